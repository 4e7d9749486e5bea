//! Request executor for the external inference API.
//!
//! Turns an [`EndpointDescriptor`] plus an optional [`UploadFile`] into a
//! single HTTP call and folds whatever happens into a [`RequestOutcome`].
//! The executor never retries, never caches, and never returns `Err`:
//! every failure becomes a failed outcome carrying one user-visible message.
//!
//! The base URL is injected at construction so tests can point the executor
//! at a fake [`Transport`].

pub mod multipart;
pub mod transport;
pub mod upload;

use std::time::Instant;

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::DashConfig;
use crate::registry::{EndpointDescriptor, HttpMethod};

use multipart::{MultipartBody, fresh_boundary};
pub use transport::{HttpRequest, HttpResponse, Transport, UreqTransport};
pub use upload::UploadFile;

// ---------------------------------------------------------------------------
// Outcome types
// ---------------------------------------------------------------------------

/// Why an execution failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecuteError {
    /// The endpoint needs a file and none was supplied. Never reaches the network.
    #[error("Please upload a file first")]
    MissingInput,
    /// No response at all: connection refused, DNS failure, broken body.
    #[error("{0}")]
    Transport(String),
    /// The server answered with a non-2xx status.
    #[error("{message}")]
    Status { status: u16, message: String },
    /// A 2xx response whose body is not JSON.
    #[error("invalid JSON in response: {0}")]
    InvalidResponse(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeStatus {
    Success,
    Failure,
}

/// Result of one execution.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestOutcome {
    pub status: OutcomeStatus,
    pub payload: Option<Value>,
    pub error: Option<ExecuteError>,
    pub elapsed_ms: u64,
}

impl RequestOutcome {
    fn success(payload: Value, elapsed_ms: u64) -> Self {
        Self {
            status: OutcomeStatus::Success,
            payload: Some(payload),
            error: None,
            elapsed_ms,
        }
    }

    fn failure(error: ExecuteError, elapsed_ms: u64) -> Self {
        Self {
            status: OutcomeStatus::Failure,
            payload: None,
            error: Some(error),
            elapsed_ms,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == OutcomeStatus::Success
    }

    /// The single user-visible error string, if the execution failed.
    pub fn error_message(&self) -> Option<String> {
        self.error.as_ref().map(ToString::to_string)
    }

    /// Payload of a successful outcome.
    pub fn payload(&self) -> Option<&Value> {
        match self.status {
            OutcomeStatus::Success => self.payload.as_ref(),
            OutcomeStatus::Failure => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Executor
// ---------------------------------------------------------------------------

/// Issues requests against one inference API base URL.
#[derive(Debug)]
pub struct RequestExecutor<T: Transport = UreqTransport> {
    base_url: String,
    transport: T,
}

impl RequestExecutor<UreqTransport> {
    /// Production executor for the configured API.
    pub fn from_config(config: &DashConfig) -> Self {
        Self::new(&config.api.base_url, UreqTransport)
    }
}

impl<T: Transport> RequestExecutor<T> {
    pub fn new(base_url: &str, transport: T) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            transport,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Full URL for an endpoint.
    pub fn url_for(&self, endpoint: &EndpointDescriptor) -> String {
        format!("{}{}", self.base_url, endpoint.path)
    }

    /// Execute one request. Exactly one transport call is made unless the
    /// endpoint needs a file and none was given.
    pub fn execute(
        &self,
        endpoint: &EndpointDescriptor,
        file: Option<&UploadFile>,
    ) -> RequestOutcome {
        let start = Instant::now();

        let body = if endpoint.accepts_file {
            match file {
                Some(f) => Some(MultipartBody::single_file(fresh_boundary(), f)),
                None => {
                    warn!(endpoint = endpoint.id, "no file selected, request not sent");
                    return RequestOutcome::failure(ExecuteError::MissingInput, elapsed_ms(start));
                }
            }
        } else {
            None
        };

        let request = HttpRequest {
            method: endpoint.method,
            url: self.url_for(endpoint),
            body: match endpoint.method {
                HttpMethod::Get => None,
                HttpMethod::Post => body,
            },
        };

        let result = self.transport.send(&request);
        let elapsed = elapsed_ms(start);
        let status = result.as_ref().map(|r| r.status).ok();

        let outcome = match result {
            Err(text) => RequestOutcome::failure(ExecuteError::Transport(text), elapsed),
            Ok(resp) if !resp.is_success() => RequestOutcome::failure(
                ExecuteError::Status {
                    status: resp.status,
                    message: error_message_from_body(resp.status, &resp.body),
                },
                elapsed,
            ),
            Ok(resp) => match serde_json::from_str::<Value>(&resp.body) {
                Ok(payload) => RequestOutcome::success(payload, elapsed),
                Err(e) => {
                    RequestOutcome::failure(ExecuteError::InvalidResponse(e.to_string()), elapsed)
                }
            },
        };

        match &outcome.error {
            None => info!(
                endpoint = endpoint.id,
                method = %endpoint.method,
                url = %request.url,
                status = ?status,
                elapsed_ms = elapsed,
                "request succeeded"
            ),
            Some(err) => warn!(
                endpoint = endpoint.id,
                method = %endpoint.method,
                url = %request.url,
                status = ?status,
                elapsed_ms = elapsed,
                error = %err,
                "request failed"
            ),
        }

        outcome
    }
}

fn elapsed_ms(start: Instant) -> u64 {
    start.elapsed().as_millis() as u64
}

/// Pick the user-visible message for a non-2xx response.
///
/// FastAPI puts it in `detail`; some handlers use `error`. Anything else
/// falls back to the status line.
fn error_message_from_body(status: u16, body: &str) -> String {
    let fallback = || format!("request failed with status code {status}");

    let Ok(value) = serde_json::from_str::<Value>(body) else {
        return fallback();
    };

    for key in ["detail", "error"] {
        match value.get(key) {
            Some(Value::String(s)) if !s.is_empty() => return s.clone(),
            // FastAPI validation errors: a list of {msg, loc, ...}
            Some(Value::Array(items)) if !items.is_empty() => {
                let msgs: Vec<&str> = items
                    .iter()
                    .filter_map(|i| i.get("msg").and_then(Value::as_str))
                    .collect();
                if !msgs.is_empty() {
                    return msgs.join("; ");
                }
            }
            _ => {}
        }
    }

    fallback()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_from_detail() {
        let body = r#"{"detail": "CSV must have a 'text' column"}"#;
        assert_eq!(
            error_message_from_body(400, body),
            "CSV must have a 'text' column"
        );
    }

    #[test]
    fn message_from_error_field() {
        assert_eq!(error_message_from_body(500, r#"{"error":"boom"}"#), "boom");
    }

    #[test]
    fn message_from_validation_list() {
        let body = r#"{"detail":[{"loc":["body","file"],"msg":"field required"}]}"#;
        assert_eq!(error_message_from_body(422, body), "field required");
    }

    #[test]
    fn message_falls_back_to_status() {
        assert_eq!(
            error_message_from_body(502, "<html>bad gateway</html>"),
            "request failed with status code 502"
        );
        assert_eq!(
            error_message_from_body(500, "{}"),
            "request failed with status code 500"
        );
    }

    #[test]
    fn executor_trims_base_url() {
        let exec = RequestExecutor::new("http://localhost:8000//", UreqTransport);
        assert_eq!(exec.base_url(), "http://localhost:8000");
        let ep = crate::registry::lookup("health").unwrap();
        assert_eq!(exec.url_for(ep), "http://localhost:8000/health");
    }

    #[test]
    fn failed_outcome_hides_payload() {
        let outcome = RequestOutcome::failure(ExecuteError::MissingInput, 0);
        assert!(outcome.payload().is_none());
        assert_eq!(
            outcome.error_message().as_deref(),
            Some("Please upload a file first")
        );
    }
}
