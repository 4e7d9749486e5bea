//! HTTP transport seam.
//!
//! The executor never talks to ureq directly; it hands an [`HttpRequest`]
//! to a [`Transport`]. Production code uses [`UreqTransport`]; tests plug in
//! a fake that counts calls and returns canned responses.

use crate::registry::HttpMethod;

use super::multipart::MultipartBody;

/// A fully built request, ready to send.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub body: Option<MultipartBody>,
}

/// Any HTTP response that made it back, regardless of status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends one request and waits for the answer.
///
/// `Err` is reserved for failures where no response exists at all
/// (connection refused, DNS, broken body). Non-2xx responses are `Ok`.
pub trait Transport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, String>;
}

/// Blocking transport backed by `ureq`.
///
/// No overall timeout is set; ureq's defaults apply.
#[derive(Debug, Default, Clone, Copy)]
pub struct UreqTransport;

impl Transport for UreqTransport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, String> {
        let result = match (&request.method, &request.body) {
            (HttpMethod::Get, _) => ureq::get(&request.url)
                .set("accept", "application/json")
                .call(),
            (HttpMethod::Post, Some(body)) => ureq::post(&request.url)
                .set("accept", "application/json")
                .set("Content-Type", &body.content_type())
                .send_bytes(body.as_bytes()),
            (HttpMethod::Post, None) => ureq::post(&request.url)
                .set("accept", "application/json")
                .call(),
        };

        match result {
            Ok(resp) => read_response(resp),
            Err(ureq::Error::Status(_, resp)) => read_response(resp),
            Err(ureq::Error::Transport(t)) => Err(t.to_string()),
        }
    }
}

fn read_response(resp: ureq::Response) -> Result<HttpResponse, String> {
    let status = resp.status();
    let body = resp
        .into_string()
        .map_err(|e| format!("failed to read response body: {e}"))?;
    Ok(HttpResponse { status, body })
}
