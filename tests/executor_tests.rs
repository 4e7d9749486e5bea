/// Request executor tests.
///
/// Network behaviour is driven through an in-process fake transport, so no
/// inference service is needed.
mod common;

use common::{CLASSIFICATION_BODY, FakeTransport};
use mldash::client::{ExecuteError, OutcomeStatus, RequestExecutor, UploadFile};
use mldash::registry::{self, HttpMethod};

fn executor(transport: FakeTransport) -> RequestExecutor<FakeTransport> {
    RequestExecutor::new("http://api.test/", transport)
}

fn csv() -> UploadFile {
    UploadFile::new("reviews.csv", b"text\ngreat\n".to_vec())
}

// ---------------------------------------------------------------------------
// Missing input
// ---------------------------------------------------------------------------

#[test]
fn file_endpoints_without_file_never_call_transport() {
    let exec = executor(FakeTransport::new());
    for ep in registry::all().iter().filter(|e| e.accepts_file) {
        let outcome = exec.execute(ep, None);
        assert_eq!(outcome.status, OutcomeStatus::Failure);
        assert_eq!(outcome.error, Some(ExecuteError::MissingInput));
        assert_eq!(
            outcome.error_message().as_deref(),
            Some("Please upload a file first")
        );
    }
    assert_eq!(exec.transport().calls(), 0);
}

// ---------------------------------------------------------------------------
// Request shape
// ---------------------------------------------------------------------------

#[test]
fn get_requests_have_no_body() {
    let exec = executor(FakeTransport::new().reply(200, r#"{"status":"healthy"}"#));
    let outcome = exec.execute(registry::lookup("health").unwrap(), Some(&csv()));

    assert!(outcome.is_success());
    let requests = exec.transport().requests.borrow();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, HttpMethod::Get);
    assert_eq!(requests[0].url, "http://api.test/health");
    assert!(requests[0].body.is_none());
}

#[test]
fn post_requests_send_one_file_field() {
    let exec = executor(FakeTransport::new().reply(200, CLASSIFICATION_BODY));
    let ep = registry::lookup("text-classification").unwrap();
    let outcome = exec.execute(ep, Some(&csv()));

    assert!(outcome.is_success());
    assert_eq!(outcome.payload().unwrap()["total_predictions"], 1);

    let requests = exec.transport().requests.borrow();
    assert_eq!(requests[0].method, HttpMethod::Post);
    assert_eq!(
        requests[0].url,
        "http://api.test/api/predict/text-classification"
    );
    let body = requests[0].body.as_ref().unwrap();
    assert!(body.content_type().starts_with("multipart/form-data; boundary="));
    let text = String::from_utf8_lossy(body.as_bytes());
    assert_eq!(text.matches("Content-Disposition").count(), 1);
    assert!(text.contains(r#"name="file"; filename="reviews.csv""#));
    assert!(text.contains("Content-Type: text/csv"));
    assert!(text.contains("text\ngreat\n"));
}

// ---------------------------------------------------------------------------
// Failures
// ---------------------------------------------------------------------------

#[test]
fn status_errors_surface_detail() {
    let exec = executor(
        FakeTransport::new().reply(400, r#"{"detail":"CSV must contain a 'text' column"}"#),
    );
    let outcome = exec.execute(registry::lookup("sentiment-analysis").unwrap(), Some(&csv()));

    assert_eq!(outcome.status, OutcomeStatus::Failure);
    assert!(outcome.payload().is_none());
    assert_eq!(
        outcome.error,
        Some(ExecuteError::Status {
            status: 400,
            message: "CSV must contain a 'text' column".to_string(),
        })
    );
    assert_eq!(
        outcome.error_message().as_deref(),
        Some("CSV must contain a 'text' column")
    );
}

#[test]
fn status_errors_without_detail_use_status_code() {
    let exec = executor(FakeTransport::new().reply(503, "Service Unavailable"));
    let outcome = exec.execute(registry::lookup("models").unwrap(), None);
    assert_eq!(
        outcome.error_message().as_deref(),
        Some("request failed with status code 503")
    );
}

#[test]
fn transport_errors_become_failures() {
    let exec = executor(FakeTransport::new().fail("Connection refused"));
    let outcome = exec.execute(registry::lookup("health").unwrap(), None);
    assert_eq!(
        outcome.error,
        Some(ExecuteError::Transport("Connection refused".to_string()))
    );
    assert_eq!(exec.transport().calls(), 1);
}

#[test]
fn non_json_success_is_invalid_response() {
    let exec = executor(FakeTransport::new().reply(200, "<html>ok</html>"));
    let outcome = exec.execute(registry::lookup("health").unwrap(), None);
    assert!(matches!(outcome.error, Some(ExecuteError::InvalidResponse(_))));
    assert!(outcome.payload().is_none());
}

#[test]
fn each_execute_is_one_attempt() {
    let exec = executor(FakeTransport::new().fail("timeout").reply(200, "{}"));
    let ep = registry::lookup("health").unwrap();
    assert!(!exec.execute(ep, None).is_success());
    assert_eq!(exec.transport().calls(), 1);
    assert!(exec.execute(ep, None).is_success());
    assert_eq!(exec.transport().calls(), 2);
}
