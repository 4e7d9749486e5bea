//! Shared test doubles for the integration tests.
#![allow(dead_code)]

use std::cell::RefCell;

use mldash::client::{HttpRequest, HttpResponse, Transport};

/// In-process transport: records every request and replays queued answers.
///
/// With an empty queue it answers `200 {}`.
#[derive(Default)]
pub struct FakeTransport {
    pub requests: RefCell<Vec<HttpRequest>>,
    replies: RefCell<Vec<Result<HttpResponse, String>>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a reply with the given status and body.
    pub fn reply(self, status: u16, body: &str) -> Self {
        self.replies.borrow_mut().push(Ok(HttpResponse {
            status,
            body: body.to_string(),
        }));
        self
    }

    /// Queue a transport-level failure.
    pub fn fail(self, message: &str) -> Self {
        self.replies.borrow_mut().push(Err(message.to_string()));
        self
    }

    pub fn calls(&self) -> usize {
        self.requests.borrow().len()
    }
}

impl Transport for FakeTransport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, String> {
        self.requests.borrow_mut().push(request.clone());
        let mut replies = self.replies.borrow_mut();
        if replies.is_empty() {
            Ok(HttpResponse {
                status: 200,
                body: "{}".to_string(),
            })
        } else {
            replies.remove(0)
        }
    }
}

pub const CLASSIFICATION_BODY: &str = r#"{
    "success": true,
    "model": "text-classification",
    "model_name": "DistilBERT",
    "filename": "reviews.csv",
    "total_predictions": 1,
    "summary": {"positive": 1, "negative": 0},
    "predictions": [
        {"id": 1, "text": "great", "prediction": "positive", "confidence": 0.93}
    ]
}"#;
