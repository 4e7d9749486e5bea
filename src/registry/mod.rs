//! Static endpoint registry for the inference API.
//!
//! Every request the dashboard can issue is described here once: method,
//! path, which kind of upload it needs, and the metadata shown next to it.
//! Nothing in this module is configurable at runtime; the base URL is
//! supplied separately by the caller.

pub mod catalogue;

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::client::UploadFile;

pub use catalogue::{ModelInfo, ModelKind, catalogue, model};

/// Registry lookup failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("unknown endpoint: {0}")]
    NotFound(String),
    #[error("unknown model: {0}")]
    UnknownModel(String),
}

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// HTTP method used by an endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Get => write!(f, "GET"),
            Self::Post => write!(f, "POST"),
        }
    }
}

/// Kind of file an endpoint accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Csv,
    Image,
    None,
}

impl FileKind {
    /// Extension used for the placeholder file name in curl examples.
    pub fn sample_extension(self) -> &'static str {
        match self {
            Self::Image => "jpg",
            Self::Csv | Self::None => "csv",
        }
    }

    /// Browser `accept` attribute for the upload control.
    pub fn accept_attr(self) -> &'static str {
        match self {
            Self::Csv => ".csv",
            Self::Image => "image/*",
            Self::None => "",
        }
    }

    /// Whether `file` can be sent to an endpoint of this kind. Endpoints
    /// that take no file accept nothing.
    pub fn accepts(self, file: &UploadFile) -> bool {
        self != Self::None && file.kind() == self
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Csv => write!(f, "csv"),
            Self::Image => write!(f, "image"),
            Self::None => write!(f, "none"),
        }
    }
}

/// One logical capability exposed by the inference API.
#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct EndpointDescriptor {
    pub id: &'static str,
    pub method: HttpMethod,
    pub path: &'static str,
    pub display_name: &'static str,
    pub description: &'static str,
    pub accepts_file: bool,
    pub file_kind: FileKind,
    pub accent_color: &'static str,
}

// ---------------------------------------------------------------------------
// Registry content
// ---------------------------------------------------------------------------

static ENDPOINTS: [EndpointDescriptor; 5] = [
    EndpointDescriptor {
        id: "health",
        method: HttpMethod::Get,
        path: "/health",
        display_name: "Health Check",
        description: "Check if the API is running and all models are loaded",
        accepts_file: false,
        file_kind: FileKind::None,
        accent_color: "#10b981",
    },
    EndpointDescriptor {
        id: "models",
        method: HttpMethod::Get,
        path: "/api/models",
        display_name: "List Models",
        description: "Get all available models with their details and status",
        accepts_file: false,
        file_kind: FileKind::None,
        accent_color: "#6366f1",
    },
    EndpointDescriptor {
        id: "text-classification",
        method: HttpMethod::Post,
        path: "/api/predict/text-classification",
        display_name: "Text Classification",
        description: "Classify texts as positive or negative using DistilBERT",
        accepts_file: true,
        file_kind: FileKind::Csv,
        accent_color: "#6366f1",
    },
    EndpointDescriptor {
        id: "sentiment-analysis",
        method: HttpMethod::Post,
        path: "/api/predict/sentiment-analysis",
        display_name: "Sentiment Analysis",
        description: "3-class sentiment analysis using RoBERTa",
        accepts_file: true,
        file_kind: FileKind::Csv,
        accent_color: "#8b5cf6",
    },
    EndpointDescriptor {
        id: "image-caption",
        method: HttpMethod::Post,
        path: "/api/predict/image-caption",
        display_name: "Image Captioning",
        description: "Generate captions for images using BLIP",
        accepts_file: true,
        file_kind: FileKind::Image,
        accent_color: "#10b981",
    },
];

/// All endpoints, in display order.
pub fn all() -> &'static [EndpointDescriptor] {
    &ENDPOINTS
}

/// Look up an endpoint by id.
pub fn lookup(id: &str) -> Result<&'static EndpointDescriptor, RegistryError> {
    ENDPOINTS
        .iter()
        .find(|e| e.id == id)
        .ok_or_else(|| RegistryError::NotFound(id.to_string()))
}

/// Build the curl command shown next to an endpoint.
pub fn curl_command(base_url: &str, endpoint: &EndpointDescriptor) -> String {
    let url = format!("{}{}", base_url.trim_end_matches('/'), endpoint.path);
    match endpoint.method {
        HttpMethod::Get => format!("curl -X GET '{url}' \\\n  -H 'accept: application/json'"),
        HttpMethod::Post => format!(
            "curl -X POST '{url}' \\\n  -H 'accept: application/json' \\\n  \
             -H 'Content-Type: multipart/form-data' \\\n  -F 'file=@your_file.{}'",
            endpoint.file_kind.sample_extension()
        ),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
