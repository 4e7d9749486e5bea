//! Minimal `multipart/form-data` encoder for a single file field.
//!
//! ureq has no multipart support, and the API only ever takes one part, so
//! the body is assembled by hand.

use super::upload::UploadFile;

/// Name of the only form field the inference API reads.
pub const FILE_FIELD: &str = "file";

/// An encoded multipart body with its boundary.
#[derive(Debug, Clone)]
pub struct MultipartBody {
    boundary: String,
    bytes: Vec<u8>,
}

impl MultipartBody {
    /// Encode `file` as the single `file` field using the given boundary.
    pub fn single_file(boundary: impl Into<String>, file: &UploadFile) -> Self {
        let boundary = boundary.into();
        let mut bytes = Vec::with_capacity(file.bytes.len() + 256);

        bytes.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
        bytes.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{FILE_FIELD}\"; filename=\"{}\"\r\n",
                escape_quotes(&file.file_name)
            )
            .as_bytes(),
        );
        bytes.extend_from_slice(format!("Content-Type: {}\r\n\r\n", file.content_type).as_bytes());
        bytes.extend_from_slice(&file.bytes);
        bytes.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

        Self { boundary, bytes }
    }

    /// Value for the request's `Content-Type` header.
    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// Generate a boundary string unlikely to collide with file content.
pub fn fresh_boundary() -> String {
    let nanos = chrono::Utc::now()
        .timestamp_nanos_opt()
        .unwrap_or_default();
    format!("----mldash{nanos:x}")
}

fn escape_quotes(name: &str) -> String {
    name.replace('"', "%22")
}
