//! JSON API handlers for the web interface.
//!
//! Handlers take the already-buffered request body and return a [`Reply`]
//! (status + serializable body). Turning a reply into a `tiny_http`
//! response happens in [`respond`], so every handler is testable without a
//! socket.

use std::io::Cursor;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tiny_http::{Response, StatusCode};

use crate::analytics::logger::{self, Source};
use crate::error::CleanError;
use crate::normalizer::{self, UnicodeInfo};

use super::{WebSettings, content_type_json, multipart};

// ---------------------------------------------------------------------------
// JSON request / response types
// ---------------------------------------------------------------------------

/// Body of `POST /api/clean-text` and `POST /api/analyze`.
///
/// `text` stays untyped so that a non-string reaches the strict normalizer
/// entry point and is reported as an invalid argument.
#[derive(Debug, Deserialize)]
struct TextCleanRequest {
    text: serde_json::Value,
    /// Accepted for compatibility with existing clients; has no effect.
    #[serde(default = "default_true")]
    #[allow(dead_code)]
    preserve_formatting: bool,
}

fn default_true() -> bool {
    true
}

/// Result of a clean operation, successful or not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub cleaned_text: Option<String>,
    /// Length of the input, in characters.
    pub original_size: usize,
    /// Length of the output, in characters.
    pub cleaned_size: usize,
    pub changes_made: usize,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub error: Option<String>,
}

impl CleanResponse {
    fn cleaned(original: &str, cleaned: String) -> Self {
        Self {
            success: true,
            original_size: original.chars().count(),
            cleaned_size: cleaned.chars().count(),
            changes_made: normalizer::count_changes(original, &cleaned),
            cleaned_text: Some(cleaned),
            error: None,
        }
    }

    fn failure(error: impl Into<String>, original_size: usize) -> Self {
        Self {
            success: false,
            cleaned_text: None,
            original_size,
            cleaned_size: 0,
            changes_made: 0,
            error: Some(error.into()),
        }
    }
}

/// Result of `POST /api/analyze`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub info: Option<UnicodeInfo>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub error: Option<String>,
}

/// Liveness probe payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
}

/// A handler result: HTTP status plus JSON body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply<T> {
    pub status: u16,
    pub body: T,
}

impl<T> Reply<T> {
    fn ok(body: T) -> Self {
        Self { status: 200, body }
    }

    fn error(err: &CleanError, body: T) -> Self {
        Self {
            status: err.status_code(),
            body,
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Serialize a reply into a JSON response.
pub fn respond<T: Serialize>(reply: &Reply<T>) -> Result<Response<Cursor<Vec<u8>>>> {
    let body = serde_json::to_string(&reply.body).context("failed to serialize JSON response")?;
    Ok(Response::from_data(body.into_bytes())
        .with_header(content_type_json())
        .with_status_code(StatusCode(reply.status)))
}

fn parse_text_request(body: &[u8]) -> Result<TextCleanRequest, CleanError> {
    serde_json::from_slice(body)
        .map_err(|e| CleanError::BadRequest(format!("Invalid request body: {e}")))
}

fn has_allowed_extension(filename: &str, allowed: &[String]) -> bool {
    let lower = filename.to_lowercase();
    allowed
        .iter()
        .any(|ext| lower.ends_with(&ext.to_lowercase()))
}

// ---------------------------------------------------------------------------
// API Handlers
// ---------------------------------------------------------------------------

/// `POST /api/clean-text`: clean text supplied as `{ "text": "..." }`.
pub fn clean_text(body: &[u8], settings: &WebSettings) -> Reply<CleanResponse> {
    let request = match parse_text_request(body) {
        Ok(request) => request,
        Err(err) => return Reply::error(&err, CleanResponse::failure(err.to_string(), 0)),
    };

    if let serde_json::Value::String(text) = &request.text
        && text.trim().is_empty()
    {
        let err = CleanError::BadRequest("No text provided".to_string());
        return Reply::error(&err, CleanResponse::failure(err.to_string(), text.chars().count()));
    }

    match normalizer::clean_value(&request.text, settings.platform) {
        Ok(cleaned) => {
            let original = request.text.as_str().unwrap_or_default();
            if settings.log {
                logger::log_clean(Source::Text, None, original, &cleaned);
            }
            Reply::ok(CleanResponse::cleaned(original, cleaned))
        }
        Err(err) => {
            if settings.log {
                logger::log_failure(Source::Text, None, &err.to_string());
            }
            Reply::error(&err, CleanResponse::failure(err.to_string(), 0))
        }
    }
}

/// `POST /api/clean-file`: clean a `multipart/form-data` upload in the
/// `file` field.
pub fn clean_file(
    content_type: Option<&str>,
    body: &[u8],
    settings: &WebSettings,
) -> Reply<CleanResponse> {
    match read_upload(content_type, body, settings) {
        Ok((filename, text)) => {
            let cleaned = normalizer::clean(&text, settings.platform);
            if settings.log {
                logger::log_clean(Source::Upload, Some(&filename), &text, &cleaned);
            }
            Reply::ok(CleanResponse::cleaned(&text, cleaned))
        }
        Err((filename, err)) => {
            if settings.log {
                logger::log_failure(Source::Upload, filename.as_deref(), &err.to_string());
            }
            Reply::error(&err, CleanResponse::failure(err.to_string(), 0))
        }
    }
}

/// Validate an upload and return its filename and decoded text.
///
/// On failure, the filename (if one was found) travels with the error so
/// it can be logged.
fn read_upload(
    content_type: Option<&str>,
    body: &[u8],
    settings: &WebSettings,
) -> Result<(String, String), (Option<String>, CleanError)> {
    let boundary = content_type.and_then(multipart::boundary).ok_or_else(|| {
        (
            None,
            CleanError::BadRequest("Expected a multipart/form-data upload".to_string()),
        )
    })?;

    let parts = multipart::parse(body, &boundary).map_err(|e| (None, e))?;
    let part = multipart::find_part(&parts, "file")
        .ok_or_else(|| (None, CleanError::BadRequest("No file uploaded".to_string())))?;

    let filename = part.filename.clone().unwrap_or_default();
    if filename.is_empty() || !has_allowed_extension(&filename, &settings.allowed_extensions) {
        return Err((
            Some(filename),
            CleanError::UnsupportedMedia("Unsupported file type".to_string()),
        ));
    }

    let decoded = normalizer::decode_text(part.data.clone());
    if let Some(recovered) = &decoded.recovered {
        eprintln!("warning: upload {filename}: {recovered}");
    }

    if decoded.text.trim().is_empty() {
        return Err((
            Some(filename),
            CleanError::UnsupportedMedia("File appears to be empty".to_string()),
        ));
    }

    Ok((filename, decoded.text))
}

/// `POST /api/analyze`: character statistics for `{ "text": "..." }`.
pub fn analyze(body: &[u8]) -> Reply<AnalyzeResponse> {
    let failure = |err: CleanError| {
        Reply::error(
            &err,
            AnalyzeResponse {
                success: false,
                info: None,
                error: Some(err.to_string()),
            },
        )
    };

    let request = match parse_text_request(body) {
        Ok(request) => request,
        Err(err) => return failure(err),
    };

    match request.text.as_str() {
        Some(text) => Reply::ok(AnalyzeResponse {
            success: true,
            info: Some(normalizer::analyze(text)),
            error: None,
        }),
        None => failure(CleanError::InvalidArgument(
            "Input must be a string".to_string(),
        )),
    }
}

/// `GET /health`: liveness probe.
pub fn health() -> Reply<HealthResponse> {
    Reply::ok(HealthResponse {
        status: "healthy".to_string(),
        service: "UnicodeFix Web Interface".to_string(),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
