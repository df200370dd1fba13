//! Error taxonomy shared by the normalizer and its callers.
//!
//! The transform itself only ever produces [`CleanError::InvalidArgument`].
//! Every other variant is raised at a boundary (path checks, decoding,
//! uploads, file I/O) and handled there, one input or request at a time.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CleanError {
    /// Non-text input handed to the strict entry point.
    #[error("{0}")]
    InvalidArgument(String),

    /// A file reference failed one of the path-safety checks.
    #[error("unsafe file path '{path}' (failed check: {check})")]
    UnsafePath { path: String, check: &'static str },

    /// Bytes were not valid UTF-8. Recovered by substituting U+FFFD.
    #[error("invalid UTF-8 after byte {valid_up_to}; replaced undecodable bytes")]
    DecodeFailure { valid_up_to: usize },

    /// Upload rejected before the transform ran.
    #[error("{0}")]
    UnsupportedMedia(String),

    /// Malformed request (bad JSON, missing field, broken multipart body).
    #[error("{0}")]
    BadRequest(String),

    /// Request body exceeded the configured upload limit.
    #[error("request body exceeds {limit} bytes")]
    PayloadTooLarge { limit: usize },

    #[error("{0}")]
    Io(#[from] std::io::Error),
}

impl CleanError {
    /// HTTP status a request-mode failure maps to.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidArgument(_)
            | Self::UnsupportedMedia(_)
            | Self::BadRequest(_)
            | Self::DecodeFailure { .. }
            | Self::UnsafePath { .. } => 400,
            Self::PayloadTooLarge { .. } => 413,
            Self::Io(_) => 500,
        }
    }
}
