//! Lossy UTF-8 decoding for file and upload contents.

use crate::error::CleanError;

/// Decoded text plus the decode error that was recovered from, if any.
#[derive(Debug)]
pub struct Decoded {
    pub text: String,
    /// Set when invalid bytes were replaced with U+FFFD.
    pub recovered: Option<CleanError>,
}

/// Decode `bytes` as UTF-8, replacing invalid sequences instead of failing.
pub fn decode_text(bytes: Vec<u8>) -> Decoded {
    match String::from_utf8(bytes) {
        Ok(text) => Decoded {
            text,
            recovered: None,
        },
        Err(err) => {
            let valid_up_to = err.utf8_error().valid_up_to();
            Decoded {
                text: String::from_utf8_lossy(err.as_bytes()).into_owned(),
                recovered: Some(CleanError::DecodeFailure { valid_up_to }),
            }
        }
    }
}
