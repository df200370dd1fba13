//! Minimal `multipart/form-data` parsing for file uploads.
//!
//! `tiny_http` hands us the raw body; this module splits it into parts and
//! reads the `Content-Disposition` name/filename of each. Bodies are fully
//! buffered (the server caps their size before they get here).

use crate::error::CleanError;

/// One part of a multipart body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Part {
    pub name: Option<String>,
    pub filename: Option<String>,
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

/// Extract the boundary from a `multipart/form-data` content type.
///
/// Returns `None` for any other media type or when the parameter is
/// missing.
pub fn boundary(content_type: &str) -> Option<String> {
    let mut params = split_params(content_type).into_iter();
    let media_type = params.next()?;
    if !media_type.trim().eq_ignore_ascii_case("multipart/form-data") {
        return None;
    }

    params.find_map(|param| {
        let (key, value) = param.split_once('=')?;
        if key.trim().eq_ignore_ascii_case("boundary") {
            let value = unquote(value.trim());
            (!value.is_empty()).then(|| value.to_string())
        } else {
            None
        }
    })
}

/// Split `body` into parts delimited by `boundary`.
pub fn parse(body: &[u8], boundary: &str) -> Result<Vec<Part>, CleanError> {
    let delimiter = format!("--{boundary}").into_bytes();
    let mut close = b"\r\n".to_vec();
    close.extend_from_slice(&delimiter);

    let mut pos = find(body, &delimiter, 0).ok_or_else(|| malformed("missing boundary"))?;
    let mut parts = Vec::new();

    loop {
        pos += delimiter.len();
        let rest = &body[pos..];
        if rest.starts_with(b"--") {
            return Ok(parts);
        }
        pos += line_break_len(rest).ok_or_else(|| malformed("expected line break after boundary"))?;

        let header_end =
            find(body, b"\r\n\r\n", pos).ok_or_else(|| malformed("unterminated part headers"))?;
        let headers = String::from_utf8_lossy(&body[pos..header_end]);
        let data_start = header_end + 4;

        let data_end = find(body, &close, data_start)
            .ok_or_else(|| malformed("missing closing boundary"))?;

        let mut part = Part {
            name: None,
            filename: None,
            content_type: None,
            data: body[data_start..data_end].to_vec(),
        };
        for line in headers.split("\r\n") {
            let Some((field, value)) = line.split_once(':') else {
                continue;
            };
            let field = field.trim();
            if field.eq_ignore_ascii_case("content-disposition") {
                for param in split_params(value).into_iter().skip(1) {
                    match param.split_once('=') {
                        Some((key, v)) if key.trim().eq_ignore_ascii_case("name") => {
                            part.name = Some(unquote(v.trim()).to_string());
                        }
                        Some((key, v)) if key.trim().eq_ignore_ascii_case("filename") => {
                            part.filename = Some(unquote(v.trim()).to_string());
                        }
                        _ => {}
                    }
                }
            } else if field.eq_ignore_ascii_case("content-type") {
                part.content_type = Some(value.trim().to_string());
            }
        }
        parts.push(part);

        // Skip the CRLF that belongs to the next delimiter.
        pos = data_end + 2;
    }
}

/// First part whose form field name is `name`.
pub fn find_part<'a>(parts: &'a [Part], name: &str) -> Option<&'a Part> {
    parts.iter().find(|p| p.name.as_deref() == Some(name))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn malformed(reason: &str) -> CleanError {
    CleanError::BadRequest(format!("Malformed multipart body: {reason}"))
}

fn find(haystack: &[u8], needle: &[u8], from: usize) -> Option<usize> {
    if from > haystack.len() || needle.is_empty() {
        return None;
    }
    haystack[from..]
        .windows(needle.len())
        .position(|window| window == needle)
        .map(|i| i + from)
}

fn line_break_len(rest: &[u8]) -> Option<usize> {
    if rest.starts_with(b"\r\n") {
        Some(2)
    } else if rest.starts_with(b"\n") {
        Some(1)
    } else {
        None
    }
}

/// Split a header value on `;`, ignoring separators inside double quotes.
fn split_params(value: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut in_quotes = false;
    let mut start = 0;

    for (i, c) in value.char_indices() {
        match c {
            '"' => in_quotes = !in_quotes,
            ';' if !in_quotes => {
                out.push(value[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    out.push(value[start..].trim());
    out
}

fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
