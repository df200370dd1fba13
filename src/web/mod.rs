//! Embedded web interface for unicodefix.
//!
//! Provides a lightweight HTTP server (sync, via `tiny_http`) that serves:
//! - A single-page form for pasting text or uploading a file
//! - JSON API endpoints that clean text, clean uploads, and report stats
//! - A liveness probe
//!
//! Launched via `unicodefix serve` (default: `http://127.0.0.1:8000`).

mod api;
mod frontend;
pub mod multipart;

pub use api::{AnalyzeResponse, CleanResponse, HealthResponse, Reply};

use std::io::{Cursor, Read};
use std::net::SocketAddr;

use anyhow::{Context, Result};
use tiny_http::{Header, Method, Request, Response, Server, StatusCode};

use crate::config::UnicodeFixConfig;
use crate::error::CleanError;
use crate::normalizer::Platform;

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

/// Per-server settings resolved from configuration.
#[derive(Debug, Clone)]
pub struct WebSettings {
    pub platform: Platform,
    pub max_upload_bytes: usize,
    pub allowed_extensions: Vec<String>,
    /// Append a record per clean to the clean log.
    pub log: bool,
}

impl WebSettings {
    pub fn from_config(config: &UnicodeFixConfig) -> Self {
        Self {
            platform: config.general.platform.resolve(),
            max_upload_bytes: config.web.max_upload_bytes,
            allowed_extensions: config.web.allowed_extensions.clone(),
            log: config.logging.enabled,
        }
    }
}

impl Default for WebSettings {
    fn default() -> Self {
        Self::from_config(&UnicodeFixConfig::default())
    }
}

// ---------------------------------------------------------------------------
// Server entry point
// ---------------------------------------------------------------------------

/// Start the web server on `config.web.addr`.
///
/// Blocks the current thread. Requests are handled sequentially; the
/// normalizer holds no shared state, so nothing needs coordinating.
pub fn serve(config: &UnicodeFixConfig) -> Result<()> {
    let server = bind(&config.web.addr)?;
    let addr = local_addr(&server)
        .map(|a| a.to_string())
        .unwrap_or_else(|| config.web.addr.clone());

    println!("UnicodeFix web interface running at http://{addr}");
    println!("Press Ctrl+C to stop.\n");

    if config.web.open_browser {
        // Best-effort
        let _ = open_browser(&format!("http://{addr}"));
    }

    run(&server, &WebSettings::from_config(config));
    Ok(())
}

/// Bind a server without starting the request loop.
pub fn bind(addr: &str) -> Result<Server> {
    Server::http(addr).map_err(|e| anyhow::anyhow!("failed to start HTTP server on {addr}: {e}"))
}

/// The socket address a bound server listens on.
pub fn local_addr(server: &Server) -> Option<SocketAddr> {
    server.server_addr().to_ip()
}

/// Handle requests until the server shuts down. One failing request never
/// takes the loop down.
pub fn run(server: &Server, settings: &WebSettings) {
    for mut request in server.incoming_requests() {
        let method = request.method().clone();
        let url = request.url().to_string();

        let response = handle(&mut request, &method, &url, settings);
        let status = response.status_code().0;
        let _ = request.respond(response);

        // Brief access log
        println!(
            "{} {} {} {}",
            method,
            url,
            status,
            chrono::Local::now().format("%H:%M:%S")
        );
    }
}

fn handle(
    request: &mut Request,
    method: &Method,
    url: &str,
    settings: &WebSettings,
) -> Response<Cursor<Vec<u8>>> {
    // Read body up-front for methods that carry one
    let body = if matches!(method, Method::Put | Method::Post | Method::Patch) {
        match read_limited(request.as_reader(), settings.max_upload_bytes) {
            Ok(buf) => buf,
            Err(err) => return error_response(&err),
        }
    } else {
        Vec::new()
    };

    let content_type = request
        .headers()
        .iter()
        .find(|h| h.field.equiv("Content-Type"))
        .map(|h| h.value.as_str().to_string());

    match dispatch(method, url, content_type.as_deref(), &body, settings) {
        Ok(resp) => resp,
        Err(e) => {
            let body = serde_json::json!({ "error": e.to_string() }).to_string();
            Response::from_data(body.into_bytes())
                .with_header(content_type_json())
                .with_status_code(StatusCode(500))
        }
    }
}

/// Read at most `limit` bytes; anything beyond is a [`CleanError::PayloadTooLarge`].
pub fn read_limited<R: Read + ?Sized>(reader: &mut R, limit: usize) -> Result<Vec<u8>, CleanError> {
    let mut buf = Vec::new();
    reader
        .take(limit as u64 + 1)
        .read_to_end(&mut buf)?;
    if buf.len() > limit {
        return Err(CleanError::PayloadTooLarge { limit });
    }
    Ok(buf)
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Dispatch a buffered request to the appropriate handler.
pub fn dispatch(
    method: &Method,
    url: &str,
    content_type: Option<&str>,
    body: &[u8],
    settings: &WebSettings,
) -> Result<Response<Cursor<Vec<u8>>>> {
    // Strip query string for path matching
    let path = url.split('?').next().unwrap_or(url);

    match (method, path) {
        // Frontend
        (&Method::Get, "/") | (&Method::Get, "/index.html") => Ok(serve_frontend()),

        // API
        (&Method::Post, "/api/clean-text") => api::respond(&api::clean_text(body, settings)),
        (&Method::Post, "/api/clean-file") => {
            api::respond(&api::clean_file(content_type, body, settings))
        }
        (&Method::Post, "/api/analyze") => api::respond(&api::analyze(body)),

        // Liveness
        (&Method::Get, "/health") | (&Method::Get, "/api/health") => api::respond(&api::health()),

        // 404
        _ => Ok(not_found()),
    }
}

// ---------------------------------------------------------------------------
// Response helpers
// ---------------------------------------------------------------------------

/// Serve the embedded single-page frontend.
fn serve_frontend() -> Response<Cursor<Vec<u8>>> {
    Response::from_data(frontend::INDEX_HTML.as_bytes().to_vec())
        .with_header(content_type_html())
        .with_status_code(StatusCode(200))
}

/// 404 response.
fn not_found() -> Response<Cursor<Vec<u8>>> {
    let body = r#"{"error": "not found"}"#;
    Response::from_data(body.as_bytes().to_vec())
        .with_header(content_type_json())
        .with_status_code(StatusCode(404))
}

/// Failure before routing (e.g. oversized body), shaped like a clean response.
fn error_response(err: &CleanError) -> Response<Cursor<Vec<u8>>> {
    let body = serde_json::json!({
        "success": false,
        "original_size": 0,
        "cleaned_size": 0,
        "changes_made": 0,
        "error": err.to_string(),
    })
    .to_string();
    Response::from_data(body.into_bytes())
        .with_header(content_type_json())
        .with_status_code(StatusCode(err.status_code()))
}

/// JSON content type header.
pub(crate) fn content_type_json() -> Header {
    Header::from_bytes("Content-Type", "application/json; charset=utf-8")
        .expect("static header is valid")
}

/// HTML content type header.
fn content_type_html() -> Header {
    Header::from_bytes("Content-Type", "text/html; charset=utf-8").expect("static header is valid")
}

/// Attempt to open a URL in the system default browser.
fn open_browser(url: &str) -> Result<()> {
    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/C", "start", url])
            .spawn()
            .context("failed to open browser")?;
    }

    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open")
            .arg(url)
            .spawn()
            .context("failed to open browser")?;
    }

    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open")
            .arg(url)
            .spawn()
            .context("failed to open browser")?;
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
