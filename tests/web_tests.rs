/// HTTP tests against a live server bound to an ephemeral port.
use std::thread;

use serde_json::{Value, json};
use unicodefix::normalizer::Platform;
use unicodefix::web::{self, CleanResponse, WebSettings};

fn start_server(settings: WebSettings) -> String {
    let server = web::bind("127.0.0.1:0").unwrap();
    let addr = web::local_addr(&server).unwrap();
    thread::spawn(move || web::run(&server, &settings));
    format!("http://{addr}")
}

fn posix_settings() -> WebSettings {
    WebSettings {
        platform: Platform::Posix,
        log: false,
        ..WebSettings::default()
    }
}

fn multipart_body(boundary: &str, filename: &str, data: &[u8]) -> Vec<u8> {
    let mut body = format!(
        "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\nContent-Type: text/plain\r\n\r\n"
    )
    .into_bytes();
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());
    body
}

fn error_body(err: ureq::Error) -> (u16, CleanResponse) {
    match err {
        ureq::Error::Status(code, resp) => (code, resp.into_json().unwrap()),
        other => panic!("expected status error, got {other}"),
    }
}

// ===========================================================================
// 1. Text cleaning
// ===========================================================================

#[test]
fn clean_text_endpoint() {
    let base = start_server(posix_settings());

    let resp: CleanResponse = ureq::post(&format!("{base}/api/clean-text"))
        .send_json(json!({ "text": "It\u{2019}s \u{2014} great\u{2026}", "preserve_formatting": false }))
        .unwrap()
        .into_json()
        .unwrap();

    assert!(resp.success);
    assert_eq!(resp.cleaned_text.as_deref(), Some("It's - great..."));
    assert_eq!(resp.original_size, 13);
    assert_eq!(resp.cleaned_size, 15);
    assert!(resp.changes_made > 0);
    assert!(resp.error.is_none());
}

#[test]
fn clean_text_rejects_bad_input() {
    let base = start_server(posix_settings());
    let url = format!("{base}/api/clean-text");

    let (status, body) = error_body(ureq::post(&url).send_json(json!({ "text": 42 })).unwrap_err());
    assert_eq!(status, 400);
    assert!(!body.success);
    assert_eq!(body.error.as_deref(), Some("Input must be a string"));

    let (status, body) = error_body(ureq::post(&url).send_json(json!({ "text": "  \n" })).unwrap_err());
    assert_eq!(status, 400);
    assert_eq!(body.error.as_deref(), Some("No text provided"));

    let (status, body) = error_body(ureq::post(&url).send_string("not json").unwrap_err());
    assert_eq!(status, 400);
    assert!(body.cleaned_text.is_none());
}

#[test]
fn oversized_body_is_refused() {
    let base = start_server(WebSettings {
        max_upload_bytes: 64,
        ..posix_settings()
    });

    let text = "x".repeat(200);
    let (status, body) = error_body(
        ureq::post(&format!("{base}/api/clean-text"))
            .send_json(json!({ "text": text }))
            .unwrap_err(),
    );
    assert_eq!(status, 413);
    assert!(!body.success);
}

// ===========================================================================
// 2. File uploads
// ===========================================================================

#[test]
fn clean_file_endpoint() {
    let base = start_server(posix_settings());
    let body = multipart_body("XyZ123", "draft.md", "\u{201C}hi\u{201D}  \r\nbye\u{200B}".as_bytes());

    let resp: CleanResponse = ureq::post(&format!("{base}/api/clean-file"))
        .set("Content-Type", "multipart/form-data; boundary=XyZ123")
        .send_bytes(&body)
        .unwrap()
        .into_json()
        .unwrap();

    assert!(resp.success);
    assert_eq!(resp.cleaned_text.as_deref(), Some("\"hi\"\nbye"));
}

#[test]
fn clean_file_rejects_bad_uploads() {
    let base = start_server(posix_settings());
    let url = format!("{base}/api/clean-file");
    let post = |filename: &str, data: &[u8]| {
        ureq::post(&url)
            .set("Content-Type", "multipart/form-data; boundary=B0UND")
            .send_bytes(&multipart_body("B0UND", filename, data))
    };

    let (status, body) = error_body(post("image.png", b"\x89PNG").unwrap_err());
    assert_eq!(status, 400);
    assert_eq!(body.error.as_deref(), Some("Unsupported file type"));

    let (status, body) = error_body(post("blank.txt", b"  \n ").unwrap_err());
    assert_eq!(status, 400);
    assert_eq!(body.error.as_deref(), Some("File appears to be empty"));

    let (status, _) = error_body(
        ureq::post(&url)
            .set("Content-Type", "application/json")
            .send_string("{}")
            .unwrap_err(),
    );
    assert_eq!(status, 400);
}

// ===========================================================================
// 3. Analysis, health, and routing
// ===========================================================================

#[test]
fn analyze_endpoint() {
    let base = start_server(posix_settings());
    let resp: Value = ureq::post(&format!("{base}/api/analyze"))
        .send_json(json!({ "text": "a\u{2019}\u{200B}" }))
        .unwrap()
        .into_json()
        .unwrap();

    assert_eq!(resp["success"], true);
    assert_eq!(resp["info"]["total_chars"], 3);
    assert_eq!(resp["info"]["problematic_chars"], 1);
    assert_eq!(resp["info"]["invisible_chars"], 1);
}

#[test]
fn health_and_frontend() {
    let base = start_server(posix_settings());

    for path in ["/health", "/api/health"] {
        let resp: Value = ureq::get(&format!("{base}{path}"))
            .call()
            .unwrap()
            .into_json()
            .unwrap();
        assert_eq!(resp, json!({ "status": "healthy", "service": "UnicodeFix Web Interface" }));
    }

    let page = ureq::get(&format!("{base}/")).call().unwrap();
    assert!(page.content_type().starts_with("text/html"));
    assert!(page.into_string().unwrap().contains("UnicodeFix"));
}

#[test]
fn unknown_route_is_404() {
    let base = start_server(posix_settings());
    match ureq::get(&format!("{base}/does-not-exist")).call() {
        Err(ureq::Error::Status(404, resp)) => {
            let body: Value = resp.into_json().unwrap();
            assert_eq!(body, json!({ "error": "not found" }));
        }
        other => panic!("expected 404, got {other:?}"),
    }
}
