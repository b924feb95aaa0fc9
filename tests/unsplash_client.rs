//! The real HTTP client against a one-shot local server.

use snapgrid::{AppConfig, PhotoSource, SnapgridError, UnsplashClient};
use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::sync::mpsc;
use std::thread;

/// Serve exactly one request with a canned response; returns the base URL and
/// a receiver yielding the request line that was received.
fn serve_once(status: &'static str, body: &'static str) -> (String, mpsc::Receiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        let mut reader = BufReader::new(stream.try_clone().unwrap());
        let mut request_line = String::new();
        reader.read_line(&mut request_line).unwrap();
        // drain headers
        loop {
            let mut line = String::new();
            if reader.read_line(&mut line).unwrap() == 0 || line == "\r\n" {
                break;
            }
        }
        tx.send(request_line.trim_end().to_string()).unwrap();

        let mut stream = stream;
        write!(
            stream,
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        )
        .unwrap();
        stream.flush().unwrap();
    });

    (format!("http://{}", addr), rx)
}

fn client_for(base_url: String) -> UnsplashClient {
    let config = AppConfig {
        api_url: base_url,
        access_key: Some("test-key".into()),
        per_page: 12,
        ..AppConfig::default()
    };
    UnsplashClient::new(&config).unwrap()
}

#[test]
fn sends_page_query_and_credential() {
    let body = r#"{"total": 1, "total_pages": 4, "results": [{"id": "x1", "urls": {"raw": "https://images.test/x1"}}]}"#;
    let (base, requests) = serve_once("200 OK", body);

    let page = client_for(base).search("red fox", 2).unwrap();
    assert_eq!(page.total_pages, 4);
    assert_eq!(page.results[0].id, "x1");

    let request_line = requests.recv().unwrap();
    assert!(request_line.starts_with("GET /search/photos?"));
    assert!(request_line.contains("page=2"));
    assert!(request_line.contains("query=red+fox") || request_line.contains("query=red%20fox"));
    assert!(request_line.contains("client_id=test-key"));
    assert!(request_line.contains("per_page=12"));
}

#[test]
fn non_success_status_is_an_error() {
    let (base, _requests) = serve_once("500 Internal Server Error", r#"{"errors": ["oops"]}"#);

    let err = client_for(base).search("cats", 1).unwrap_err();
    match err {
        SnapgridError::Http { status, body } => {
            assert_eq!(status, 500);
            assert!(body.contains("oops"));
        }
        other => panic!("expected HTTP error, got {:?}", other),
    }
}

#[test]
fn malformed_body_is_a_parse_error() {
    let (base, _requests) = serve_once("200 OK", r#"{"results": "nope"}"#);

    let err = client_for(base).search("cats", 1).unwrap_err();
    assert!(matches!(err, SnapgridError::Parse(_)));
    assert!(err.is_remote());
}
