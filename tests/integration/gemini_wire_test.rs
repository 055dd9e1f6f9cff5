//! Gemini Wire Integration Tests
//!
//! Runs `GeminiEngine` against a local HTTP stub to pin the request URL,
//! the request body shape, and how status codes map onto engine errors.

use std::sync::Arc;

use teger_llm::{
    CancellationToken, EngineConfig, EngineError, ErrorKind, GeminiEngine, ReasoningEngine,
    ReasoningTransport, RetryPolicy,
};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;

const MODEL_TEXT: &str = r#"{"risk_score": 12, "threat_level": "Low", "dissonance_report": "ok"}"#;

// ============================================================================
// HTTP stub
// ============================================================================

#[derive(Debug)]
struct CapturedRequest {
    request_line: String,
    body: String,
}

/// Serve the canned responses in order, one connection each.
async fn spawn_stub(
    responses: Vec<(u16, String)>,
) -> (String, mpsc::UnboundedReceiver<CapturedRequest>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        for (status, body) in responses {
            let (mut stream, _) = listener.accept().await.unwrap();
            let captured = read_request(&mut stream).await;
            let _ = tx.send(captured);
            let reply = format!(
                "HTTP/1.1 {} Stub\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            stream.write_all(reply.as_bytes()).await.unwrap();
            let _ = stream.shutdown().await;
        }
    });

    (format!("http://{}/v1beta/models", addr), rx)
}

async fn read_request(stream: &mut TcpStream) -> CapturedRequest {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    let header_end = loop {
        let n = stream.read(&mut chunk).await.unwrap();
        assert!(n > 0, "client closed before sending headers");
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let content_length = head
        .lines()
        .find_map(|line| {
            let (name, value) = line.split_once(':')?;
            name.eq_ignore_ascii_case("content-length")
                .then(|| value.trim().parse::<usize>().ok())
                .flatten()
        })
        .unwrap_or(0);

    while buf.len() < header_end + content_length {
        let n = stream.read(&mut chunk).await.unwrap();
        assert!(n > 0, "client closed mid-body");
        buf.extend_from_slice(&chunk[..n]);
    }

    CapturedRequest {
        request_line: head.lines().next().unwrap_or_default().to_string(),
        body: String::from_utf8_lossy(&buf[header_end..header_end + content_length]).to_string(),
    }
}

fn envelope(text: &str) -> String {
    serde_json::json!({
        "candidates": [
            { "content": { "parts": [ { "text": text } ] } }
        ]
    })
    .to_string()
}

fn engine_for(endpoint: String, api_key: Option<&str>) -> GeminiEngine {
    GeminiEngine::new(EngineConfig {
        endpoint,
        model: "test-model".to_string(),
        api_key: api_key.map(str::to_string),
        request_timeout_secs: 5,
        proxy_url: None,
    })
    .unwrap()
}

// ============================================================================
// Request shape
// ============================================================================

#[tokio::test]
async fn test_generate_request_shape() {
    let (endpoint, mut requests) = spawn_stub(vec![(200, envelope(MODEL_TEXT))]).await;
    let engine = engine_for(endpoint, Some("secret"));

    let text = engine.generate("SYSTEM", "USER").await.unwrap();
    assert_eq!(text, MODEL_TEXT);

    let request = requests.recv().await.unwrap();
    assert_eq!(
        request.request_line,
        "POST /v1beta/models/test-model:generateContent?key=secret HTTP/1.1"
    );

    let body: serde_json::Value = serde_json::from_str(&request.body).unwrap();
    assert_eq!(body["contents"][0]["parts"][0]["text"], "USER");
    assert_eq!(body["systemInstruction"]["parts"][0]["text"], "SYSTEM");
    assert_eq!(
        body["generationConfig"]["responseMimeType"],
        "application/json"
    );
}

#[tokio::test]
async fn test_missing_key_omits_query() {
    let (endpoint, mut requests) = spawn_stub(vec![(200, envelope(MODEL_TEXT))]).await;
    let engine = engine_for(endpoint, None);

    engine.generate("S", "U").await.unwrap();
    let request = requests.recv().await.unwrap();
    assert_eq!(
        request.request_line,
        "POST /v1beta/models/test-model:generateContent HTTP/1.1"
    );
}

#[tokio::test]
async fn test_health_check_gets_model() {
    let (endpoint, mut requests) = spawn_stub(vec![(200, "{}".to_string())]).await;
    let engine = engine_for(endpoint, Some("secret"));

    engine.health_check().await.unwrap();
    let request = requests.recv().await.unwrap();
    assert_eq!(
        request.request_line,
        "GET /v1beta/models/test-model?key=secret HTTP/1.1"
    );
}

// ============================================================================
// Status and envelope mapping
// ============================================================================

#[tokio::test]
async fn test_status_codes_map_to_error_kinds() {
    let (endpoint, _requests) = spawn_stub(vec![
        (429, "{}".to_string()),
        (500, "{}".to_string()),
        (403, "{}".to_string()),
    ])
    .await;
    let engine = engine_for(endpoint, Some("secret"));

    let err = engine.generate("S", "U").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::RateLimited);

    let err = engine.generate("S", "U").await.unwrap_err();
    assert_eq!(
        err,
        EngineError::Engine {
            status: 500,
            message: "Internal Server Error".to_string(),
        }
    );
    assert_eq!(err.to_string(), "Engine Error (500): Internal Server Error");

    let err = engine.generate("S", "U").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Engine);
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn test_empty_envelope_is_empty_response() {
    let (endpoint, _requests) = spawn_stub(vec![
        (200, r#"{"candidates": []}"#.to_string()),
        (200, envelope("   ")),
    ])
    .await;
    let engine = engine_for(endpoint, None);

    assert_eq!(
        engine.generate("S", "U").await.unwrap_err().kind(),
        ErrorKind::EmptyResponse
    );
    assert_eq!(
        engine.generate("S", "U").await.unwrap_err().kind(),
        ErrorKind::EmptyResponse
    );
}

#[tokio::test]
async fn test_unreachable_endpoint_hides_key() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let engine = engine_for(format!("http://{}/v1beta/models", addr), Some("topsecret"));
    let err = engine.generate("S", "U").await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Transport);
    assert!(!err.to_string().contains("topsecret"));
}

// ============================================================================
// Transport over the wire
// ============================================================================

#[tokio::test]
async fn test_transport_retries_rate_limit_over_http() {
    let (endpoint, mut requests) = spawn_stub(vec![
        (429, "{}".to_string()),
        (200, envelope(MODEL_TEXT)),
    ])
    .await;
    let engine = Arc::new(engine_for(endpoint, Some("secret")));
    let transport = ReasoningTransport::new(
        engine,
        RetryPolicy {
            max_retries: 2,
            initial_backoff_ms: 5,
            max_backoff_ms: None,
        },
    );

    let reply = transport
        .send("S", "U", &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(reply.text, MODEL_TEXT);
    assert_eq!(reply.attempts.len(), 2);

    assert!(requests.recv().await.is_some());
    assert!(requests.recv().await.is_some());
}
