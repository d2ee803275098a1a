//! GenerationClient tests against a minimal in-process HTTP peer

use plotweave_core::{EngineConfig, EngineError, GenerationClient, HybridBody};
use serde_json::{json, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Serve exactly one request with a canned response, then close
async fn serve_once(status: u16, body: &str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let response = format!(
        "HTTP/1.1 {} X\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        body.len(),
        body
    );

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        read_request(&mut socket).await;
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();
    });

    format!("http://{addr}")
}

/// Serve one request whose body is cut short of the advertised length, then
/// close the connection mid-body
async fn serve_truncated(partial_body: &str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let response = format!(
        "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\r\n{}",
        partial_body.len() + 64,
        partial_body
    );

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        read_request(&mut socket).await;
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.flush().await.unwrap();
        socket.shutdown().await.ok();
    });

    format!("http://{addr}")
}

/// Drain one HTTP request (headers plus Content-Length body)
async fn read_request(socket: &mut tokio::net::TcpStream) {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        let n = socket.read(&mut chunk).await.unwrap();
        if n == 0 {
            return;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(header_end) = find_header_end(&buf) {
            let headers = String::from_utf8_lossy(&buf[..header_end]).to_lowercase();
            let content_length = headers
                .lines()
                .find_map(|line| line.strip_prefix("content-length:"))
                .and_then(|v| v.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if buf.len() >= header_end + 4 + content_length {
                return;
            }
        }
    }
}

fn find_header_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|w| w == b"\r\n\r\n")
}

fn client_for(base_url: &str) -> GenerationClient {
    GenerationClient::new(&EngineConfig::new(base_url)).unwrap()
}

#[tokio::test]
async fn structured_response_is_parsed() {
    let base = serve_once(200, r#"{"code": "graph TD; A-->B"}"#).await;
    let client = client_for(&base);

    let value: Value = client
        .post_structured("/api/generate/mindmap", &json!({"topic": "rust"}))
        .await
        .unwrap();
    assert_eq!(value["code"], "graph TD; A-->B");
}

#[tokio::test]
async fn structured_parse_failure_carries_the_body() {
    let base = serve_once(200, "plain text, not json").await;
    let client = client_for(&base);

    let result: Result<Value, _> = client.post_structured("/api/chat", &json!({})).await;
    match result {
        Err(EngineError::Parse { body }) => assert_eq!(body, "plain text, not json"),
        other => panic!("expected parse error, got {other:?}"),
    }
}

#[tokio::test]
async fn http_error_with_string_detail_is_surfaced() {
    let base = serve_once(500, r#"{"detail": "游戏服务器无响应"}"#).await;
    let client = client_for(&base);

    let result: Result<Value, _> = client
        .post_structured("/api/game/adventure", &json!({}))
        .await;
    match result {
        Err(EngineError::Http { status, message }) => {
            assert_eq!(status, 500);
            assert_eq!(message, "游戏服务器无响应");
        }
        other => panic!("expected http error, got {other:?}"),
    }
}

#[tokio::test]
async fn http_error_without_parseable_body_is_generic() {
    let base = serve_once(502, "<html>bad gateway</html>").await;
    let client = client_for(&base);

    let result: Result<Value, _> = client.post_structured("/api/chat", &json!({})).await;
    match result {
        Err(EngineError::Http { status, message }) => {
            assert_eq!(status, 502);
            assert_eq!(message, "HTTP Error 502");
        }
        other => panic!("expected http error, got {other:?}"),
    }
}

#[tokio::test]
async fn hybrid_body_parses_terminal_json() {
    let base = serve_once(
        200,
        r#"{"plot": "你醒来了", "state_update": {"location": "洞府"}, "choices": ["打坐"]}"#,
    )
    .await;
    let client = client_for(&base);

    let body: HybridBody<Value> = client
        .post_hybrid("/api/game/adventure", &json!({}))
        .await
        .unwrap();
    match body {
        HybridBody::Parsed(value) => assert_eq!(value["state_update"]["location"], "洞府"),
        HybridBody::Literal(text) => panic!("expected parsed body, got literal {text:?}"),
    }
}

#[tokio::test]
async fn hybrid_body_falls_back_to_literal_text() {
    let base = serve_once(200, "剧情继续，但这不是 JSON。").await;
    let client = client_for(&base);

    let body: HybridBody<Value> = client
        .post_hybrid("/api/game/adventure", &json!({}))
        .await
        .unwrap();
    assert_eq!(
        body,
        HybridBody::Literal("剧情继续，但这不是 JSON。".to_string())
    );
}

#[tokio::test]
async fn hybrid_stream_dying_mid_body_keeps_partial_text() {
    let base = serve_truncated("你推开了石门，").await;
    let client = client_for(&base);

    let body: HybridBody<Value> = client
        .post_hybrid("/api/game/adventure", &json!({}))
        .await
        .unwrap();
    match body {
        HybridBody::Literal(text) => {
            assert!(text.starts_with("你推开了石门，"), "partial text lost: {text:?}");
            assert!(text.contains("[Error:"), "missing annotation: {text:?}");
            assert!(text.ends_with(']'));
        }
        HybridBody::Parsed(value) => panic!("expected literal body, got {value:?}"),
    }
}

#[tokio::test]
async fn streamed_body_arrives_as_text_fragments() {
    use futures::StreamExt;

    let base = serve_once(200, "第一段第二段").await;
    let client = client_for(&base);

    let mut stream = client.post_stream("/api/chat", &json!({})).await.unwrap();
    let mut collected = String::new();
    while let Some(fragment) = stream.next().await {
        collected.push_str(&fragment.unwrap());
    }
    assert_eq!(collected, "第一段第二段");
}
