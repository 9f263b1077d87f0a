//! End-to-end behaviour of the client against a local HTTP stub.

mod stub;

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use copilot::{
    ChatOptions, ChatRequest, ChatResponse, ClientConfig, ClientLogger, CopilotClient, Error,
    HealthStatus, Message, RequestOptions,
};
use serde_json::{Value, json};

use stub::Reply;

const FAST_BACKOFF: Duration = Duration::from_millis(10);

fn client_for(base_url: &str) -> CopilotClient {
    CopilotClient::new(
        ClientConfig::new()
            .with_base_url(base_url)
            .with_retry_backoff(FAST_BACKOFF),
    )
    .expect("client should build")
}

fn reply(text: &str) -> Reply {
    Reply::Json(200, json!({ "reply": text }))
}

#[tokio::test]
async fn post_chat_forwards_messages_unchanged() {
    let stub = stub::spawn(|_, _| reply("Sure thing.")).await;
    let client = client_for(&stub.base_url);
    let messages = vec![
        Message::system("Answer briefly."),
        Message::assistant("Hi! I'm your AI Copilot. How can I help today?"),
        Message::user("What is Rust?"),
        Message::assistant("A systems language."),
        Message::user("Thanks. And \"cargo\"?"),
    ];

    let response = client.post_chat(&messages).await.unwrap();
    assert_eq!(response.reply, "Sure thing.");

    let requests = stub.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].request_line, "POST /api/chat HTTP/1.1");
    assert_eq!(requests[0].header("content-type"), Some("application/json"));
    let sent: ChatRequest = serde_json::from_value(requests[0].json()).unwrap();
    assert_eq!(sent.messages, messages);
}

#[tokio::test]
async fn empty_conversation_sends_empty_messages() {
    let stub = stub::spawn(|_, _| reply("Hello?")).await;
    let client = client_for(&stub.base_url);

    client.post_chat(&[]).await.unwrap();
    assert_eq!(stub.requests()[0].json(), json!({ "messages": [] }));
}

#[tokio::test]
async fn slow_response_times_out_with_status_zero() {
    let stub = stub::spawn(|_, _| {
        Reply::Delayed(Duration::from_secs(5), Box::new(reply("too late")))
    })
    .await;
    let client = client_for(&stub.base_url);
    let options = ChatOptions::new().with_timeout(Duration::from_millis(100));

    let start = Instant::now();
    let err = client
        .post_chat_with(&[Message::user("hi")], &options)
        .await
        .unwrap_err();

    assert!(err.is_timeout());
    assert_eq!(err.code(), "timeout");
    assert_eq!(err.status(), 0);
    assert_eq!(err.message(), "Request timed out. Please try again.");
    // Both attempts were abandoned at their deadlines rather than waiting for the server.
    assert!(start.elapsed() < Duration::from_secs(2));
    assert_eq!(stub.hits(), 2);
}

#[tokio::test]
async fn timeout_then_success_recovers() {
    let stub = stub::spawn(|hit, _| match hit {
        0 => Reply::Delayed(Duration::from_secs(5), Box::new(reply("too late"))),
        _ => reply("second try"),
    })
    .await;
    let client = client_for(&stub.base_url);
    let options = ChatOptions::new().with_timeout(Duration::from_millis(100));

    let response = client
        .post_chat_with(&[Message::user("hi")], &options)
        .await
        .unwrap();
    assert_eq!(response.reply, "second try");
    assert_eq!(stub.hits(), 2);
}

#[tokio::test]
async fn service_unavailable_is_retried_once_after_backoff() {
    let stub = stub::spawn(|hit, _| match hit {
        0 => Reply::Json(503, json!({ "error": { "message": "warming up" } })),
        _ => reply("ready now"),
    })
    .await;
    // Default backoff.
    let client = CopilotClient::new(ClientConfig::new().with_base_url(&stub.base_url)).unwrap();

    let start = Instant::now();
    let response = client.post_chat(&[Message::user("hi")]).await.unwrap();
    assert_eq!(response.reply, "ready now");
    assert_eq!(stub.hits(), 2);
    assert!(start.elapsed() >= Duration::from_millis(300));

    let requests = stub.requests();
    assert_eq!(requests[0].body, requests[1].body);
}

#[tokio::test]
async fn forwarded_timeout_code_is_retried() {
    let stub = stub::spawn(|hit, _| match hit {
        0 => Reply::Json(
            408,
            json!({ "error": { "code": "timeout", "message": "Upstream timed out" } }),
        ),
        _ => reply("made it"),
    })
    .await;
    let client = client_for(&stub.base_url);

    let response = client.post_chat(&[Message::user("hi")]).await.unwrap();
    assert_eq!(response.reply, "made it");
    assert_eq!(stub.hits(), 2);
}

#[tokio::test]
async fn bad_request_is_not_retried() {
    let stub = stub::spawn(|_, _| Reply::Text(400, "nope".to_string())).await;
    let client = client_for(&stub.base_url);

    let err = client.post_chat(&[Message::user("hi")]).await.unwrap_err();
    assert_eq!(err.code(), "http_error");
    assert_eq!(err.status(), 400);
    assert_eq!(err.message(), "Request failed with status 400");
    assert!(err.details().is_none());
    assert_eq!(stub.hits(), 1);
}

#[tokio::test]
async fn structured_error_body_is_forwarded() {
    let body = json!({ "error": { "code": "invalid_messages", "message": "messages must not be empty" } });
    let expected = body.clone();
    let stub = stub::spawn(move |_, _| Reply::Json(422, body.clone())).await;
    let client = client_for(&stub.base_url);

    let err = client.post_chat(&[]).await.unwrap_err();
    assert_eq!(err.code(), "invalid_messages");
    assert_eq!(err.message(), "messages must not be empty");
    assert_eq!(err.status(), 422);
    assert_eq!(err.details(), Some(&expected));
    assert_eq!(stub.hits(), 1);
}

#[tokio::test]
async fn flat_error_body_supplies_message() {
    let stub = stub::spawn(|_, _| Reply::Json(404, json!({ "detail": "Not Found" }))).await;
    let client = client_for(&stub.base_url);

    let err = client.post_chat(&[Message::user("hi")]).await.unwrap_err();
    assert_eq!(err.code(), "http_error");
    assert_eq!(err.message(), "Not Found");
    assert_eq!(stub.hits(), 1);
}

#[tokio::test]
async fn gateway_timeout_is_retried_then_surfaces() {
    let stub = stub::spawn(|_, _| Reply::Text(504, "upstream timed out".to_string())).await;
    let client = client_for(&stub.base_url);

    let err = client.post_chat(&[Message::user("hi")]).await.unwrap_err();
    assert_eq!(err.code(), "gateway_timeout");
    assert_eq!(err.status(), 504);
    assert_eq!(stub.hits(), 2);
}

#[tokio::test]
async fn second_failure_surfaces_without_further_retry() {
    let stub = stub::spawn(|hit, _| match hit {
        0 => Reply::Json(500, json!({ "message": "boom" })),
        _ => Reply::Json(400, json!({ "error": { "code": "bad_input", "message": "bad" } })),
    })
    .await;
    let client = client_for(&stub.base_url);

    let err = client.post_chat(&[Message::user("hi")]).await.unwrap_err();
    assert_eq!(err.code(), "bad_input");
    assert_eq!(err.status(), 400);
    assert_eq!(stub.hits(), 2);
}

#[tokio::test]
async fn unreachable_backend_is_a_network_error() {
    let client = client_for(&stub::closed_base_url());

    let err = client.post_chat(&[Message::user("hi")]).await.unwrap_err();
    assert!(err.is_network());
    assert_eq!(err.code(), "network");
    assert_eq!(err.status(), 0);
    assert!(std::error::Error::source(&err).is_some());
}

#[tokio::test]
async fn non_json_success_is_tolerated() {
    let stub = stub::spawn(|_, _| Reply::Text(200, "accepted".to_string())).await;
    let client = client_for(&stub.base_url);

    let value = client
        .request_with_timeout(
            &client.build_url("/api/anything"),
            &RequestOptions::get(),
            Duration::from_secs(5),
        )
        .await
        .unwrap();
    assert_eq!(value, Value::Null);

    let err = client.post_chat(&[Message::user("hi")]).await.unwrap_err();
    assert!(matches!(err, Error::Serialization { .. }));
    // A malformed success is not transient.
    assert_eq!(stub.hits(), 2);
}

#[tokio::test]
async fn health_check_accepts_json_and_text() {
    let stub = stub::spawn(|hit, _| match hit {
        0 => Reply::Json(200, json!({ "status": "ok" })),
        _ => Reply::Text(200, "OK".to_string()),
    })
    .await;
    let client = client_for(&stub.base_url);

    assert_eq!(
        client.health_check().await.unwrap(),
        HealthStatus::Json(json!({ "status": "ok" }))
    );
    assert_eq!(
        client.health_check().await.unwrap(),
        HealthStatus::Text("OK".to_string())
    );
    let requests = stub.requests();
    assert_eq!(requests[0].request_line, "GET /health HTTP/1.1");
}

#[tokio::test]
async fn explicit_base_wins_over_resolved_base() {
    let stub = stub::spawn(|_, _| reply("from explicit base")).await;
    let client = client_for(&stub::closed_base_url());
    let options = ChatOptions::new().with_base_url(format!("{}/", stub.base_url));

    let response = client
        .post_chat_with(&[Message::user("hi")], &options)
        .await
        .unwrap();
    assert_eq!(response.reply, "from explicit base");
    assert_eq!(stub.requests()[0].request_line, "POST /api/chat HTTP/1.1");
}

#[tokio::test]
async fn invalid_base_falls_back_to_origin() {
    let stub = stub::spawn(|_, _| reply("via origin")).await;
    let client = CopilotClient::new(
        ClientConfig::new()
            .with_base_url("not a valid url")
            .with_origin(stub.base_url.clone())
            .with_retry_backoff(FAST_BACKOFF),
    )
    .expect("client should build");

    let response = client.post_chat(&[Message::user("hi")]).await.unwrap();
    assert_eq!(response.reply, "via origin");
    assert_eq!(stub.requests()[0].request_line, "POST /api/chat HTTP/1.1");
}

#[tokio::test]
async fn invalid_base_without_origin_is_a_url_error() {
    let client = client_for("not a valid url");

    let err = client.post_chat(&[Message::user("hi")]).await.unwrap_err();
    assert_eq!(err.code(), "url");
    assert_eq!(err.status(), 0);
}

#[tokio::test]
async fn concurrent_calls_resolve_independently() {
    let stub = stub::spawn(|_, captured| {
        let body = captured.json();
        let last = body["messages"]
            .as_array()
            .and_then(|m| m.last())
            .and_then(|m| m["content"].as_str())
            .unwrap_or_default()
            .to_string();
        let answer = reply(&format!("echo: {last}"));
        if last == "slow" {
            Reply::Delayed(Duration::from_millis(200), Box::new(answer))
        } else {
            answer
        }
    })
    .await;
    let client = client_for(&stub.base_url);
    let other = client.clone();

    let slow = vec![Message::user("slow")];
    let fast = vec![Message::user("fast")];
    let (a, b) = tokio::join!(client.post_chat(&slow), other.post_chat(&fast));

    assert_eq!(a.unwrap().reply, "echo: slow");
    assert_eq!(b.unwrap().reply, "echo: fast");
    assert_eq!(stub.hits(), 2);
}

#[derive(Default)]
struct RecordingLogger {
    events: Mutex<Vec<String>>,
}

impl ClientLogger for RecordingLogger {
    fn log_request(&self, request: &ChatRequest) {
        self.events
            .lock()
            .unwrap()
            .push(format!("request:{}", request.messages.len()));
    }

    fn log_response(&self, response: &ChatResponse) {
        self.events
            .lock()
            .unwrap()
            .push(format!("reply:{}", response.reply));
    }

    fn log_error(&self, error: &Error) {
        self.events
            .lock()
            .unwrap()
            .push(format!("error:{}", error.code()));
    }
}

#[tokio::test]
async fn logger_sees_each_call_once() {
    let stub = stub::spawn(|hit, _| match hit {
        0 => Reply::Json(503, json!({})),
        1 => reply("hello"),
        _ => Reply::Json(400, json!({})),
    })
    .await;
    let logger = Arc::new(RecordingLogger::default());
    let client = client_for(&stub.base_url).with_logger(logger.clone());

    client.post_chat(&[Message::user("hi")]).await.unwrap();
    client.post_chat(&[]).await.unwrap_err();

    assert_eq!(
        *logger.events.lock().unwrap(),
        vec![
            "request:1".to_string(),
            "reply:hello".to_string(),
            "request:0".to_string(),
            "error:http_error".to_string(),
        ]
    );
}
