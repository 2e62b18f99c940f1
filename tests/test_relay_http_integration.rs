use chrono::NaiveDate;
use datechat::calendar::FixedClock;
use datechat::client::{OpenAiBackend, Relay, RelayError, RelaySettings};
use datechat::date_tools::{DateContext, date_toolset};
use datechat::types::Turn;
use httpmock::prelude::*;
use serde_json::json;

fn relay(base_url: &str) -> Relay<OpenAiBackend, DateContext> {
    let context = DateContext::new(FixedClock(NaiveDate::from_ymd_opt(2025, 7, 8).unwrap()));
    Relay::new(
        OpenAiBackend::new("sk-test", base_url),
        date_toolset().unwrap(),
        context,
        RelaySettings::default(),
    )
}

#[tokio::test]
async fn text_reply_over_http() {
    let server = MockServer::start_async().await;
    let m = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/chat/completions")
                .header("authorization", "Bearer sk-test")
                .body_contains("\"get_monday\"")
                .body_contains("\"date_str\"")
                .body_contains("What is the date today?");
            then.status(200).json_body(json!({
                "id": "chatcmpl-1",
                "object": "chat.completion",
                "created": 1751932800,
                "model": "claude-3-5-sonnet-20241022",
                "choices": [{
                    "index": 0,
                    "message": {"role": "assistant", "content": "Let me think."},
                    "finish_reason": "stop"
                }]
            }));
        })
        .await;

    let exchange = relay(&server.base_url())
        .send(vec![], "What is the date today?".into())
        .await;

    m.assert_async().await;
    assert_eq!(exchange.outcome.unwrap().text, "Let me think.");
    assert_eq!(exchange.history.len(), 2);
}

#[tokio::test]
async fn api_error_leaves_history_unchanged() {
    let server = MockServer::start_async().await;
    let m = server
        .mock_async(|when, then| {
            when.method(POST).path("/chat/completions");
            then.status(400).json_body(json!({
                "error": {
                    "message": "invalid x-api-key",
                    "type": "authentication_error",
                    "param": null,
                    "code": null
                }
            }));
        })
        .await;

    let before = vec![
        Turn::User("hi".into()),
        Turn::assistant_text("Hello! How can I help?"),
    ];
    let exchange = relay(&server.base_url())
        .send(before.clone(), "monday of 2025-07-08?".into())
        .await;

    m.assert_async().await;
    let err = exchange.outcome.unwrap_err();
    assert!(matches!(err, RelayError::FirstRound(_)));
    assert!(err.to_string().contains("invalid x-api-key"));
    assert_eq!(exchange.history, before);
}
