use scalpwatch::notify::{ButtonAction, Keyboard, Notifier, NotifyError};
use scalpwatch::services::telegram::TelegramClient;
use std::time::Duration;
use serde_json::json;
use wiremock::matchers::{body_partial_json, body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TOKEN: &str = "123:abc";
const CHAT: i64 = -1001;

fn client(server: &MockServer) -> TelegramClient {
    TelegramClient::with_client(server.uri(), TOKEN, CHAT, reqwest::Client::new())
}

fn ok(result: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "ok": true, "result": result }))
}

#[tokio::test]
async fn test_send_text_with_keyboard() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("/bot{}/sendMessage", TOKEN)))
        .and(body_partial_json(json!({
            "chat_id": CHAT,
            "text": "Confirm the action:",
            "parse_mode": "Markdown",
            "reply_markup": {
                "inline_keyboard": [
                    [{ "text": "✅ Confirm buy", "callback_data": "confirm_buy" }],
                    [{ "text": "❌ Cancel signal", "callback_data": "cancel_signal" }],
                    [{ "text": "📊 Show chart", "callback_data": "show_chart" }]
                ]
            }
        })))
        .respond_with(ok(json!({ "message_id": 10, "chat": { "id": CHAT } })))
        .expect(1)
        .mount(&server)
        .await;

    client(&server)
        .send_text("Confirm the action:", Some(&Keyboard::signal(false)))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_rejected_call_maps_description() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("/bot{}/sendMessage", TOKEN)))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "ok": false,
            "error_code": 400,
            "description": "Bad Request: chat not found"
        })))
        .mount(&server)
        .await;

    let result = client(&server).send_text("hi", None).await;
    match result {
        Err(NotifyError::Api {
            method,
            description,
        }) => {
            assert_eq!(method, "sendMessage");
            assert!(description.contains("chat not found"));
        }
        other => panic!("expected API error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_send_photo_multipart() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("/bot{}/sendPhoto", TOKEN)))
        .and(body_string_contains("name=\"photo\"; filename=\"chart.png\""))
        .and(body_string_contains("BUY SIGNAL"))
        .respond_with(ok(json!({ "message_id": 11, "chat": { "id": CHAT } })))
        .expect(1)
        .mount(&server)
        .await;

    client(&server)
        .send_photo(b"png-bytes".to_vec(), "*BUY SIGNAL*")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_edit_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("/bot{}/editMessageText", TOKEN)))
        .and(body_partial_json(json!({
            "chat_id": CHAT,
            "message_id": 42,
            "text": "❌ Signal cancelled"
        })))
        .respond_with(ok(json!({ "message_id": 42, "chat": { "id": CHAT } })))
        .expect(1)
        .mount(&server)
        .await;

    client(&server)
        .edit_text(42, "❌ Signal cancelled", None)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_get_updates_and_answer_callback() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("/bot{}/getUpdates", TOKEN)))
        .and(body_partial_json(json!({ "offset": 5, "timeout": 1 })))
        .respond_with(ok(json!([
            {
                "update_id": 5,
                "message": { "message_id": 1, "chat": { "id": CHAT }, "text": "/status" }
            },
            {
                "update_id": 6,
                "callback_query": {
                    "id": "cb-9",
                    "data": "refresh_status",
                    "message": { "message_id": 2, "chat": { "id": CHAT } }
                }
            }
        ])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(format!("/bot{}/answerCallbackQuery", TOKEN)))
        .and(body_partial_json(json!({ "callback_query_id": "cb-9" })))
        .respond_with(ok(json!(true)))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server);
    let updates = client.get_updates(Some(5), 1).await.unwrap();
    assert_eq!(updates.len(), 2);
    assert_eq!(updates[0].message.as_ref().unwrap().text.as_deref(), Some("/status"));

    let query = updates[1].callback_query.as_ref().unwrap();
    assert_eq!(
        query.data.as_deref().unwrap().parse::<ButtonAction>(),
        Ok(ButtonAction::RefreshStatus)
    );
    client.answer_callback_query(&query.id).await.unwrap();
}

#[tokio::test]
async fn test_transport_errors_do_not_leak_token() {
    let secret = "123456:SECRET_TOKEN";
    let client =
        TelegramClient::new("http://127.0.0.1:1", secret, CHAT, Duration::from_secs(5)).unwrap();

    let err = client.send_text("hi", None).await.unwrap_err();
    assert!(matches!(err, NotifyError::Http(_)));
    assert!(!err.to_string().contains("SECRET_TOKEN"), "{}", err);
    assert!(!format!("{:?}", err).contains("SECRET_TOKEN"));

    let err = client.get_updates(None, 1).await.unwrap_err();
    assert!(!err.to_string().contains("SECRET_TOKEN"), "{}", err);

    let err = client.send_photo(b"png".to_vec(), "chart").await.unwrap_err();
    assert!(!err.to_string().contains("SECRET_TOKEN"), "{}", err);
}
