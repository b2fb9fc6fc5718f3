//! Integration tests for the checkout channels.
//!
//! Telegram and `EmailJS` are replaced by mock servers; the tests check the
//! exact payloads sent and how failures and timeouts land in the receipt.

#![allow(clippy::unwrap_used)]

use std::time::Duration;

use axum::extract::Json;
use axum::http::{StatusCode, Uri};
use axum::{Router, routing::post};
use secrecy::SecretString;
use serde_json::{Value, json};

use gaspass_client::config::{EmailJsConfig, TelegramConfig};
use gaspass_client::{CheckoutNotifier, EmailJsChannel, TelegramChannel};
use gaspass_core::cart::CartLineItem;
use gaspass_core::checkout::{ChannelOutcome, CheckoutRequest, ContactDetails};
use gaspass_core::{Price, ProductId};
use gaspass_integration_tests::{MockServer, Recorder, closed_port_url};

fn request() -> CheckoutRequest {
    let items = vec![
        CartLineItem {
            product_id: ProductId::new(1),
            name: "Casque".to_string(),
            image: "casque.png".to_string(),
            category: "Audio".to_string(),
            price: Price::from(1000),
            stock: 5,
            quantity: 3,
        },
        CartLineItem {
            product_id: ProductId::new(2),
            name: "Enceinte".to_string(),
            image: "enceinte.png".to_string(),
            category: "Audio".to_string(),
            price: Price::from(2500),
            stock: 2,
            quantity: 1,
        },
    ];
    let contact = ContactDetails::new("Awa Diop", "+221770000000", "awa@example.com").unwrap();
    CheckoutRequest::new(items, contact).unwrap()
}

fn telegram(base: &str) -> TelegramChannel {
    TelegramChannel::new(
        reqwest::Client::new(),
        TelegramConfig {
            bot_token: SecretString::from("123:test-token".to_string()),
            chat_id: "987654".to_string(),
            api_url: base.to_string(),
        },
    )
}

fn emailjs(base: &str) -> EmailJsChannel {
    EmailJsChannel::new(
        reqwest::Client::new(),
        EmailJsConfig {
            service_id: "service_test".to_string(),
            template_id: "template_test".to_string(),
            public_key: SecretString::from("public_test".to_string()),
            api_url: base.to_string(),
        },
    )
}

/// Mock Telegram that records `sendMessage` calls and answers `ok: true`.
async fn telegram_server(recorder: Recorder) -> MockServer {
    MockServer::start(Router::new().route(
        "/{bot}/sendMessage",
        post(move |uri: Uri, Json(body): Json<Value>| {
            let recorder = recorder.clone();
            async move {
                recorder.record(uri.path(), uri.query(), body);
                Json(json!({"ok": true, "result": {"message_id": 1}}))
            }
        }),
    ))
    .await
}

/// Mock `EmailJS` that records sends and answers `200 OK`.
async fn emailjs_server(recorder: Recorder) -> MockServer {
    MockServer::start(Router::new().route(
        "/api/v1.0/email/send",
        post(move |Json(body): Json<Value>| {
            let recorder = recorder.clone();
            async move {
                recorder.record("/api/v1.0/email/send", None, body);
                "OK"
            }
        }),
    ))
    .await
}

// =============================================================================
// Payloads
// =============================================================================

#[tokio::test]
async fn test_telegram_payload() {
    let recorder = Recorder::default();
    let server = telegram_server(recorder.clone()).await;
    let notifier = CheckoutNotifier::default().with_channel(telegram(&server.url("")));

    let receipt = notifier.submit(&request()).await;

    assert!(receipt.success, "{}", receipt.message);
    assert_eq!(receipt.message, "delivered via Telegram");

    let requests = recorder.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].path, "/bot123:test-token/sendMessage");

    let body = &requests[0].body;
    assert_eq!(body["chat_id"], "987654");
    assert_eq!(body["parse_mode"], "Markdown");
    let text = body["text"].as_str().unwrap();
    assert!(text.contains("Awa Diop"));
    assert!(text.contains("Casque × 3 — 3000 FCFA"));
    assert!(text.contains("5500 FCFA"));
}

#[tokio::test]
async fn test_emailjs_payload() {
    let recorder = Recorder::default();
    let server = emailjs_server(recorder.clone()).await;
    let notifier = CheckoutNotifier::default().with_channel(emailjs(&server.url("")));
    let request = request();

    let receipt = notifier.submit(&request).await;
    assert!(receipt.success, "{}", receipt.message);

    let body = recorder.requests()[0].body.clone();
    assert_eq!(body["service_id"], "service_test");
    assert_eq!(body["template_id"], "template_test");
    assert_eq!(body["user_id"], "public_test");
    assert_eq!(body["template_params"]["name"], "Awa Diop");
    assert_eq!(body["template_params"]["phone"], "+221770000000");
    assert_eq!(body["template_params"]["email"], "awa@example.com");
    assert_eq!(
        body["template_params"]["message"],
        notifier.summary(&request).as_str()
    );
}

// =============================================================================
// Failure handling
// =============================================================================

#[tokio::test]
async fn test_partial_failure_still_succeeds() {
    let telegram_recorder = Recorder::default();
    let telegram_server = telegram_server(telegram_recorder).await;
    let failing_emailjs = MockServer::start(Router::new().route(
        "/api/v1.0/email/send",
        post(|| async { (StatusCode::BAD_REQUEST, "The template ID is invalid") }),
    ))
    .await;

    let notifier = CheckoutNotifier::default()
        .with_channel(telegram(&telegram_server.url("")))
        .with_channel(emailjs(&failing_emailjs.url("")));

    let receipt = notifier.submit(&request()).await;

    assert!(receipt.success);
    assert_eq!(
        receipt.message,
        "delivered via Telegram, failed via EmailJS (HTTP 400: The template ID is invalid)"
    );
}

#[tokio::test]
async fn test_telegram_rejection_is_a_failure() {
    let server = MockServer::start(Router::new().route(
        "/{bot}/sendMessage",
        post(|| async { Json(json!({"ok": false, "description": "Bad Request: chat not found"})) }),
    ))
    .await;
    let notifier = CheckoutNotifier::default().with_channel(telegram(&server.url("")));

    let receipt = notifier.submit(&request()).await;

    assert!(!receipt.success);
    assert_eq!(
        receipt.reports[0].outcome,
        ChannelOutcome::Failed {
            reason: "API error: Bad Request: chat not found".to_string()
        }
    );
}

#[tokio::test]
async fn test_all_channels_unreachable() {
    let dead = closed_port_url().await;
    let notifier = CheckoutNotifier::default()
        .with_channel(telegram(&dead))
        .with_channel(emailjs(&dead));

    let receipt = notifier.submit(&request()).await;

    assert!(!receipt.success);
    assert!(receipt.message.starts_with("failed via Telegram (request failed"));
    assert!(receipt.message.contains("failed via EmailJS (request failed"));
    assert!(!receipt.message.contains("test-token"));
}

#[tokio::test]
async fn test_hanging_channel_times_out() {
    let hanging = MockServer::start(Router::new().route(
        "/{bot}/sendMessage",
        post(|| async {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Json(json!({"ok": true}))
        }),
    ))
    .await;
    let recorder = Recorder::default();
    let email_server = emailjs_server(recorder.clone()).await;

    let notifier = CheckoutNotifier::new(Duration::from_millis(300), "FCFA")
        .with_channel(telegram(&hanging.url("")))
        .with_channel(emailjs(&email_server.url("")));

    let started = std::time::Instant::now();
    let receipt = notifier.submit(&request()).await;

    assert!(started.elapsed() < Duration::from_secs(5));
    assert!(receipt.success);
    assert_eq!(
        receipt.message,
        "failed via Telegram (timed out after 300ms), delivered via EmailJS"
    );
    assert_eq!(recorder.requests().len(), 1);
}
