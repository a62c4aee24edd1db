use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use httpmock::prelude::*;
use serde_json::json;
use url::Url;

use quillpost::application::classify::{ClassifyError, ClassifyInput, Classifier};
use quillpost::application::notify::{
    ChatChannel, ChatMessage, EmailChannel, NotifyError, TeamEmail,
};
use quillpost::application::relay::{RelayDelivery, RelayPayload, RetryPolicy};
use quillpost::domain::types::Category;
use quillpost::infra::outbound::{
    ChatWebhookClient, EmailJsClient, EmailJsCredentials, HttpWebhookTransport, ModelClassifier,
    build_http_client,
};

fn client() -> reqwest::Client {
    build_http_client(Duration::from_secs(5)).expect("http client")
}

fn url(server: &MockServer, path: &str) -> Url {
    Url::parse(&server.url(path)).expect("mock url")
}

fn relay(attempts: u32) -> RelayDelivery {
    RelayDelivery::new(
        Arc::new(HttpWebhookTransport::new(client())),
        RetryPolicy {
            max_attempts: NonZeroU32::new(attempts).expect("non-zero"),
            base_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
        },
    )
}

fn payload() -> RelayPayload {
    RelayPayload {
        title: "Launch".to_string(),
        content: "Version 2 is out.".to_string(),
        summary: "New post: Launch. Version 2 is out.".to_string(),
        timestamp: time::macros::datetime!(2024-03-13 00:00 UTC),
    }
}

#[tokio::test]
async fn relay_gives_up_after_three_failed_attempts() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST).path("/hook");
        then.status(500).body("internal error");
    });

    let delivered = relay(3)
        .deliver_with_retry(&url(&server, "/hook"), &payload())
        .await;

    assert!(!delivered);
    mock.assert_hits(3);
}

#[tokio::test]
async fn relay_posts_json_with_service_headers() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/hook")
            .header("content-type", "application/json")
            .header("accept", "application/json")
            .header_exists("user-agent")
            .json_body_includes(r#"{"title":"Launch","summary":"New post: Launch. Version 2 is out."}"#);
        then.status(200).body("ok");
    });

    let delivered = relay(3)
        .deliver_with_retry(&url(&server, "/hook"), &payload())
        .await;

    assert!(delivered);
    mock.assert_hits(1);
}

#[tokio::test]
async fn relay_treats_unreachable_host_as_failure() {
    let unreachable = Url::parse("http://127.0.0.1:9/hook").expect("url");
    assert!(!relay(2).deliver_with_retry(&unreachable, &payload()).await);
}

#[tokio::test]
async fn chat_client_posts_announcement() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/webhook")
            .json_body_includes(
                json!({
                    "content": "**Product Update!**\nSummary: New post: Launch.\nLink: <http://localhost:3000/posts/7>",
                    "embeds": [{
                        "title": "Product Update",
                        "description": "New post: Launch.",
                        "url": "http://localhost:3000/posts/7",
                        "color": 3447003
                    }]
                })
                .to_string(),
            );
        then.status(204);
    });

    let chat = ChatWebhookClient::new(client(), url(&server, "/webhook"));
    let message = ChatMessage::announcement(
        Category::Product,
        "New post: Launch.",
        "http://localhost:3000/posts/7",
    );
    chat.send_message(&message).await.expect("chat delivered");
    mock.assert();
}

#[tokio::test]
async fn chat_client_reports_rejections() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/webhook");
        then.status(400).body(r#"{"message":"Invalid Form Body"}"#);
    });

    let chat = ChatWebhookClient::new(client(), url(&server, "/webhook"));
    let message = ChatMessage::announcement(Category::Product, "s", "l");
    let err = chat.send_message(&message).await.expect_err("rejected");
    assert!(matches!(err, NotifyError::Status { status: 400, ref body } if body.contains("Invalid Form Body")));
}

#[tokio::test]
async fn email_client_sends_template_params() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/api/v1.0/email/send")
            .json_body_includes(
                json!({
                    "service_id": "service_1",
                    "template_id": "template_1",
                    "user_id": "public_1",
                    "template_params": {
                        "summary": "New post: Hiring.",
                        "link": "http://localhost:3000/posts/9",
                        "to_email": "team@example.com",
                        "subject": "Team Update: New post: Hiring...."
                    }
                })
                .to_string(),
            );
        then.status(200).body("OK");
    });

    let email = EmailJsClient::new(
        client(),
        url(&server, "/api/v1.0/email/send"),
        EmailJsCredentials {
            service_id: "service_1".to_string(),
            template_id: "template_1".to_string(),
            public_key: "public_1".to_string(),
            recipient: "team@example.com".to_string(),
        },
    );
    email
        .send_email(&TeamEmail::new(
            "New post: Hiring.",
            "http://localhost:3000/posts/9",
        ))
        .await
        .expect("email sent");
    mock.assert();
}

fn model(server: &MockServer) -> ModelClassifier {
    ModelClassifier::new(
        client(),
        url(server, "/v1"),
        "sk-test".to_string(),
        "gpt-3.5-turbo".to_string(),
    )
}

#[tokio::test]
async fn model_output_is_mapped_through_keywords() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/v1/chat/completions")
            .header("authorization", "Bearer sk-test")
            .json_body_includes(r#"{"model":"gpt-3.5-turbo","max_tokens":150}"#);
        then.status(200).json_body(json!({
            "choices": [{"message": {"role": "assistant", "content": "  🚀 Our new product ships today.  "}}]
        }));
    });

    let category = model(&server)
        .classify(&ClassifyInput::summary("New post: v2. Out now."))
        .await
        .expect("classified");

    assert_eq!(category, Category::Product);
    mock.assert();
}

#[tokio::test]
async fn model_empty_content_is_an_error() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/v1/chat/completions");
        then.status(200)
            .json_body(json!({"choices": [{"message": {"content": "   "}}]}));
    });

    let err = model(&server)
        .classify(&ClassifyInput::summary("anything"))
        .await
        .expect_err("empty content");
    assert!(matches!(err, ClassifyError::EmptyResponse));
}

#[tokio::test]
async fn model_http_errors_are_reported() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/v1/chat/completions");
        then.status(429).body("rate limited");
    });

    let err = model(&server)
        .classify(&ClassifyInput::summary("anything"))
        .await
        .expect_err("rate limited");
    assert!(matches!(err, ClassifyError::Status { status: 429, .. }));
}
