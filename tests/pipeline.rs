use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;
use std::num::NonZeroU32;

use async_trait::async_trait;
use tokio::sync::Mutex;
use url::Url;

use quillpost::application::classify::{ClassifyError, ClassifyInput, Classifier, KeywordClassifier};
use quillpost::application::notify::{
    ChatChannel, ChatMessage, EmailChannel, NotificationService, NotifyError, TeamEmail,
};
use quillpost::application::posts::{
    CreatePostCommand, PostLinks, PostService, PostServiceError, RelayTarget,
};
use quillpost::application::relay::{
    RelayDelivery, RelayError, RelayResponse, RetryPolicy, WebhookTransport,
};
use quillpost::application::repos::{PostsRepo, PostsWriteRepo};
use quillpost::domain::posts::build_summary;
use quillpost::domain::types::Category;
use quillpost::infra::store::PostStore;

#[derive(Default)]
struct RecordingChat {
    messages: Mutex<Vec<ChatMessage>>,
}

#[async_trait]
impl ChatChannel for RecordingChat {
    async fn send_message(&self, message: &ChatMessage) -> Result<(), NotifyError> {
        self.messages.lock().await.push(message.clone());
        Ok(())
    }
}

#[derive(Default)]
struct RecordingEmail {
    emails: Mutex<Vec<TeamEmail>>,
}

#[async_trait]
impl EmailChannel for RecordingEmail {
    async fn send_email(&self, email: &TeamEmail) -> Result<(), NotifyError> {
        self.emails.lock().await.push(email.clone());
        Ok(())
    }
}

struct UnavailableClassifier;

#[async_trait]
impl Classifier for UnavailableClassifier {
    async fn classify(&self, _input: &ClassifyInput) -> Result<Category, ClassifyError> {
        Err(ClassifyError::Status {
            status: 503,
            body: "model overloaded".to_string(),
        })
    }
}

#[derive(Default)]
struct DownRelay {
    calls: AtomicU32,
    bodies: Mutex<Vec<serde_json::Value>>,
}

#[async_trait]
impl WebhookTransport for DownRelay {
    async fn post_json(
        &self,
        _url: &Url,
        body: &serde_json::Value,
    ) -> Result<RelayResponse, RelayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.bodies.lock().await.push(body.clone());
        Ok(RelayResponse {
            status: 503,
            body: "<h1>CloudFront</h1> could not connect".to_string(),
        })
    }
}

struct Harness {
    store: Arc<PostStore>,
    chat: Arc<RecordingChat>,
    email: Arc<RecordingEmail>,
    service: PostService,
}

fn harness_with(classifier: Arc<dyn Classifier>) -> Harness {
    let store = Arc::new(PostStore::in_memory(false));
    let chat = Arc::new(RecordingChat::default());
    let email = Arc::new(RecordingEmail::default());
    let reader: Arc<dyn PostsRepo> = store.clone();
    let writer: Arc<dyn PostsWriteRepo> = store.clone();
    let base = Url::parse("http://localhost:3000").expect("base url");

    let service = PostService::new(
        reader,
        writer,
        classifier,
        NotificationService::new(Some(chat.clone()), Some(email.clone())),
        PostLinks::new(&base),
    );

    Harness {
        store,
        chat,
        email,
        service,
    }
}

fn harness() -> Harness {
    harness_with(Arc::new(KeywordClassifier))
}

fn instant_retry() -> RetryPolicy {
    RetryPolicy {
        max_attempts: NonZeroU32::new(3).expect("non-zero"),
        base_delay: Duration::ZERO,
        max_delay: Duration::ZERO,
    }
}

#[tokio::test]
async fn product_post_is_announced_on_chat() {
    let h = harness();
    let content = "Our new product launches today. ".repeat(10);

    let post = h
        .service
        .create_post(CreatePostCommand::new("Launching v2", content.clone()))
        .await
        .expect("post created");

    assert_eq!(post.category, Category::Product);
    let messages = h.chat.messages.lock().await;
    assert_eq!(messages.len(), 1);
    let message = &messages[0];
    assert!(message.content.contains("Product"));

    let summary = build_summary("Launching v2", &content);
    let description = &message.embeds[0].description;
    assert_eq!(description.chars().count(), 200);
    assert!(description.ends_with("..."));
    assert!(summary.starts_with(description.trim_end_matches("...")));
    assert_eq!(
        message.embeds[0].url,
        format!("http://localhost:3000/posts/{}", post.id)
    );
    assert!(h.email.emails.lock().await.is_empty());
}

#[tokio::test]
async fn short_product_post_keeps_whole_summary() {
    let h = harness();

    let post = h
        .service
        .create_post(CreatePostCommand::new(
            "Launching v2",
            "We launched our new product today.",
        ))
        .await
        .expect("post created");

    assert_eq!(post.category, Category::Product);
    let messages = h.chat.messages.lock().await;
    assert_eq!(messages.len(), 1);
    assert_eq!(
        messages[0].embeds[0].description,
        "New post: Launching v2. We launched our new product today."
    );
    assert!(messages[0].content.contains("Product"));
}

#[tokio::test]
async fn team_post_is_emailed_with_summary_subject() {
    let h = harness();

    let post = h
        .service
        .create_post(CreatePostCommand::new(
            "We're hiring",
            "Join our growing team!",
        ))
        .await
        .expect("post created");

    assert_eq!(post.category, Category::Team);
    let emails = h.email.emails.lock().await;
    assert_eq!(emails.len(), 1);
    let summary = build_summary(&post.title, &post.content);
    let prefix: String = summary.chars().take(50).collect();
    assert_eq!(emails[0].subject, format!("Team Update: {prefix}..."));
    assert_eq!(emails[0].link, format!("http://localhost:3000/posts/{}", post.id));
    assert!(h.chat.messages.lock().await.is_empty());
}

#[tokio::test]
async fn other_posts_trigger_no_notification() {
    let h = harness();

    let post = h
        .service
        .create_post(CreatePostCommand::new("Weekend notes", "Some thoughts on coffee."))
        .await
        .expect("post created");

    assert_eq!(post.category, Category::Other);
    assert!(h.chat.messages.lock().await.is_empty());
    assert!(h.email.emails.lock().await.is_empty());
}

#[tokio::test]
async fn empty_title_is_rejected_without_side_effects() {
    let h = harness();

    let err = h
        .service
        .create_post(CreatePostCommand::new("", "launch day"))
        .await
        .expect_err("empty title");

    assert!(matches!(err, PostServiceError::InvalidInput { .. }));
    assert_eq!(h.store.count_posts().await.expect("count"), 0);
    assert!(h.chat.messages.lock().await.is_empty());
}

#[tokio::test]
async fn whitespace_content_is_rejected() {
    let h = harness();

    let err = h
        .service
        .create_post(CreatePostCommand::new("Title", "   \n"))
        .await
        .expect_err("blank content");

    assert!(matches!(err, PostServiceError::InvalidInput { .. }));
    assert_eq!(h.store.count_posts().await.expect("count"), 0);
}

#[tokio::test]
async fn created_posts_have_unique_ids_and_list_newest_first() {
    let h = harness();
    let mut created = Vec::new();
    for n in 0..5 {
        let post = h
            .service
            .create_post(CreatePostCommand::new(format!("Post {n}"), "body"))
            .await
            .expect("post created");
        created.push(post.id);
    }

    let listed: Vec<_> = h
        .service
        .list_posts()
        .await
        .expect("list")
        .into_iter()
        .map(|post| post.id)
        .collect();

    let mut expected = created.clone();
    expected.reverse();
    assert_eq!(listed, expected);

    let mut unique = created.clone();
    unique.sort_by(|a, b| a.as_str().cmp(b.as_str()));
    unique.dedup();
    assert_eq!(unique.len(), created.len());
}

#[tokio::test]
async fn classifier_failure_falls_back_to_other() {
    let h = harness_with(Arc::new(UnavailableClassifier));

    let post = h
        .service
        .create_post(CreatePostCommand::new("Product launch", "New product!"))
        .await
        .expect("post still created");

    assert_eq!(post.category, Category::Other);
    assert_eq!(h.store.count_posts().await.expect("count"), 1);
    assert!(h.chat.messages.lock().await.is_empty());
}

#[tokio::test]
async fn stored_category_matches_the_classification() {
    let h = harness();

    let post = h
        .service
        .create_post(CreatePostCommand::new("Team offsite", "Photos from the trip."))
        .await
        .expect("post created");

    let stored = h
        .service
        .find_post(&post.id)
        .await
        .expect("lookup")
        .expect("post stored");
    assert_eq!(stored.category, Category::Team);
}

#[tokio::test]
async fn relay_failure_does_not_fail_creation() {
    let relay = Arc::new(DownRelay::default());
    let h = harness();
    let service = h.service.clone().with_relay(RelayTarget {
        delivery: RelayDelivery::new(relay.clone(), instant_retry()),
        url: Url::parse("http://relay.test/hook").expect("relay url"),
    });

    let post = service
        .create_post(CreatePostCommand::new("Launch recap", "The launch went well."))
        .await
        .expect("post created despite relay outage");

    assert_eq!(relay.calls.load(Ordering::SeqCst), 3);
    let bodies = relay.bodies.lock().await;
    assert_eq!(bodies[0]["title"], "Launch recap");
    assert_eq!(bodies[0]["content"], "The launch went well.");
    assert_eq!(
        bodies[0]["summary"],
        build_summary("Launch recap", "The launch went well.")
    );
    let created_at = post
        .date
        .format(&time::format_description::well_known::Rfc3339)
        .expect("format date");
    assert_eq!(bodies[0]["timestamp"], created_at.as_str());
    assert_eq!(h.chat.messages.lock().await.len(), 1);
    assert!(service.find_post(&post.id).await.expect("lookup").is_some());
}

#[tokio::test]
async fn classify_summary_uses_configured_classifier() {
    let h = harness();
    assert_eq!(
        h.service.classify_summary("We are hiring").await.expect("classify"),
        Category::Team
    );
    assert!(matches!(
        h.service.classify_summary("  ").await,
        Err(PostServiceError::InvalidInput { .. })
    ));
}
