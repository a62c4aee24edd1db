use std::{process, sync::Arc};

use quillpost::{
    application::{
        classify::{Classifier, ClassifyInput, KeywordClassifier, classify_or_default},
        error::AppError,
        notify::{ChatChannel, EmailChannel, NotificationService},
        posts::{PostLinks, PostService, RelayTarget},
        relay::{RelayDelivery, RetryPolicy},
        repos::{PostsRepo, PostsWriteRepo},
    },
    config::{self, ClassifierSettings, StoreBackend},
    infra::{
        error::InfraError,
        http::{self, AppState},
        outbound::{
            ChatWebhookClient, EmailJsClient, HttpWebhookTransport, ModelClassifier,
            build_http_client,
        },
        store::PostStore,
        telemetry,
    },
};
use reqwest::Client;
use tokio::sync::Notify;
use tracing::{Dispatch, Level, dispatcher, error, info, warn};
use tracing_subscriber::fmt as tracing_fmt;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt().with_max_level(Level::ERROR).finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (cli_args, settings) = config::load_with_cli()
        .map_err(|err| InfraError::configuration(err.to_string()))?;

    let command = cli_args
        .command
        .unwrap_or(config::Command::Serve(Box::<config::ServeArgs>::default()));

    telemetry::init(&settings.logging).map_err(AppError::from)?;

    match command {
        config::Command::Serve(_) => run_serve(settings).await,
        config::Command::Classify(args) => run_classify(args).await,
    }
}

async fn run_classify(args: config::ClassifyArgs) -> Result<(), AppError> {
    let category = classify_or_default(&KeywordClassifier, &ClassifyInput::summary(args.text)).await;
    println!("{category}");
    Ok(())
}

async fn run_serve(settings: config::Settings) -> Result<(), AppError> {
    let client = build_http_client(settings.http.request_timeout)?;
    let posts = Arc::new(build_post_service(&settings, &client).await?);
    let router = http::build_router(AppState::new(posts));

    let listener = tokio::net::TcpListener::bind(settings.server.addr)
        .await
        .map_err(|err| AppError::from(InfraError::from(err)))?;
    info!(addr = %settings.server.addr, "listening");

    let shutdown = Arc::new(Notify::new());
    let server = axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown({
            let shutdown = shutdown.clone();
            async move { shutdown.notified().await }
        })
        .into_future();
    tokio::pin!(server);

    tokio::select! {
        result = &mut server => {
            return result.map_err(|err| AppError::unexpected(format!("server error: {err}")));
        }
        signal = tokio::signal::ctrl_c() => {
            signal.map_err(|err| AppError::from(InfraError::from(err)))?;
        }
    }

    info!(
        grace_seconds = settings.server.graceful_shutdown.as_secs(),
        "shutdown requested; draining connections"
    );
    shutdown.notify_one();

    tokio::select! {
        result = &mut server => {
            result.map_err(|err| AppError::unexpected(format!("server error: {err}")))
        }
        () = tokio::time::sleep(settings.server.graceful_shutdown) => {
            warn!("graceful shutdown timed out; dropping open connections");
            Ok(())
        }
    }
}

async fn build_post_service(
    settings: &config::Settings,
    client: &Client,
) -> Result<PostService, AppError> {
    let store = match &settings.store.backend {
        StoreBackend::Memory => PostStore::in_memory(settings.store.seed_welcome_post),
        StoreBackend::File(path) => PostStore::open(path, settings.store.seed_welcome_post).await?,
    };
    let store = Arc::new(store);
    let reader: Arc<dyn PostsRepo> = store.clone();
    let writer: Arc<dyn PostsWriteRepo> = store;

    let classifier: Arc<dyn Classifier> = match &settings.classifier {
        ClassifierSettings::Keyword => Arc::new(KeywordClassifier),
        ClassifierSettings::Model(model) => Arc::new(ModelClassifier::new(
            client.clone(),
            model.base_url.clone(),
            model.api_key.clone(),
            model.name.clone(),
        )),
    };

    let chat: Option<Arc<dyn ChatChannel>> = match &settings.chat.webhook_url {
        Some(url) => Some(Arc::new(ChatWebhookClient::new(client.clone(), url.clone()))),
        None => {
            warn!("chat.webhook_url not set; product announcements are disabled");
            None
        }
    };

    let email: Option<Arc<dyn EmailChannel>> = match settings.email.credentials() {
        Ok(credentials) => Some(Arc::new(EmailJsClient::new(
            client.clone(),
            settings.email.endpoint.clone(),
            credentials,
        ))),
        Err(missing) => {
            warn!(missing = ?missing, "email settings incomplete; team emails are disabled");
            None
        }
    };

    let service = PostService::new(
        reader,
        writer,
        classifier,
        NotificationService::new(chat, email),
        PostLinks::new(&settings.server.public_base_url),
    );

    let relay = &settings.relay;
    Ok(match &relay.webhook_url {
        Some(url) => {
            let policy = RetryPolicy {
                max_attempts: relay.max_attempts,
                base_delay: relay.base_delay,
                max_delay: relay.max_delay,
            };
            let transport = Arc::new(HttpWebhookTransport::new(client.clone()));
            service.with_relay(RelayTarget {
                delivery: RelayDelivery::new(transport, policy),
                url: url.clone(),
            })
        }
        None => {
            warn!("relay.webhook_url not set; relay delivery is disabled");
            service
        }
    })
}
