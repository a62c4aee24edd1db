//! Configuration layer: typed settings with layered precedence (file → env → CLI).

mod cli;

pub use cli::*;

use std::{
    net::{IpAddr, SocketAddr},
    num::NonZeroU32,
    path::PathBuf,
    str::FromStr,
    time::Duration,
};

use clap::Parser;
use config::{Config, Environment, File};
use serde::Deserialize;
use thiserror::Error;
use tracing::level_filters::LevelFilter;
use url::Url;

use crate::application::relay::DEFAULT_MAX_ATTEMPTS;
use crate::infra::outbound::{DEFAULT_MODEL, EMAILJS_SEND_ENDPOINT, EmailJsCredentials};

const DEFAULT_CONFIG_BASENAME: &str = "config/default";
const LOCAL_CONFIG_BASENAME: &str = "quillpost";
const ENV_PREFIX: &str = "QUILLPOST";
const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_GRACEFUL_SHUTDOWN_SECS: u64 = 30;
const DEFAULT_PUBLIC_BASE_URL: &str = "http://localhost:3000";
const DEFAULT_STORE_PATH: &str = "data/posts.json";
const DEFAULT_MODEL_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_RELAY_BASE_DELAY_MS: u64 = 1_000;
const DEFAULT_RELAY_MAX_DELAY_MS: u64 = 10_000;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Fully-resolved deployment settings after precedence resolution and validation.
#[derive(Debug, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub logging: LoggingSettings,
    pub store: StoreSettings,
    pub classifier: ClassifierSettings,
    pub relay: RelaySettings,
    pub chat: ChatSettings,
    pub email: EmailSettings,
    pub http: HttpSettings,
}

#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub addr: SocketAddr,
    pub graceful_shutdown: Duration,
    pub public_base_url: Url,
}

#[derive(Debug, Clone)]
pub struct LoggingSettings {
    pub level: LevelFilter,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy)]
pub enum LogFormat {
    Json,
    Compact,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    Memory,
    File(PathBuf),
}

#[derive(Debug, Clone)]
pub struct StoreSettings {
    pub backend: StoreBackend,
    pub seed_welcome_post: bool,
}

#[derive(Debug, Clone)]
pub enum ClassifierSettings {
    Keyword,
    Model(ModelSettings),
}

#[derive(Debug, Clone)]
pub struct ModelSettings {
    pub base_url: Url,
    pub api_key: String,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct RelaySettings {
    pub webhook_url: Option<Url>,
    pub max_attempts: NonZeroU32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

#[derive(Debug, Clone)]
pub struct ChatSettings {
    pub webhook_url: Option<Url>,
}

#[derive(Debug, Clone)]
pub struct EmailSettings {
    pub endpoint: Url,
    pub service_id: Option<String>,
    pub template_id: Option<String>,
    pub public_key: Option<String>,
    pub recipient: Option<String>,
}

impl EmailSettings {
    /// All four provider values, or the keys that are still missing.
    pub fn credentials(&self) -> Result<EmailJsCredentials, Vec<&'static str>> {
        match (
            &self.service_id,
            &self.template_id,
            &self.public_key,
            &self.recipient,
        ) {
            (Some(service_id), Some(template_id), Some(public_key), Some(recipient)) => {
                Ok(EmailJsCredentials {
                    service_id: service_id.clone(),
                    template_id: template_id.clone(),
                    public_key: public_key.clone(),
                    recipient: recipient.clone(),
                })
            }
            _ => Err([
                ("email.service_id", &self.service_id),
                ("email.template_id", &self.template_id),
                ("email.public_key", &self.public_key),
                ("email.recipient", &self.recipient),
            ]
            .into_iter()
            .filter(|(_, value)| value.is_none())
            .map(|(key, _)| key)
            .collect()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct HttpSettings {
    pub request_timeout: Duration,
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to build configuration: {0}")]
    Build(#[from] config::ConfigError),
    #[error("invalid configuration for `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

impl LoadError {
    fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            reason: reason.into(),
        }
    }
}

/// Load settings using the configured precedence (file → environment → CLI).
pub fn load(cli: &CliArgs) -> Result<Settings, LoadError> {
    let mut builder = Config::builder()
        .add_source(File::with_name(DEFAULT_CONFIG_BASENAME).required(false))
        .add_source(File::with_name(LOCAL_CONFIG_BASENAME).required(false));

    if let Some(path) = cli.config_file.as_ref() {
        builder = builder.add_source(File::from(path.as_path()).required(true));
    }

    builder = builder.add_source(Environment::with_prefix(ENV_PREFIX).separator("__"));

    let mut raw: RawSettings = builder.build()?.try_deserialize()?;

    match cli.command.as_ref() {
        Some(Command::Serve(args)) => raw.apply_serve_overrides(&args.overrides),
        Some(Command::Classify(_)) | None => {
            raw.apply_serve_overrides(&ServeOverrides::default());
        }
    }

    Settings::from_raw(raw)
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSettings {
    server: RawServerSettings,
    logging: RawLoggingSettings,
    store: RawStoreSettings,
    classifier: RawClassifierSettings,
    relay: RawRelaySettings,
    chat: RawChatSettings,
    email: RawEmailSettings,
    http: RawHttpSettings,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawServerSettings {
    host: Option<String>,
    port: Option<u16>,
    graceful_shutdown_seconds: Option<u64>,
    public_base_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawLoggingSettings {
    level: Option<String>,
    json: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawStoreSettings {
    backend: Option<String>,
    path: Option<PathBuf>,
    seed_welcome_post: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawClassifierSettings {
    strategy: Option<String>,
    model: RawModelSettings,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawModelSettings {
    base_url: Option<String>,
    api_key: Option<String>,
    name: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawRelaySettings {
    webhook_url: Option<String>,
    max_attempts: Option<u32>,
    base_delay_ms: Option<u64>,
    max_delay_ms: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawChatSettings {
    webhook_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawEmailSettings {
    endpoint: Option<String>,
    service_id: Option<String>,
    template_id: Option<String>,
    public_key: Option<String>,
    recipient: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawHttpSettings {
    request_timeout_seconds: Option<u64>,
}

impl RawSettings {
    fn apply_serve_overrides(&mut self, overrides: &ServeOverrides) {
        if let Some(host) = overrides.server_host.as_ref() {
            self.server.host = Some(host.clone());
        }
        if let Some(port) = overrides.server_port {
            self.server.port = Some(port);
        }
        if let Some(seconds) = overrides.server_graceful_shutdown_seconds {
            self.server.graceful_shutdown_seconds = Some(seconds);
        }
        if let Some(url) = overrides.public_base_url.as_ref() {
            self.server.public_base_url = Some(url.clone());
        }
        if let Some(level) = overrides.log_level.as_ref() {
            self.logging.level = Some(level.clone());
        }
        if let Some(json) = overrides.log_json {
            self.logging.json = Some(json);
        }
        if let Some(backend) = overrides.store_backend.as_ref() {
            self.store.backend = Some(backend.clone());
        }
        if let Some(path) = overrides.store_path.as_ref() {
            self.store.path = Some(path.clone());
        }
        if let Some(strategy) = overrides.classifier_strategy.as_ref() {
            self.classifier.strategy = Some(strategy.clone());
        }
        if let Some(url) = overrides.relay_webhook_url.as_ref() {
            self.relay.webhook_url = Some(url.clone());
        }
        if let Some(url) = overrides.chat_webhook_url.as_ref() {
            self.chat.webhook_url = Some(url.clone());
        }
    }
}

impl Settings {
    fn from_raw(raw: RawSettings) -> Result<Self, LoadError> {
        let RawSettings {
            server,
            logging,
            store,
            classifier,
            relay,
            chat,
            email,
            http,
        } = raw;

        Ok(Self {
            server: build_server_settings(server)?,
            logging: build_logging_settings(logging)?,
            store: build_store_settings(store)?,
            classifier: build_classifier_settings(classifier)?,
            relay: build_relay_settings(relay)?,
            chat: ChatSettings {
                webhook_url: optional_url(chat.webhook_url, "chat.webhook_url")?,
            },
            email: build_email_settings(email)?,
            http: build_http_settings(http)?,
        })
    }
}

fn build_server_settings(server: RawServerSettings) -> Result<ServerSettings, LoadError> {
    let host = server.host.unwrap_or_else(|| DEFAULT_HOST.to_string());
    let port = server.port.unwrap_or(DEFAULT_PORT);
    if port == 0 {
        return Err(LoadError::invalid(
            "server.port",
            "port must be greater than zero",
        ));
    }
    let addr = parse_socket_addr(&host, port)
        .map_err(|reason| LoadError::invalid("server.addr", reason))?;

    let graceful_secs = server
        .graceful_shutdown_seconds
        .unwrap_or(DEFAULT_GRACEFUL_SHUTDOWN_SECS);
    if graceful_secs == 0 {
        return Err(LoadError::invalid(
            "server.graceful_shutdown_seconds",
            "must be greater than zero",
        ));
    }

    let public_base_url = parse_url(
        non_blank(server.public_base_url)
            .as_deref()
            .unwrap_or(DEFAULT_PUBLIC_BASE_URL),
        "server.public_base_url",
    )?;

    Ok(ServerSettings {
        addr,
        graceful_shutdown: Duration::from_secs(graceful_secs),
        public_base_url,
    })
}

fn build_logging_settings(logging: RawLoggingSettings) -> Result<LoggingSettings, LoadError> {
    let level = match logging.level {
        Some(level) => LevelFilter::from_str(level.as_str()).map_err(|err| {
            LoadError::invalid("logging.level", format!("failed to parse: {err}"))
        })?,
        None => LevelFilter::INFO,
    };

    let format = if logging.json.unwrap_or(false) {
        LogFormat::Json
    } else {
        LogFormat::Compact
    };

    Ok(LoggingSettings { level, format })
}

fn build_store_settings(store: RawStoreSettings) -> Result<StoreSettings, LoadError> {
    let backend = match non_blank(store.backend).as_deref() {
        None | Some("memory") => StoreBackend::Memory,
        Some("file") => {
            let path = store
                .path
                .unwrap_or_else(|| PathBuf::from(DEFAULT_STORE_PATH));
            if path.as_os_str().is_empty() {
                return Err(LoadError::invalid("store.path", "path must not be empty"));
            }
            StoreBackend::File(path)
        }
        Some(other) => {
            return Err(LoadError::invalid(
                "store.backend",
                format!("expected `memory` or `file`, got `{other}`"),
            ));
        }
    };

    Ok(StoreSettings {
        backend,
        seed_welcome_post: store.seed_welcome_post.unwrap_or(true),
    })
}

fn build_classifier_settings(
    classifier: RawClassifierSettings,
) -> Result<ClassifierSettings, LoadError> {
    match non_blank(classifier.strategy).as_deref() {
        None | Some("keyword") => Ok(ClassifierSettings::Keyword),
        Some("model") => {
            let model = classifier.model;
            let api_key = non_blank(model.api_key).ok_or_else(|| {
                LoadError::invalid(
                    "classifier.model.api_key",
                    "required when classifier.strategy is `model`",
                )
            })?;
            let base_url = match non_blank(model.base_url) {
                Some(value) => parse_url(&value, "classifier.model.base_url")?,
                None => parse_url(DEFAULT_MODEL_BASE_URL, "classifier.model.base_url")?,
            };
            let name = non_blank(model.name).unwrap_or_else(|| DEFAULT_MODEL.to_string());
            Ok(ClassifierSettings::Model(ModelSettings {
                base_url,
                api_key,
                name,
            }))
        }
        Some(other) => Err(LoadError::invalid(
            "classifier.strategy",
            format!("expected `keyword` or `model`, got `{other}`"),
        )),
    }
}

fn build_relay_settings(relay: RawRelaySettings) -> Result<RelaySettings, LoadError> {
    let webhook_url = optional_url(relay.webhook_url, "relay.webhook_url")?;
    let max_attempts = NonZeroU32::new(relay.max_attempts.unwrap_or(DEFAULT_MAX_ATTEMPTS.get()))
        .ok_or_else(|| LoadError::invalid("relay.max_attempts", "must be greater than zero"))?;
    let base_delay_ms = relay.base_delay_ms.unwrap_or(DEFAULT_RELAY_BASE_DELAY_MS);
    let max_delay_ms = relay.max_delay_ms.unwrap_or(DEFAULT_RELAY_MAX_DELAY_MS);
    if max_delay_ms < base_delay_ms {
        return Err(LoadError::invalid(
            "relay.max_delay_ms",
            "must not be smaller than relay.base_delay_ms",
        ));
    }

    Ok(RelaySettings {
        webhook_url,
        max_attempts,
        base_delay: Duration::from_millis(base_delay_ms),
        max_delay: Duration::from_millis(max_delay_ms),
    })
}

fn build_email_settings(email: RawEmailSettings) -> Result<EmailSettings, LoadError> {
    let endpoint = match non_blank(email.endpoint) {
        Some(value) => parse_url(&value, "email.endpoint")?,
        None => parse_url(EMAILJS_SEND_ENDPOINT, "email.endpoint")?,
    };

    Ok(EmailSettings {
        endpoint,
        service_id: non_blank(email.service_id),
        template_id: non_blank(email.template_id),
        public_key: non_blank(email.public_key),
        recipient: non_blank(email.recipient),
    })
}

fn build_http_settings(http: RawHttpSettings) -> Result<HttpSettings, LoadError> {
    let seconds = http
        .request_timeout_seconds
        .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);
    if seconds == 0 {
        return Err(LoadError::invalid(
            "http.request_timeout_seconds",
            "must be greater than zero",
        ));
    }
    Ok(HttpSettings {
        request_timeout: Duration::from_secs(seconds),
    })
}

/// Blank strings count as unset so that empty environment variables disable a channel.
fn non_blank(value: Option<String>) -> Option<String> {
    value.and_then(|value| {
        let trimmed = value.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    })
}

fn optional_url(value: Option<String>, key: &'static str) -> Result<Option<Url>, LoadError> {
    non_blank(value)
        .map(|value| parse_url(&value, key))
        .transpose()
}

fn parse_url(value: &str, key: &'static str) -> Result<Url, LoadError> {
    Url::parse(value).map_err(|err| LoadError::invalid(key, format!("invalid URL: {err}")))
}

fn parse_socket_addr(host: &str, port: u16) -> Result<SocketAddr, String> {
    if host.eq_ignore_ascii_case("localhost") {
        return Ok(SocketAddr::from(([127, 0, 0, 1], port)));
    }
    host.parse::<IpAddr>()
        .map(|ip| SocketAddr::new(ip, port))
        .map_err(|err| format!("invalid host `{host}`: {err}"))
}

/// Resolve configuration using the supplied CLI arguments, returning both for downstream use.
pub fn load_with_cli() -> Result<(CliArgs, Settings), LoadError> {
    let args = CliArgs::parse();
    let settings = load(&args)?;
    Ok((args, settings))
}
