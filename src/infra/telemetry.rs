use std::sync::Once;

use metrics::{Unit, describe_counter};
use tracing_error::ErrorLayer;
use tracing_subscriber::{
    EnvFilter, fmt,
    layer::{Layer, SubscriberExt},
    util::SubscriberInitExt,
};

use crate::config::{LogFormat, LoggingSettings};

use super::error::InfraError;

static METRIC_DESCRIPTIONS: Once = Once::new();

/// Install a global tracing subscriber using the provided logging settings.
pub fn init(logging: &LoggingSettings) -> Result<(), InfraError> {
    describe_metrics();

    let env_filter = EnvFilter::builder()
        .with_default_directive(logging.level.into())
        .from_env_lossy();

    let fmt_layer = match logging.format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .with_target(true)
            .boxed(),
        LogFormat::Compact => fmt::layer().compact().with_target(true).boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(ErrorLayer::default())
        .with(fmt_layer)
        .try_init()
        .map_err(|err| {
            InfraError::telemetry(format!("failed to install tracing subscriber: {err}"))
        })
}

/// Register descriptions for every counter the service emits.
pub fn describe_metrics() {
    METRIC_DESCRIPTIONS.call_once(|| {
        describe_counter!(
            "quillpost_posts_created_total",
            Unit::Count,
            "Total number of posts stored by the creation pipeline."
        );
        describe_counter!(
            "quillpost_relay_attempts_total",
            Unit::Count,
            "Total number of POST attempts made to the relay webhook."
        );
        describe_counter!(
            "quillpost_relay_failures_total",
            Unit::Count,
            "Total number of relay deliveries abandoned after exhausting retries."
        );
        describe_counter!(
            "quillpost_notifications_total",
            Unit::Count,
            "Notifications by channel and outcome."
        );
        describe_counter!(
            "quillpost_classification_fallback_total",
            Unit::Count,
            "Total number of classifications that fell back to Other after an error."
        );
    });
}
