//! Topic classification seam.

use async_trait::async_trait;
use metrics::counter;
use thiserror::Error;
use tracing::{debug, warn};

use crate::domain::{classify::classify_keywords, types::Category};

#[derive(Debug, Error)]
pub enum ClassifyError {
    #[error("classification request failed: {0}")]
    Request(String),
    #[error("classification service returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("classification service returned no content")]
    EmptyResponse,
}

/// Text handed to a classifier. Only `summary` is required; the remaining
/// fields give model-backed classifiers more context.
#[derive(Debug, Clone, Default)]
pub struct ClassifyInput {
    pub summary: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub content: Option<String>,
}

impl ClassifyInput {
    pub fn summary(summary: impl Into<String>) -> Self {
        Self {
            summary: summary.into(),
            ..Default::default()
        }
    }
}

#[async_trait]
pub trait Classifier: Send + Sync {
    async fn classify(&self, input: &ClassifyInput) -> Result<Category, ClassifyError>;
}

/// Keyword matching over the summary. Never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordClassifier;

#[async_trait]
impl Classifier for KeywordClassifier {
    async fn classify(&self, input: &ClassifyInput) -> Result<Category, ClassifyError> {
        Ok(classify_keywords(&input.summary))
    }
}

/// Classify, falling back to [`Category::Other`] when the classifier fails.
pub async fn classify_or_default(classifier: &dyn Classifier, input: &ClassifyInput) -> Category {
    match classifier.classify(input).await {
        Ok(category) => {
            debug!(category = %category, "summary classified");
            category
        }
        Err(err) => {
            counter!("quillpost_classification_fallback_total").increment(1);
            warn!(error = %err, "classification failed; using default category");
            Category::default()
        }
    }
}
