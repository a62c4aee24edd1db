use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::application::classify::{ClassifyError, ClassifyInput, Classifier};
use crate::domain::{classify::classify_keywords, types::Category};

pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

const TEMPERATURE: f32 = 0.7;
const MAX_TOKENS: u32 = 150;
const SYSTEM_PROMPT: &str = "You are a professional technical writer who creates clear, concise summaries for team communications.";

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: [ChatTurn<'a>; 2],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatTurn<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Asks an OpenAI-compatible chat-completions endpoint to restate the post,
/// then labels the answer with the keyword rules.
#[derive(Debug, Clone)]
pub struct ModelClassifier {
    client: Client,
    base_url: Url,
    api_key: String,
    model: String,
}

impl ModelClassifier {
    pub fn new(client: Client, base_url: Url, api_key: String, model: String) -> Self {
        Self {
            client,
            base_url,
            api_key,
            model,
        }
    }

    fn completions_url(&self) -> String {
        format!(
            "{}/chat/completions",
            self.base_url.as_str().trim_end_matches('/')
        )
    }
}

fn user_prompt(input: &ClassifyInput) -> String {
    let title = input.title.as_deref().unwrap_or(&input.summary);
    let description = input.description.as_deref().unwrap_or("");
    let content = input.content.as_deref().unwrap_or(&input.summary);
    format!(
        "Summarize the following blog article into 1\u{2013}2 professional, clear sentences. \
         Focus on the main topic and key update, and write it as if posting an update to a \
         professional team Discord server. Be brief and informative.\n\n\
         Title: {title}\n\
         Description: {description}\n\
         Full Content: {content}\n\n\
         Format the response as a single sentence starting with an appropriate emoji \
         (\u{1F680} for launches, \u{1F4E2} for announcements, etc.)."
    )
}

#[async_trait]
impl Classifier for ModelClassifier {
    async fn classify(&self, input: &ClassifyInput) -> Result<Category, ClassifyError> {
        let prompt = user_prompt(input);
        let request = CompletionRequest {
            model: &self.model,
            messages: [
                ChatTurn {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatTurn {
                    role: "user",
                    content: &prompt,
                },
            ],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };

        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|err| ClassifyError::Request(err.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            return Err(ClassifyError::Status {
                status,
                body: super::error_body(response).await,
            });
        }

        let completion: CompletionResponse = response
            .json()
            .await
            .map_err(|err| ClassifyError::Request(err.to_string()))?;
        let text = completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or(ClassifyError::EmptyResponse)?;

        debug!(model = %self.model, "model summary received");
        Ok(classify_keywords(&text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_falls_back_to_summary_when_fields_are_missing() {
        let prompt = user_prompt(&ClassifyInput::summary("New post: Launch."));
        assert!(prompt.contains("Title: New post: Launch."));
        assert!(prompt.contains("Full Content: New post: Launch."));
        assert!(prompt.starts_with("Summarize the following blog article into 1\u{2013}2"));
        assert!(prompt.contains("starting with an appropriate emoji"));
    }

    #[test]
    fn completions_url_joins_base_path() {
        let classifier = ModelClassifier::new(
            Client::new(),
            Url::parse("https://api.openai.com/v1/").expect("url"),
            "key".to_string(),
            DEFAULT_MODEL.to_string(),
        );
        assert_eq!(
            classifier.completions_url(),
            "https://api.openai.com/v1/chat/completions"
        );
    }
}
