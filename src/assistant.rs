//! Natural-language assistant
//!
//! The assistant service reports failures in-band: an error comes back as
//! a reply string starting with a known prefix. [`AssistantReply`] turns
//! that into a proper variant at the boundary so nothing downstream has to
//! string-match.

use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

const PERPLEXITY_ENDPOINT: &str = "https://api.perplexity.ai/chat/completions";

const SYSTEM_PROMPT: &str = "You are a helpful hotel booking assistant.";

/// Prefix of replies produced when the API returns a non-success status
pub const API_ERROR_PREFIX: &str = "LLM API error";

/// Prefix of replies produced when the API response cannot be parsed
pub const PARSE_ERROR_PREFIX: &str = "LLM response parse error";

/// Reply used when the API answers without any choices
pub const NO_ANSWER: &str = "No answer available.";

/// Answers free-form travel questions
#[async_trait]
pub trait AssistantService: Send + Sync {
    /// Ask a question; failures are reported as prefixed reply strings
    async fn ask(&self, question: &str) -> String;
}

/// Assistant reply with the in-band error channel decoded
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssistantReply {
    /// A usable answer
    Answer(String),
    /// The service failed; carries the service's error message
    Failed(String),
}

impl AssistantReply {
    /// Classify a raw reply string
    #[must_use]
    pub fn from_raw(raw: String) -> Self {
        if raw.starts_with(API_ERROR_PREFIX) || raw.starts_with(PARSE_ERROR_PREFIX) {
            Self::Failed(raw)
        } else {
            Self::Answer(raw)
        }
    }

    /// Ask the service and classify its reply
    pub async fn ask(service: &dyn AssistantService, question: &str) -> Self {
        Self::from_raw(service.ask(question).await)
    }

    #[must_use]
    pub const fn is_answer(&self) -> bool {
        matches!(self, Self::Answer(_))
    }
}

/// Perplexity chat-completions client
pub struct PerplexityAssistant {
    client: reqwest::Client,
    api_key: SecretString,
    model: String,
    endpoint: String,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    #[serde(default)]
    message: Option<ChoiceMessage>,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

impl PerplexityAssistant {
    /// Create a new assistant client
    ///
    /// # Errors
    ///
    /// Returns error if API key is missing or the HTTP client cannot be built
    pub fn new(api_key: SecretString, model: String, timeout: Duration) -> Result<Self> {
        if api_key.expose_secret().is_empty() {
            return Err(Error::Config("Perplexity API key required".to_string()));
        }

        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            api_key,
            model,
            endpoint: PERPLEXITY_ENDPOINT.to_string(),
        })
    }

    /// Point the client at a different endpoint
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

#[async_trait]
impl AssistantService for PerplexityAssistant {
    async fn ask(&self, question: &str) -> String {
        let request = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: question,
                },
            ],
            max_tokens: 800,
            temperature: 0.5,
        };

        let response = match self
            .client
            .post(&self.endpoint)
            .header(
                "Authorization",
                format!("Bearer {}", self.api_key.expose_secret()),
            )
            .json(&request)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(error = %e, "assistant request failed");
                return format!("{API_ERROR_PREFIX}: {e}");
            }
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "assistant API error");
            return format!("{API_ERROR_PREFIX}: {} - {body}", status.as_u16());
        }

        match response.json::<ChatResponse>().await {
            Ok(chat) => extract_answer(chat),
            Err(e) => {
                tracing::error!(error = %e, "failed to parse assistant response");
                format!("{PARSE_ERROR_PREFIX}: {e}")
            }
        }
    }
}

fn extract_answer(chat: ChatResponse) -> String {
    chat.choices
        .into_iter()
        .next()
        .map_or_else(
            || NO_ANSWER.to_string(),
            |choice| {
                choice
                    .message
                    .and_then(|m| m.content)
                    .unwrap_or_else(|| NO_ANSWER.to_string())
            },
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reply_classification() {
        assert_eq!(
            AssistantReply::from_raw("LLM API error: 401 - unauthorized".to_string()),
            AssistantReply::Failed("LLM API error: 401 - unauthorized".to_string())
        );
        assert!(matches!(
            AssistantReply::from_raw("LLM response parse error: eof".to_string()),
            AssistantReply::Failed(_)
        ));
        assert!(AssistantReply::from_raw("Try the Oberoi in Mumbai.".to_string()).is_answer());
        assert!(AssistantReply::from_raw(NO_ANSWER.to_string()).is_answer());
    }

    #[test]
    fn test_extract_answer() {
        let chat: ChatResponse = serde_json::from_value(serde_json::json!({
            "choices": [{ "message": { "role": "assistant", "content": "Goa is lovely." } }]
        }))
        .unwrap();
        assert_eq!(extract_answer(chat), "Goa is lovely.");

        let empty: ChatResponse = serde_json::from_value(serde_json::json!({ "choices": [] })).unwrap();
        assert_eq!(extract_answer(empty), NO_ANSWER);

        let no_content: ChatResponse =
            serde_json::from_value(serde_json::json!({ "choices": [{ "message": {} }] })).unwrap();
        assert_eq!(extract_answer(no_content), NO_ANSWER);
    }

    #[test]
    fn test_new_requires_key() {
        let result = PerplexityAssistant::new(
            SecretString::from(String::new()),
            "sonar".to_string(),
            Duration::from_secs(5),
        );
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
