//! Chat-completions API client using reqwest

use mealplan_core::GeneratorConfig;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use url::Url;

use crate::{Error, Result};

/// Chat message as sent to and returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChatMessage,
}

/// Error envelope returned on non-success responses
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ApiError,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

/// Client for an OpenAI-compatible chat-completions endpoint
pub struct OpenAiClient {
    http: reqwest::Client,
    api_base: Url,
    api_key: String,
    model: String,
    temperature: f32,
}

impl OpenAiClient {
    /// Create a client from generator settings and an explicit API key
    pub fn new(api_key: impl Into<String>, config: &GeneratorConfig) -> Result<Self> {
        let api_base = Url::parse(&config.api_base)?;
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("mealplan/", env!("CARGO_PKG_VERSION")))
            .build()?;

        info!(api_base = %api_base, model = %config.model, "Created OpenAI client");

        Ok(Self {
            http,
            api_base,
            api_key: api_key.into(),
            model: config.model.clone(),
            temperature: config.temperature,
        })
    }

    /// Get the model name
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Full URL of the chat-completions endpoint
    pub fn endpoint(&self) -> String {
        format!(
            "{}/chat/completions",
            self.api_base.as_str().trim_end_matches('/')
        )
    }

    /// Send a single user prompt and return the first choice's text
    pub async fn complete(&self, prompt: &str) -> Result<String> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            temperature: self.temperature,
        };

        debug!(
            endpoint = %self.endpoint(),
            model = %self.model,
            prompt_len = prompt.len(),
            "Sending chat completion request"
        );

        let response = self
            .http
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read response".to_string());
            return Err(error_from_status(status, &body));
        }

        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|e| Error::Parse(format!("Failed to parse chat response: {}", e)))?;

        let content = first_choice(chat)?;
        info!(chars = content.len(), "Received meal plan text");
        Ok(content)
    }
}

impl std::fmt::Debug for OpenAiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiClient")
            .field("api_base", &self.api_base.as_str())
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .finish_non_exhaustive()
    }
}

fn first_choice(chat: ChatResponse) -> Result<String> {
    chat.choices
        .into_iter()
        .next()
        .map(|choice| choice.message.content.trim().to_string())
        .filter(|content| !content.is_empty())
        .ok_or_else(|| Error::Parse("Chat response contained no text".to_string()))
}

/// Map a non-success response to an error, using the API's message if present
fn error_from_status(status: StatusCode, body: &str) -> Error {
    let message = serde_json::from_str::<ErrorResponse>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| body.trim().to_string());

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Error::Auth(message),
        StatusCode::TOO_MANY_REQUESTS => Error::RateLimited(message),
        _ => Error::Api {
            status: status.as_u16(),
            message,
        },
    }
}
