//! Error types for OpenAI operations

use thiserror::Error;

/// Result type for OpenAI operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while talking to the chat-completions API
#[derive(Error, Debug)]
pub enum Error {
    /// Transport-level failure (connection, timeout, TLS)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Invalid or missing API key
    #[error("OpenAI authentication error: {0}")]
    Auth(String),

    /// Rate limit or quota exceeded
    #[error("OpenAI rate limit exceeded: {0}")]
    RateLimited(String),

    /// Any other non-success response
    #[error("OpenAI API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Invalid API base URL
    #[error("Invalid API URL: {0}")]
    Url(#[from] url::ParseError),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<Error> for mealplan_core::Error {
    fn from(err: Error) -> Self {
        mealplan_core::Error::Generation(err.to_string())
    }
}
