//! Error types for the meal planner

use thiserror::Error;

/// Result type alias for meal planner operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for meal planner operations
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// The grocery list had no usable items
    #[error("Grocery list is empty. Please enter some grocery items first.")]
    EmptyGroceryList,

    /// No API credential was found for the selected generator
    #[error("No API key found for {0}. Set it in the environment or in the secrets file.")]
    MissingCredentials(String),

    /// Invalid household profile input
    #[error("Invalid profile: {0}")]
    Profile(String),

    /// The requested generator is not registered
    #[error("Unknown generator: {0}")]
    UnknownGenerator(String),

    /// The generation backend failed
    #[error("Generation failed: {0}")]
    Generation(String),

    /// A document could not be laid out
    #[error("Render error: {0}")]
    Render(String),

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}
