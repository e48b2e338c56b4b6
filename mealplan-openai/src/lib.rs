//! Mealplan OpenAI - Chat-completion backend for the meal planner
//!
//! This crate sends the rendered meal plan prompt to an OpenAI-compatible
//! chat-completions endpoint and returns the generated plan text.

mod client;
mod error;
mod generator;

pub use client::OpenAiClient;
pub use error::{Error, Result};
pub use generator::OpenAiGenerator;
