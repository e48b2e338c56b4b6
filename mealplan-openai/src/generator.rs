//! Generator backed by the chat-completions API

use async_trait::async_trait;
use mealplan_core::{GenerationRequest, Generator, GeneratorConfig};
use tracing::warn;

use crate::{OpenAiClient, Result};

/// Remote generator; unconfigured when no API key was supplied
#[derive(Debug)]
pub struct OpenAiGenerator {
    client: Option<OpenAiClient>,
}

impl OpenAiGenerator {
    /// Create a generator from settings and an optional API key
    ///
    /// A missing or blank key yields a generator that reports itself as
    /// unconfigured and refuses to generate.
    pub fn new(config: &GeneratorConfig, api_key: Option<String>) -> Result<Self> {
        let client = match api_key.filter(|k| !k.trim().is_empty()) {
            Some(key) => Some(OpenAiClient::new(key, config)?),
            None => {
                warn!("No OpenAI API key configured");
                None
            }
        };
        Ok(Self { client })
    }

    /// The underlying client, if configured
    pub fn client(&self) -> Option<&OpenAiClient> {
        self.client.as_ref()
    }
}

#[async_trait]
impl Generator for OpenAiGenerator {
    fn name(&self) -> &'static str {
        "openai"
    }

    async fn generate(&self, request: &GenerationRequest) -> mealplan_core::Result<String> {
        let client = self
            .client
            .as_ref()
            .ok_or_else(|| mealplan_core::Error::MissingCredentials("OpenAI".to_string()))?;

        Ok(client.complete(&request.prompt).await?)
    }

    fn is_configured(&self) -> bool {
        self.client.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mealplan_core::{GroceryList, GeneratorRegistry, Household};

    #[test]
    fn test_unconfigured_without_key() {
        let generator = OpenAiGenerator::new(&GeneratorConfig::default(), None).unwrap();
        assert!(!generator.is_configured());
        assert!(generator.client().is_none());

        let generator =
            OpenAiGenerator::new(&GeneratorConfig::default(), Some("  ".to_string())).unwrap();
        assert!(!generator.is_configured());
    }

    #[test]
    fn test_configured_with_key() {
        let generator =
            OpenAiGenerator::new(&GeneratorConfig::default(), Some("sk-test".to_string())).unwrap();
        assert!(generator.is_configured());
        assert_eq!(generator.name(), "openai");
    }

    #[tokio::test]
    async fn test_generate_without_key_fails() {
        let generator = OpenAiGenerator::new(&GeneratorConfig::default(), None).unwrap();
        let request = GenerationRequest::new(
            GroceryList::parse("eggs").unwrap(),
            Household::default(),
        );

        let result = generator.generate(&request).await;
        assert!(matches!(
            result,
            Err(mealplan_core::Error::MissingCredentials(_))
        ));
    }

    #[test]
    fn test_registers_alongside_keyword() {
        let mut registry = GeneratorRegistry::with_defaults();
        registry.register(Box::new(
            OpenAiGenerator::new(&GeneratorConfig::default(), None).unwrap(),
        ));

        assert_eq!(registry.list_registered(), vec!["keyword", "openai"]);
        assert_eq!(registry.list_configured(), vec!["keyword"]);
    }
}
