//! Configuration management for the meal planner
//!
//! Configuration is loaded with the following priority (highest to lowest):
//! 1. CLI flags
//! 2. Environment variables (MEALPLAN_*)
//! 3. Config file (~/.config/mealplan/config.toml)
//! 4. Default values

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::render::DocumentFormat;
use crate::{Error, Result};

/// Text generation settings
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Registered generator to use ("openai" or "keyword")
    pub backend: String,

    /// Model name passed to the remote API
    pub model: String,

    /// Sampling temperature
    pub temperature: f32,

    /// Base URL of the chat-completions API
    pub api_base: String,

    /// Request timeout
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            backend: "openai".to_string(),
            model: "gpt-3.5-turbo".to_string(),
            temperature: 0.7,
            api_base: "https://api.openai.com/v1".to_string(),
            timeout: Duration::from_secs(60),
        }
    }
}

/// Output document settings
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct DocumentConfig {
    /// Document format
    pub format: DocumentFormat,

    /// Directory the document is written to
    pub output_dir: PathBuf,

    /// Number of days laid out on each page
    pub days_per_page: usize,

    /// Fold text to plain ASCII before layout
    pub ascii_fold: bool,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            format: DocumentFormat::Pdf,
            output_dir: PathBuf::from("."),
            days_per_page: 2,
            ascii_fold: true,
        }
    }
}

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Generator configuration
    pub generator: GeneratorConfig,

    /// Document configuration
    pub document: DocumentConfig,
}

/// Values given on the command line
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub backend: Option<String>,
    pub model: Option<String>,
    pub format: Option<DocumentFormat>,
    pub output_dir: Option<PathBuf>,
}

impl Config {
    /// Load configuration from the default config file location
    ///
    /// Returns default config if file doesn't exist
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();

        if let Some(path) = config_path {
            if path.exists() {
                return Self::load_from_file(&path);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(Error::Io)?;
        toml::from_str(&contents)
            .map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))
    }

    /// Get the default config file path
    ///
    /// Returns `~/.config/mealplan/config.toml` on Unix
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("mealplan").join("config.toml"))
    }

    /// Apply environment variable overrides
    ///
    /// Supported variables:
    /// - MEALPLAN_BACKEND: Generator to use
    /// - MEALPLAN_MODEL: Model to use
    /// - MEALPLAN_API_BASE: Chat-completions API base URL
    /// - MEALPLAN_OUTPUT_DIR: Where documents are written
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(backend) = std::env::var("MEALPLAN_BACKEND") {
            self.generator.backend = backend;
        }

        if let Ok(model) = std::env::var("MEALPLAN_MODEL") {
            self.generator.model = model;
        }

        if let Ok(api_base) = std::env::var("MEALPLAN_API_BASE") {
            self.generator.api_base = api_base;
        }

        if let Ok(dir) = std::env::var("MEALPLAN_OUTPUT_DIR") {
            self.document.output_dir = PathBuf::from(dir);
        }

        self
    }

    /// Apply CLI flag overrides
    pub fn with_cli_overrides(mut self, overrides: CliOverrides) -> Self {
        if let Some(backend) = overrides.backend {
            self.generator.backend = backend;
        }

        if let Some(model) = overrides.model {
            self.generator.model = model;
        }

        if let Some(format) = overrides.format {
            self.document.format = format;
        }

        if let Some(dir) = overrides.output_dir {
            self.document.output_dir = dir;
        }

        self
    }

    /// Check values that serde cannot
    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.generator.api_base).map_err(|e| {
            Error::Config(format!(
                "Invalid api_base '{}': {}",
                self.generator.api_base, e
            ))
        })?;

        if !(0.0..=2.0).contains(&self.generator.temperature) {
            return Err(Error::Config(format!(
                "temperature must be between 0 and 2, got {}",
                self.generator.temperature
            )));
        }

        if self.document.days_per_page == 0 {
            return Err(Error::Config("days_per_page must be at least 1".to_string()));
        }

        Ok(())
    }

    /// Load configuration with all overrides applied
    ///
    /// Priority: CLI > env > config file > defaults
    pub fn load_with_overrides(overrides: CliOverrides) -> Result<Self> {
        let config = Self::load()?
            .with_env_overrides()
            .with_cli_overrides(overrides);
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.generator.backend, "openai");
        assert_eq!(config.generator.model, "gpt-3.5-turbo");
        assert_eq!(config.generator.timeout, Duration::from_secs(60));
        assert_eq!(config.document.format, DocumentFormat::Pdf);
        assert_eq!(config.document.days_per_page, 2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_cli_overrides() {
        let config = Config::default().with_cli_overrides(CliOverrides {
            backend: Some("keyword".to_string()),
            model: Some("gpt-4".to_string()),
            format: Some(DocumentFormat::Markdown),
            output_dir: Some(PathBuf::from("/tmp/plans")),
        });

        assert_eq!(config.generator.backend, "keyword");
        assert_eq!(config.generator.model, "gpt-4");
        assert_eq!(config.document.format, DocumentFormat::Markdown);
        assert_eq!(config.document.output_dir, PathBuf::from("/tmp/plans"));
    }

    #[test]
    fn test_empty_cli_overrides_keep_values() {
        let config = Config::default().with_cli_overrides(CliOverrides::default());
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_parse_toml() {
        let toml = r#"
[generator]
backend = "openai"
model = "gpt-4o-mini"
temperature = 0.2
api_base = "http://localhost:8080/v1"
timeout = "2m"

[document]
format = "markdown"
output_dir = "plans"
days_per_page = 7
ascii_fold = false
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.generator.model, "gpt-4o-mini");
        assert_eq!(config.generator.timeout, Duration::from_secs(120));
        assert_eq!(config.generator.api_base, "http://localhost:8080/v1");
        assert_eq!(config.document.format, DocumentFormat::Markdown);
        assert_eq!(config.document.days_per_page, 7);
        assert!(!config.document.ascii_fold);
    }

    #[test]
    fn test_partial_toml() {
        let toml = r#"
[generator]
model = "gpt-4"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        // Everything else should use defaults
        assert_eq!(config.generator.backend, "openai");
        assert_eq!(config.generator.model, "gpt-4");
        assert_eq!(config.document, DocumentConfig::default());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.generator.api_base = "not a url".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.generator.temperature = 3.5;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.document.days_per_page = 0;
        assert!(config.validate().is_err());
    }
}
