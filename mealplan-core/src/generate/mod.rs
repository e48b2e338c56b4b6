//! Text generators that produce a free-text meal plan
//!
//! A generator takes a [`GenerationRequest`] and returns plan text in the
//! line format understood by [`crate::plan::parse_plan`]. Generators are
//! looked up by name in a [`GeneratorRegistry`].

use std::collections::HashMap;

use async_trait::async_trait;

use crate::profile::{GroceryList, Household};
use crate::prompt::build_prompt;
use crate::{Error, Result};

mod keyword;

pub use keyword::KeywordGenerator;

/// Everything a generator needs for one plan
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// Validated grocery list
    pub groceries: GroceryList,
    /// People the plan is for (may be empty)
    pub household: Household,
    /// Rendered prompt for language-model backends
    pub prompt: String,
}

impl GenerationRequest {
    /// Build a request, rendering the prompt from the inputs
    pub fn new(groceries: GroceryList, household: Household) -> Self {
        let prompt = build_prompt(&groceries, &household);
        Self {
            groceries,
            household,
            prompt,
        }
    }
}

/// Trait for meal plan text generators
#[async_trait]
pub trait Generator: Send + Sync {
    /// Get the name of this generator
    fn name(&self) -> &'static str;

    /// Produce plan text for the request
    async fn generate(&self, request: &GenerationRequest) -> Result<String>;

    /// Whether this generator has everything it needs (e.g. credentials)
    fn is_configured(&self) -> bool;
}

/// Registry of available generators
pub struct GeneratorRegistry {
    generators: HashMap<String, Box<dyn Generator>>,
}

impl GeneratorRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            generators: HashMap::new(),
        }
    }

    /// Create a registry with the built-in offline generator
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(KeywordGenerator::new()));
        registry
    }

    /// Register a generator, replacing any with the same name
    pub fn register(&mut self, generator: Box<dyn Generator>) {
        self.generators
            .insert(generator.name().to_string(), generator);
    }

    /// Get a generator by name
    pub fn get(&self, name: &str) -> Option<&dyn Generator> {
        self.generators.get(name).map(|g| g.as_ref())
    }

    /// Get a generator by name or fail with [`Error::UnknownGenerator`]
    pub fn require(&self, name: &str) -> Result<&dyn Generator> {
        self.get(name)
            .ok_or_else(|| Error::UnknownGenerator(name.to_string()))
    }

    /// List generators that are ready to use
    pub fn list_configured(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .generators
            .values()
            .filter(|g| g.is_configured())
            .map(|g| g.name())
            .collect();
        names.sort_unstable();
        names
    }

    /// List all registered generators
    pub fn list_registered(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.generators.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }
}

impl Default for GeneratorRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl std::fmt::Debug for GeneratorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeneratorRegistry")
            .field("generators", &self.list_registered())
            .finish()
    }
}
