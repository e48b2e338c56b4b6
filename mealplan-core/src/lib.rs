//! Mealplan Core - Core library for the household meal planner
//!
//! This crate parses free-text weekly meal plans into structured days and
//! meals, builds generation prompts from a grocery list and household
//! profiles, and lays plans out as downloadable documents.

pub mod config;
pub mod error;
pub mod generate;
pub mod plan;
pub mod profile;
pub mod prompt;
pub mod render;
pub mod secrets;

pub use config::{CliOverrides, Config, DocumentConfig, GeneratorConfig};
pub use error::{Error, Result};
pub use generate::{GenerationRequest, Generator, GeneratorRegistry, KeywordGenerator};
pub use plan::{
    format_plan, parse_plan, parse_plan_with_people, Day, Meal, MealType, Plan, Weekday,
};
pub use profile::{GroceryList, HealthGoal, Household, Person};
pub use render::{Document, DocumentFormat, DocumentRenderer};
pub use secrets::Secrets;
