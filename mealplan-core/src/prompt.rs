//! Prompt template for text generators
//!
//! The template is embedded at compile time and uses `{{VARIABLE}}`
//! placeholders that are rendered from a [`PromptContext`].

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::profile::{GroceryList, Household};

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{([A-Z_]+)\}\}").unwrap());

/// Text used for placeholders with no value
const UNSET: &str = "(not specified)";

/// Embedded meal plan prompt
const MEAL_PLAN_PROMPT: &str = include_str!("prompts/meal_plan.md");

/// Get the raw meal plan prompt template
pub fn get_template() -> &'static str {
    MEAL_PLAN_PROMPT
}

/// Context for rendering a prompt template
#[derive(Debug, Clone, Default)]
pub struct PromptContext {
    /// Variable substitutions
    variables: HashMap<String, String>,
}

impl PromptContext {
    /// Create a new empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a variable value
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.variables.insert(key.into(), value.into());
        self
    }

    /// Set a variable value (builder pattern)
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    /// Set the grocery list, one item per line
    pub fn with_groceries(self, groceries: &GroceryList) -> Self {
        let items = groceries
            .items()
            .iter()
            .map(|item| format!("- {}", item))
            .collect::<Vec<_>>()
            .join("\n");
        self.with("GROCERIES", items)
    }

    /// Set the household annotations
    pub fn with_household(self, household: &Household) -> Self {
        let people = if household.is_empty() {
            "(no individual preferences)".to_string()
        } else {
            household
                .people
                .iter()
                .map(|p| {
                    let mut line = format!("- {}: goal {} ({})", p.name, p.goal, p.goal.guidance());
                    if !p.dislikes.trim().is_empty() {
                        line.push_str(&format!("; dislikes {}", p.dislikes.trim()));
                    }
                    line
                })
                .collect::<Vec<_>>()
                .join("\n")
        };
        self.with("HOUSEHOLD", people)
    }
}

/// Render the meal plan prompt with the given context
pub fn render(context: &PromptContext) -> String {
    render_template(MEAL_PLAN_PROMPT, context)
}

/// Substitute every `{{NAME}}` placeholder in one pass
///
/// Substituted values are never rescanned, so braces in grocery items or
/// dislikes come through verbatim.
fn render_template(template: &str, context: &PromptContext) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures| {
            context
                .variables
                .get(&caps[1])
                .map(String::as_str)
                .unwrap_or(UNSET)
                .to_string()
        })
        .into_owned()
}

/// Build the full generation prompt for a grocery list and household
pub fn build_prompt(groceries: &GroceryList, household: &Household) -> String {
    let context = PromptContext::new()
        .with_groceries(groceries)
        .with_household(household);
    render(&context)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{HealthGoal, Person};

    #[test]
    fn test_get_template() {
        let template = get_template();
        assert!(template.contains("{{GROCERIES}}"));
        assert!(template.contains("{{HOUSEHOLD}}"));
        assert!(template.contains("Monday:"));
    }

    #[test]
    fn test_render_empty_context() {
        let rendered = render(&PromptContext::new());
        assert!(rendered.contains("(not specified)"));
        assert!(!rendered.contains("{{"));
    }

    #[test]
    fn test_build_prompt_with_household() {
        let groceries = GroceryList::parse("eggs\nspinach").unwrap();
        let household = Household::new(vec![
            Person::new("Brian")
                .with_goal(HealthGoal::WeightLoss)
                .with_dislikes("mushrooms"),
            Person::new("Ana"),
        ])
        .unwrap();

        let prompt = build_prompt(&groceries, &household);
        assert!(prompt.contains("- eggs\n- spinach"));
        assert!(prompt.contains("- Brian: goal Weight Loss"));
        assert!(prompt.contains("dislikes mushrooms"));
        assert!(prompt.contains("- Ana: goal General Health"));
        assert!(!prompt.contains("{{"));
    }

    #[test]
    fn test_build_prompt_without_household() {
        let groceries = GroceryList::parse("rice").unwrap();
        let prompt = build_prompt(&groceries, &Household::default());
        assert!(prompt.contains("(no individual preferences)"));
    }

    #[test]
    fn test_values_are_not_rescanned() {
        let groceries = GroceryList::parse("{{FOO}} sauce\nrice").unwrap();
        let prompt = build_prompt(&groceries, &Household::default());

        assert!(prompt.contains("- {{FOO}} sauce"));
        assert!(!prompt.contains("(not specified) sauce"));
    }

    #[test]
    fn test_custom_variable() {
        let rendered = render_template("Hello {{NAME}}, {{lower}}", &PromptContext::new().with("NAME", "Ana"));
        assert_eq!(rendered, "Hello Ana, {{lower}}");
    }
}
