//! Household profiles and grocery list input
//!
//! A household is an optional list of people, each with a health goal and
//! free-text dislikes. Profiles can be loaded from a TOML file:
//!
//! ```toml
//! [[person]]
//! name = "Brian"
//! goal = "weight-loss"
//! dislikes = "mushrooms, olives"
//! ```
//!
//! or given on the command line as `NAME[:GOAL[:DISLIKES]]`.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{Error, Result};

/// Health goal selected for a person
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum HealthGoal {
    #[default]
    GeneralHealth,
    WeightLoss,
    WeightGain,
    HighEnergy,
}

impl HealthGoal {
    /// All selectable goals
    pub fn all() -> &'static [HealthGoal] {
        &[
            HealthGoal::GeneralHealth,
            HealthGoal::WeightLoss,
            HealthGoal::WeightGain,
            HealthGoal::HighEnergy,
        ]
    }

    /// Display label for this goal
    pub fn name(&self) -> &'static str {
        match self {
            HealthGoal::GeneralHealth => "General Health",
            HealthGoal::WeightLoss => "Weight Loss",
            HealthGoal::WeightGain => "Weight Gain",
            HealthGoal::HighEnergy => "High Energy",
        }
    }

    /// Short guidance for the generator
    pub fn guidance(&self) -> &'static str {
        match self {
            HealthGoal::GeneralHealth => "balanced portions with plenty of vegetables",
            HealthGoal::WeightLoss => "lighter portions, lean protein, fewer refined carbs",
            HealthGoal::WeightGain => "larger portions and calorie-dense additions",
            HealthGoal::HighEnergy => "slow-release carbs and protein for sustained energy",
        }
    }
}

impl fmt::Display for HealthGoal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for HealthGoal {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .to_lowercase()
            .chars()
            .map(|c| if c == '_' || c == ' ' { '-' } else { c })
            .collect();

        match normalized.as_str() {
            "general-health" | "general" | "health" => Ok(HealthGoal::GeneralHealth),
            "weight-loss" | "loss" | "lose" => Ok(HealthGoal::WeightLoss),
            "weight-gain" | "gain" => Ok(HealthGoal::WeightGain),
            "high-energy" | "energy" => Ok(HealthGoal::HighEnergy),
            _ => Err(format!("Unknown health goal: {}", s)),
        }
    }
}

/// One member of the household
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    /// Name used to attribute tweaks
    pub name: String,
    /// Selected health goal
    #[serde(default)]
    pub goal: HealthGoal,
    /// Foods this person dislikes, free text
    #[serde(default)]
    pub dislikes: String,
}

impl Person {
    /// Create a person with the default goal and no dislikes
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            goal: HealthGoal::default(),
            dislikes: String::new(),
        }
    }

    /// Set the health goal (builder pattern)
    pub fn with_goal(mut self, goal: HealthGoal) -> Self {
        self.goal = goal;
        self
    }

    /// Set the dislikes (builder pattern)
    pub fn with_dislikes(mut self, dislikes: impl Into<String>) -> Self {
        self.dislikes = dislikes.into();
        self
    }

    /// Individual disliked foods, lowercased
    pub fn disliked_items(&self) -> Vec<String> {
        self.dislikes
            .split([',', ';'])
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .collect()
    }
}

impl std::str::FromStr for Person {
    type Err = String;

    /// Parse `NAME[:GOAL[:DISLIKES]]`
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let mut parts = s.splitn(3, ':');
        let name = parts.next().unwrap_or_default().trim();
        if name.is_empty() {
            return Err(format!("Missing name in profile: {}", s));
        }

        let mut person = Person::new(name);
        if let Some(goal) = parts.next().map(str::trim).filter(|g| !g.is_empty()) {
            person.goal = goal.parse()?;
        }
        if let Some(dislikes) = parts.next() {
            person.dislikes = dislikes.trim().to_string();
        }
        Ok(person)
    }
}

/// All people a plan is generated for
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Household {
    /// People in the order they were entered
    #[serde(default, rename = "person")]
    pub people: Vec<Person>,
}

impl Household {
    /// Create a household from a list of people
    pub fn new(people: Vec<Person>) -> Result<Self> {
        let household = Self { people };
        household.validate()?;
        Ok(household)
    }

    /// Load a household from a TOML file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(Error::Io)?;
        let household: Household = toml::from_str(&contents).map_err(|e| {
            Error::Config(format!(
                "Failed to parse household file {}: {}",
                path.display(),
                e
            ))
        })?;
        household.validate()?;

        debug!(path = %path.display(), people = household.people.len(), "Loaded household");
        Ok(household)
    }

    /// Add more people, rejecting duplicate names
    pub fn extend(&mut self, people: impl IntoIterator<Item = Person>) -> Result<()> {
        self.people.extend(people);
        self.validate()
    }

    /// Whether no profiles were entered
    pub fn is_empty(&self) -> bool {
        self.people.is_empty()
    }

    /// Names of everyone in the household
    pub fn names(&self) -> Vec<String> {
        self.people.iter().map(|p| p.name.clone()).collect()
    }

    fn validate(&self) -> Result<()> {
        for (i, person) in self.people.iter().enumerate() {
            if person.name.trim().is_empty() {
                return Err(Error::Profile("Person name cannot be empty".to_string()));
            }
            let duplicate = self.people[..i]
                .iter()
                .any(|p| p.name.eq_ignore_ascii_case(&person.name));
            if duplicate {
                return Err(Error::Profile(format!("Duplicate person: {}", person.name)));
            }
        }
        Ok(())
    }
}

/// A validated, non-empty grocery list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroceryList {
    items: Vec<String>,
}

impl GroceryList {
    /// Parse newline-separated grocery items
    ///
    /// Blank lines and leading bullet markers are dropped. Returns
    /// [`Error::EmptyGroceryList`] if nothing is left.
    pub fn parse(text: &str) -> Result<Self> {
        let items: Vec<String> = text
            .lines()
            .map(|line| line.trim().trim_start_matches(['-', '*', '•']).trim())
            .filter(|item| !item.is_empty())
            .map(str::to_string)
            .collect();

        if items.is_empty() {
            return Err(Error::EmptyGroceryList);
        }
        Ok(Self { items })
    }

    /// The grocery items in input order
    pub fn items(&self) -> &[String] {
        &self.items
    }

    /// Items joined one per line
    pub fn to_text(&self) -> String {
        self.items.join("\n")
    }
}
