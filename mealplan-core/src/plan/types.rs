//! Structured meal plan types

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Day of the week a plan section belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    /// All weekdays, Monday first
    pub fn all() -> &'static [Weekday] {
        &[
            Weekday::Monday,
            Weekday::Tuesday,
            Weekday::Wednesday,
            Weekday::Thursday,
            Weekday::Friday,
            Weekday::Saturday,
            Weekday::Sunday,
        ]
    }

    /// Display label for this weekday
    pub fn name(&self) -> &'static str {
        match self {
            Weekday::Monday => "Monday",
            Weekday::Tuesday => "Tuesday",
            Weekday::Wednesday => "Wednesday",
            Weekday::Thursday => "Thursday",
            Weekday::Friday => "Friday",
            Weekday::Saturday => "Saturday",
            Weekday::Sunday => "Sunday",
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for Weekday {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Weekday::all()
            .iter()
            .copied()
            .find(|day| day.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown weekday: {}", s))
    }
}

/// Which meal of the day a [`Meal`] is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
}

impl MealType {
    /// All meal types in serving order
    pub fn all() -> &'static [MealType] {
        &[MealType::Breakfast, MealType::Lunch, MealType::Dinner]
    }

    /// Display label for this meal type
    pub fn name(&self) -> &'static str {
        match self {
            MealType::Breakfast => "Breakfast",
            MealType::Lunch => "Lunch",
            MealType::Dinner => "Dinner",
        }
    }
}

impl fmt::Display for MealType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A single planned meal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meal {
    /// Breakfast, lunch or dinner
    pub meal_type: MealType,
    /// Dish name (e.g. "Tofu Wrap")
    pub title: String,
    /// Free-text description of the ingredients used
    pub ingredients: String,
    /// Recipe link, if the plan referenced one
    pub link: Option<String>,
    /// Per-person tweaks keyed by person name
    #[serde(default)]
    pub tweaks: BTreeMap<String, String>,
}

impl Meal {
    /// Create a meal with no link and no tweaks
    pub fn new(
        meal_type: MealType,
        title: impl Into<String>,
        ingredients: impl Into<String>,
    ) -> Self {
        Self {
            meal_type,
            title: title.into(),
            ingredients: ingredients.into(),
            link: None,
            tweaks: BTreeMap::new(),
        }
    }

    /// Attach a recipe link (builder pattern)
    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }

    /// Attach a per-person tweak (builder pattern)
    pub fn with_tweak(mut self, person: impl Into<String>, tweak: impl Into<String>) -> Self {
        self.tweaks.insert(person.into(), tweak.into());
        self
    }
}

/// One day of the plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Day {
    /// Weekday label; `None` for meals that appeared before any weekday header
    pub weekday: Option<Weekday>,
    /// Meals in the order they appeared
    pub meals: Vec<Meal>,
}

impl Day {
    /// Create an empty day
    pub fn new(weekday: Weekday) -> Self {
        Self {
            weekday: Some(weekday),
            meals: Vec::new(),
        }
    }

    /// Create the day that collects meals seen before any weekday header
    pub fn implicit() -> Self {
        Self {
            weekday: None,
            meals: Vec::new(),
        }
    }

    /// Add a meal unless this day already has one of the same type
    ///
    /// Returns `false` if the meal was dropped.
    pub fn push_meal(&mut self, meal: Meal) -> bool {
        if self.meal(meal.meal_type).is_some() {
            return false;
        }
        self.meals.push(meal);
        true
    }

    /// Look up the meal of the given type
    pub fn meal(&self, meal_type: MealType) -> Option<&Meal> {
        self.meals.iter().find(|m| m.meal_type == meal_type)
    }

    /// Heading used when displaying this day
    pub fn label(&self) -> &'static str {
        self.weekday.map(|w| w.name()).unwrap_or("Meals")
    }
}

/// A parsed meal plan
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    /// Days in the order they appeared
    pub days: Vec<Day>,
}

impl Plan {
    /// Whether the plan contains no days at all
    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Total number of meals across all days
    pub fn meal_count(&self) -> usize {
        self.days.iter().map(|d| d.meals.len()).sum()
    }

    /// All recipe links in plan order
    pub fn links(&self) -> Vec<&str> {
        self.days
            .iter()
            .flat_map(|d| d.meals.iter())
            .filter_map(|m| m.link.as_deref())
            .collect()
    }
}
