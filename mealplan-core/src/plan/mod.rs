//! Meal plan model, parsing and formatting
//!
//! This module turns the free text returned by a generator into a
//! structured [`Plan`] and back into canonical text.

mod format;
mod parser;
mod types;

pub use format::{format_meal_line, format_plan};
pub use parser::{parse_plan, parse_plan_with_people, PlanParser};
pub(crate) use parser::BARE_URL;
pub use types::{Day, Meal, MealType, Plan, Weekday};
