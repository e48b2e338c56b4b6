//! Canonical text form of a plan
//!
//! The output is the same line format the parser reads, so
//! `parse_plan(&format_plan(&plan)) == plan` for any parsed plan.

use std::fmt;

use super::types::{Day, Meal, Plan};

/// Render a plan in canonical text form
pub fn format_plan(plan: &Plan) -> String {
    plan.to_string()
}

/// Render a single meal line, without tweaks
pub fn format_meal_line(meal: &Meal) -> String {
    let mut line = format!("{}: {}", meal.meal_type, meal.title);
    if !meal.ingredients.is_empty() {
        line.push_str(" - ");
        line.push_str(&meal.ingredients);
    }
    if let Some(ref link) = meal.link {
        line.push_str(" - ");
        line.push_str(link);
    }
    line
}

impl fmt::Display for Meal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", format_meal_line(self))?;
        for (person, tweak) in &self.tweaks {
            writeln!(f, "- {}: {}", person, tweak)?;
        }
        Ok(())
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Meals collected before any weekday header have no header of their own
        if let Some(weekday) = self.weekday {
            writeln!(f, "{}:", weekday)?;
        }
        for meal in &self.meals {
            write!(f, "{}", meal)?;
        }
        Ok(())
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, day) in self.days.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", day)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::{parse_plan, MealType, Weekday};

    fn sample_plan() -> Plan {
        let mut monday = Day::new(Weekday::Monday);
        monday.push_meal(
            Meal::new(MealType::Breakfast, "Oat Porridge", "oats, milk")
                .with_tweak("Brian", "add honey")
                .with_tweak("Ana", "use oat milk"),
        );
        monday.push_meal(
            Meal::new(MealType::Lunch, "Tofu Wrap", "chickpeas, rice")
                .with_link("https://example.com/recipe"),
        );
        monday.push_meal(Meal::new(MealType::Dinner, "Leftovers", ""));

        let tuesday = Day::new(Weekday::Tuesday);

        let mut wednesday = Day::new(Weekday::Wednesday);
        wednesday.push_meal(Meal::new(MealType::Dinner, "Curry", "").with_link("https://food.example/curry"));

        Plan {
            days: vec![monday, tuesday, wednesday],
        }
    }

    #[test]
    fn test_format_meal_line() {
        let meal = Meal::new(MealType::Lunch, "Tofu Wrap", "chickpeas, rice")
            .with_link("https://example.com/recipe");
        assert_eq!(
            format_meal_line(&meal),
            "Lunch: Tofu Wrap - chickpeas, rice - https://example.com/recipe"
        );
    }

    #[test]
    fn test_format_plan_layout() {
        let text = format_plan(&sample_plan());
        let expected = "Monday:
Breakfast: Oat Porridge - oats, milk
- Ana: use oat milk
- Brian: add honey
Lunch: Tofu Wrap - chickpeas, rice - https://example.com/recipe
Dinner: Leftovers

Tuesday:

Wednesday:
Dinner: Curry - https://food.example/curry
";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_reparse_canonical_form() {
        let plan = sample_plan();
        assert_eq!(parse_plan(&format_plan(&plan)), plan);
    }

    #[test]
    fn test_reparse_is_idempotent_for_messy_input() {
        let messy = "Intro text\n**Monday:**\nBreakfast — Eggs — eggs, toast — [https://a.example/eggs]\n- Brian: extra toast\n- malformed\nLunch: Soup\nMonday\nDinner: Pasta - pasta - [Recipe](https://b.example/pasta)";
        let first = parse_plan(messy);
        let second = parse_plan(&format_plan(&first));
        assert_eq!(first, second);
        assert_eq!(second.days.len(), 2);
    }

    #[test]
    fn test_implicit_day_has_no_header() {
        let mut day = Day::implicit();
        day.push_meal(Meal::new(MealType::Breakfast, "Eggs", ""));
        let plan = Plan { days: vec![day] };

        assert_eq!(format_plan(&plan), "Breakfast: Eggs\n");
        assert_eq!(parse_plan(&format_plan(&plan)), plan);
    }

    #[test]
    fn test_format_empty_plan() {
        assert_eq!(format_plan(&Plan::default()), "");
    }
}
