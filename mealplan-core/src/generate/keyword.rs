//! Offline generator based on keyword matching
//!
//! Grocery items are matched against a small built-in table of dishes. Each
//! meal slot rotates through the dishes whose keywords appear in the list,
//! falling back to a simple bowl made from the first items when nothing
//! matches.

use async_trait::async_trait;
use tracing::debug;

use super::{GenerationRequest, Generator};
use crate::plan::{format_plan, Day, Meal, MealType, Plan, Weekday};
use crate::profile::{HealthGoal, Household};
use crate::Result;

/// A dish the keyword generator knows how to suggest
struct Dish {
    meal_type: MealType,
    title: &'static str,
    keywords: &'static [&'static str],
}

#[rustfmt::skip]
const DISHES: &[Dish] = &[
    Dish { meal_type: MealType::Breakfast, title: "Oat Porridge", keywords: &["oat", "milk", "banana", "berries", "honey"] },
    Dish { meal_type: MealType::Breakfast, title: "Scrambled Eggs on Toast", keywords: &["egg", "bread", "butter", "spinach"] },
    Dish { meal_type: MealType::Breakfast, title: "Yogurt Fruit Bowl", keywords: &["yogurt", "yoghurt", "berries", "granola", "apple"] },
    Dish { meal_type: MealType::Breakfast, title: "Banana Pancakes", keywords: &["banana", "flour", "egg"] },
    Dish { meal_type: MealType::Breakfast, title: "Green Smoothie", keywords: &["spinach", "banana", "kale", "almond milk"] },
    Dish { meal_type: MealType::Lunch, title: "Chickpea Tofu Wrap", keywords: &["tortilla", "wrap", "chickpea", "tofu", "lettuce"] },
    Dish { meal_type: MealType::Lunch, title: "Lentil Soup", keywords: &["lentil", "carrot", "onion", "celery"] },
    Dish { meal_type: MealType::Lunch, title: "Rice Salad", keywords: &["rice", "cucumber", "tomato", "pepper"] },
    Dish { meal_type: MealType::Lunch, title: "Cheese Toastie", keywords: &["bread", "cheese", "ham"] },
    Dish { meal_type: MealType::Lunch, title: "Quinoa Bowl", keywords: &["quinoa", "bean", "avocado", "corn"] },
    Dish { meal_type: MealType::Dinner, title: "Vegetable Stir Fry", keywords: &["tofu", "broccoli", "noodle", "soy", "pepper"] },
    Dish { meal_type: MealType::Dinner, title: "Chickpea Curry", keywords: &["chickpea", "coconut", "rice", "spinach", "tomato"] },
    Dish { meal_type: MealType::Dinner, title: "Pasta Primavera", keywords: &["pasta", "courgette", "zucchini", "pepper", "tomato"] },
    Dish { meal_type: MealType::Dinner, title: "Baked Chicken and Potatoes", keywords: &["chicken", "potato", "carrot"] },
    Dish { meal_type: MealType::Dinner, title: "Salmon with Greens", keywords: &["salmon", "fish", "broccoli", "green bean"] },
];

/// Offline generator that needs no credentials
#[derive(Debug, Clone, Default)]
pub struct KeywordGenerator;

impl KeywordGenerator {
    /// Create a new keyword generator
    pub fn new() -> Self {
        Self
    }

    /// Build a structured plan for the request
    pub fn plan(&self, request: &GenerationRequest) -> Plan {
        let items = request.groceries.items();

        let days = Weekday::all()
            .iter()
            .enumerate()
            .map(|(index, &weekday)| {
                let mut day = Day::new(weekday);
                for &meal_type in MealType::all() {
                    let mut meal = suggest(meal_type, index, items);
                    add_tweaks(&mut meal, &request.household);
                    day.push_meal(meal);
                }
                day
            })
            .collect();

        Plan { days }
    }
}

#[async_trait]
impl Generator for KeywordGenerator {
    fn name(&self) -> &'static str {
        "keyword"
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<String> {
        let plan = self.plan(request);
        debug!(meals = plan.meal_count(), "Generated keyword meal plan");
        Ok(format_plan(&plan))
    }

    fn is_configured(&self) -> bool {
        true
    }
}

/// Grocery items matching any of the keywords
fn matching_items<'a>(keywords: &[&str], items: &'a [String]) -> Vec<&'a str> {
    items
        .iter()
        .filter(|item| {
            let item = item.to_lowercase();
            keywords.iter().any(|k| item.contains(k))
        })
        .map(String::as_str)
        .collect()
}

/// Pick the dish for one meal slot, rotating through matches by day
fn suggest(meal_type: MealType, day_index: usize, items: &[String]) -> Meal {
    let candidates: Vec<(&Dish, Vec<&str>)> = DISHES
        .iter()
        .filter(|d| d.meal_type == meal_type)
        .map(|d| (d, matching_items(d.keywords, items)))
        .filter(|(_, used)| !used.is_empty())
        .collect();

    if candidates.is_empty() {
        let used: Vec<&str> = items
            .iter()
            .cycle()
            .skip(day_index)
            .take(items.len().min(3))
            .map(String::as_str)
            .collect();
        return Meal::new(meal_type, format!("Simple {} Bowl", meal_type), used.join(", "));
    }

    let (dish, used) = &candidates[day_index % candidates.len()];
    Meal::new(meal_type, dish.title, used.join(", "))
}

fn add_tweaks(meal: &mut Meal, household: &Household) {
    let haystack = format!("{} {}", meal.title, meal.ingredients).to_lowercase();

    for person in &household.people {
        let disliked: Vec<String> = person
            .disliked_items()
            .into_iter()
            .filter(|d| haystack.contains(d.as_str()))
            .collect();

        let tweak = if !disliked.is_empty() {
            Some(format!("leave out {}", disliked.join(", ")))
        } else if meal.meal_type == MealType::Dinner {
            goal_tip(person.goal).map(str::to_string)
        } else {
            None
        };

        if let Some(tweak) = tweak {
            meal.tweaks.insert(person.name.clone(), tweak);
        }
    }
}

fn goal_tip(goal: HealthGoal) -> Option<&'static str> {
    match goal {
        HealthGoal::GeneralHealth => None,
        HealthGoal::WeightLoss => Some("smaller portion with extra vegetables"),
        HealthGoal::WeightGain => Some("add an extra serving"),
        HealthGoal::HighEnergy => Some("add a side of whole grains"),
    }
}
