//! Free-text meal plan parser
//!
//! Generators return a loosely formatted week plan:
//!
//! ```text
//! Monday:
//! Breakfast: Oat Porridge - oats, milk
//! Lunch: Tofu Wrap - chickpeas, rice - https://example.com/recipe
//! - Brian: add avocado
//! ```
//!
//! Parsing is best-effort. Lines that are not understood are skipped and the
//! parser never fails; a malformed plan degrades to fewer days or meals.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use tracing::{debug, trace};

use super::types::{Day, Meal, MealType, Plan, Weekday};

static MARKDOWN_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]*)\]\((https?://[^)\s]+)\)").unwrap());

pub(crate) static BARE_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"https?://[^\s<>\[\]()"']+"#).unwrap());

/// Separators between a dish title and its ingredients
const TITLE_SEPARATORS: &[&str] = &[" - ", " – ", "—"];

/// Bullet markers that introduce a per-person tweak
const BULLETS: &[&str] = &["- ", "• ", "* "];

/// Link labels that name the link rather than the dish
const GENERIC_LINK_LABELS: &[&str] = &[
    "recipe",
    "recipe link",
    "link",
    "here",
    "view recipe",
    "full recipe",
];

/// Parse a free-text meal plan
pub fn parse_plan(content: &str) -> Plan {
    let mut parser = PlanParser::new();
    for line in content.lines() {
        parser.feed(line);
    }
    parser.finish()
}

/// Parse a free-text meal plan, keeping only tweaks for the given people
///
/// Names are matched case-insensitively and stored with the spelling from
/// `people`.
pub fn parse_plan_with_people(content: &str, people: &[String]) -> Plan {
    let mut parser = PlanParser::with_people(people);
    for line in content.lines() {
        parser.feed(line);
    }
    parser.finish()
}

/// Parser position within the plan text
#[derive(Debug, Default)]
enum ParseState {
    /// Nothing seen yet
    #[default]
    Idle,
    /// Inside a day, no meal open
    InDay(Day),
    /// A meal is open and can still receive tweaks
    InMeal { day: Day, meal: Meal },
}

/// What a single trimmed line means
#[derive(Debug, PartialEq)]
enum Line<'a> {
    Weekday(Weekday),
    Meal(MealType, &'a str),
    Tweak(&'a str),
    Other,
}

/// Line-by-line plan parser
///
/// Feed lines with [`PlanParser::feed`] and collect the result with
/// [`PlanParser::finish`].
#[derive(Debug, Default)]
pub struct PlanParser<'a> {
    state: ParseState,
    days: Vec<Day>,
    people: Option<&'a [String]>,
}

impl<'a> PlanParser<'a> {
    /// Create a parser that accepts tweaks for any name
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a parser that only accepts tweaks for known people
    ///
    /// An empty list accepts every name.
    pub fn with_people(people: &'a [String]) -> Self {
        Self {
            people: (!people.is_empty()).then_some(people),
            ..Self::default()
        }
    }

    /// Consume one line of input
    pub fn feed(&mut self, line: &str) {
        let line = line.trim();
        if line.is_empty() {
            return;
        }

        let state = std::mem::take(&mut self.state);
        self.state = match (state, classify(line)) {
            (state, Line::Weekday(weekday)) => {
                self.close(state);
                ParseState::InDay(Day::new(weekday))
            }
            (state, Line::Meal(meal_type, payload)) => {
                let day = match state {
                    ParseState::Idle => Day::implicit(),
                    ParseState::InDay(day) => day,
                    ParseState::InMeal { mut day, meal } => {
                        store_meal(&mut day, meal);
                        day
                    }
                };
                ParseState::InMeal {
                    day,
                    meal: parse_meal(meal_type, payload),
                }
            }
            (ParseState::InMeal { day, mut meal }, Line::Tweak(rest)) => {
                self.apply_tweak(&mut meal, rest);
                ParseState::InMeal { day, meal }
            }
            (state, _) => {
                trace!(line, "Skipping unrecognized line");
                state
            }
        };
    }

    /// Flush any open meal and day and return the plan
    pub fn finish(mut self) -> Plan {
        let state = std::mem::take(&mut self.state);
        self.close(state);

        let plan = Plan { days: self.days };
        debug!(
            days = plan.days.len(),
            meals = plan.meal_count(),
            "Parsed meal plan"
        );
        plan
    }

    fn close(&mut self, state: ParseState) {
        match state {
            ParseState::Idle => {}
            ParseState::InDay(day) => self.days.push(day),
            ParseState::InMeal { mut day, meal } => {
                store_meal(&mut day, meal);
                self.days.push(day);
            }
        }
    }

    fn apply_tweak(&self, meal: &mut Meal, rest: &str) {
        let Some((name, tweak)) = rest.split_once(':') else {
            trace!(line = rest, "Ignoring tweak without a name");
            return;
        };

        let name = name.trim_matches(is_decoration);
        let tweak = tweak.trim_matches(is_decoration);
        if name.is_empty() || tweak.is_empty() {
            return;
        }

        let name = match self.people {
            Some(people) => match people.iter().find(|p| p.eq_ignore_ascii_case(name)) {
                Some(known) => known.clone(),
                None => {
                    trace!(name, "Ignoring tweak for unknown person");
                    return;
                }
            },
            None => name.to_string(),
        };

        meal.tweaks.insert(name, tweak.to_string());
    }
}

fn store_meal(day: &mut Day, meal: Meal) {
    let meal_type = meal.meal_type;
    if !day.push_meal(meal) {
        debug!(day = day.label(), %meal_type, "Dropping repeated meal");
    }
}

fn classify(line: &str) -> Line<'_> {
    if let Some(weekday) = weekday_line(line) {
        return Line::Weekday(weekday);
    }
    if let Some((meal_type, payload)) = meal_line(line) {
        return Line::Meal(meal_type, payload);
    }
    if let Some(rest) = BULLETS.iter().find_map(|b| line.strip_prefix(b)) {
        // Some generators bullet their meal lines too
        if let Some((meal_type, payload)) = bulleted_meal_line(rest) {
            return Line::Meal(meal_type, payload);
        }
        return Line::Tweak(rest);
    }
    Line::Other
}

/// Markdown emphasis and heading markers around labels
fn is_decoration(c: char) -> bool {
    c.is_whitespace() || matches!(c, '*' | '#' | '_')
}

fn is_separator(c: char) -> bool {
    is_decoration(c) || matches!(c, '-' | '–' | '—' | ':' | ',')
}

/// A line consisting only of a weekday name, e.g. `Monday:` or `**Monday**`
fn weekday_line(line: &str) -> Option<Weekday> {
    line.trim_matches(is_decoration)
        .trim_end_matches(':')
        .trim_matches(is_decoration)
        .parse()
        .ok()
}

/// A line starting with a meal type keyword; returns the text after it
fn meal_line(line: &str) -> Option<(MealType, &str)> {
    let line = line.trim_start_matches(is_decoration);

    MealType::all().iter().find_map(|&meal_type| {
        let keyword = meal_type.name();
        let head = line.get(..keyword.len())?;
        if !head.eq_ignore_ascii_case(keyword) {
            return None;
        }

        let rest = &line[keyword.len()..];
        match rest.chars().next() {
            None => Some((meal_type, rest)),
            Some(c) if c == ':' || c == '(' || is_separator(c) => {
                Some((meal_type, meal_payload(rest)))
            }
            _ => None,
        }
    })
}

/// A bulleted meal needs the keyword directly followed by a colon
///
/// `- Lunch: Soup` is a meal, `- Dinner guests: bring bread` is a tweak.
fn bulleted_meal_line(line: &str) -> Option<(MealType, &str)> {
    let (meal_type, payload) = meal_line(line)?;
    let after_keyword = line.trim_start_matches(is_decoration).get(meal_type.name().len()..)?;
    after_keyword
        .trim_start_matches(is_decoration)
        .starts_with(':')
        .then_some((meal_type, payload))
}

/// Text after the first colon, ignoring colons inside links
fn meal_payload(rest: &str) -> &str {
    let search_end = BARE_URL.find(rest).map(|m| m.start()).unwrap_or(rest.len());
    match rest[..search_end].find(':') {
        Some(idx) => &rest[idx + 1..],
        None => rest,
    }
}

fn parse_meal(meal_type: MealType, payload: &str) -> Meal {
    let (text, link) = extract_link(payload);
    let (title, ingredients) = split_title(text.trim_matches(is_separator));

    Meal {
        meal_type,
        title,
        ingredients,
        link,
        tweaks: BTreeMap::new(),
    }
}

/// Remove every URL from `text`, keeping descriptive markdown link labels
///
/// Markdown links take precedence over bare URLs.
fn extract_link(text: &str) -> (String, Option<String>) {
    let mut link = None;

    let text = MARKDOWN_LINK.replace_all(text, |caps: &Captures| {
        if link.is_none() {
            link = Some(caps[2].to_string());
        }
        link_label(&caps[1]).to_string()
    });

    let text = BARE_URL.replace_all(&text, |caps: &Captures| {
        if link.is_none() {
            link = Some(trim_url(&caps[0]).to_string());
        }
        String::new()
    });

    let text = text.replace("[]", "").replace("()", "").replace("<>", "");
    (text, link)
}

/// The label of a markdown link when it describes the dish
fn link_label(label: &str) -> &str {
    let label = label.trim();
    let generic = BARE_URL.is_match(label)
        || GENERIC_LINK_LABELS
            .iter()
            .any(|g| label.eq_ignore_ascii_case(g));
    if generic {
        ""
    } else {
        label
    }
}

/// Drop sentence punctuation that got glued to the end of a URL
fn trim_url(url: &str) -> &str {
    url.trim_end_matches(['.', ',', ';', ':', '!', '?'])
}

fn split_title(text: &str) -> (String, String) {
    let split = TITLE_SEPARATORS
        .iter()
        .filter_map(|sep| text.find(sep).map(|idx| (idx, sep.len())))
        .min_by_key(|(idx, _)| *idx);

    match split {
        Some((idx, len)) => (
            text[..idx].trim_matches(is_separator).to_string(),
            text[idx + len..].trim_matches(is_separator).to_string(),
        ),
        None => (text.to_string(), String::new()),
    }
}
