//! Paginated document output
//!
//! A [`DocumentRenderer`] lays a [`Plan`] out a few days per page with every
//! recipe link clickable. PDF pages are drawn with `printpdf`; the Markdown
//! format is plain text and the HTML format renders that Markdown through
//! `pulldown-cmark`, one `<section class="page">` per page.

mod pdf;

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use pulldown_cmark::{html, Event, Parser};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use unicode_normalization::UnicodeNormalization;

use crate::config::DocumentConfig;
use crate::plan::{parse_plan, Day, MealType, Plan, BARE_URL};
use crate::{Error, Result};

/// Heading printed at the top of every document
pub const DOCUMENT_TITLE: &str = "7-Day Meal Plan";

/// Base name of the downloadable file
pub const DOCUMENT_BASENAME: &str = "7_day_meal_plan";

const NO_MEALS: &str = "No meals planned.";

const HTML_STYLE: &str = "body { font-family: Helvetica, Arial, sans-serif; font-size: 10pt; }
h1 { text-align: center; font-size: 14pt; }
.page { page-break-after: always; }
.page:last-child { page-break-after: auto; }
a { color: #0000ff; text-decoration: underline; }";

/// Output document format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    #[default]
    Pdf,
    Html,
    Markdown,
}

impl DocumentFormat {
    /// File extension for this format
    pub fn extension(&self) -> &'static str {
        match self {
            DocumentFormat::Pdf => "pdf",
            DocumentFormat::Html => "html",
            DocumentFormat::Markdown => "md",
        }
    }

    /// MIME type for this format
    pub fn mime(&self) -> &'static str {
        match self {
            DocumentFormat::Pdf => "application/pdf",
            DocumentFormat::Html => "text/html",
            DocumentFormat::Markdown => "text/markdown",
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentFormat::Pdf => write!(f, "pdf"),
            DocumentFormat::Html => write!(f, "html"),
            DocumentFormat::Markdown => write!(f, "markdown"),
        }
    }
}

impl std::str::FromStr for DocumentFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pdf" => Ok(DocumentFormat::Pdf),
            "html" | "htm" => Ok(DocumentFormat::Html),
            "markdown" | "md" => Ok(DocumentFormat::Markdown),
            _ => Err(format!("Unknown document format: {}", s)),
        }
    }
}

/// A rendered, downloadable document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Fixed file name including extension
    pub filename: String,
    /// MIME type of `bytes`
    pub mime: &'static str,
    /// Document contents
    pub bytes: Vec<u8>,
    /// Number of pages laid out
    pub pages: usize,
}

impl Document {
    /// Write the document into `dir`, returning the full path
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf> {
        std::fs::create_dir_all(dir).map_err(Error::Io)?;
        let path = dir.join(&self.filename);
        std::fs::write(&path, &self.bytes).map_err(Error::Io)?;

        info!(path = %path.display(), mime = self.mime, bytes = self.bytes.len(), "Wrote meal plan document");
        Ok(path)
    }
}

/// One laid-out element of a page
#[derive(Debug, Clone, PartialEq)]
enum Block {
    Day(String),
    Meal { meal_type: MealType, title: String },
    Ingredients(String),
    Recipe(String),
    Tweaks(Vec<(String, String)>),
    Note(String),
    /// A line of unstructured plan text
    Raw(String),
}

/// Lays plans out as paginated documents
#[derive(Debug, Clone)]
pub struct DocumentRenderer {
    format: DocumentFormat,
    days_per_page: usize,
    ascii_fold: bool,
    generated_on: Option<NaiveDate>,
}

impl DocumentRenderer {
    /// Create a renderer with two days per page
    pub fn new(format: DocumentFormat) -> Self {
        Self {
            format,
            days_per_page: 2,
            ascii_fold: false,
            generated_on: None,
        }
    }

    /// Create a renderer from the document configuration
    pub fn from_config(config: &DocumentConfig) -> Self {
        Self::new(config.format)
            .with_days_per_page(config.days_per_page)
            .with_ascii_fold(config.ascii_fold)
    }

    /// Set how many days go on each page (at least one)
    pub fn with_days_per_page(mut self, days: usize) -> Self {
        self.days_per_page = days.max(1);
        self
    }

    /// Fold text to plain ASCII before layout
    ///
    /// PDF output is always folded since it uses the built-in fonts.
    pub fn with_ascii_fold(mut self, enabled: bool) -> Self {
        self.ascii_fold = enabled;
        self
    }

    /// Print a generation date under the title
    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.generated_on = Some(date);
        self
    }

    /// Parse plan text and render it
    pub fn render_text(&self, text: &str) -> Result<Document> {
        self.render(&parse_plan(text), text)
    }

    /// Render an already parsed plan, or its raw text if no day was found
    pub fn render(&self, plan: &Plan, raw: &str) -> Result<Document> {
        if plan.is_empty() {
            debug!("No days recognized, rendering raw text");
            let page = raw
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(|line| Block::Raw(line.to_string()))
                .collect();
            return self.finish(vec![page]);
        }
        self.render_plan(plan)
    }

    /// Render a structured plan
    pub fn render_plan(&self, plan: &Plan) -> Result<Document> {
        let pages = plan
            .days
            .chunks(self.days_per_page)
            .map(|days| days.iter().flat_map(day_blocks).collect())
            .collect();

        self.finish(pages)
    }

    fn finish(&self, pages: Vec<Vec<Block>>) -> Result<Document> {
        let mut pages: Vec<Vec<Block>> = pages.into_iter().filter(|p| !p.is_empty()).collect();
        if pages.is_empty() {
            pages.push(vec![Block::Note(NO_MEALS.to_string())]);
        }

        if self.ascii_fold || self.format == DocumentFormat::Pdf {
            for block in pages.iter_mut().flatten() {
                block.fold();
            }
        }

        let (bytes, page_count) = match self.format {
            DocumentFormat::Pdf => pdf::write_pdf(&pages, self.generated_on)?,
            DocumentFormat::Markdown => {
                let body = self.markdown_pages(&pages).join("\n---\n\n");
                (body.into_bytes(), pages.len())
            }
            DocumentFormat::Html => {
                let body = html_document(&self.markdown_pages(&pages));
                (body.into_bytes(), pages.len())
            }
        };

        Ok(Document {
            filename: format!("{}.{}", DOCUMENT_BASENAME, self.format.extension()),
            mime: self.format.mime(),
            bytes,
            pages: page_count,
        })
    }

    fn markdown_pages(&self, pages: &[Vec<Block>]) -> Vec<String> {
        let mut out: Vec<String> = pages
            .iter()
            .map(|page| page.iter().map(markdown_block).collect())
            .collect();

        let mut header = format!("# {}\n\n", DOCUMENT_TITLE);
        if let Some(date) = self.generated_on {
            header.push_str(&format!("_Generated on {}_\n\n", date.format("%Y-%m-%d")));
        }
        if let Some(first) = out.first_mut() {
            first.insert_str(0, &header);
        }
        out
    }
}

impl Block {
    fn fold(&mut self) {
        match self {
            Block::Day(text)
            | Block::Ingredients(text)
            | Block::Recipe(text)
            | Block::Note(text)
            | Block::Raw(text)
            | Block::Meal { title: text, .. } => *text = fold_to_ascii(text),
            Block::Tweaks(tweaks) => {
                for (person, tweak) in tweaks {
                    *person = fold_to_ascii(person);
                    *tweak = fold_to_ascii(tweak);
                }
            }
        }
    }
}

fn day_blocks(day: &Day) -> Vec<Block> {
    let mut blocks = vec![Block::Day(day.label().to_string())];
    if day.meals.is_empty() {
        blocks.push(Block::Note(NO_MEALS.to_string()));
    }

    for meal in &day.meals {
        blocks.push(Block::Meal {
            meal_type: meal.meal_type,
            title: meal.title.clone(),
        });
        if !meal.ingredients.is_empty() {
            blocks.push(Block::Ingredients(meal.ingredients.clone()));
        }
        if let Some(ref link) = meal.link {
            blocks.push(Block::Recipe(link.clone()));
        }
        if !meal.tweaks.is_empty() {
            blocks.push(Block::Tweaks(
                meal.tweaks
                    .iter()
                    .map(|(p, t)| (p.clone(), t.clone()))
                    .collect(),
            ));
        }
    }
    blocks
}

fn markdown_block(block: &Block) -> String {
    match block {
        Block::Day(label) => format!("## {}\n\n", label),
        Block::Meal { meal_type, title } => {
            format!("**{}:** {}\n\n", meal_type, escape_markdown(title))
        }
        Block::Ingredients(text) => format!("Ingredients: {}\n\n", escape_markdown(text)),
        Block::Recipe(link) => format!("Recipe: [{}]({})\n\n", escape_markdown(link), link),
        Block::Tweaks(tweaks) => {
            let mut out: String = tweaks
                .iter()
                .map(|(person, tweak)| {
                    format!("- *{}*: {}\n", escape_markdown(person), escape_markdown(tweak))
                })
                .collect();
            out.push('\n');
            out
        }
        Block::Note(text) => format!("_{}_\n\n", text),
        Block::Raw(line) => format!("{}\n\n", linkify(line)),
    }
}

/// Escape text so it renders literally, turning bare URLs into links
fn linkify(line: &str) -> String {
    let mut out = String::new();
    let mut last = 0;
    for m in BARE_URL.find_iter(line) {
        out.push_str(&escape_markdown(&line[last..m.start()]));
        out.push_str(&format!("[{}]({})", escape_markdown(m.as_str()), m.as_str()));
        last = m.end();
    }
    out.push_str(&escape_markdown(&line[last..]));
    out
}

fn escape_markdown(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '`' | '*' | '_' | '[' | ']' | '<' | '>' | '#' | '|') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Reduce text to plain ASCII
///
/// Typographic punctuation maps to its ASCII form, accented letters lose
/// their accents (NFKD) and anything else outside ASCII is dropped.
pub fn fold_to_ascii(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\u{2013}' | '\u{2014}' | '\u{2212}' => '-',
            '\u{2018}' | '\u{2019}' | '\u{201B}' => '\'',
            '\u{201C}' | '\u{201D}' => '"',
            '\u{2022}' => '*',
            _ => c,
        })
        .nfkd()
        .filter(char::is_ascii)
        .collect()
}

fn html_document(pages: &[String]) -> String {
    let mut out = format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n<style>\n{}\n</style>\n</head>\n<body>\n",
        DOCUMENT_TITLE, HTML_STYLE
    );

    for page in pages {
        out.push_str("<section class=\"page\">\n");
        // Raw HTML from generated text is shown as text, never interpreted
        let events = Parser::new(page).map(|event| match event {
            Event::Html(text) | Event::InlineHtml(text) => Event::Text(text),
            other => other,
        });
        html::push_html(&mut out, events);
        out.push_str("</section>\n");
    }

    out.push_str("</body>\n</html>\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::{parse_plan_with_people, Meal, Weekday};

    fn week_plan() -> Plan {
        let days = Weekday::all()
            .iter()
            .map(|&weekday| {
                let mut day = Day::new(weekday);
                day.push_meal(Meal::new(MealType::Breakfast, "Oats", "oats, milk"));
                day.push_meal(
                    Meal::new(MealType::Lunch, "Tofu Wrap", "chickpeas, rice")
                        .with_link("https://example.com/recipe")
                        .with_tweak("Brian", "add avocado"),
                );
                day
            })
            .collect();
        Plan { days }
    }

    fn text(doc: &Document) -> String {
        String::from_utf8(doc.bytes.clone()).unwrap()
    }

    fn markdown() -> DocumentRenderer {
        DocumentRenderer::new(DocumentFormat::Markdown)
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!("md".parse::<DocumentFormat>().unwrap(), DocumentFormat::Markdown);
        assert_eq!("HTML".parse::<DocumentFormat>().unwrap(), DocumentFormat::Html);
        assert_eq!("pdf".parse::<DocumentFormat>().unwrap(), DocumentFormat::Pdf);
        assert!("docx".parse::<DocumentFormat>().is_err());
    }

    #[test]
    fn test_markdown_document() {
        let doc = markdown().render_plan(&week_plan()).unwrap();
        let body = text(&doc);

        assert_eq!(doc.filename, "7_day_meal_plan.md");
        assert_eq!(doc.mime, "text/markdown");
        assert!(body.starts_with("# 7-Day Meal Plan"));
        assert!(body.contains("## Monday"));
        assert!(body.contains("**Lunch:** Tofu Wrap"));
        assert!(body.contains("Recipe: [https://example.com/recipe](https://example.com/recipe)"));
        assert!(body.contains("- *Brian*: add avocado"));
    }

    #[test]
    fn test_pagination() {
        let renderer = markdown().with_days_per_page(2);
        let doc = renderer.render_plan(&week_plan()).unwrap();
        assert_eq!(doc.pages, 4);
        assert_eq!(text(&doc).matches("\n---\n").count(), 3);

        let doc = renderer.with_days_per_page(7).render_plan(&week_plan()).unwrap();
        assert_eq!(doc.pages, 1);
    }

    #[test]
    fn test_html_document() {
        let doc = DocumentRenderer::new(DocumentFormat::Html)
            .with_days_per_page(3)
            .render_plan(&week_plan())
            .unwrap();
        let body = text(&doc);

        assert_eq!(doc.filename, "7_day_meal_plan.html");
        assert_eq!(doc.mime, "text/html");
        assert_eq!(body.matches("<section class=\"page\">").count(), 3);
        assert!(body.contains("<h1>7-Day Meal Plan</h1>"));
        assert!(body.contains("<a href=\"https://example.com/recipe\">"));
    }

    #[test]
    fn test_html_escapes_generated_markup() {
        let mut day = Day::new(Weekday::Monday);
        day.push_meal(Meal::new(MealType::Dinner, "<script>alert(1)</script>", ""));
        let doc = DocumentRenderer::new(DocumentFormat::Html)
            .render_plan(&Plan { days: vec![day] })
            .unwrap();

        let body = text(&doc);
        assert!(!body.contains("<script>"));
        assert!(body.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_pdf_document() {
        let doc = DocumentRenderer::new(DocumentFormat::Pdf)
            .with_days_per_page(2)
            .render_plan(&week_plan())
            .unwrap();

        assert_eq!(doc.filename, "7_day_meal_plan.pdf");
        assert_eq!(doc.mime, "application/pdf");
        assert!(doc.bytes.starts_with(b"%PDF"));
        assert_eq!(doc.pages, 4);
    }

    #[test]
    fn test_pdf_raw_text() {
        let doc = DocumentRenderer::new(DocumentFormat::Pdf)
            .render_text("Error generating meal plan: timeout")
            .unwrap();

        assert!(doc.bytes.starts_with(b"%PDF"));
        assert_eq!(doc.pages, 1);
    }

    #[test]
    fn test_generation_date() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        let doc = markdown().with_date(date).render_plan(&week_plan()).unwrap();
        assert!(text(&doc).contains("_Generated on 2026-03-01_"));
    }

    #[test]
    fn test_raw_text_fallback() {
        let doc = markdown()
            .render_text("Error generating meal plan: timeout\nSee https://status.example/x")
            .unwrap();
        let body = text(&doc);

        assert_eq!(doc.pages, 1);
        assert!(body.contains("Error generating meal plan: timeout"));
        assert!(body.contains("[https://status.example/x](https://status.example/x)"));
    }

    #[test]
    fn test_days_without_meals_are_not_raw() {
        let doc = markdown()
            .render_text("Monday:\nnothing useful\nTuesday:")
            .unwrap();
        let body = text(&doc);

        assert!(body.contains("## Monday"));
        assert!(body.contains("## Tuesday"));
        assert!(body.contains("_No meals planned._"));
        assert!(!body.contains("nothing useful"));
    }

    #[test]
    fn test_render_text_parses_plan() {
        let doc = markdown().render_text("Monday:\nDinner: Curry - rice").unwrap();
        assert!(text(&doc).contains("**Dinner:** Curry"));
    }

    #[test]
    fn test_render_keeps_filtered_tweaks() {
        let raw = "Monday:\nLunch: Soup - leeks\n- Alice: less salt\n- Zed: no soup";
        let plan = parse_plan_with_people(raw, &["Alice".to_string()]);

        let body = text(&markdown().render(&plan, raw).unwrap());
        assert!(body.contains("- *Alice*: less salt"));
        assert!(!body.contains("Zed"));
    }

    #[test]
    fn test_empty_plan_has_one_page() {
        let doc = markdown().render_plan(&Plan::default()).unwrap();
        assert_eq!(doc.pages, 1);
        assert!(text(&doc).contains("_No meals planned._"));
    }

    #[test]
    fn test_fold_to_ascii() {
        assert_eq!(
            fold_to_ascii("Curry \u{2014} \u{201C}rice\u{201D}\u{2026}"),
            "Curry - \"rice\"..."
        );
        assert_eq!(fold_to_ascii("Crème brûlée"), "Creme brulee");
        assert_eq!(fold_to_ascii("Tofu 🍜 bowl"), "Tofu  bowl");
    }

    #[test]
    fn test_ascii_fold_applied() {
        let mut day = Day::new(Weekday::Monday);
        day.push_meal(Meal::new(MealType::Dinner, "Chef\u{2019}s Crème Curry", ""));
        let doc = markdown()
            .with_ascii_fold(true)
            .render_plan(&Plan { days: vec![day] })
            .unwrap();
        assert!(text(&doc).contains("Chef's Creme Curry"));
    }

    #[test]
    fn test_write_to() {
        let dir = tempfile::tempdir().unwrap();
        let doc = markdown().render_plan(&week_plan()).unwrap();

        let path = doc.write_to(&dir.path().join("out")).unwrap();
        assert_eq!(path.file_name().unwrap(), "7_day_meal_plan.md");
        assert_eq!(std::fs::read(&path).unwrap(), doc.bytes);
    }
}
