//! Render command - lay out existing plan text as a document

use chrono::Local;
use clap::Args;
use mealplan_core::{parse_plan_with_people, Config, Document, DocumentRenderer};
use std::path::PathBuf;

use super::read_input;

/// Render a saved plan into a document
#[derive(Args, Debug)]
pub struct RenderArgs {
    /// Plan text file ("-" reads stdin)
    pub file: PathBuf,

    /// Known person name for attributing tweaks (repeatable)
    #[arg(short, long = "person")]
    pub people: Vec<String>,

    /// Days laid out on each page (overrides config)
    #[arg(long)]
    pub days_per_page: Option<usize>,

    /// Write the document to stdout instead of the output directory
    #[arg(long)]
    pub stdout: bool,
}

impl RenderArgs {
    /// Execute the render command
    pub fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let document = self.render(config)?;

        if self.stdout {
            println!("{}", String::from_utf8_lossy(&document.bytes));
            return Ok(());
        }

        let path = document.write_to(&config.document.output_dir)?;
        println!(
            "Saved {} ({}, {} page(s))",
            path.display(),
            document.mime,
            document.pages
        );
        Ok(())
    }

    fn render(&self, config: &Config) -> anyhow::Result<Document> {
        let text = read_input(&self.file)?;

        let mut renderer =
            DocumentRenderer::from_config(&config.document).with_date(Local::now().date_naive());
        if let Some(days) = self.days_per_page {
            renderer = renderer.with_days_per_page(days);
        }

        let plan = parse_plan_with_people(&text, &self.people);
        Ok(renderer.render(&plan, &text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mealplan_core::DocumentFormat;

    const PLAN: &str = "Monday:\nBreakfast: Oats\nTuesday:\nLunch: Soup\nWednesday:\nDinner: Stew\n";

    fn config(dir: &std::path::Path) -> Config {
        let mut config = Config::default();
        config.document.format = DocumentFormat::Html;
        config.document.output_dir = dir.to_path_buf();
        config
    }

    #[test]
    fn test_render_writes_html() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plan.txt");
        std::fs::write(&path, PLAN).unwrap();

        let args = RenderArgs {
            file: path,
            people: Vec::new(),
            days_per_page: None,
            stdout: false,
        };
        args.execute(&config(dir.path())).unwrap();

        let html = std::fs::read_to_string(dir.path().join("7_day_meal_plan.html")).unwrap();
        assert!(html.contains("Wednesday"));
    }

    #[test]
    fn test_default_format_is_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plan.txt");
        std::fs::write(&path, PLAN).unwrap();

        let mut config = Config::default();
        config.document.output_dir = dir.path().to_path_buf();

        let args = RenderArgs {
            file: path,
            people: Vec::new(),
            days_per_page: None,
            stdout: false,
        };
        let document = args.render(&config).unwrap();

        assert_eq!(document.filename, "7_day_meal_plan.pdf");
        assert_eq!(document.mime, "application/pdf");
        assert!(document.bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_days_per_page_override() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plan.txt");
        std::fs::write(&path, PLAN).unwrap();

        let mut config = config(dir.path());
        config.document.format = DocumentFormat::Markdown;

        let args = RenderArgs {
            file: path,
            people: Vec::new(),
            days_per_page: Some(1),
            stdout: false,
        };
        let document = args.render(&config).unwrap();

        assert_eq!(document.pages, 3);
        assert_eq!(document.filename, "7_day_meal_plan.md");
    }
}
