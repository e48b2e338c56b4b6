//! Parse command - structure plan text and print it back

use clap::Args;
use mealplan_core::{format_plan, parse_plan_with_people, Plan};
use std::path::PathBuf;

use super::read_input;

/// Parse plan text into days and meals
#[derive(Args, Debug)]
pub struct ParseArgs {
    /// Plan text file ("-" reads stdin)
    pub file: PathBuf,

    /// Known person name for attributing tweaks (repeatable)
    #[arg(short, long = "person")]
    pub people: Vec<String>,

    /// Print JSON instead of canonical text
    #[arg(long)]
    pub json: bool,
}

impl ParseArgs {
    /// Execute the parse command
    pub fn execute(&self) -> anyhow::Result<()> {
        let plan = self.parse()?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&plan)?);
        } else {
            print!("{}", format_plan(&plan));
        }

        eprintln!(
            "Parsed {}: {} day(s), {} meal(s), {} link(s)",
            self.file.display(),
            plan.days.len(),
            plan.meal_count(),
            plan.links().len()
        );
        Ok(())
    }

    fn parse(&self) -> anyhow::Result<Plan> {
        let text = read_input(&self.file)?;
        Ok(parse_plan_with_people(&text, &self.people))
    }
}
