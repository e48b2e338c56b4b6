//! Generate command - produce a plan and save it as a document

use chrono::Local;
use clap::Args;
use mealplan_core::{
    parse_plan_with_people, Config, DocumentRenderer, Error, GenerationRequest,
    GeneratorRegistry, GroceryList, Household, Person,
};
use std::path::PathBuf;

use super::read_input;

/// Generate a 7-day meal plan from a grocery list
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Grocery list file, one item per line ("-" reads stdin)
    #[arg(short, long)]
    pub groceries: PathBuf,

    /// Household member as NAME[:GOAL[:DISLIKES]] (repeatable)
    #[arg(short, long = "person")]
    pub people: Vec<Person>,

    /// TOML file with [[person]] tables
    #[arg(long)]
    pub household: Option<PathBuf>,

    /// Print the parsed plan as JSON instead of plain text
    #[arg(long)]
    pub json: bool,

    /// Print the plan without writing a document
    #[arg(long)]
    pub no_document: bool,
}

impl GenerateArgs {
    /// Execute the generate command
    pub async fn execute(
        &self,
        verbose: bool,
        config: &Config,
        registry: &GeneratorRegistry,
    ) -> anyhow::Result<()> {
        let groceries = GroceryList::parse(&read_input(&self.groceries)?)?;
        let household = self.load_household()?;
        let names = household.names();

        let generator = registry.require(&config.generator.backend)?;
        if !generator.is_configured() {
            anyhow::bail!(
                "Generator '{}' is missing credentials. Run `mealplan secrets init` \
                 or set OPENAI_API_KEY",
                generator.name()
            );
        }

        if verbose {
            println!(
                "Generating with '{}' for {} item(s), {} person(s)",
                generator.name(),
                groceries.items().len(),
                names.len()
            );
        }

        let request = GenerationRequest::new(groceries, household);
        let text = match generator.generate(&request).await {
            Ok(text) => text,
            Err(e @ Error::MissingCredentials(_)) => return Err(e.into()),
            Err(e) => {
                tracing::warn!(generator = generator.name(), error = %e, "Generation failed");
                println!("Error generating meal plan: {}", e);
                return Ok(());
            }
        };

        let plan = parse_plan_with_people(&text, &names);
        if self.json {
            println!("{}", serde_json::to_string_pretty(&plan)?);
        } else {
            println!("{}", text.trim_end());
        }

        if self.no_document {
            return Ok(());
        }

        let document = DocumentRenderer::from_config(&config.document)
            .with_date(Local::now().date_naive())
            .render(&plan, &text)?;
        let path = document.write_to(&config.document.output_dir)?;

        println!();
        println!(
            "Saved {} ({}, {} page(s))",
            path.display(),
            document.mime,
            document.pages
        );

        Ok(())
    }

    /// Merge the household file with `--person` entries
    fn load_household(&self) -> anyhow::Result<Household> {
        let mut household = match &self.household {
            Some(path) => Household::load_from_file(path)?,
            None => Household::default(),
        };
        household.extend(self.people.iter().cloned())?;
        Ok(household)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use mealplan_core::{DocumentFormat, Generator};

    struct FailingGenerator;

    #[async_trait]
    impl Generator for FailingGenerator {
        fn name(&self) -> &'static str {
            "failing"
        }

        async fn generate(&self, _request: &GenerationRequest) -> mealplan_core::Result<String> {
            Err(Error::Generation("upstream unavailable".to_string()))
        }

        fn is_configured(&self) -> bool {
            true
        }
    }

    struct CannedGenerator;

    #[async_trait]
    impl Generator for CannedGenerator {
        fn name(&self) -> &'static str {
            "canned"
        }

        async fn generate(&self, _request: &GenerationRequest) -> mealplan_core::Result<String> {
            Ok("Monday:\nLunch: Soup - leeks\n- Alice: less salt\n- Zed: no soup".to_string())
        }

        fn is_configured(&self) -> bool {
            true
        }
    }

    struct UnconfiguredGenerator;

    #[async_trait]
    impl Generator for UnconfiguredGenerator {
        fn name(&self) -> &'static str {
            "unconfigured"
        }

        async fn generate(&self, _request: &GenerationRequest) -> mealplan_core::Result<String> {
            Err(Error::MissingCredentials("test".to_string()))
        }

        fn is_configured(&self) -> bool {
            false
        }
    }

    fn args(groceries: PathBuf) -> GenerateArgs {
        GenerateArgs {
            groceries,
            people: Vec::new(),
            household: None,
            json: false,
            no_document: false,
        }
    }

    fn config(backend: &str, output_dir: &std::path::Path) -> Config {
        let mut config = Config::default();
        config.generator.backend = backend.to_string();
        config.document.format = DocumentFormat::Markdown;
        config.document.output_dir = output_dir.to_path_buf();
        config
    }

    fn registry() -> GeneratorRegistry {
        let mut registry = GeneratorRegistry::with_defaults();
        registry.register(Box::new(FailingGenerator));
        registry.register(Box::new(CannedGenerator));
        registry.register(Box::new(UnconfiguredGenerator));
        registry
    }

    #[tokio::test]
    async fn test_generate_writes_document() {
        let dir = tempfile::tempdir().unwrap();
        let groceries = dir.path().join("groceries.txt");
        std::fs::write(&groceries, "eggs\nspinach\nrice\nchicken\n").unwrap();
        let out = dir.path().join("out");

        let mut args = args(groceries);
        args.people = vec!["Alice:weight-loss:mushrooms".parse().unwrap()];

        args.execute(false, &config("keyword", &out), &registry())
            .await
            .unwrap();

        let written = std::fs::read_to_string(out.join("7_day_meal_plan.md")).unwrap();
        assert!(written.contains("Monday"));
        assert!(written.contains("Sunday"));
    }

    #[tokio::test]
    async fn test_document_drops_tweaks_for_unknown_people() {
        let dir = tempfile::tempdir().unwrap();
        let groceries = dir.path().join("groceries.txt");
        std::fs::write(&groceries, "leeks\n").unwrap();
        let out = dir.path().join("out");

        let mut args = args(groceries);
        args.people = vec![Person::new("Alice")];

        args.execute(false, &config("canned", &out), &registry())
            .await
            .unwrap();

        let written = std::fs::read_to_string(out.join("7_day_meal_plan.md")).unwrap();
        assert!(written.contains("less salt"));
        assert!(!written.contains("Zed"));
        assert!(!written.contains("no soup"));
    }

    #[tokio::test]
    async fn test_generation_failure_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let groceries = dir.path().join("groceries.txt");
        std::fs::write(&groceries, "eggs\n").unwrap();
        let out = dir.path().join("out");

        args(groceries)
            .execute(false, &config("failing", &out), &registry())
            .await
            .unwrap();

        assert!(!out.exists());
    }

    #[tokio::test]
    async fn test_missing_credentials_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let groceries = dir.path().join("groceries.txt");
        std::fs::write(&groceries, "eggs\n").unwrap();
        let out = dir.path().join("out");

        let err = args(groceries)
            .execute(false, &config("unconfigured", &out), &registry())
            .await
            .unwrap_err();

        assert!(err.to_string().contains("missing credentials"));
        assert!(!out.exists());
    }

    #[tokio::test]
    async fn test_empty_grocery_list_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let groceries = dir.path().join("groceries.txt");
        std::fs::write(&groceries, "\n  \n").unwrap();

        let result = args(groceries)
            .execute(false, &config("keyword", dir.path()), &registry())
            .await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_unknown_backend_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let groceries = dir.path().join("groceries.txt");
        std::fs::write(&groceries, "eggs\n").unwrap();

        let result = args(groceries)
            .execute(false, &config("nope", dir.path()), &registry())
            .await;

        assert!(result.is_err());
    }

    #[test]
    fn test_household_merges_file_and_flags() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("household.toml");
        std::fs::write(&path, "[[person]]\nname = \"Alice\"\ngoal = \"weight-loss\"\n").unwrap();

        let mut args = args(PathBuf::from("-"));
        args.household = Some(path);
        args.people = vec![Person::new("Bob")];

        let household = args.load_household().unwrap();
        assert_eq!(household.names(), vec!["Alice", "Bob"]);
    }

    #[test]
    fn test_household_rejects_duplicate_names() {
        let mut args = args(PathBuf::from("-"));
        args.people = vec![Person::new("Alice"), Person::new("alice")];

        assert!(args.load_household().is_err());
    }
}
