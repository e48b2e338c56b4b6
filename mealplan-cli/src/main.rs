//! Mealplan CLI - Command line interface for the household meal planner
//!
//! Generates a 7-day meal plan from a grocery list and household profiles,
//! and turns plan text into a downloadable document.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use mealplan_core::{CliOverrides, Config, DocumentFormat, GeneratorRegistry, Secrets};
use mealplan_openai::OpenAiGenerator;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use commands::{GenerateArgs, ParseArgs, RenderArgs, SecretsArgs};

/// Mealplan: weekly meal plans from what's in the kitchen
#[derive(Parser, Debug)]
#[command(name = "mealplan")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Generator backend to use (overrides config and env)
    #[arg(long, global = true, env = "MEALPLAN_BACKEND")]
    backend: Option<String>,

    /// Model to use (overrides config and env)
    #[arg(long, global = true, env = "MEALPLAN_MODEL")]
    model: Option<String>,

    /// Document format: pdf, html or markdown
    #[arg(long, global = true)]
    format: Option<DocumentFormat>,

    /// Directory documents are written to
    #[arg(short, long, global = true, env = "MEALPLAN_OUTPUT_DIR")]
    output_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show version information
    Version,

    /// Generate a meal plan and save it as a document
    #[command(visible_alias = "g")]
    Generate(GenerateArgs),

    /// Parse plan text and print it in canonical form
    Parse(ParseArgs),

    /// Render plan text into a document
    Render(RenderArgs),

    /// Show current configuration
    Config,

    /// Manage API credentials
    Secrets(SecretsArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    if cli.verbose {
        tracing::info!("Verbose mode enabled");
    }

    let config = Config::load_with_overrides(CliOverrides {
        backend: cli.backend.clone(),
        model: cli.model.clone(),
        format: cli.format,
        output_dir: cli.output_dir.clone(),
    })?;

    if cli.verbose {
        tracing::info!(
            backend = %config.generator.backend,
            model = %config.generator.model,
            format = %config.document.format,
            output_dir = %config.document.output_dir.display(),
            "Configuration loaded"
        );
    }

    match cli.command {
        Some(Commands::Version) => {
            println!("mealplan {}", env!("CARGO_PKG_VERSION"));
        }
        Some(Commands::Generate(args)) => {
            let registry = build_registry(&config)?;
            args.execute(cli.verbose, &config, &registry).await?;
        }
        Some(Commands::Parse(args)) => {
            args.execute()?;
        }
        Some(Commands::Render(args)) => {
            args.execute(&config)?;
        }
        Some(Commands::Config) => {
            let registry = build_registry(&config)?;
            show_config(&config, &registry);
        }
        Some(Commands::Secrets(args)) => {
            args.execute()?;
        }
        None => {
            println!("Mealplan - weekly meal plans from your grocery list");
            println!();
            println!("Use --help for usage information");
        }
    }

    Ok(())
}

/// Register the offline generator plus the remote one with its key
fn build_registry(config: &Config) -> anyhow::Result<GeneratorRegistry> {
    let api_key = Secrets::load()?.openai_api_key();

    let mut registry = GeneratorRegistry::with_defaults();
    registry.register(Box::new(OpenAiGenerator::new(&config.generator, api_key)?));
    Ok(registry)
}

fn show_config(config: &Config, registry: &GeneratorRegistry) {
    println!("Mealplan Configuration");
    println!("======================");
    println!();
    println!("Generator Settings:");
    println!("  backend: {}", config.generator.backend);
    println!("  model: {}", config.generator.model);
    println!("  temperature: {}", config.generator.temperature);
    println!("  api_base: {}", config.generator.api_base);
    println!("  timeout: {}s", config.generator.timeout.as_secs());
    println!("  configured: {}", registry.list_configured().join(", "));
    println!();
    println!("Document Settings:");
    println!("  format: {}", config.document.format);
    println!("  output_dir: {}", config.document.output_dir.display());
    println!("  days_per_page: {}", config.document.days_per_page);
    println!("  ascii_fold: {}", config.document.ascii_fold);
    println!();

    for (label, path) in [
        ("Config file", Config::default_config_path()),
        ("Secrets file", Secrets::default_secrets_path()),
    ] {
        if let Some(path) = path {
            println!("{}: {}", label, path.display());
            if path.exists() {
                println!("  (exists)");
            } else {
                println!("  (not found - using defaults)");
            }
        }
    }
}
