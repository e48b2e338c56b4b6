//! Secrets command - set up the credentials file

use clap::{Args, Subcommand};
use mealplan_core::Secrets;
use std::path::PathBuf;

/// Manage API credentials
#[derive(Args, Debug)]
pub struct SecretsArgs {
    #[command(subcommand)]
    pub command: SecretsCommand,
}

#[derive(Subcommand, Debug)]
pub enum SecretsCommand {
    /// Create a template secrets file with owner-only permissions
    Init {
        /// Where to create the file (defaults to ~/.config/mealplan/secrets.toml)
        #[arg(long)]
        path: Option<PathBuf>,
    },
}

impl SecretsArgs {
    /// Execute the secrets command
    pub fn execute(&self) -> anyhow::Result<()> {
        match &self.command {
            SecretsCommand::Init { path } => {
                let path = match path {
                    Some(path) => {
                        Secrets::create_template_at(path)?;
                        path.clone()
                    }
                    None => Secrets::create_template()?,
                };

                println!("Created secrets file: {}", path.display());
                println!("Add your OpenAI API key under [openai], or set OPENAI_API_KEY.");
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_at_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("secrets.toml");

        let args = SecretsArgs {
            command: SecretsCommand::Init {
                path: Some(path.clone()),
            },
        };
        args.execute().unwrap();
        assert!(path.exists());

        // Second run refuses to overwrite
        assert!(args.execute().is_err());
    }
}
