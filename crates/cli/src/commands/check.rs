//! switchboard check command

use clap::Args;
use console::style;
use engine::{ConfigLoader, Router, ValidationResult, ValidatorOptions};
use shared::SwitchboardError;
use std::path::PathBuf;

/// Configuration source flags shared by every command
#[derive(Debug, Clone, Args)]
pub struct ConfigArgs {
    /// User-level configuration file
    #[arg(long, global = true)]
    pub user: Option<PathBuf>,

    /// Project-level configuration file (overrides the user file)
    #[arg(long, global = true, default_value = ".switchboard.yaml")]
    pub project: PathBuf,
}

impl ConfigArgs {
    pub fn loader(&self) -> ConfigLoader {
        let loader = ConfigLoader::new().with_project_file(&self.project);
        match &self.user {
            Some(user) => loader.with_user_file(user),
            None => loader,
        }
    }
}

#[derive(Debug, Args)]
pub struct CheckCommand {
    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

impl CheckCommand {
    /// Returns whether the configuration was accepted
    pub fn run(&self, config: &ConfigArgs) -> anyhow::Result<bool> {
        let result = match config.loader().load() {
            Ok(loaded) => Router::validate(&loaded, &ValidatorOptions::default()),
            Err(SwitchboardError::Rejected(result)) => result,
            Err(e) => return Err(e.into()),
        };

        if self.json {
            println!("{}", serde_json::to_string_pretty(&result)?);
        } else {
            print_report(&result);
        }

        Ok(result.valid)
    }
}

pub fn print_report(result: &ValidationResult) {
    if result.valid {
        println!("{} Configuration is valid", style("✓").green());
    } else {
        println!(
            "{} Configuration rejected with {} error(s)",
            style("✗").red(),
            result.errors.len()
        );
        for error in &result.errors {
            println!("  {} {}", style(format!("[{}]", error.kind())).red(), error);
        }
    }

    for warning in &result.warnings {
        println!("  {} {}", style("[warning]").yellow(), warning);
    }
}
