//! Switchboard CLI - Command-line host for the routing engine
//!
//! Usage:
//!   switchboard check [--user P] [--project P]         - Validate configuration
//!   switchboard route <agent> <prompt> [--file F] ...  - Resolve a request

use clap::{Parser, Subcommand};
use cli::commands::{CheckCommand, ConfigArgs, RouteCommand};

#[derive(Parser)]
#[command(name = "switchboard")]
#[command(about = "Switchboard - Rule-based request routing across agents")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    config: ConfigArgs,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate the merged configuration
    Check(CheckCommand),
    /// Resolve a request against an agent's routing rules
    Route(RouteCommand),
}

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Check(cmd) => {
            if !cmd.run(&cli.config)? {
                std::process::exit(1);
            }
            Ok(())
        }
        Commands::Route(cmd) => cmd.run(&cli.config),
    }
}
