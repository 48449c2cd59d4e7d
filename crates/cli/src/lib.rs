pub mod commands;

use clap::{Parser, Subcommand};
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "shopfront",
    about = "Shopfront operator CLI",
    long_about = "Operate shopfront migrations, demo seeding, config inspection, and readiness checks.",
    after_help = "Examples:\n  shopfront doctor --json\n  shopfront config\n  shopfront recommend --product prod-hdp-001 --shopper shopper-demo-001"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Apply pending database migrations and return structured status output")]
    Migrate,
    #[command(about = "Load the deterministic demo catalog and verify the seed contract")]
    Seed,
    #[command(
        about = "Inspect effective configuration values with source attribution and redaction"
    )]
    Config,
    #[command(about = "Validate config, database connectivity, and catalog presence")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
    #[command(about = "Run the recommendation engine against the configured database")]
    Recommend {
        #[arg(long, help = "Reference product id the shopper is viewing")]
        product: String,
        #[arg(long, help = "Shopper id resolved by the auth gateway")]
        shopper: Option<String>,
    },
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Migrate => commands::migrate::run(),
        Command::Seed => commands::seed::run(),
        Command::Config => {
            commands::CommandResult { exit_code: 0, output: commands::config::run() }
        }
        Command::Doctor { json } => {
            commands::CommandResult { exit_code: 0, output: commands::doctor::run(json) }
        }
        Command::Recommend { product, shopper } => {
            commands::recommend::run(&product, shopper.as_deref())
        }
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
