//! tape entry point.
//!
//! This file is intentionally thin: it sets up tracing and parses the
//! command line. The run drivers live in `commands/`.

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "tape")]
#[command(about = "TapeDeck discrete-event backtester", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a CSV observation tape through a configured strategy
    Run {
        /// Run configuration (JSON)
        #[arg(long)]
        config: String,

        /// Observation tape (CSV: symbol,logical_time,price_micros)
        #[arg(long)]
        data: String,
    },

    /// Replay the built-in demo tape with the demo strategy
    Demo {
        /// Starting cash, decimal units
        #[arg(long, default_value_t = 10_000.0)]
        cash: f64,
    },
}

fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    match cli.cmd {
        Commands::Run { config, data } => commands::run::execute(&config, &data),
        Commands::Demo { cash } => commands::demo::execute(cash),
    }
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()),
        )
        .init();
}
