//! IDToken CLI - Main entry point

use clap::{Parser, Subcommand};
use idtoken_cli::commands;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "idtoken")]
#[command(about = "IDToken - Identity-gated token ledger", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run an operation script against a fresh in-memory ledger
    Run {
        /// Script file (JSON)
        script: PathBuf,
        /// Token configuration file (JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Print the default token configuration
    Config,

    /// Print the address derived from a label
    Address {
        /// Account label
        label: String,
    },
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Run { script, config } => {
            let report = commands::run_script(&script, config.as_deref()).await?;
            if !report.conserved {
                anyhow::bail!("Ledger invariant violated: balances do not sum to total supply");
            }
        }

        Commands::Config => commands::show_config()?,

        Commands::Address { label } => {
            commands::address(&label);
        }
    }

    Ok(())
}
