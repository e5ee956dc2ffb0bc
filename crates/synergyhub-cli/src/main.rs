use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

mod commands;

#[derive(Parser)]
#[command(name = "synergyhub-cli", version, about = "SynergyHub procurement synergy CLI")]
struct Cli {
    /// JSON snapshot of synergies (overrides `data.synergies_path`)
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse detected synergies
    Synergy {
        #[command(subcommand)]
        action: commands::synergy::SynergyAction,
    },
    /// Multi-company maintenance timeline
    Timeline {
        #[command(subcommand)]
        action: commands::timeline::TimelineAction,
    },
    /// Score and evaluate RFP offers
    Offers {
        #[command(subcommand)]
        action: commands::offers::OffersAction,
    },
    /// Committee decisions on recommended offers
    Committee {
        #[command(subcommand)]
        action: commands::committee::CommitteeAction,
    },
    /// Company / synergy / material network
    Graph {
        /// Only keep synergies matching this text
        #[arg(long)]
        query: Option<String>,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let data = cli.data.as_deref();
    let result = match cli.command {
        Commands::Synergy { action } => commands::synergy::run(action, data),
        Commands::Timeline { action } => commands::timeline::run(action, data),
        Commands::Offers { action } => commands::offers::run(action, data),
        Commands::Committee { action } => commands::committee::run(action, data),
        Commands::Graph { query } => commands::graph::run(query, data),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
