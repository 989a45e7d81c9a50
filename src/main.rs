// ABOUTME: CLI entry point for weaviate-cloud-migrator
// ABOUTME: Parses commands and routes to appropriate handlers

use clap::{Parser, Subcommand};
use weaviate_cloud_migrator::{commands, config::Config};

#[derive(Parser)]
#[command(name = "weaviate-cloud-migrator")]
#[command(about = "One-shot schema and data migration between Weaviate clusters", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full migration: clone schema, stream objects, compare counts
    Migrate {
        /// Skip the confirmation prompt before wiping the target schema
        #[arg(short = 'y', long)]
        yes: bool,
    },
    /// Clone the schema only, without copying any objects
    Schema {
        /// Skip the confirmation prompt before wiping the target schema
        #[arg(short = 'y', long)]
        yes: bool,
    },
    /// Compare per-collection object counts between source and target
    Verify,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging - default to INFO level if RUST_LOG not set
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    // All connection parameters come from the environment; resolution fails
    // before any connection is opened.
    let config = Config::from_env()?;

    match cli.command {
        Commands::Migrate { yes } => commands::migrate(&config, yes).await,
        Commands::Schema { yes } => commands::schema(&config, yes).await,
        Commands::Verify => commands::verify(&config).await,
    }
}
