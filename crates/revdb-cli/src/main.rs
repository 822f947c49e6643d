mod db;
mod ingest;
mod reviews;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "revdb")]
#[command(about = "Product review ingestion and sentiment scoring")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Database maintenance
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },
    /// Scrape, score and store reviews for a product query
    Ingest {
        /// Product search query, e.g. "wireless mouse"
        query: String,

        /// Score into an in-memory store instead of the database
        #[arg(long)]
        dry_run: bool,
    },
    /// Show recently stored reviews
    List {
        /// Only reviews whose product name contains this text
        #[arg(long)]
        product: Option<String>,

        #[arg(long, default_value_t = 20)]
        limit: i64,

        /// Print rows as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Subcommand)]
enum DbCommands {
    /// Check database connectivity
    Ping,
    /// Apply pending migrations
    Migrate,
    /// Delete every stored review
    Reset {
        /// Skip the confirmation guard
        #[arg(long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("revdb: run `revdb --help` for available commands");
        return Ok(());
    };

    let config = revdb_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    match command {
        Commands::Db { command } => match command {
            DbCommands::Ping => db::run_db_ping(&config).await,
            DbCommands::Migrate => db::run_db_migrate(&config).await,
            DbCommands::Reset { yes } => db::run_db_reset(&config, yes).await,
        },
        Commands::Ingest { query, dry_run } => ingest::run_ingest(&config, &query, dry_run).await,
        Commands::List {
            product,
            limit,
            json,
        } => reviews::run_list(&config, product.as_deref(), limit, json).await,
    }
}
