use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use pharmakon::config::DbConfig;
use pharmakon::db::Database;
use pharmakon::etl::run_import;
use pharmakon::logging::configure_logging;
use pharmakon::scrape::create_http_client;

#[derive(Parser)]
#[command(author, version, about = "DrugBank metadata scraper and loader", long_about = None)]
struct Cli {
    /// Path to the JSON database configuration
    #[arg(short, long, default_value = "config.json")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Drop and recreate the target tables (destructive)
    CreateSchema,

    /// Scrape the drug pages and bulk-load the results
    RunImport {
        /// Newline-delimited file of DrugBank ids
        #[arg(short, long, default_value = "DRUGIDS")]
        ids_file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    configure_logging();

    let cli = Cli::parse();
    let config = DbConfig::from_file(&cli.config)?;
    let db = Database::new(&config)
        .await
        .context("Failed to connect to database")?;

    match cli.command {
        Commands::CreateSchema => {
            info!("Creating database tables");
            db.create_tables()
                .await
                .context("Failed to create tables")?;
        }
        Commands::RunImport { ids_file } => {
            let drug_ids = read_drug_ids(&ids_file)?;
            info!("Importing {} drugs", drug_ids.len());
            let client = create_http_client()?;
            run_import(&db, &client, &drug_ids).await?;
        }
    }

    Ok(())
}

/// Read the newline-delimited id list, trimming whitespace and dropping
/// blank lines.
fn read_drug_ids(path: &Path) -> Result<Vec<String>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read ids file {}", path.display()))?;
    Ok(raw
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}
