use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use edudash_application::ScreenService;
use edudash_core::catalog::Catalog;
use edudash_infrastructure::{ConfigService, open_gateway};

mod commands;

use commands::utils::ConsoleNotifier;

#[derive(Parser)]
#[command(name = "edudash")]
#[command(about = "edudash - admin back-office for an education platform", long_about = None)]
struct Cli {
    /// Config file (defaults to $EDUDASH_CONFIG, then the platform config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the dashboard screens
    Screens,
    /// Show a screen's rows as a table
    List {
        screen: String,
        /// Column to sort by
        #[arg(long)]
        sort: Option<String>,
        /// Sort descending
        #[arg(long, requires = "sort")]
        desc: bool,
    },
    /// Show one record or list document
    Show { screen: String, id: String },
    /// Edit a record: start editing, apply the changes, save
    Edit {
        screen: String,
        id: String,
        /// field=value (repeatable)
        #[arg(long = "set", value_name = "FIELD=VALUE", required = true)]
        sets: Vec<String>,
    },
    /// Create a record
    Create {
        screen: String,
        /// Explicit id (required when the screen is keyed by a natural id)
        #[arg(long)]
        id: Option<String>,
        #[arg(long = "set", value_name = "FIELD=VALUE")]
        sets: Vec<String>,
    },
    /// Append an item to a list
    AddItem {
        screen: String,
        key: String,
        #[arg(long = "set", value_name = "FIELD=VALUE")]
        sets: Vec<String>,
    },
    /// Remove an item from a list
    RemoveItem {
        screen: String,
        key: String,
        item_id: String,
    },
    /// Delete a record or list document
    Delete { screen: String, id: String },
}

fn init_tracing(default_level: &str) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_service = ConfigService::new(cli.config.as_deref())?;
    let config = config_service
        .get_config()
        .with_context(|| format!("Failed to load {}", config_service.path().display()))?;
    init_tracing(&config.log_level);

    let catalog = Catalog::standard();
    let gateway = open_gateway(&config, &catalog)
        .await
        .context("Failed to open backend")?;
    let service = ScreenService::new(gateway, catalog, Arc::new(ConsoleNotifier));

    match cli.command {
        Commands::Screens => commands::screens::list_screens(&service),
        Commands::List { screen, sort, desc } => {
            commands::screens::list_rows(&service, &screen, sort, desc).await?
        }
        Commands::Show { screen, id } => {
            if service.screen(&screen)?.is_list() {
                commands::lists::show(&service, &screen, &id).await?
            } else {
                commands::records::show(&service, &screen, &id).await?
            }
        }
        Commands::Edit { screen, id, sets } => {
            commands::records::edit(&service, &screen, &id, &sets).await?
        }
        Commands::Create { screen, id, sets } => {
            commands::records::create(&service, &screen, id.as_deref(), &sets).await?
        }
        Commands::AddItem { screen, key, sets } => {
            commands::lists::add_item(&service, &screen, &key, &sets).await?
        }
        Commands::RemoveItem {
            screen,
            key,
            item_id,
        } => commands::lists::remove_item(&service, &screen, &key, &item_id).await?,
        Commands::Delete { screen, id } => {
            commands::records::delete(&service, &screen, &id).await?
        }
    }

    Ok(())
}
