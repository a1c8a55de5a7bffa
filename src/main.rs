use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use shoplist::admin::AdminGate;
use shoplist::cli::{admin, catalog, item, open, view};
use shoplist::config::Config;
use shoplist::model::ItemId;
use shoplist::store;

#[derive(Parser)]
#[command(name = "shoplist")]
#[command(about = "Shared shopping list for a small group")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "shoplist.yaml")]
    config: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Add an item to the list
    Add {
        /// Item name
        item: String,

        /// Store to buy it at
        #[arg(short, long)]
        store: Option<String>,

        /// Category to file it under
        #[arg(short = 'k', long)]
        category: Option<String>,
    },

    /// Mark an item purchased, or back to not purchased
    Toggle {
        /// Item ID as shown by `view`
        id: ItemId,
    },

    /// Remove an item
    Delete {
        /// Item ID as shown by `view`
        id: ItemId,
    },

    /// Process a location carrying toggle=<id> or delete=<id>
    Open {
        /// e.g. "?toggle=3"
        #[arg(default_value = "")]
        location: String,
    },

    /// Show the list grouped by store and category
    View {
        /// Only show this store
        #[arg(short, long)]
        store: Option<String>,

        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Admin-only bulk operations
    Admin {
        /// Admin name
        name: String,

        #[command(subcommand)]
        command: AdminCommands,
    },

    /// List configured stores
    Stores,

    /// List configured categories
    Categories,
}

#[derive(Subcommand)]
enum AdminCommands {
    /// Remove every purchased item
    ClearPurchased,
    /// Remove every item
    ClearAll,
}

fn init_logging(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.filter))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load config
    let loaded = Config::load(&cli.config);
    let config = loaded.as_ref().cloned().unwrap_or_default();
    init_logging(&config);
    if let Err(e) = &loaded {
        tracing::warn!("Using default configuration: {:#}", e);
    }

    match cli.command {
        Commands::Stores => {
            catalog::stores(&config.catalog);
            return Ok(());
        }
        Commands::Categories => {
            catalog::categories(&config.catalog);
            return Ok(());
        }
        _ => {}
    }

    // Initialize store
    let rows = store::open(&config)?;
    let catalog = &config.catalog;

    match cli.command {
        Commands::Add {
            item: name,
            store,
            category,
        } => {
            item::add(rows.as_ref(), catalog, name, store, category)?;
        }
        Commands::Toggle { id } => {
            item::toggle(rows.as_ref(), catalog, id)?;
        }
        Commands::Delete { id } => {
            item::delete(rows.as_ref(), catalog, id)?;
        }
        Commands::Open { location } => {
            open::run(rows.as_ref(), catalog, &location)?;
        }
        Commands::View { store, json } => {
            view::run(rows.as_ref(), catalog, store, json)?;
        }
        Commands::Admin { name, command } => {
            let gate = AdminGate::from_config(&config);
            match command {
                AdminCommands::ClearPurchased => {
                    admin::clear_purchased(rows.as_ref(), catalog, &gate, &name)?;
                }
                AdminCommands::ClearAll => {
                    admin::clear_all(rows.as_ref(), catalog, &gate, &name)?;
                }
            }
        }
        Commands::Stores | Commands::Categories => {}
    }

    Ok(())
}
