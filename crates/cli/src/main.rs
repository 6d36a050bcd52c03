//! Breadbox CLI - store management tools.
//!
//! # Usage
//!
//! ```bash
//! # List the catalog
//! bb-cli product list
//!
//! # Add a product and stock it
//! bb-cli product add --title "Sourdough Loaf" --price 8.99 --stock 12
//! bb-cli product adjust-stock --id <id> --stock 20
//!
//! # Inspect and manage orders
//! bb-cli order list
//! bb-cli order set-status --number ORD-... --status shipped
//! bb-cli order reconcile
//!
//! # Dashboard counters
//! bb-cli stats
//!
//! # Seed a demo catalog
//! bb-cli seed
//! ```
//!
//! The store file defaults to `$BREADBOX_DB_PATH`, falling back to
//! `~/.breadbox/store.redb`; override with `--store`.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "bb-cli")]
#[command(author, version, about = "Breadbox store management tools")]
struct Cli {
    /// Path to the store file.
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage the product catalog
    Product {
        #[command(subcommand)]
        action: ProductAction,
    },
    /// Manage orders
    Order {
        #[command(subcommand)]
        action: OrderAction,
    },
    /// Show dashboard counters
    Stats,
    /// Seed a demo catalog
    Seed,
}

#[derive(Subcommand)]
enum ProductAction {
    /// List all products
    List,
    /// Add a product
    Add {
        /// Product title
        #[arg(long)]
        title: String,

        /// Unit price (e.g. 8.99)
        #[arg(long)]
        price: rust_decimal::Decimal,

        /// Category label
        #[arg(long)]
        category: Option<String>,

        /// Image URL
        #[arg(long)]
        image: Option<url::Url>,

        /// Initial stock level
        #[arg(long, default_value_t = 0)]
        stock: u32,
    },
    /// Set a product's stock level
    AdjustStock {
        /// Product id
        #[arg(long)]
        id: String,

        /// New stock level
        #[arg(long)]
        stock: i64,
    },
    /// Remove a product from the catalog
    Delete {
        /// Product id
        #[arg(long)]
        id: String,
    },
}

#[derive(Subcommand)]
enum OrderAction {
    /// List all orders (newest first)
    List,
    /// Move an order to a new status
    SetStatus {
        /// Order number (`ORD-...`)
        #[arg(long)]
        number: String,

        /// Target status (`processing`, `shipped`, `delivered`, `cancelled`)
        #[arg(long)]
        status: String,
    },
    /// Delete an order
    Delete {
        /// Order number (`ORD-...`)
        #[arg(long)]
        number: String,
    },
    /// Rebuild the global order index from per-user records
    Reconcile,
}

fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli);

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    let shop = commands::open_storefront(cli.store)?;

    match cli.command {
        Commands::Product { action } => match action {
            ProductAction::List => commands::product::list(&shop)?,
            ProductAction::Add {
                title,
                price,
                category,
                image,
                stock,
            } => commands::product::add(&shop, &title, price, category, image, stock)?,
            ProductAction::AdjustStock { id, stock } => {
                commands::product::adjust_stock(&shop, &id, stock)?;
            }
            ProductAction::Delete { id } => commands::product::delete(&shop, &id)?,
        },
        Commands::Order { action } => match action {
            OrderAction::List => commands::order::list(&shop)?,
            OrderAction::SetStatus { number, status } => {
                commands::order::set_status(&shop, &number, &status)?;
            }
            OrderAction::Delete { number } => commands::order::delete(&shop, &number)?,
            OrderAction::Reconcile => commands::order::reconcile(&shop)?,
        },
        Commands::Stats => commands::stats::show(&shop)?,
        Commands::Seed => commands::seed::demo_catalog(&shop)?,
    }
    Ok(())
}
