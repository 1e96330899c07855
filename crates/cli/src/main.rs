//! Bozor CLI - cart, favorites and catalog from the terminal.
//!
//! Every invocation rehydrates the persisted state, applies one command,
//! writes the result back and exits.
//!
//! # Usage
//!
//! ```bash
//! # Browse the catalog
//! bozor catalog list --sort price-low --max-price 50
//! bozor catalog show 12
//!
//! # Build a cart
//! bozor cart add-product 12 --quantity 2
//! bozor cart set 12 0
//! bozor cart show
//!
//! # Raw actions, in the persisted action format
//! bozor dispatch '{"type": "favorites/clearFavorites"}'
//!
//! # Create the postgres schema
//! BOZOR_STORAGE=postgres bozor migrate
//! ```
//!
//! Configuration comes from the environment (see `bozor_storefront::config`).
//! Logs go to stderr; stdout carries command output only.

#![cfg_attr(not(test), forbid(unsafe_code))]

use core::num::NonZeroU32;

use bozor_core::ProductId;
use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod render;

#[derive(Parser)]
#[command(name = "bozor")]
#[command(author, version, about = "Bozor storefront CLI")]
struct Cli {
    /// Print state as JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect and change the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Inspect and change favorites
    Favorites {
        #[command(subcommand)]
        action: FavoritesAction,
    },
    /// Inspect and change the signed-in session
    Auth {
        #[command(subcommand)]
        action: AuthAction,
    },
    /// Browse the product catalog
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },
    /// Apply a raw JSON action, e.g. '{"type": "cart/clearCart"}'
    Dispatch {
        /// Action JSON
        action: String,
    },
    /// Delete all persisted state
    Reset,
    /// Run database migrations for the postgres backend
    Migrate,
}

/// A line item given on the command line.
#[derive(Args)]
struct ItemArgs {
    /// Product id
    #[arg(long)]
    id: ProductId,

    /// Display name
    #[arg(long)]
    name: String,

    /// Unit price
    #[arg(long)]
    price: Decimal,

    /// Image URL
    #[arg(long)]
    image: Option<String>,
}

#[derive(Subcommand)]
enum CartAction {
    /// Show cart lines and totals
    Show,
    /// Add an item described on the command line
    Add {
        #[command(flatten)]
        item: ItemArgs,

        /// Units to add
        #[arg(short, long, default_value_t = NonZeroU32::MIN)]
        quantity: NonZeroU32,
    },
    /// Add a catalog product at its discounted price
    AddProduct {
        /// Product id
        id: ProductId,

        /// Units to add
        #[arg(short, long, default_value_t = NonZeroU32::MIN)]
        quantity: NonZeroU32,
    },
    /// Remove a line
    Remove {
        /// Product id
        id: ProductId,
    },
    /// Set the quantity of a line; zero or less removes it
    Set {
        /// Product id
        id: ProductId,

        /// New quantity
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Remove all lines
    Clear,
}

#[derive(Subcommand)]
enum FavoritesAction {
    /// List favorites
    Show,
    /// Like an item described on the command line
    Add {
        #[command(flatten)]
        item: ItemArgs,
    },
    /// Like a catalog product
    AddProduct {
        /// Product id
        id: ProductId,
    },
    /// Unlike a product
    Remove {
        /// Product id
        id: ProductId,
    },
    /// Remove all favorites
    Clear,
}

#[derive(Subcommand)]
enum AuthAction {
    /// Show whether a session is held
    Show,
    /// Record a session issued by the authentication service
    Login {
        /// Email address or phone number
        #[arg(short, long)]
        identifier: String,

        /// Bearer token
        #[arg(short, long)]
        token: String,

        /// User profile JSON (defaults to the identifier)
        #[arg(short, long)]
        user: Option<String>,

        /// Record as a new registration; requires --password
        #[arg(long, requires = "password")]
        register: bool,

        /// Password to check against the password policy (registration only)
        #[arg(short, long, requires = "register")]
        password: Option<String>,
    },
    /// Drop the session
    Logout,
    /// Check a password against the policy and print its Argon2 hash
    HashPassword {
        /// Password to hash
        password: String,
    },
    /// Check a password against a stored Argon2 hash
    VerifyPassword {
        /// Password to check
        password: String,

        /// PHC-format hash, as printed by `hash-password`
        hash: String,
    },
}

/// Price bounds and ordering for listings.
#[derive(Args)]
struct RefineArgs {
    /// Lowest list price to show
    #[arg(long)]
    min_price: Option<Decimal>,

    /// Highest list price to show
    #[arg(long)]
    max_price: Option<Decimal>,

    /// relevance, price-low, price-high or newest
    #[arg(long, default_value = "relevance")]
    sort: bozor_storefront::catalog::SortOrder,
}

#[derive(Subcommand)]
enum CatalogAction {
    /// List products, optionally in one category
    List {
        /// Category slug
        #[arg(short, long)]
        category: Option<String>,

        /// Zero-based page number
        #[arg(short, long, default_value_t = 0)]
        page: u32,

        #[command(flatten)]
        refine: RefineArgs,
    },
    /// Search products
    Search {
        /// Search terms
        query: String,

        #[command(flatten)]
        refine: RefineArgs,
    },
    /// Show one product
    Show {
        /// Product id
        id: ProductId,

        /// Installment plan length in months
        #[arg(long, default_value_t = 12)]
        months: u32,
    },
    /// List categories
    Categories,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

/// Logs go to stderr, filtered by `RUST_LOG` with an info default.
fn init_tracing(json: bool) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "bozor=info,bozor_storefront=info".into());

    let text = (!json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));
    let json = json.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(text)
        .with(json)
        .init();
}

async fn run(cli: Cli) -> bozor_storefront::Result<()> {
    let config = bozor_storefront::config::StorefrontConfig::from_env()?;
    let output = commands::Output { json: cli.json };

    match cli.command {
        Commands::Cart { action } => commands::state::cart(&config, output, action).await,
        Commands::Favorites { action } => {
            commands::state::favorites(&config, output, action).await
        }
        Commands::Auth { action } => commands::state::auth(&config, output, action).await,
        Commands::Dispatch { action } => commands::state::dispatch(&config, output, &action).await,
        Commands::Reset => commands::state::reset(&config).await,
        Commands::Catalog { action } => commands::catalog::run(&config, output, action).await,
        Commands::Migrate => commands::migrate::run(&config).await,
    }
}
