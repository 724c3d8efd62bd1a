//! Shopfront CLI - a terminal front end for the shop.
//!
//! # Usage
//!
//! ```bash
//! # Add two units of a product to the cart and show it
//! shopfront cart add p-123 -q 2
//! shopfront cart show
//!
//! # Browse the catalog interactively; each line is a filter edit
//! shopfront browse --query "category=tea"
//!
//! # Place an order for the cart
//! shopfront checkout --name "Ada Lovelace" --email ada@example.com \
//!     --phone "+44 20 7946 0000" --address "12 Analytical Row" \
//!     --city London --postal-code "N1 9GU"
//!
//! # Back-office
//! shopfront admin orders --page 2
//! shopfront admin order-status o-42 shipped
//! ```
//!
//! # Commands
//!
//! - `cart` - Show and edit the cart
//! - `wishlist` - Show and edit the wishlist
//! - `products` - Fetch one listing page for the given filters
//! - `browse` - Interactive, debounced listing
//! - `checkout` - Submit the cart as an order
//! - `admin` - Orders, users, branches, and products
//!
//! Configuration comes from the environment; see `StorefrontConfig`.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use shopfront_core::{OrderId, OrderStatus, ProductId};
use shopfront_storefront::{Notifier, StorefrontConfig, StorefrontSession};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod output;

#[derive(Parser)]
#[command(name = "shopfront")]
#[command(author, version, about = "Shopfront command-line storefront")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show and edit the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Show and edit the wishlist
    Wishlist {
        #[command(subcommand)]
        action: WishlistAction,
    },
    /// Fetch one page of products and print its shareable URL
    Products(commands::products::ListingArgs),
    /// Browse products interactively, one filter edit per input line
    Browse {
        /// Starting URL query, e.g. "category=tea&page=2"
        #[arg(short, long, default_value = "")]
        query: String,
    },
    /// Submit the cart as an order
    Checkout(commands::checkout::ShippingArgs),
    /// Back-office operations
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Print the cart
    Show,
    /// Add a product
    Add {
        product: ProductId,
        /// Units to add
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Set a line's quantity (0 or less removes it)
    Update {
        product: ProductId,
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Remove a product
    Remove { product: ProductId },
    /// Empty the cart
    Clear,
}

#[derive(Subcommand)]
enum WishlistAction {
    /// Print the wishlist
    Show,
    /// Save a product
    Add { product: ProductId },
    /// Remove a saved product
    Remove { product: ProductId },
    /// Move a saved product into the cart
    Move { product: ProductId },
    /// Remove every saved product
    Clear,
}

#[derive(Subcommand)]
enum AdminAction {
    /// List orders
    Orders {
        #[arg(short, long, default_value_t = 1)]
        page: u32,
    },
    /// Change an order's status
    OrderStatus { order: OrderId, status: OrderStatus },
    /// List users
    Users {
        #[arg(short, long, default_value_t = 1)]
        page: u32,
    },
    /// List store branches
    Branches,
    /// Delete a product
    DeleteProduct { product: ProductId },
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR => sentry_tracing::EventFilter::Event,
        tracing::Level::WARN | tracing::Level::INFO => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Configuration failures are the one place the binary exits early
    let config = match StorefrontConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            output::fatal(&e.to_string());
            std::process::exit(2);
        }
    };

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = init_sentry(&config);

    // Logs go to stderr so command output on stdout stays clean
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "shopfront_storefront=warn,shopfront_cli=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    if let Err(e) = run(cli, config).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: StorefrontConfig) -> Result<(), commands::CliError> {
    let notifier = Notifier::new();
    let mut notices = notifier.subscribe();
    let mut session = StorefrontSession::open(config, notifier)?;

    let result = dispatch(cli.command, &mut session).await;

    output::notices(&mut notices);
    session.close();
    result
}

async fn dispatch(
    command: Commands,
    session: &mut StorefrontSession,
) -> Result<(), commands::CliError> {
    match command {
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show(session),
            CartAction::Add { product, quantity } => {
                commands::cart::add(session, &product, quantity).await?;
            }
            CartAction::Update { product, quantity } => {
                commands::cart::update(session, &product, quantity);
            }
            CartAction::Remove { product } => commands::cart::remove(session, &product),
            CartAction::Clear => commands::cart::clear(session),
        },
        Commands::Wishlist { action } => match action {
            WishlistAction::Show => commands::wishlist::show(session),
            WishlistAction::Add { product } => commands::wishlist::add(session, &product).await?,
            WishlistAction::Remove { product } => commands::wishlist::remove(session, &product),
            WishlistAction::Move { product } => commands::wishlist::move_to_cart(session, &product),
            WishlistAction::Clear => commands::wishlist::clear(session),
        },
        Commands::Products(args) => commands::products::list(session, &args).await?,
        Commands::Browse { query } => commands::browse::run(session, &query).await?,
        Commands::Checkout(args) => commands::checkout::run(session, args).await?,
        Commands::Admin { action } => match action {
            AdminAction::Orders { page } => commands::admin::orders(session, page).await?,
            AdminAction::OrderStatus { order, status } => {
                commands::admin::order_status(session, &order, status).await?;
            }
            AdminAction::Users { page } => commands::admin::users(session, page).await?,
            AdminAction::Branches => commands::admin::branches(session).await?,
            AdminAction::DeleteProduct { product } => {
                commands::admin::delete_product(session, &product).await?;
            }
        },
    }
    Ok(())
}
