//! Gaspass CLI - browse the catalog, manage the cart and check out.
//!
//! # Usage
//!
//! ```bash
//! # Browse
//! gaspass products list --category 2 --page 1 --limit 12
//! gaspass products search casque --max-price 50000 --sort price_asc
//! gaspass products show 7
//!
//! # Cart (persisted between runs)
//! gaspass cart add 7 --quantity 2
//! gaspass cart update 7 3
//! gaspass cart show
//!
//! # Announce the order to the shop
//! gaspass checkout --name "Awa Diop" --phone "+221 77 000 00 00" --email awa@example.com
//!
//! # Create the catalog schema
//! gaspass migrate
//! ```
//!
//! # Commands
//!
//! - `products`, `categories`, `reviews`, `blog`, `stats`, `health` - Data Access API
//! - `cart` - Local cart operations
//! - `checkout` - Send the cart over the configured channels
//! - `migrate` - Run database migrations
//!
//! Logging goes to stderr and defaults to `warn`; set `RUST_LOG` for more.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;

use gaspass_core::catalog::{CategoryFilter, SortOrder};
use gaspass_core::{BlogPostId, ProductId, ReviewId};

mod commands;
mod output;

#[derive(Parser)]
#[command(name = "gaspass")]
#[command(author, version, about = "Gaspass storefront CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse products
    Products {
        #[command(subcommand)]
        action: ProductAction,
    },
    /// List categories
    Categories,
    /// Browse reviews
    Reviews {
        #[command(subcommand)]
        action: ReviewAction,
    },
    /// Read the blog
    Blog {
        #[command(subcommand)]
        action: BlogAction,
    },
    /// Show catalog counts
    Stats,
    /// Check API and database health
    Health,
    /// Manage the local cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Send the cart to the shop and clear it on success
    Checkout {
        /// Customer name
        #[arg(short, long)]
        name: String,

        /// Customer phone number
        #[arg(short, long)]
        phone: String,

        /// Customer email address
        #[arg(short, long)]
        email: String,
    },
    /// Run catalog database migrations
    Migrate,
}

#[derive(Subcommand)]
enum ProductAction {
    /// List products
    List {
        /// Page number (requires --limit)
        #[arg(long)]
        page: Option<u32>,

        /// Page size (requires --page)
        #[arg(long)]
        limit: Option<u32>,

        /// Category ID, or `All`
        #[arg(short, long, value_parser = parse_category)]
        category: Option<CategoryFilter>,

        /// Only featured products
        #[arg(short, long)]
        featured: bool,
    },
    /// Show featured products
    Featured,
    /// Show one product
    Show { id: ProductId },
    /// Show a product's reviews
    Reviews { id: ProductId },
    /// Search products
    Search {
        /// Text matched against name and description
        query: Option<String>,

        /// Category ID, or `All`
        #[arg(short, long, value_parser = parse_category)]
        category: Option<CategoryFilter>,

        /// Minimum price
        #[arg(long)]
        min_price: Option<Decimal>,

        /// Maximum price
        #[arg(long)]
        max_price: Option<Decimal>,

        /// `price_asc`, `price_desc`, `rating` or `name`
        #[arg(short, long, value_parser = parse_sort)]
        sort: Option<SortOrder>,
    },
}

#[derive(Subcommand)]
enum ReviewAction {
    /// List all reviews
    List,
    /// Show one review
    Show { id: ReviewId },
}

#[derive(Subcommand)]
enum BlogAction {
    /// List blog posts
    List,
    /// Read one post
    Show { id: BlogPostId },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show cart contents
    Show,
    /// Add a product
    Add {
        id: ProductId,

        /// Quantity to add
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Set a product's quantity (0 removes it)
    Update { id: ProductId, quantity: u32 },
    /// Remove a product
    Remove { id: ProductId },
    /// Empty the cart
    Clear,
}

fn parse_category(value: &str) -> Result<CategoryFilter, String> {
    CategoryFilter::parse(value.trim())
        .map_err(|_| format!("expected a category ID or `All`, got {value:?}"))
}

fn parse_sort(value: &str) -> Result<SortOrder, String> {
    SortOrder::parse(value).ok_or_else(|| {
        format!("expected one of price_asc, price_desc, rating, name; got {value:?}")
    })
}

#[tokio::main]
async fn main() {
    // Logs go to stderr so command output stays clean
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "warn".into());
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    use commands::{cart, catalog, checkout, migrate};

    match cli.command {
        Commands::Products { action } => match action {
            ProductAction::List {
                page,
                limit,
                category,
                featured,
            } => {
                let category = category.and_then(|c| c.category());
                catalog::list_products(page, limit, category, featured).await?;
            }
            ProductAction::Featured => catalog::featured_products().await?,
            ProductAction::Show { id } => catalog::show_product(id).await?,
            ProductAction::Reviews { id } => catalog::product_reviews(id).await?,
            ProductAction::Search {
                query,
                category,
                min_price,
                max_price,
                sort,
            } => {
                let query = gaspass_client::SearchQuery {
                    q: query,
                    category: category.and_then(|c| c.category()),
                    min_price,
                    max_price,
                    sort,
                };
                catalog::search_products(&query).await?;
            }
        },
        Commands::Categories => catalog::categories().await?,
        Commands::Reviews { action } => match action {
            ReviewAction::List => catalog::reviews().await?,
            ReviewAction::Show { id } => catalog::show_review(id).await?,
        },
        Commands::Blog { action } => match action {
            BlogAction::List => catalog::blog_posts().await?,
            BlogAction::Show { id } => catalog::show_blog_post(id).await?,
        },
        Commands::Stats => catalog::stats().await?,
        Commands::Health => catalog::health().await?,
        Commands::Cart { action } => match action {
            CartAction::Show => cart::show()?,
            CartAction::Add { id, quantity } => cart::add(id, quantity).await?,
            CartAction::Update { id, quantity } => cart::update(id, quantity)?,
            CartAction::Remove { id } => cart::remove(id)?,
            CartAction::Clear => cart::clear()?,
        },
        Commands::Checkout { name, phone, email } => {
            checkout::submit(&name, &phone, &email).await?;
        }
        Commands::Migrate => migrate::run().await?,
    }
    Ok(())
}
