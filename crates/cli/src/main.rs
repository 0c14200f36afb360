//! Mini Product Manager CLI - manage WooCommerce products from a terminal.
//!
//! Talks to a running admin server over its `/api/products` routes.
//!
//! # Usage
//!
//! ```bash
//! # List the first page of products
//! mpm products list
//!
//! # Create a product
//! mpm products create --name "Widget" --price 9.99 --image https://example.com/w.png
//!
//! # Change a price
//! mpm products set-price 42 12.50
//!
//! # Replace the images
//! mpm products set-images 42 --image https://example.com/a.png --image https://example.com/b.png
//!
//! # Delete without the confirmation prompt
//! mpm products delete 42 --yes
//! ```
//!
//! # Environment Variables
//!
//! - `MPM_API_URL` - Admin server base URL (default: <http://127.0.0.1:3001>)

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

use commands::products::{self, ProductsApi};

#[derive(Parser)]
#[command(name = "mpm")]
#[command(author, version, about = "Mini Product Manager CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage products
    Products {
        #[command(subcommand)]
        action: ProductAction,
    },
}

#[derive(Subcommand)]
enum ProductAction {
    /// List products
    List {
        /// Page number
        #[arg(long, default_value_t = 1)]
        page: u32,

        /// Products per page
        #[arg(long, default_value_t = 10)]
        per_page: u32,
    },
    /// Create a simple, published product
    Create {
        /// Product name
        #[arg(short, long)]
        name: String,

        /// Regular price (e.g. 9.99)
        #[arg(short, long)]
        price: String,

        /// Image URL (repeatable)
        #[arg(short, long = "image")]
        images: Vec<String>,
    },
    /// Change a product's regular price
    SetPrice {
        /// Product ID
        id: u64,

        /// New regular price
        price: String,
    },
    /// Replace a product's images
    SetImages {
        /// Product ID
        id: u64,

        /// Image URL (repeatable, at least one)
        #[arg(short, long = "image", required = true)]
        images: Vec<String>,
    },
    /// Permanently delete a product
    Delete {
        /// Product ID
        id: u64,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mpm=warn".into()),
        )
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
    let api = ProductsApi::from_env()?;

    match cli.command {
        Commands::Products { action } => match action {
            ProductAction::List { page, per_page } => {
                products::list(&api, page, per_page).await?;
            }
            ProductAction::Create {
                name,
                price,
                images,
            } => {
                products::create(&api, &name, &price, &images).await?;
            }
            ProductAction::SetPrice { id, price } => {
                products::set_price(&api, id.into(), &price).await?;
            }
            ProductAction::SetImages { id, images } => {
                products::set_images(&api, id.into(), &images).await?;
            }
            ProductAction::Delete { id, yes } => {
                products::delete(&api, id.into(), yes).await?;
            }
        },
    }
    Ok(())
}
