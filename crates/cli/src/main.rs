//! Comanda CLI - migrations, seeding, menu and cart tools.
//!
//! # Usage
//!
//! ```bash
//! # Run storefront database migrations
//! comanda migrate
//!
//! # Load (or reload) a tenant's menu
//! comanda seed data/seed/estafeten.json
//!
//! # Print a tenant's menu from a running storefront
//! comanda menu estafeten
//!
//! # Work with the local cart
//! comanda cart add estafeten "Lomo con queso" --bread Tradicional --side Boniato
//! comanda cart show
//! comanda cart inc 1
//! comanda cart clear
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `seed` - Seed a tenant from a JSON document
//! - `menu` - Fetch and print a tenant's menu
//! - `cart` - Show and edit the persisted cart

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

use commands::cart::{AddRequest, LineOp};

#[derive(Parser)]
#[command(name = "comanda")]
#[command(author, version, about = "Comanda CLI tools")]
struct Cli {
    /// Storefront base URL
    #[arg(
        long,
        global = true,
        env = "COMANDA_API_URL",
        default_value = "http://127.0.0.1:3000"
    )]
    api_url: String,

    /// Directory holding the cart snapshot
    #[arg(long, global = true, env = "COMANDA_CART_DIR", default_value = ".comanda")]
    cart_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run storefront database migrations
    Migrate,
    /// Seed a tenant's store, categories and products from a JSON file
    Seed {
        /// Path to the seed document
        file: PathBuf,
    },
    /// Fetch and print a tenant's menu
    Menu {
        /// Tenant slug
        tenant: String,
    },
    /// Show and edit the local cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Print the cart
    Show,
    /// Add a product from a tenant's menu
    Add {
        /// Tenant slug
        tenant: String,
        /// Product name as shown on the menu
        product: String,
        /// Bread choice (required)
        #[arg(long)]
        bread: Option<String>,
        /// Side choice (required)
        #[arg(long)]
        side: Option<String>,
        /// Seed document providing the bread and side options
        #[arg(long)]
        modifiers: Option<PathBuf>,
    },
    /// Add one unit to a line
    Inc {
        /// Line number from `cart show`
        line: usize,
    },
    /// Take one unit off a line, removing it at zero
    Dec {
        /// Line number from `cart show`
        line: usize,
    },
    /// Remove a line
    Remove {
        /// Line number from `cart show`
        line: usize,
    },
    /// Empty the cart
    Clear,
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "comanda=info,comanda_storefront=info".into());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::storefront().await?,
        Commands::Seed { file } => commands::seed::tenant(&file).await?,
        Commands::Menu { tenant } => commands::menu::show(&cli.api_url, &tenant).await?,
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show(&cli.cart_dir),
            CartAction::Add {
                tenant,
                product,
                bread,
                side,
                modifiers,
            } => {
                let request = AddRequest {
                    api_url: &cli.api_url,
                    tenant: &tenant,
                    product: &product,
                    bread: bread.as_deref(),
                    side: side.as_deref(),
                    modifiers: modifiers.as_deref(),
                };
                commands::cart::add(&cli.cart_dir, &request).await?;
            }
            CartAction::Inc { line } => {
                commands::cart::update_line(&cli.cart_dir, line, LineOp::Increment)?;
            }
            CartAction::Dec { line } => {
                commands::cart::update_line(&cli.cart_dir, line, LineOp::Decrement)?;
            }
            CartAction::Remove { line } => {
                commands::cart::update_line(&cli.cart_dir, line, LineOp::Remove)?;
            }
            CartAction::Clear => commands::cart::clear(&cli.cart_dir)?,
        },
    }
    Ok(())
}
