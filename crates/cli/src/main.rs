//! YenFlowers CLI - Smart search and recommendation tools.
//!
//! # Usage
//!
//! ```bash
//! # Run a smart search and show the parsed intent
//! yf-cli search "hoa hồng đỏ giá 500k" --limit 10
//!
//! # Type queries line by line and watch the suggestion dropdown
//! yf-cli suggest
//!
//! # Recommendations for a product page
//! yf-cli recommend --context pdp --product-id 7f3c --limit 4
//! ```
//!
//! # Commands
//!
//! - `search` - Smart search with intent chips
//! - `suggest` - Interactive debounced suggestions
//! - `recommend` - Ranked recommendations for a page context
//!
//! Every command reads `BACKEND_API_URL`, overridable with `--api-url`.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use yen_flowers_core::RecommendationContext;

mod commands;

#[derive(Parser)]
#[command(name = "yf-cli")]
#[command(author, version, about = "YenFlowers CLI tools")]
struct Cli {
    /// Base URL of the shop API
    #[arg(long, env = "BACKEND_API_URL", global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a smart search
    Search {
        /// Free-text query, sent as typed
        query: String,

        /// Maximum number of results
        #[arg(short, long, default_value_t = 20)]
        limit: u32,
    },
    /// Read queries from stdin and print suggestion state changes
    Suggest,
    /// Fetch recommendations for a page context
    Recommend {
        /// Page context (`homepage`, `pdp`, `cart`)
        #[arg(short, long, default_value = "homepage")]
        context: RecommendationContext,

        /// Product the page is about (product page only)
        #[arg(short, long)]
        product_id: Option<String>,

        /// Maximum number of recommendations
        #[arg(short, long, default_value_t = 8)]
        limit: u32,
    },
}

#[tokio::main]
async fn main() {
    // Load .env file if present (ignore errors if not found)
    let _ = dotenvy::dotenv();

    // Logs go to stderr so command output stays clean
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CliError> {
    let client = commands::client(cli.api_url.as_deref())?;

    match cli.command {
        Commands::Search { query, limit } => commands::search::run(&client, &query, limit).await?,
        Commands::Suggest => commands::suggest::run(client).await?,
        Commands::Recommend {
            context,
            product_id,
            limit,
        } => commands::recommend::run(&client, context, product_id, limit).await,
    }
    Ok(())
}
