use address_suggest_core::{
    validate_address, AddressAutocompleteService, AutocompleteOptions, ListingSearchSource,
    PlacesSource, SharedSource,
};
use chrono::Utc;
use clap::{Parser, Subcommand};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "address-suggest", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Property-search backend base URL
    #[arg(long, default_value = "http://localhost:3000")]
    backend_url: String,
}

#[derive(Subcommand)]
enum Command {
    /// Query all suggestion sources and print the ranked candidates.
    Suggest {
        /// Free-text address query
        #[arg(long)]
        query: String,
        /// Maximum suggestions to return.
        #[arg(long, default_value = "10")]
        limit: usize,
        /// Per-source timeout in milliseconds (unbounded when omitted).
        #[arg(long)]
        source_timeout_ms: Option<u64>,
    },
    /// Check a free-text address for minimal well-formedness.
    Validate {
        /// Address to check
        #[arg(long)]
        address: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let app_version = env!("CARGO_PKG_VERSION");

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Suggest {
            query,
            limit,
            source_timeout_ms,
        } => {
            let options = AutocompleteOptions {
                max_suggestions: limit,
                source_timeout: source_timeout_ms.map(Duration::from_millis),
                ..AutocompleteOptions::default()
            };
            let sources: Vec<SharedSource> = vec![
                Arc::new(ListingSearchSource::new(&cli.backend_url)),
                Arc::new(PlacesSource),
            ];
            let service = AddressAutocompleteService::new(sources, options);

            info!(
                version = app_version,
                backend = %cli.backend_url,
                started_at = %Utc::now().to_rfc3339(),
                "address-suggest boot"
            );

            let suggestions = service.suggestions(&query).await;
            if suggestions.is_empty() {
                println!("no suggestions");
                return Ok(());
            }

            for suggestion in &suggestions {
                println!(
                    "[{}] type={:?} confidence={:.2} {}",
                    suggestion.id, suggestion.kind, suggestion.confidence, suggestion.full_address
                );
                if let Some(meta) = &suggestion.metadata {
                    println!(
                        "  city={} state={} zip={}",
                        meta.city.as_deref().unwrap_or("-"),
                        meta.state.as_deref().unwrap_or("-"),
                        meta.zip.as_deref().unwrap_or("-"),
                    );
                }
            }

            if let Some(cached) = service.cached(&query) {
                if cached.has_more {
                    println!(
                        "... {} more candidate(s) beyond the limit",
                        cached.total - cached.suggestions.len()
                    );
                }
            }
        }
        Command::Validate { address } => {
            let outcome = validate_address(&address);
            if outcome.is_valid {
                println!("valid");
            } else {
                for error in outcome.errors {
                    println!("invalid: {error}");
                }
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
