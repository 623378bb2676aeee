//! Pokedex command-line front end
//!
//! Resolves a comma-separated query against the catalog, printing status
//! changes as they happen and the resolved records at the end.

use anyhow::Context;
use clap::Parser;
use pokedex_lookup::{CatalogClient, Config, Orchestrator, SearchSummary, StateChange};
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Look up Pokémon by ID, name or type
#[derive(Parser, Debug)]
#[command(name = "pokedex")]
#[command(about = "Look up Pokémon by ID, name or type (comma-separated)")]
struct Args {
    /// Query, e.g. "25,charizard,fire"
    query: String,

    /// Catalog API base URL (overrides POKEDEX_API_BASE_URL)
    #[arg(long)]
    base_url: Option<String>,

    /// Initial retry delay in milliseconds (overrides POKEDEX_RETRY_INITIAL_DELAY_MS)
    #[arg(long)]
    retry_delay_ms: Option<u64>,

    /// Log level used when RUST_LOG is not set
    #[arg(long, default_value = "warn")]
    log_level: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut config = Config::from_env();
    if let Some(base_url) = &args.base_url {
        config = config.with_base_url(base_url.as_str());
    }
    if let Some(delay) = args.retry_delay_ms {
        config = config.with_initial_delay_ms(delay);
    }
    info!("Configuration loaded: {:?}", config);

    let catalog = CatalogClient::new(&config).context("Failed to build catalog client")?;
    let orchestrator = Orchestrator::from_config(Arc::new(catalog), &config);

    let mut changes = orchestrator.state().subscribe();
    let printer = tokio::spawn(async move {
        loop {
            match changes.recv().await {
                Ok(StateChange::Status { status }) => println!("  {}", status),
                Ok(_) => {}
                Err(RecvError::Lagged(_)) => continue,
                Err(RecvError::Closed) => break,
            }
        }
    });

    let summary = {
        let search = orchestrator.search(&args.query);
        tokio::pin!(search);

        tokio::select! {
            summary = &mut search => summary,
            _ = tokio::signal::ctrl_c() => {
                orchestrator.cancel();
                search.await
            }
        }
    };

    let snapshot = orchestrator.state().snapshot().await;
    // Dropping the last handle on the state closes the change channel, so the
    // printer drains every queued status and then exits
    drop(orchestrator);
    printer.await.context("Status printer failed")?;

    if let SearchSummary::Completed { found } = summary {
        if found > 0 {
            println!();
            println!("{:>6}  {:<16} {:>6} {:>6}  TYPES", "ID", "NAME", "HEIGHT", "WEIGHT");
            for record in &snapshot.results {
                println!(
                    "{:>6}  {:<16} {:>6} {:>6}  {}",
                    record.id,
                    record.name,
                    record.height,
                    record.weight,
                    record.categories.join(", ")
                );
            }
            if let Some(image) = &snapshot.image_url {
                println!("\nImage: {}", image);
            }
        }
    }
    println!("{}", snapshot.status);

    Ok(())
}
