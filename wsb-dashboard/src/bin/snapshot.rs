/// One-shot dashboard snapshot
///
/// Fetches tickers and options once, optionally the earnings for the
/// ticker given as the first argument, and prints the assembled view as
/// pretty JSON.
///
///     wsb-snapshot            # table, tape and options
///     wsb-snapshot GME        # plus the GME earnings panel
use std::error::Error;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use wsb_dashboard::{ApiClient, DashboardConfig, DashboardState, SnapshotUpdate};

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    init_logging();

    let config = DashboardConfig::from_env()?;
    let client = ApiClient::new(config.api.clone())?;
    let symbol = std::env::args().nth(1).map(|s| s.trim().to_uppercase());

    info!("Fetching {} snapshot from {}", config.timeframe, config.api.base_url);

    let (tickers, options) = futures::future::join(
        client.fetch_tickers(config.timeframe, config.limit),
        client.fetch_options(config.timeframe),
    )
    .await;

    let mut state = DashboardState::new(config.timeframe);
    state.apply(SnapshotUpdate::Tickers {
        timeframe: config.timeframe,
        result: tickers,
    });
    state.apply(SnapshotUpdate::Options {
        timeframe: config.timeframe,
        result: options,
    });

    if let Some(symbol) = symbol {
        let result = client.fetch_earnings(&symbol).await;
        if let Err(e) = &result {
            warn!("No earnings for {}: {}", symbol, e);
        }
        state.select(&symbol);
        state.apply(SnapshotUpdate::Earnings { symbol, result });
    }

    println!("{}", serde_json::to_string_pretty(&state.view())?);
    Ok(())
}
