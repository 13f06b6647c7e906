//! Background refresh tasks feeding the dashboard state
//!
//! Every task reports through one `mpsc` channel of [`SnapshotUpdate`]s.
//! In-flight requests are never cancelled, so updates may arrive out of
//! order; the receiving [`DashboardState`](super::state::DashboardState)
//! decides what is still relevant.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch, Notify};
use tracing::{debug, info, warn};

use super::client::ApiClient;
use super::error::DashboardError;
use super::types::{EarningsSummary, OptionsResponse, TickerAggregate};
use super::view::Timeframe;

/// Result of one background request
#[derive(Debug, Clone)]
pub enum SnapshotUpdate {
    Tickers {
        timeframe: Timeframe,
        result: Result<Vec<TickerAggregate>, DashboardError>,
    },
    Options {
        timeframe: Timeframe,
        result: Result<OptionsResponse, DashboardError>,
    },
    Earnings {
        symbol: String,
        result: Result<EarningsSummary, DashboardError>,
    },
    ScrapeFinished(Result<(), DashboardError>),
}

/// Spawn the periodic tickers + options poller.
///
/// Polls immediately, then every `refresh` interval, whenever the timeframe
/// changes, and whenever `repoll` is notified. Stops once the update
/// receiver or the timeframe sender is dropped.
pub fn spawn_poller(
    client: Arc<ApiClient>,
    limit: u32,
    refresh: Duration,
    mut timeframe_rx: watch::Receiver<Timeframe>,
    repoll: Arc<Notify>,
    update_tx: mpsc::Sender<SnapshotUpdate>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        info!(
            "Starting poller for {} every {:?}",
            client.config().base_url,
            refresh
        );

        loop {
            let timeframe = *timeframe_rx.borrow_and_update();

            if !poll_once(&client, timeframe, limit, &update_tx).await {
                warn!("Update receiver dropped, stopping poller");
                return;
            }

            tokio::select! {
                _ = tokio::time::sleep(refresh) => {
                    debug!("Refresh interval elapsed");
                }
                changed = timeframe_rx.changed() => {
                    if changed.is_err() {
                        info!("Timeframe sender dropped, stopping poller");
                        return;
                    }
                    debug!("Timeframe changed, polling now");
                }
                _ = repoll.notified() => {
                    debug!("Re-poll requested");
                }
            }
        }
    })
}

/// Fetch tickers and options concurrently; `false` once nobody is listening
async fn poll_once(
    client: &ApiClient,
    timeframe: Timeframe,
    limit: u32,
    update_tx: &mpsc::Sender<SnapshotUpdate>,
) -> bool {
    let (tickers, options) = futures::future::join(
        client.fetch_tickers(timeframe, limit),
        client.fetch_options(timeframe),
    )
    .await;

    match &tickers {
        Ok(tickers) => debug!("Fetched {} tickers for {}", tickers.len(), timeframe),
        Err(e) => warn!("Ticker fetch failed for {}: {}", timeframe, e),
    }
    if let Err(e) = &options {
        warn!("Options fetch failed for {}: {}", timeframe, e);
    }

    let updates = [
        SnapshotUpdate::Tickers {
            timeframe,
            result: tickers,
        },
        SnapshotUpdate::Options {
            timeframe,
            result: options,
        },
    ];

    for update in updates {
        if update_tx.send(update).await.is_err() {
            return false;
        }
    }
    true
}

/// Trigger a backend scrape; on success ask the poller for fresh data
pub fn spawn_scrape(
    client: Arc<ApiClient>,
    repoll: Arc<Notify>,
    update_tx: mpsc::Sender<SnapshotUpdate>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        info!("Triggering scrape");

        let result = match client.trigger_scrape().await {
            Ok(stats) => {
                info!("Scrape finished: {}", stats);
                repoll.notify_one();
                Ok(())
            }
            Err(e) => {
                warn!("Scrape failed: {}", e);
                Err(e)
            }
        };

        let _ = update_tx.send(SnapshotUpdate::ScrapeFinished(result)).await;
    })
}

/// Fetch the earnings panel data for `symbol`
pub fn spawn_earnings_fetch(
    client: Arc<ApiClient>,
    symbol: String,
    update_tx: mpsc::Sender<SnapshotUpdate>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        debug!("Fetching earnings for {}", symbol);

        let result = client.fetch_earnings(&symbol).await;
        if let Err(e) = &result {
            warn!("Earnings fetch failed for {}: {}", symbol, e);
        }

        let _ = update_tx
            .send(SnapshotUpdate::Earnings { symbol, result })
            .await;
    })
}
