use std::pin::pin;
use std::sync::Arc;
use std::sync::atomic::Ordering;

use chrono::Utc;
use colored::Colorize;
use log::{info, warn};
use tokio::task::JoinSet;
use tokio::time::sleep;

use crate::{
    config::Config,
    exchanges::client::{ClientFactory, FetchError},
    metrics::METRICS,
    report,
    schema::{PriceField, PriceQuote},
};

/// Runs one (exchange, pair) fetch.
///
/// This is the failure-isolation boundary: every client error is
/// classified, logged, and converted into `None`. Nothing that
/// happens here can fail a sibling fetcher or the cycle.
///
/// RESOURCE CONTRACT:
/// - The client is acquired at the top and owned by this task.
///   Dropping it is the release, which covers every exit path:
///   success, each failure class, and abort mid-flight.
/// - A failed acquisition has acquired nothing, so there is
///   nothing to release.
///
pub(crate) async fn fetch_one(
    factory: Arc<dyn ClientFactory>,
    exchange: String,
    pair: String,
) -> Option<PriceQuote> {
    let client = match factory.acquire(&exchange) {
        Some(client) => client,
        None => {
            // Config validation rejects unknown exchanges at startup,
            // so this only fires if factory and config disagree.
            warn!("No client registered for exchange: {exchange}");
            return None;
        }
    };

    match client.fetch_ticker(&pair).await {
        Ok(ticker) => {
            METRICS.quotes_collected.fetch_add(1, Ordering::Relaxed);
            Some(PriceQuote {
                exchange,
                pair,
                ask: ticker.ask,
                bid: ticker.bid,
            })
        }

        Err(FetchError::ExchangeUnavailable) => {
            METRICS.exchange_unavailable.fetch_add(1, Ordering::Relaxed);
            warn!("Exchange is not available: {exchange}");
            None
        }

        Err(FetchError::RequestTimeout) => {
            METRICS.request_timeouts.fetch_add(1, Ordering::Relaxed);
            warn!("Request timeout: {exchange} {pair}");
            None
        }

        Err(FetchError::UnsupportedPair) => {
            METRICS.unsupported_pairs.fetch_add(1, Ordering::Relaxed);
            warn!("Unsupported pair {pair} at {exchange}");
            None
        }

        Err(FetchError::Other(msg)) => {
            METRICS.other_errors.fetch_add(1, Ordering::Relaxed);
            warn!("Fetch failed at {exchange} for {pair}: {msg}");
            None
        }
    }
}

/// Spawns all fetchers of one cycle onto a fresh JoinSet.
///
/// The returned set is the cycle's cancellation scope: aborting
/// it cancels every in-flight fetcher of this cycle and nothing
/// else.
pub(crate) fn spawn_cycle(
    factory: &Arc<dyn ClientFactory>,
    exchanges: &[String],
    pairs: &[String],
) -> JoinSet<Option<PriceQuote>> {
    let mut set = JoinSet::new();

    for exchange in exchanges {
        for pair in pairs {
            METRICS.fetchers_spawned.fetch_add(1, Ordering::Relaxed);
            set.spawn(fetch_one(
                factory.clone(),
                exchange.clone(),
                pair.clone(),
            ));
        }
    }

    set
}

/// Folds one joined fetcher result into the snapshot.
fn absorb(
    joined: Result<Option<PriceQuote>, tokio::task::JoinError>,
    snapshot: &mut Vec<PriceQuote>,
) {
    match joined {
        Ok(Some(quote)) => snapshot.push(quote),

        // Classified failure, already logged by the fetcher
        Ok(None) => {}

        // Aborted during shutdown
        Err(e) if e.is_cancelled() => {}

        Err(e) => warn!("Fetcher task failed: {e}"),
    }
}

/// Runs all fetchers of one cycle to completion and returns the
/// snapshot.
///
/// CONTRACT:
/// - Waits for every fetcher to terminate (success or classified
///   failure), never first-completion
/// - Completion order does not influence the snapshot contents
/// - No retries: a failed fetcher simply contributes no quote
///
#[cfg(test)]
pub(crate) async fn collect_snapshot(
    factory: Arc<dyn ClientFactory>,
    exchanges: &[String],
    pairs: &[String],
) -> Vec<PriceQuote> {
    let mut set = spawn_cycle(&factory, exchanges, pairs);
    let mut snapshot = Vec::with_capacity(exchanges.len() * pairs.len());

    while let Some(joined) = set.join_next().await {
        absorb(joined, &mut snapshot);
    }

    snapshot
}

/// The scheduler: drives fetch → report → sleep forever.
///
/// STATES:
/// - Fetching:  all E×P fetchers in flight on one JoinSet
/// - Reporting: snapshot rendered once per price field
/// - Sleeping:  fixed delay before the next cycle
///
/// Only one cycle is ever in flight; a cycle's snapshot is dropped
/// before the next one starts.
///
/// SHUTDOWN:
/// - A single SIGINT stops new cycles, aborts the in-flight
///   JoinSet as a group, waits until every abort is acknowledged,
///   and returns. No report is printed for an interrupted cycle.
///
pub async fn run_poller(cfg: Config, factory: Arc<dyn ClientFactory>) -> anyhow::Result<()> {
    let delay = cfg.poll_delay();
    let mut shutdown = pin!(tokio::signal::ctrl_c());

    loop {
        println!(
            "{}",
            format!("<Fetching data at {}>", Utc::now().format("%Y-%m-%d %H:%M:%S UTC")).white()
        );

        let mut set = spawn_cycle(&factory, &cfg.exchanges, &cfg.pairs);
        let mut snapshot = Vec::with_capacity(cfg.exchanges.len() * cfg.pairs.len());
        let mut cancelled = false;

        while !cancelled && !set.is_empty() {
            tokio::select! {
                _ = &mut shutdown => cancelled = true,
                joined = set.join_next() => {
                    if let Some(joined) = joined {
                        absorb(joined, &mut snapshot);
                    }
                }
            }
        }

        if cancelled {
            // Cancel the whole cycle as a group and wait for each
            // abort to be acknowledged before exiting. Client release
            // rides on task drop, so nothing leaks here.
            set.abort_all();
            while set.join_next().await.is_some() {}
            info!("Got shutdown signal, exiting without a report for the interrupted cycle");
            return Ok(());
        }

        report::print_sorted(&snapshot, PriceField::Ask);
        report::print_sorted(&snapshot, PriceField::Bid);

        METRICS.cycles_completed.fetch_add(1, Ordering::Relaxed);
        info!(
            "cycle done: quotes={} unavailable={} timeouts={} unsupported={} other={}",
            METRICS.quotes_collected.load(Ordering::Relaxed),
            METRICS.exchange_unavailable.load(Ordering::Relaxed),
            METRICS.request_timeouts.load(Ordering::Relaxed),
            METRICS.unsupported_pairs.load(Ordering::Relaxed),
            METRICS.other_errors.load(Ordering::Relaxed),
        );

        tokio::select! {
            _ = &mut shutdown => {
                info!("Got shutdown signal, exiting");
                return Ok(());
            }
            _ = sleep(delay) => {}
        }
    }
}
