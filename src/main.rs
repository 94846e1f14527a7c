// ------------------------------------------------------------
// Module declarations
// ------------------------------------------------------------
//
// Each module represents a well-defined responsibility:
//
// - config:    Configuration loaded from JSON, validated at startup
// - schema:    Strongly typed quote and snapshot definitions
// - util:      Shared helper utilities (symbol handling, parsing)
// - exchanges: Exchange clients and the client registry
// - collector: Polling runtime (fetch, aggregate, schedule)
// - report:    Sorted, colorized arbitrage report rendering
// - metrics:   Lock-free runtime counters
//
mod config;
mod schema;
mod util;
mod exchanges;
mod collector;
mod report;
mod metrics;

use std::fs;
use std::path::Path;
use std::sync::Arc;

use log::info;

use config::Config;
use exchanges::Registry;
use exchanges::client::ClientFactory;
use collector::runner::run_poller;

const CONFIG_PATH: &str = "config.json";

// ------------------------------------------------------------
// Application entry point
// ------------------------------------------------------------
//
// This is the main runtime for the multi-exchange ticker poller.
//
// Responsibilities:
// - Initialize logging
// - Load and validate configuration
// - Build the exchange client registry
// - Run the polling loop until SIGINT
//
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Diagnostics (failed fetches, lifecycle notices) go through the
    // logger; default to info so they are visible without RUST_LOG.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // --------------------------------------------------------
    // Load configuration
    //
    // NOTE:
    // - `config.json` is optional; without it the built-in
    //   polling set is used.
    // - Validation happens before any network activity so that
    //   unknown exchanges or malformed pairs abort startup
    //   instead of failing on every cycle.
    // --------------------------------------------------------
    let cfg = load_config(CONFIG_PATH)?;
    cfg.validate()?;

    info!(
        "polling {} exchange(s) x {} pair(s) every {}s",
        cfg.exchanges.len(),
        cfg.pairs.len(),
        cfg.poll_delay_secs,
    );

    let registry = Registry::new(cfg.request_timeout())?;
    let factory: Arc<dyn ClientFactory> = Arc::new(registry);

    run_poller(cfg, factory).await
}

// ------------------------------------------------------------
// Configuration loader
// ------------------------------------------------------------
//
// Reads the JSON configuration file from disk if present and
// deserializes it into the strongly typed `Config` structure.
// Falls back to the built-in defaults otherwise.
//
fn load_config(path: &str) -> anyhow::Result<Config> {
    if !Path::new(path).exists() {
        info!("no {path} found, using built-in defaults");
        return Ok(Config::default());
    }

    let data = fs::read_to_string(path)?;
    let cfg = serde_json::from_str(&data)?;
    Ok(cfg)
}
