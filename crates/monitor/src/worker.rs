use std::sync::Arc;
use std::time::Duration;

use metrics::{counter, gauge, histogram};
use thiserror::Error;
use tokio::sync::watch;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use blockwatch_domain::{config::ConfigError, synthetic_transaction, Registry};

use crate::rpc::BlockSource;

#[derive(Debug, Error)]
pub enum MonitorError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("rpc error: {0}")]
    Rpc(String),
}

impl From<reqwest::Error> for MonitorError {
    fn from(value: reqwest::Error) -> Self {
        Self::Rpc(value.to_string())
    }
}

/// Drives poll cycles on `poll_interval` until `shutdown` fires.
///
/// Fetch failures are logged and counted but never abort the loop; the next
/// cycle proceeds unaffected.
pub async fn run_monitor<S>(
    poll_interval: Duration,
    registry: Arc<Registry>,
    source: S,
    mut shutdown: watch::Receiver<bool>,
) where
    S: BlockSource,
{
    loop {
        tokio::select! {
            _ = sleep(poll_interval) => poll_once(registry.as_ref(), &source).await,
            _ = shutdown.changed() => break,
        }
    }
    info!("monitor stopped");
}

/// One fetch-compare-fan-out cycle.
///
/// Reads the previously recorded height, fetches the latest one outside any
/// registry lock, and on an advance appends one synthetic transaction per
/// subscribed address, stamped with the new height. A height jump of more
/// than one block still yields a single transaction at the final height.
pub async fn poll_once<S>(registry: &Registry, source: &S)
where
    S: BlockSource,
{
    let previous = registry.current_block();
    match source.latest_block_height().await {
        Ok(height) if height > previous => {
            counter!("monitor_rpc_calls_total", "result" => "ok").increment(1);
            registry.update_current_block(height);

            // Addresses subscribed after this snapshot pick up from the
            // next block.
            let subscribers = registry.subscribed_addresses();
            for address in &subscribers {
                registry.add_transaction(address, synthetic_transaction(address, height));
            }

            gauge!("monitor_last_height").set(height as f64);
            histogram!("monitor_fanout_subscribers").record(subscribers.len() as f64);
            info!(height, subscribers = subscribers.len(), "processing new block");
        }
        Ok(height) => {
            counter!("monitor_rpc_calls_total", "result" => "ok").increment(1);
            debug!(height, previous, "no new block");
        }
        Err(err) => {
            counter!("monitor_rpc_calls_total", "result" => "error").increment(1);
            warn!(%err, "block height fetch failed");
        }
    }
}
