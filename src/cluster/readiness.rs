//! Polls each node's status route until the whole roster answers.
use crate::client;
use crate::cluster::topology::NodeSpec;
use crate::{Error, Result};
use tracing::{debug, info};

use reqwest::Client;

use tokio::time::Duration;

pub const READY_ATTEMPTS: u32 = 10;
pub const READY_BASE_DELAY: Duration = Duration::from_millis(200);

/// The delay before the next attempt grows linearly with the attempt count.
pub fn retry_delay(attempt: u32) -> Duration {
    READY_BASE_DELAY * attempt
}

/// Polls `GET /` on `host:port` until the node answers, failing once the
/// attempt budget is spent.
pub async fn await_node(http: &Client, host: &str, port: u16) -> Result<()> {
    await_node_with(http, host, port, READY_ATTEMPTS).await
}

pub(crate) async fn await_node_with(
    http: &Client,
    host: &str,
    port: u16,
    attempts: u32,
) -> Result<()> {
    for attempt in 1..=attempts {
        match client::status(http, host, port).await {
            Ok(status) => {
                debug!("node {} on port {} is ready", status.id, port);
                return Ok(());
            }
            Err(err) => {
                debug!("port {} not ready on attempt {}: {:?}", port, attempt, err);
            }
        }
        tokio::time::sleep(retry_delay(attempt)).await;
    }
    Err(Error::BootstrapTimeout(port))
}

/// Waits for every node in the roster, reporting each one as it comes up.
pub async fn await_cluster(http: &Client, host: &str, specs: &[NodeSpec]) -> Result<()> {
    for spec in specs.iter() {
        await_node(http, host, spec.port).await?;
        info!("node {} is ready on port {}", spec.id, spec.port);
    }
    Ok(())
}
