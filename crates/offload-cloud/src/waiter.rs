//! Waiting on long-running operations
//!
//! Polls with exponential backoff under an overall deadline. Elapsing the
//! deadline yields [`CloudError::ProvisioningTimeout`] instead of blocking
//! forever.

use crate::error::{CloudError, Result};
use crate::provider::{ClusterResult, OperationHandle, OperationStatus, ProvisioningClient};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub struct WaitConfig {
    /// Overall deadline for the operation
    pub timeout: Duration,

    /// Delay before the second poll
    pub initial_delay: Duration,

    /// Maximum delay between polls
    pub max_delay: Duration,

    /// Backoff multiplier
    pub backoff_multiplier: f64,
}

impl Default for WaitConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30 * 60),
            initial_delay: Duration::from_secs(5),
            max_delay: Duration::from_secs(30),
            backoff_multiplier: 1.5,
        }
    }
}

impl WaitConfig {
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout,
            ..Default::default()
        }
    }

    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let factor = self.backoff_multiplier.powi(attempt.min(64) as i32);
        let delay = self.initial_delay.as_secs_f64() * factor;
        Duration::from_secs_f64(delay.min(self.max_delay.as_secs_f64()))
    }
}

/// Wait until the operation resolves or the deadline elapses
pub async fn wait_for_operation<C>(
    client: &C,
    handle: &OperationHandle,
    config: &WaitConfig,
) -> Result<ClusterResult>
where
    C: ProvisioningClient + ?Sized,
{
    info!(
        operation = %handle.name,
        cluster = %handle.cluster_name,
        timeout_secs = config.timeout.as_secs(),
        "Waiting for operation"
    );

    match tokio::time::timeout(config.timeout, poll_until_done(client, handle, config)).await {
        Ok(result) => result,
        Err(_) => Err(CloudError::ProvisioningTimeout {
            operation: handle.name.clone(),
            timeout: config.timeout,
        }),
    }
}

async fn poll_until_done<C>(
    client: &C,
    handle: &OperationHandle,
    config: &WaitConfig,
) -> Result<ClusterResult>
where
    C: ProvisioningClient + ?Sized,
{
    let mut attempt = 0;
    loop {
        match client.poll(handle).await? {
            OperationStatus::Done(result) => return Ok(result),
            OperationStatus::Failed { code, message } => {
                return Err(CloudError::Provisioning { code, message });
            }
            OperationStatus::Running => {
                let delay = config.delay_for_attempt(attempt);
                debug!(
                    operation = %handle.name,
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    "Operation still running"
                );
                sleep(delay).await;
                attempt = attempt.saturating_add(1);
            }
        }
    }
}
