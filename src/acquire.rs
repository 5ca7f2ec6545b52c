//! Spot request acquisition polling
//!
//! Drives a batch of submitted spot requests to a terminal state. Each
//! iteration sleeps for the poll interval, then queries the state of all
//! outstanding requests in a single batched call. The loop ends when
//! every request has been observed active, or aborts on the first
//! request seen in a terminal non-active state: spot capacity is
//! fungible and a partial batch is not a useful result.
//!
//! The loop is bounded by a maximum wait and a cancellation token, since
//! the provider's liveness is outside our control.

use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::bid::CapacityRequest;
use crate::error::{Result, SpotError};
use crate::market::{RequestState, SpotMarket};

/// Default interval between status queries
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 10;

/// Default maximum time to wait for fulfillment
pub const DEFAULT_MAX_WAIT_SECS: u64 = 600;

/// Polling parameters for [`resolve`]
#[derive(Debug, Clone)]
pub struct PollConfig {
    /// Time between status queries
    pub interval: Duration,

    /// Maximum total time to wait before giving up
    pub max_wait: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
            max_wait: Duration::from_secs(DEFAULT_MAX_WAIT_SECS),
        }
    }
}

impl PollConfig {
    /// Set the poll interval
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Set the maximum wait bound
    pub fn with_max_wait(mut self, max_wait: Duration) -> Self {
        self.max_wait = max_wait;
        self
    }
}

/// Poll the given spot requests until all are fulfilled.
///
/// Returns the instance ids assigned to the requests, one per request.
/// Fails with [`SpotError::Acquisition`] as soon as any request is
/// observed outside {open, active} — no partial set escapes. Fails with
/// [`SpotError::AcquisitionTimeout`] when the wait bound expires and
/// [`SpotError::Cancelled`] when the token is tripped mid-poll.
///
/// No per-request state is cached across iterations except the
/// accumulated instance-id set, so a request transiently reported open
/// after having been seen before is tolerated.
pub async fn resolve(
    market: &dyn SpotMarket,
    requests: &[CapacityRequest],
    config: &PollConfig,
    cancel: &CancellationToken,
) -> Result<Vec<String>> {
    let request_ids: Vec<String> = requests.iter().map(|r| r.id.clone()).collect();

    info!(
        "Waiting for {} spot request(s) to be fulfilled (interval: {:?}, max wait: {:?})",
        request_ids.len(),
        config.interval,
        config.max_wait
    );

    let start = tokio::time::Instant::now();
    let mut instance_ids: Vec<String> = Vec::new();

    loop {
        if start.elapsed() >= config.max_wait {
            return Err(SpotError::AcquisitionTimeout(config.max_wait));
        }

        tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(SpotError::Cancelled),
            _ = tokio::time::sleep(config.interval) => {}
        }

        let statuses = market.describe_spot_requests(&request_ids).await?;

        let mut done = true;
        for status in statuses {
            debug!(
                request_id = %status.request_id,
                state = ?status.state,
                status = ?status.status_message,
                "spot request state"
            );

            match status.state {
                RequestState::Open => done = false,
                RequestState::Active => match status.instance_id {
                    Some(instance_id) => {
                        if !instance_ids.contains(&instance_id) {
                            info!(
                                "Spot request {} fulfilled by instance {}",
                                status.request_id, instance_id
                            );
                            instance_ids.push(instance_id);
                        }
                    }
                    // Active but the instance id has not propagated yet
                    None => done = false,
                },
                RequestState::Terminal(state) => {
                    return Err(SpotError::Acquisition {
                        request_id: status.request_id,
                        state,
                        fault: status.fault.unwrap_or_default(),
                        status: status.status_message.unwrap_or_default(),
                    });
                }
            }
        }

        if done {
            break;
        }
    }

    info!("All {} spot request(s) fulfilled", request_ids.len());
    Ok(instance_ids)
}
