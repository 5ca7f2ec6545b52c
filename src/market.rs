//! Provider seam for the spot market
//!
//! The acquisition state machine and the price report work through this
//! interface only, never through concrete SDK types. The production
//! implementation is [`crate::ec2::Ec2Market`]; tests drive the polling
//! loop with scripted implementations.

use async_trait::async_trait;

use crate::bid::{BidSpec, CapacityRequest};
use crate::error::Result;
use crate::pricing::PriceObservation;

/// Lifecycle state of a spot request, as reported by the provider.
///
/// Once a request leaves `Open` it never returns to it. The poller
/// trusts this provider contract and does not defend against regression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestState {
    /// Pending fulfillment
    Open,
    /// Fulfilled; an instance has been assigned
    Active,
    /// Any other provider state (closed, cancelled, failed, disabled).
    /// Carries the raw provider state string for error reporting.
    Terminal(String),
}

impl RequestState {
    /// Map a raw provider state string onto the request lifecycle
    pub fn from_provider(state: &str) -> Self {
        match state {
            "open" => Self::Open,
            "active" => Self::Active,
            other => Self::Terminal(other.to_string()),
        }
    }

    /// Check whether the request is still pending
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Open)
    }
}

/// Snapshot of a spot request taken during one polling iteration
#[derive(Debug, Clone)]
pub struct SpotRequestStatus {
    /// Provider-assigned spot request id
    pub request_id: String,

    /// Current lifecycle state
    pub state: RequestState,

    /// Assigned instance id, present once the request is active
    pub instance_id: Option<String>,

    /// Provider fault message, if any
    pub fault: Option<String>,

    /// Provider status message, if any
    pub status_message: Option<String>,
}

/// Description of a launched instance
///
/// The public IP is assigned asynchronously by the provider and may
/// still be absent right after fulfillment.
#[derive(Debug, Clone)]
pub struct InstanceDescription {
    /// Instance id
    pub id: String,

    /// Instance type
    pub instance_type: String,

    /// Private IP address
    pub private_ip: Option<String>,

    /// Public IP address
    pub public_ip: Option<String>,
}

/// Spot-market operations the core logic depends on.
///
/// Status and describe queries are batched: one call covers all
/// outstanding requests, keeping the polling loop to a single provider
/// round-trip per iteration.
#[async_trait]
pub trait SpotMarket: Send + Sync {
    /// Submit a spot request batch, returning one handle per unit
    async fn submit_spot_requests(&self, spec: &BidSpec) -> Result<Vec<CapacityRequest>>;

    /// Query the current state of the given spot requests in one call
    async fn describe_spot_requests(&self, request_ids: &[String]) -> Result<Vec<SpotRequestStatus>>;

    /// Describe the given instances in one call
    async fn describe_instances(&self, instance_ids: &[String]) -> Result<Vec<InstanceDescription>>;

    /// Fetch recent spot price observations for a product description
    async fn price_history(&self, product: &str) -> Result<Vec<PriceObservation>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_state_from_provider() {
        assert_eq!(RequestState::from_provider("open"), RequestState::Open);
        assert_eq!(RequestState::from_provider("active"), RequestState::Active);
        assert_eq!(
            RequestState::from_provider("closed"),
            RequestState::Terminal("closed".to_string())
        );
        assert_eq!(
            RequestState::from_provider("cancelled"),
            RequestState::Terminal("cancelled".to_string())
        );
        assert_eq!(
            RequestState::from_provider("failed"),
            RequestState::Terminal("failed".to_string())
        );
    }

    #[test]
    fn test_request_state_is_open() {
        assert!(RequestState::Open.is_open());
        assert!(!RequestState::Active.is_open());
        assert!(!RequestState::Terminal("closed".to_string()).is_open());
    }
}
