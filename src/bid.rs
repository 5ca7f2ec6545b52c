//! Bid construction and submission
//!
//! A [`BidSpec`] describes the capacity we are willing to pay for; the
//! provider turns it into one spot request handle per requested unit.

use tracing::info;

use crate::error::{Result, SpotError};
use crate::market::SpotMarket;

/// Default ephemeral block-device layout: two instance-store volumes,
/// striped later by whoever configures the host.
fn default_ephemeral_devices() -> Vec<(String, String)> {
    vec![
        ("/dev/sdb".to_string(), "ephemeral0".to_string()),
        ("/dev/sdc".to_string(), "ephemeral1".to_string()),
    ]
}

/// Specification of a spot bid
#[derive(Debug, Clone)]
pub struct BidSpec {
    /// Maximum price we are willing to pay (USD per hour)
    pub bid: f64,

    /// AMI ID
    pub ami_id: String,

    /// Instance type (e.g., "c3.2xlarge")
    pub instance_type: String,

    /// Security group names
    pub security_groups: Vec<String>,

    /// Key pair name
    pub key_name: Option<String>,

    /// Number of units to request
    pub count: i32,

    /// Block-device layout: (device name, ephemeral virtual name) pairs
    pub ephemeral_devices: Vec<(String, String)>,
}

impl BidSpec {
    /// Create a new bid spec for an AMI at a given price
    pub fn new(ami_id: impl Into<String>, bid: f64) -> Self {
        Self {
            bid,
            ami_id: ami_id.into(),
            instance_type: "c3.2xlarge".to_string(),
            security_groups: vec![],
            key_name: None,
            count: 1,
            ephemeral_devices: default_ephemeral_devices(),
        }
    }

    /// Set instance type
    pub fn with_instance_type(mut self, instance_type: impl Into<String>) -> Self {
        self.instance_type = instance_type.into();
        self
    }

    /// Add a security group
    pub fn with_security_group(mut self, group: impl Into<String>) -> Self {
        self.security_groups.push(group.into());
        self
    }

    /// Set key pair name
    pub fn with_key_pair(mut self, key_name: impl Into<String>) -> Self {
        self.key_name = Some(key_name.into());
        self
    }

    /// Set the number of units to request
    pub fn with_count(mut self, count: i32) -> Self {
        self.count = count;
        self
    }

    /// Replace the ephemeral block-device layout
    pub fn with_ephemeral_devices(mut self, devices: Vec<(String, String)>) -> Self {
        self.ephemeral_devices = devices;
        self
    }
}

/// Handle for a submitted spot request. Immutable once submitted.
#[derive(Debug, Clone)]
pub struct CapacityRequest {
    /// Provider-assigned spot request id
    pub id: String,

    /// Bid price (USD per hour)
    pub bid: f64,

    /// AMI ID
    pub ami_id: String,

    /// Instance type
    pub instance_type: String,

    /// Security group names
    pub security_groups: Vec<String>,
}

/// Submit a bid to the spot market.
///
/// Returns one [`CapacityRequest`] per requested unit. A provider
/// rejection is fatal; there is no retry.
pub async fn submit(market: &dyn SpotMarket, spec: &BidSpec) -> Result<Vec<CapacityRequest>> {
    info!(
        "Submitting spot request: type={}, ami={}, bid=${}, count={}",
        spec.instance_type, spec.ami_id, spec.bid, spec.count
    );

    let requests = market.submit_spot_requests(spec).await?;

    if requests.len() != spec.count as usize {
        return Err(SpotError::config(format!(
            "provider returned {} spot request handles for count {}",
            requests.len(),
            spec.count
        )));
    }

    for request in &requests {
        info!("Spot request submitted: {}", request.id);
    }

    Ok(requests)
}
