//! # spotlaunch
//!
//! Spot-market capacity acquisition and price reporting for EC2.
//!
//! ## Architecture
//!
//! ```text
//! launch path:   BidSpec ──submit──▶ CapacityRequest ──resolve──▶ instance ids ──describe──▶ InstanceDescription
//! price path:    price feed ──ingest──▶ PriceCatalog ──rank──▶ PriceReport
//! ```
//!
//! The acquisition state machine (submit bid, poll, resolve, aggregate)
//! and the price report both work through the [`market::SpotMarket`]
//! seam; [`ec2::Ec2Market`] is the production implementation. Polling is
//! bounded by a maximum wait and cancellable via a token, and a failed
//! request aborts the whole batch: partial spot capacity is not a useful
//! result.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod acquire;
pub mod bid;
pub mod config;
pub mod ec2;
pub mod error;
pub mod market;
pub mod pricing;
pub mod provision;
pub mod rank;
pub mod report;

// Error handling
pub use error::{Result, SpotError};

// Provider seam
pub use market::{InstanceDescription, RequestState, SpotMarket, SpotRequestStatus};

// Acquisition
pub use acquire::{DEFAULT_MAX_WAIT_SECS, DEFAULT_POLL_INTERVAL_SECS, PollConfig, resolve};
pub use bid::{BidSpec, CapacityRequest, submit};
pub use provision::launch;

// EC2 backend
pub use ec2::{DEFAULT_REGION, Ec2Market, create_ec2_client};

// Pricing
pub use pricing::{PriceCatalog, PriceObservation};
pub use rank::InstanceTypeKey;

// Presets
pub use config::{InstancePreset, PresetFile};
