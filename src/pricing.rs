//! Spot price catalog
//!
//! Holds the freshest observation per (instance type, availability zone)
//! pair. The catalog is rebuilt for each price query; nothing persists
//! across invocations.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

/// A single spot price sample from the provider's price feed
#[derive(Debug, Clone, PartialEq)]
pub struct PriceObservation {
    /// Instance type (e.g., "c3.2xlarge")
    pub instance_type: String,

    /// Availability zone (e.g., "us-west-1a")
    pub availability_zone: String,

    /// Price in USD per hour
    pub price: f64,

    /// When the provider recorded this price
    pub timestamp: DateTime<Utc>,
}

/// Per-(type, zone) price catalog.
///
/// Invariant: at most one observation per (type, zone), namely the one
/// with the latest timestamp among everything ingested. Zones are kept
/// in ascending lexical order, which is the order the report prints.
#[derive(Debug, Default)]
pub struct PriceCatalog {
    entries: BTreeMap<String, BTreeMap<String, PriceObservation>>,
}

impl PriceCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Ingest raw observations, keeping the latest per (type, zone).
    ///
    /// An incoming observation replaces the stored one only when its
    /// timestamp is strictly newer, so feeds that arrive pre-sorted by
    /// recency and feeds that arrive shuffled produce the same catalog.
    pub fn ingest(&mut self, observations: impl IntoIterator<Item = PriceObservation>) {
        for observation in observations {
            let zones = self
                .entries
                .entry(observation.instance_type.clone())
                .or_default();

            match zones.get(&observation.availability_zone) {
                Some(existing) if existing.timestamp >= observation.timestamp => {}
                _ => {
                    zones.insert(observation.availability_zone.clone(), observation);
                }
            }
        }
    }

    /// Iterate (instance type, zone map) pairs in lexical type order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &BTreeMap<String, PriceObservation>)> {
        self.entries.iter()
    }

    /// Zone map for one instance type, zones in ascending lexical order
    pub fn zones(&self, instance_type: &str) -> Option<&BTreeMap<String, PriceObservation>> {
        self.entries.get(instance_type)
    }

    /// Number of instance types in the catalog
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check whether the catalog holds any observations
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
