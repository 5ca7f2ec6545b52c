//! Named instance presets
//!
//! Presets live in a JSON file and are passed explicitly into the
//! launch path; there is no module-level preset table.
//!
//! File shape:
//!
//! ```json
//! {
//!   "key_name": "bench@geneva",
//!   "instances": {
//!     "testbox": {
//!       "ami": "ami-4b6f650e",
//!       "type": "c3.2xlarge",
//!       "bid": 0.10,
//!       "security_groups": ["SSH Only"]
//!     }
//!   }
//! }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::bid::BidSpec;
use crate::error::{Result, SpotError};

/// A named launch configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstancePreset {
    /// AMI ID
    pub ami: String,

    /// Instance type
    #[serde(rename = "type")]
    pub instance_type: String,

    /// Maximum bid (USD per hour)
    pub bid: f64,

    /// Security group names
    #[serde(default)]
    pub security_groups: Vec<String>,
}

/// Preset config file contents
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PresetFile {
    /// Key pair applied to every launch, if set
    #[serde(default)]
    pub key_name: Option<String>,

    /// Presets by name
    #[serde(default)]
    pub instances: BTreeMap<String, InstancePreset>,
}

impl PresetFile {
    /// Load presets from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            SpotError::config(format!("cannot read preset file {}: {}", path.display(), e))
        })?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Look up a preset by name
    pub fn get(&self, name: &str) -> Result<&InstancePreset> {
        self.instances
            .get(name)
            .ok_or_else(|| SpotError::UnknownPreset(name.to_string()))
    }

    /// Build the bid spec for a named preset
    pub fn bid_spec(&self, name: &str) -> Result<BidSpec> {
        let preset = self.get(name)?;

        let mut spec =
            BidSpec::new(&preset.ami, preset.bid).with_instance_type(&preset.instance_type);
        for group in &preset.security_groups {
            spec = spec.with_security_group(group);
        }
        if let Some(key_name) = &self.key_name {
            spec = spec.with_key_pair(key_name);
        }

        Ok(spec)
    }
}
