//! Price report rendering
//!
//! Pure formatting over an already-ingested catalog: instance types in
//! rank order, a dashed separator between families, zones ascending
//! within a type.

use crate::error::Result;
use crate::pricing::PriceCatalog;
use crate::rank::InstanceTypeKey;

/// Separator printed between instance families
const FAMILY_SEPARATOR: &str = "    -------------------------";

/// Render the catalog as an indented price report.
///
/// Consecutive types of the same family print contiguously; a separator
/// line is inserted whenever the family prefix changes. Any instance
/// type that fails to parse aborts the whole report.
pub fn render(catalog: &PriceCatalog) -> Result<String> {
    let mut ranked: Vec<(&String, InstanceTypeKey)> = catalog
        .iter()
        .map(|(instance_type, _)| {
            InstanceTypeKey::parse(instance_type).map(|key| (instance_type, key))
        })
        .collect::<Result<_>>()?;
    ranked.sort_by(|a, b| a.1.cmp(&b.1));

    let mut out = String::new();
    let mut last_family: Option<&str> = None;

    for (instance_type, key) in &ranked {
        if let Some(family) = last_family {
            if family != key.family.as_str() {
                out.push_str(FAMILY_SEPARATOR);
                out.push('\n');
            }
        }

        out.push_str(&format!("    {instance_type}\n"));
        if let Some(zones) = catalog.zones(instance_type.as_str()) {
            for (zone, observation) in zones {
                out.push_str(&format!("        {}: {:.6}\n", zone, observation.price));
            }
        }

        last_family = Some(&key.family);
    }

    Ok(out)
}
