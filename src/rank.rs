//! Instance type ranking
//!
//! Total order over instance-type identifiers of the form
//! `<family><generation>.<size>`, where size is one of a fixed ranked
//! vocabulary with an optional leading multiplier digit on xlarge
//! variants ("2xlarge" ranks above plain "xlarge"). The parsed key is a
//! pure sort key: comparison is lexicographic over
//! (family, generation, size rank, multiplier) via the derived `Ord`.

use crate::error::{Result, SpotError};

/// Size vocabulary in rank order
const SIZE_RANKS: [&str; 5] = ["micro", "small", "medium", "large", "xlarge"];

/// Parsed decomposition of an instance-type identifier.
///
/// Field order matters: the derived `Ord` compares family, then
/// generation, then size rank, then multiplier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct InstanceTypeKey {
    /// Family prefix (e.g., "c" in "c3.large")
    pub family: String,

    /// Generation number (e.g., 3 in "c3.large")
    pub generation: u32,

    /// Index into the size vocabulary
    pub size_rank: usize,

    /// Leading multiplier on xlarge variants (2 in "2xlarge"), 0 if absent
    pub multiplier: u32,
}

impl InstanceTypeKey {
    /// Parse an instance-type identifier into a sort key.
    ///
    /// Fails with [`SpotError::UnrecognizedInstanceType`] when the
    /// identifier does not decompose into family, generation, and a size
    /// from the known vocabulary.
    pub fn parse(identifier: &str) -> Result<Self> {
        let unrecognized = || SpotError::UnrecognizedInstanceType(identifier.to_string());

        let (prefix, size_part) = identifier.split_once('.').ok_or_else(unrecognized)?;

        // family = prefix minus its trailing digit run, generation = that run
        let digits = prefix
            .chars()
            .rev()
            .take_while(|c| c.is_ascii_digit())
            .count();
        let split = prefix.len() - digits;
        let family = &prefix[..split];
        if family.is_empty() || digits == 0 {
            return Err(unrecognized());
        }
        let generation: u32 = prefix[split..].parse().map_err(|_| unrecognized())?;

        // size = optional multiplier digits followed by a vocabulary word
        let word_start = size_part
            .find(|c: char| !c.is_ascii_digit())
            .ok_or_else(unrecognized)?;
        let multiplier: u32 = if word_start == 0 {
            0
        } else {
            size_part[..word_start].parse().map_err(|_| unrecognized())?
        };

        let size_word = &size_part[word_start..];
        let size_rank = SIZE_RANKS
            .iter()
            .position(|s| *s == size_word)
            .ok_or_else(unrecognized)?;

        Ok(Self {
            family: family.to_string(),
            generation,
            size_rank,
            multiplier,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(identifier: &str) -> InstanceTypeKey {
        InstanceTypeKey::parse(identifier).unwrap()
    }

    #[test]
    fn test_parse_fields() {
        let parsed = key("c3.2xlarge");
        assert_eq!(parsed.family, "c");
        assert_eq!(parsed.generation, 3);
        assert_eq!(parsed.size_rank, 4);
        assert_eq!(parsed.multiplier, 2);

        let parsed = key("m3.medium");
        assert_eq!(parsed.family, "m");
        assert_eq!(parsed.generation, 3);
        assert_eq!(parsed.size_rank, 2);
        assert_eq!(parsed.multiplier, 0);
    }

    #[test]
    fn test_size_order_within_generation() {
        assert!(key("c3.large") < key("c3.xlarge"));
        assert!(key("c3.xlarge") < key("c3.2xlarge"));
        assert!(key("c3.2xlarge") < key("c3.4xlarge"));
        assert!(key("t1.micro") < key("t1.small"));
        assert!(key("t1.small") < key("t1.medium"));
        assert!(key("t1.medium") < key("t1.large"));
    }

    #[test]
    fn test_generation_outranks_size() {
        assert!(key("c3.2xlarge") < key("c4.large"));
    }

    #[test]
    fn test_family_outranks_generation() {
        // Family comparison is independent of generation: every c* type
        // sorts before every m* type.
        assert!(key("c3.large") < key("m3.medium"));
        assert!(key("c4.xlarge") < key("m1.small"));
    }

    #[test]
    fn test_unknown_size_rejected() {
        assert!(matches!(
            InstanceTypeKey::parse("c3.huge"),
            Err(SpotError::UnrecognizedInstanceType(_))
        ));
    }

    #[test]
    fn test_malformed_identifiers_rejected() {
        for identifier in ["c3large", "c3.", ".large", "c.large", "3.large", "c3.2"] {
            assert!(
                InstanceTypeKey::parse(identifier).is_err(),
                "{identifier} should not parse"
            );
        }
    }
}
