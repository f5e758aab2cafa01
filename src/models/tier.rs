//! Administrative tiers of the boundary hierarchy.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One level of the SLS → Lingkungan → Kelurahan hierarchy.
///
/// Tiers are independent collections: a point resolves to at most one
/// boundary per tier, and a tier may be empty when its source is missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    /// Smallest statistical unit (Satuan Lingkungan Setempat)
    Sls,
    /// Neighbourhood, aggregating several SLS
    Lingkungan,
    /// Village / urban ward, the coarsest tier
    Kelurahan,
}

impl Tier {
    /// All tiers, finest first
    pub fn all() -> &'static [Tier] {
        &[Tier::Sls, Tier::Lingkungan, Tier::Kelurahan]
    }

    /// GeoJSON property key holding the unit name for this tier
    pub fn name_key(&self) -> &'static str {
        match self {
            Tier::Sls => "nmsls",
            Tier::Lingkungan => "lingkungan",
            Tier::Kelurahan => "nmdesa",
        }
    }

    /// Field name used in configuration and JSON output
    pub fn field_name(&self) -> &'static str {
        match self {
            Tier::Sls => "sls",
            Tier::Lingkungan => "lingkungan",
            Tier::Kelurahan => "kelurahan",
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            Tier::Sls => "SLS",
            Tier::Lingkungan => "Lingkungan",
            Tier::Kelurahan => "Kelurahan",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.field_name())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown tier '{0}' (expected sls, lingkungan or kelurahan)")]
pub struct UnknownTier(String);

impl FromStr for Tier {
    type Err = UnknownTier;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sls" => Ok(Tier::Sls),
            "lingkungan" => Ok(Tier::Lingkungan),
            "kelurahan" | "desa" => Ok(Tier::Kelurahan),
            _ => Err(UnknownTier(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_keys_are_distinct() {
        assert_eq!(Tier::Sls.name_key(), "nmsls");
        assert_eq!(Tier::Lingkungan.name_key(), "lingkungan");
        assert_eq!(Tier::Kelurahan.name_key(), "nmdesa");
    }

    #[test]
    fn test_parse_tier() {
        assert_eq!("SLS".parse::<Tier>().unwrap(), Tier::Sls);
        assert_eq!(" kelurahan ".parse::<Tier>().unwrap(), Tier::Kelurahan);
        assert!("province".parse::<Tier>().is_err());
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&Tier::Lingkungan).unwrap();
        assert_eq!(json, "\"lingkungan\"");
        let tier: Tier = serde_json::from_str("\"sls\"").unwrap();
        assert_eq!(tier, Tier::Sls);
    }
}
