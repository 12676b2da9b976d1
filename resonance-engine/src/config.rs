//! Audit configuration with the council's stated defaults.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::cardinality::RangeRules;
use crate::constants::{
    DEFAULT_DUAL_EXACT_COUNT, DEFAULT_DUAL_MAX_PER_ARCHETYPE, DEFAULT_MONO_MAX, DEFAULT_MONO_MIN,
    DEFAULT_NEUTRAL_MAX, DEFAULT_NEUTRAL_MIN, DEFAULT_RESONANCES, DEFAULT_TRIBAL_THRESHOLD,
};
use crate::error::ConfigError;
use crate::topology::Topology;
use crate::tribal::TribeSpec;

/// Every key is optional; missing keys fall back to the corpus targets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditConfig {
    #[serde(default = "AuditConfig::default_resonances")]
    pub resonances: Vec<String>,
    /// Archetype name to the two resonances it pairs
    #[serde(default)]
    pub archetype_names: BTreeMap<String, Vec<String>>,
    #[serde(default = "AuditConfig::default_mono_range")]
    pub mono_range: (usize, usize),
    #[serde(default = "AuditConfig::default_neutral_range")]
    pub neutral_range: (usize, usize),
    #[serde(default = "AuditConfig::default_dual_exact_count")]
    pub dual_exact_count: usize,
    #[serde(default = "AuditConfig::default_dual_max_per_archetype")]
    pub dual_max_per_archetype: usize,
    #[serde(default = "AuditConfig::default_tribal_threshold")]
    pub tribal_threshold: f64,
    #[serde(default)]
    pub tribes: Vec<TribeSpec>,
}

impl AuditConfig {
    fn default_resonances() -> Vec<String> {
        DEFAULT_RESONANCES.iter().map(|s| (*s).to_string()).collect()
    }

    const fn default_mono_range() -> (usize, usize) {
        (DEFAULT_MONO_MIN, DEFAULT_MONO_MAX)
    }

    const fn default_neutral_range() -> (usize, usize) {
        (DEFAULT_NEUTRAL_MIN, DEFAULT_NEUTRAL_MAX)
    }

    const fn default_dual_exact_count() -> usize {
        DEFAULT_DUAL_EXACT_COUNT
    }

    const fn default_dual_max_per_archetype() -> usize {
        DEFAULT_DUAL_MAX_PER_ARCHETYPE
    }

    const fn default_tribal_threshold() -> f64 {
        DEFAULT_TRIBAL_THRESHOLD
    }

    /// Load configuration from a JSON object.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed or the parsed values
    /// fail [`AuditConfig::validate`].
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    #[must_use]
    pub const fn range_rules(&self) -> RangeRules {
        RangeRules {
            mono_range: self.mono_range,
            neutral_range: self.neutral_range,
            dual_exact_count: self.dual_exact_count,
            dual_max_per_archetype: self.dual_max_per_archetype,
        }
    }

    /// # Errors
    ///
    /// Returns an error for inverted ranges or a threshold outside `[0, 1]`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.range_rules().validate()?;
        if !(0.0..=1.0).contains(&self.tribal_threshold) {
            return Err(ConfigError::ThresholdOutOfRange {
                value: self.tribal_threshold,
            });
        }
        Ok(())
    }

    /// Build the topology these settings describe and resolve every tribe's
    /// home archetype against it.
    ///
    /// # Errors
    ///
    /// See [`Topology::new`]; also fails when a tribe names a home archetype
    /// the topology lacks.
    pub fn topology(&self) -> Result<Topology, ConfigError> {
        let topology = Topology::new(self.resonances.iter().cloned(), &self.archetype_names)?;
        self.validate_tribes(&topology)?;
        Ok(topology)
    }

    /// # Errors
    ///
    /// Returns the first tribe whose home archetype is not in `topology`.
    pub fn validate_tribes(&self, topology: &Topology) -> Result<(), ConfigError> {
        match self
            .tribes
            .iter()
            .find(|tribe| topology.archetype(&tribe.home_archetype).is_none())
        {
            Some(tribe) => Err(ConfigError::UnknownArchetype {
                subtype: tribe.subtype.clone(),
                archetype: tribe.home_archetype.clone(),
            }),
            None => Ok(()),
        }
    }
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            resonances: Self::default_resonances(),
            archetype_names: BTreeMap::new(),
            mono_range: Self::default_mono_range(),
            neutral_range: Self::default_neutral_range(),
            dual_exact_count: Self::default_dual_exact_count(),
            dual_max_per_archetype: Self::default_dual_max_per_archetype(),
            tribal_threshold: Self::default_tribal_threshold(),
            tribes: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_uses_defaults() {
        let config = AuditConfig::from_json("{}").unwrap();
        assert_eq!(config, AuditConfig::default());
        assert_eq!(config.range_rules(), RangeRules::default());
        assert_eq!(config.topology().unwrap().archetypes().len(), 10);
    }

    #[test]
    fn parses_overrides_and_tribes() {
        let config = AuditConfig::from_json(
            r#"{
                "resonances": ["Tide", "Ember", "Stone"],
                "archetype_names": {"Tempest": ["Tide", "Ember"]},
                "mono_range": [10, 12],
                "tribal_threshold": 0.7,
                "tribes": [{"subtype": "Warrior", "home_archetype": "Tempest"}]
            }"#,
        )
        .unwrap();
        assert_eq!(config.mono_range, (10, 12));
        assert_eq!(config.neutral_range, (15, 25));
        assert_eq!(config.tribes[0].subtype, "Warrior");
        assert!(config.topology().unwrap().archetype("Tempest").is_some());
    }

    #[test]
    fn topology_rejects_tribe_with_unknown_home() {
        let config = AuditConfig::from_json(
            r#"{"tribes": [{"subtype": "Warrior", "home_archetype": "Nowhere"}]}"#,
        )
        .unwrap();
        assert_eq!(
            config.topology().unwrap_err(),
            ConfigError::UnknownArchetype {
                subtype: "Warrior".to_string(),
                archetype: "Nowhere".to_string()
            }
        );
    }

    #[test]
    fn rejects_threshold_outside_unit_interval() {
        let err = AuditConfig::from_json(r#"{"tribal_threshold": 1.5}"#).unwrap_err();
        assert!(matches!(err, ConfigError::ThresholdOutOfRange { .. }));
        let config = AuditConfig {
            tribal_threshold: f64::NAN,
            ..AuditConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_inverted_mono_range() {
        let err = AuditConfig::from_json(r#"{"mono_range": [45, 38]}"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvertedRange {
                field: "mono_range",
                ..
            }
        ));
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(matches!(
            AuditConfig::from_json("{\"mono_range\": 3}"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn sample_config_is_valid() {
        let config = AuditConfig::from_json(include_str!("../../data/council.json")).unwrap();
        let topology = config.topology().unwrap();
        for tribe in &config.tribes {
            assert!(topology.archetype(&tribe.home_archetype).is_some());
        }
    }
}
