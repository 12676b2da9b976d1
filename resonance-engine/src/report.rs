//! Structured audit output.
//!
//! `AuditReport` gathers every analyzer's findings into one serializable
//! value; rendering it as text, markdown or JSON is the caller's concern.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::cardinality::{RuleViolation, validate_ranges};
use crate::catalog::Catalog;
use crate::config::AuditConfig;
use crate::diff::CatalogDiff;
use crate::error::ConfigError;
use crate::pool::{
    all_pools, dual_counts, mono_counts, neutral_count, off_topology_cards, rarity_breakdown,
};
use crate::resonance::ResonancePair;
use crate::tags::{TagViolation, find_tag_violations};
use crate::topology::Topology;
use crate::tribal::{TribalRatio, analyze_tribes};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResonanceCount {
    pub resonance: String,
    pub mono_count: usize,
    /// False for resonances seen on cards but absent from the topology
    pub configured: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolSummary {
    pub archetype: String,
    pub pair: ResonancePair,
    pub size: usize,
    pub dual_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TribalFinding {
    #[serde(flatten)]
    pub measurement: TribalRatio,
    pub threshold: f64,
    /// True only when members exist and the ratio falls short
    pub below_threshold: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ReportSummary {
    pub cards: usize,
    pub tag_violations: usize,
    pub rule_violations: usize,
    pub tribes_below_threshold: usize,
}

impl ReportSummary {
    #[must_use]
    pub const fn total_violations(&self) -> usize {
        self.tag_violations + self.rule_violations + self.tribes_below_threshold
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditReport {
    pub summary: ReportSummary,
    pub resonances: Vec<ResonanceCount>,
    pub neutral_count: usize,
    pub dual_count: usize,
    pub pools: Vec<PoolSummary>,
    pub tag_violations: Vec<TagViolation>,
    pub rule_violations: Vec<RuleViolation>,
    pub tribes: Vec<TribalFinding>,
    pub rarity: BTreeMap<String, BTreeMap<String, usize>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diff: Option<CatalogDiff>,
}

impl AuditReport {
    /// Run every analyzer over one snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if a configured tribe names an archetype the
    /// topology does not define.
    pub fn build(
        catalog: &Catalog,
        topology: &Topology,
        config: &AuditConfig,
    ) -> Result<Self, ConfigError> {
        for card in off_topology_cards(catalog, topology) {
            log::warn!(
                "{} is {}, outside the configured topology",
                card.name,
                card.resonance
            );
        }

        let resonances = mono_counts(catalog, topology)
            .into_iter()
            .map(|(resonance, mono_count)| ResonanceCount {
                configured: topology.contains(&resonance),
                resonance: resonance.to_string(),
                mono_count,
            })
            .collect();

        let duals = dual_counts(catalog, topology);
        let pools = all_pools(catalog, topology)
            .into_iter()
            .map(|pool| PoolSummary {
                dual_count: duals.get(&pool.archetype).copied().unwrap_or(0),
                archetype: pool.archetype,
                pair: pool.pair,
                size: pool.count,
            })
            .collect();

        let tag_violations = find_tag_violations(catalog, topology);
        let rule_violations = validate_ranges(catalog, topology, &config.range_rules());
        let tribes: Vec<TribalFinding> = analyze_tribes(catalog, topology, &config.tribes)?
            .into_iter()
            .map(|measurement| TribalFinding {
                below_threshold: measurement.meets(config.tribal_threshold) == Some(false),
                threshold: config.tribal_threshold,
                measurement,
            })
            .collect();

        let summary = ReportSummary {
            cards: catalog.len(),
            tag_violations: tag_violations.len(),
            rule_violations: rule_violations.len(),
            tribes_below_threshold: tribes.iter().filter(|t| t.below_threshold).count(),
        };
        log::info!(
            "audit complete: {} tag, {} range, {} tribal findings",
            summary.tag_violations,
            summary.rule_violations,
            summary.tribes_below_threshold
        );

        Ok(Self {
            summary,
            resonances,
            neutral_count: neutral_count(catalog),
            dual_count: catalog.dual_cards().len(),
            pools,
            tag_violations,
            rule_violations,
            tribes,
            rarity: rarity_breakdown(catalog),
            diff: None,
        })
    }

    #[must_use]
    pub fn with_diff(mut self, diff: CatalogDiff) -> Self {
        self.diff = Some(diff);
        self
    }

    #[must_use]
    pub const fn has_violations(&self) -> bool {
        self.summary.total_violations() > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::diff_catalogs;
    use crate::tribal::TribeSpec;

    fn config() -> AuditConfig {
        AuditConfig {
            resonances: vec!["Tide".into(), "Ember".into()],
            mono_range: (1, 2),
            neutral_range: (0, 1),
            dual_exact_count: 1,
            tribes: vec![
                TribeSpec {
                    subtype: "Warrior".into(),
                    home_archetype: "Ember/Tide".into(),
                },
                TribeSpec {
                    subtype: "Survivor".into(),
                    home_archetype: "Ember/Tide".into(),
                },
            ],
            ..AuditConfig::default()
        }
    }

    const CLEAN: &str = r#"[
        {"name": "Tide Scout", "resonance": "Tide", "archetype_tags": ["Ember/Tide"], "subtype": "Warrior"},
        {"name": "Ember Scout", "resonance": "Ember", "subtype": "Warrior", "rarity": "common"},
        {"name": "Tempest Signpost", "resonance": {"dual": ["Tide", "Ember"]}}
    ]"#;

    #[test]
    fn clean_catalog_has_no_violations() {
        let config = config();
        let catalog = Catalog::from_json(CLEAN).unwrap();
        let report = AuditReport::build(&catalog, &config.topology().unwrap(), &config).unwrap();
        assert!(!report.has_violations(), "{report:#?}");
        assert_eq!(report.summary.cards, 3);
        assert_eq!(report.pools.len(), 1);
        assert_eq!(report.pools[0].size, 3);
        assert_eq!(report.pools[0].dual_count, 1);
        assert_eq!(report.tribes[0].measurement.ratio, Some(1.0));
        assert!(report.tribes[1].measurement.ratio.is_none());
        assert!(!report.tribes[1].below_threshold);
    }

    #[test]
    fn collects_findings_from_every_analyzer() {
        let config = config();
        let catalog = Catalog::from_json(
            r#"[
                {"name": "Starcatcher", "resonance": "Stone", "archetype_tags": ["Ember/Tide"], "subtype": "Warrior"},
                {"name": "Tide Scout", "resonance": "Tide"}
            ]"#,
        )
        .unwrap();
        let report = AuditReport::build(&catalog, &config.topology().unwrap(), &config).unwrap();
        assert_eq!(report.summary.tag_violations, 1);
        assert!(report.summary.rule_violations >= 2);
        assert_eq!(report.summary.tribes_below_threshold, 1);
        assert!(report.has_violations());
        let stone = report
            .resonances
            .iter()
            .find(|r| r.resonance == "Stone")
            .unwrap();
        assert!(!stone.configured);
    }

    #[test]
    fn serializes_with_optional_diff() {
        let config = config();
        let catalog = Catalog::from_json(CLEAN).unwrap();
        let report = AuditReport::build(&catalog, &config.topology().unwrap(), &config).unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert!(json.get("diff").is_none());
        assert_eq!(json["tribes"][1]["ratio"], serde_json::Value::Null);

        let with_diff = report.with_diff(diff_catalogs(&Catalog::empty(), &catalog));
        let json = serde_json::to_value(&with_diff).unwrap();
        assert_eq!(json["diff"]["added"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn unknown_tribe_home_is_a_config_error() {
        let mut config = config();
        config.tribes[0].home_archetype = "Verdant".into();
        let topology = Topology::from_resonances(["Tide", "Ember"]).unwrap();
        let err = AuditReport::build(&Catalog::empty(), &topology, &config).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownArchetype { .. }));
    }
}
