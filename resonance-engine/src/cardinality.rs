//! Global range rules over pool counts.

use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::constants::{
    DEFAULT_DUAL_EXACT_COUNT, DEFAULT_DUAL_MAX_PER_ARCHETYPE, DEFAULT_MONO_MAX, DEFAULT_MONO_MIN,
    DEFAULT_NEUTRAL_MAX, DEFAULT_NEUTRAL_MIN,
};
use crate::error::ConfigError;
use crate::pool::{dual_counts, mono_counts, neutral_count};
use crate::topology::Topology;

/// Acceptable counts for a full card pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeRules {
    /// Inclusive bounds on mono cards per resonance
    pub mono_range: (usize, usize),
    /// Inclusive bounds on neutral cards
    pub neutral_range: (usize, usize),
    pub dual_exact_count: usize,
    pub dual_max_per_archetype: usize,
}

impl Default for RangeRules {
    fn default() -> Self {
        Self {
            mono_range: (DEFAULT_MONO_MIN, DEFAULT_MONO_MAX),
            neutral_range: (DEFAULT_NEUTRAL_MIN, DEFAULT_NEUTRAL_MAX),
            dual_exact_count: DEFAULT_DUAL_EXACT_COUNT,
            dual_max_per_archetype: DEFAULT_DUAL_MAX_PER_ARCHETYPE,
        }
    }
}

impl RangeRules {
    /// # Errors
    ///
    /// Returns an error if either range has its minimum above its maximum.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, (min, max)) in [
            ("mono_range", self.mono_range),
            ("neutral_range", self.neutral_range),
        ] {
            if min > max {
                return Err(ConfigError::InvertedRange { field, min, max });
            }
        }
        Ok(())
    }

    /// A single signpost per archetype means a missing one is its own failure.
    #[must_use]
    pub const fn expects_one_signpost(&self) -> bool {
        self.dual_max_per_archetype == 1
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    MonoCount,
    NeutralCount,
    DualTotal,
    DualsPerArchetype,
    MissingSignpost,
}

/// A cardinality finding. Always collected, never raised.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleViolation {
    pub kind: RuleKind,
    /// Resonance or archetype the rule applies to, or `pool` for global rules
    pub subject: String,
    pub actual: usize,
    pub expected: String,
    pub message: String,
}

/// Run every range rule and report all failures.
///
/// Order is stable: mono counts in topology order, neutral, dual total,
/// then per-archetype dual rules in topology order.
#[must_use]
pub fn validate_ranges(
    catalog: &Catalog,
    topology: &Topology,
    rules: &RangeRules,
) -> Vec<RuleViolation> {
    let mut violations = Vec::new();

    let monos = mono_counts(catalog, topology);
    let (mono_min, mono_max) = rules.mono_range;
    for resonance in topology.resonances() {
        let count = monos.get(resonance).copied().unwrap_or(0);
        if !(mono_min..=mono_max).contains(&count) {
            violations.push(RuleViolation {
                kind: RuleKind::MonoCount,
                subject: resonance.to_string(),
                actual: count,
                expected: format!("{mono_min}..={mono_max}"),
                message: format!(
                    "{resonance} has {count} mono cards; expected between {mono_min} and {mono_max}"
                ),
            });
        }
    }

    let neutrals = neutral_count(catalog);
    let (neutral_min, neutral_max) = rules.neutral_range;
    if !(neutral_min..=neutral_max).contains(&neutrals) {
        violations.push(RuleViolation {
            kind: RuleKind::NeutralCount,
            subject: "pool".to_string(),
            actual: neutrals,
            expected: format!("{neutral_min}..={neutral_max}"),
            message: format!(
                "pool has {neutrals} neutral cards; expected between {neutral_min} and {neutral_max}"
            ),
        });
    }

    let dual_total = catalog.dual_cards().len();
    if dual_total != rules.dual_exact_count {
        violations.push(RuleViolation {
            kind: RuleKind::DualTotal,
            subject: "pool".to_string(),
            actual: dual_total,
            expected: rules.dual_exact_count.to_string(),
            message: format!(
                "pool has {dual_total} dual cards; expected exactly {}",
                rules.dual_exact_count
            ),
        });
    }

    let duals = dual_counts(catalog, topology);
    for archetype in topology.archetypes() {
        let count = duals.get(&archetype.name).copied().unwrap_or(0);
        if count > rules.dual_max_per_archetype {
            violations.push(RuleViolation {
                kind: RuleKind::DualsPerArchetype,
                subject: archetype.name.clone(),
                actual: count,
                expected: format!("<= {}", rules.dual_max_per_archetype),
                message: format!(
                    "{} has {count} dual signposts; at most {} allowed",
                    archetype.name, rules.dual_max_per_archetype
                ),
            });
        } else if count == 0 && rules.expects_one_signpost() {
            violations.push(RuleViolation {
                kind: RuleKind::MissingSignpost,
                subject: archetype.name.clone(),
                actual: 0,
                expected: "1".to_string(),
                message: format!("{} has no dual signpost", archetype.name),
            });
        }
    }

    log::debug!("range pass: {} violations", violations.len());
    violations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CardMeta, CardRecord, ResonanceField};

    fn record(name: String, resonance: ResonanceField) -> CardRecord {
        CardRecord {
            name,
            resonance,
            archetype_tags: Vec::new(),
            subtype: None,
            meta: CardMeta::default(),
        }
    }

    fn small_rules() -> RangeRules {
        RangeRules {
            mono_range: (2, 3),
            neutral_range: (1, 2),
            dual_exact_count: 1,
            dual_max_per_archetype: 1,
        }
    }

    fn build(monos: &[(&str, usize)], neutrals: usize, duals: &[(&str, &str)]) -> Catalog {
        let mut records = Vec::new();
        for (resonance, count) in monos {
            for i in 0..*count {
                records.push(record(
                    format!("{resonance} {i}"),
                    ResonanceField::Single((*resonance).to_string()),
                ));
            }
        }
        for i in 0..neutrals {
            records.push(record(
                format!("Neutral {i}"),
                ResonanceField::Single("neutral".to_string()),
            ));
        }
        for (i, (a, b)) in duals.iter().enumerate() {
            records.push(record(
                format!("Signpost {i}"),
                ResonanceField::Dual {
                    dual: vec![(*a).to_string(), (*b).to_string()],
                },
            ));
        }
        Catalog::load(records).unwrap()
    }

    #[test]
    fn defaults_match_council_targets() {
        let rules = RangeRules::default();
        assert_eq!(rules.mono_range, (38, 45));
        assert_eq!(rules.neutral_range, (15, 25));
        assert_eq!(rules.dual_exact_count, 10);
        assert!(rules.expects_one_signpost());
    }

    #[test]
    fn clean_pool_has_no_violations() {
        let topology = Topology::from_resonances(["Tide", "Ember"]).unwrap();
        let catalog = build(&[("Tide", 2), ("Ember", 3)], 1, &[("Tide", "Ember")]);
        assert!(validate_ranges(&catalog, &topology, &small_rules()).is_empty());
    }

    #[test]
    fn reports_every_failure_without_short_circuit() {
        let topology = Topology::from_resonances(["Tide", "Ember"]).unwrap();
        let catalog = build(
            &[("Tide", 1), ("Ember", 4)],
            0,
            &[("Tide", "Ember"), ("Ember", "Tide")],
        );
        let violations = validate_ranges(&catalog, &topology, &small_rules());
        let kinds: Vec<RuleKind> = violations.iter().map(|v| v.kind).collect();
        assert_eq!(
            kinds,
            vec![
                RuleKind::MonoCount,
                RuleKind::MonoCount,
                RuleKind::NeutralCount,
                RuleKind::DualTotal,
                RuleKind::DualsPerArchetype,
            ]
        );
        assert_eq!(violations[0].subject, "Tide");
        assert_eq!(violations[0].actual, 1);
        assert_eq!(violations[4].actual, 2);
    }

    #[test]
    fn missing_signpost_is_distinct() {
        let topology = Topology::from_resonances(["Tide", "Ember", "Stone"]).unwrap();
        let catalog = build(
            &[("Tide", 2), ("Ember", 2), ("Stone", 2)],
            1,
            &[("Tide", "Ember")],
        );
        let violations = validate_ranges(&catalog, &topology, &small_rules());
        let missing: Vec<&str> = violations
            .iter()
            .filter(|v| v.kind == RuleKind::MissingSignpost)
            .map(|v| v.subject.as_str())
            .collect();
        assert_eq!(missing, vec!["Stone/Tide", "Ember/Stone"]);
    }

    #[test]
    fn missing_signpost_only_applies_to_single_signpost_policy() {
        let topology = Topology::from_resonances(["Tide", "Ember", "Stone"]).unwrap();
        let catalog = build(&[("Tide", 2), ("Ember", 2), ("Stone", 2)], 1, &[]);
        let rules = RangeRules {
            dual_exact_count: 0,
            dual_max_per_archetype: 2,
            ..small_rules()
        };
        assert!(validate_ranges(&catalog, &topology, &rules).is_empty());
    }

    #[test]
    fn inverted_ranges_are_config_errors() {
        let rules = RangeRules {
            neutral_range: (9, 3),
            ..RangeRules::default()
        };
        assert_eq!(
            rules.validate(),
            Err(ConfigError::InvertedRange {
                field: "neutral_range",
                min: 9,
                max: 3
            })
        );
    }
}
