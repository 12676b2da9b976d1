//! Tribal home-pair concentration.
//!
//! Measures how much of a subtype lives inside its intended archetype.
//! Whether the measurement is good enough is the caller's decision.

use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::error::ConfigError;
use crate::numbers::ratio;
use crate::topology::{Archetype, Topology};

/// A subtype and the archetype it is supposed to call home.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TribeSpec {
    pub subtype: String,
    pub home_archetype: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TribalRatio {
    pub subtype: String,
    pub home_archetype: String,
    pub total: usize,
    pub home_count: usize,
    /// `None` when the subtype has no members
    pub ratio: Option<f64>,
}

impl TribalRatio {
    /// Whether the ratio reaches `threshold`; `None` when there is no data.
    #[must_use]
    pub fn meets(&self, threshold: f64) -> Option<bool> {
        self.ratio.map(|value| value >= threshold)
    }
}

/// Share of `subtype` members that are mono in either home resonance or dual
/// on exactly the home pair. Neutral members count toward the total only.
#[must_use]
pub fn tribal_home_ratio(catalog: &Catalog, subtype: &str, home: &Archetype) -> TribalRatio {
    let members: Vec<_> = catalog
        .iter()
        .filter(|card| card.subtype.as_deref() == Some(subtype))
        .collect();
    let total = members.len();
    let home_count = members
        .iter()
        .filter(|card| card.resonance.is_home_in(&home.pair))
        .count();
    TribalRatio {
        subtype: subtype.to_string(),
        home_archetype: home.name.clone(),
        total,
        home_count,
        ratio: ratio(home_count, total),
    }
}

/// Measure every configured tribe.
///
/// # Errors
///
/// Returns an error if a tribe names a home archetype the topology lacks.
pub fn analyze_tribes(
    catalog: &Catalog,
    topology: &Topology,
    tribes: &[TribeSpec],
) -> Result<Vec<TribalRatio>, ConfigError> {
    let results = tribes
        .iter()
        .map(|tribe| {
            let home = topology.archetype(&tribe.home_archetype).ok_or_else(|| {
                ConfigError::UnknownArchetype {
                    subtype: tribe.subtype.clone(),
                    archetype: tribe.home_archetype.clone(),
                }
            })?;
            Ok(tribal_home_ratio(catalog, &tribe.subtype, home))
        })
        .collect::<Result<Vec<_>, ConfigError>>()?;
    log::debug!("tribal pass: {} tribes measured", results.len());
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CardMeta, CardRecord, ResonanceField};

    fn member(name: &str, resonance: ResonanceField, subtype: &str) -> CardRecord {
        CardRecord {
            name: name.to_string(),
            resonance,
            archetype_tags: Vec::new(),
            subtype: Some(subtype.to_string()),
            meta: CardMeta::default(),
        }
    }

    fn single(value: &str) -> ResonanceField {
        ResonanceField::Single(value.to_string())
    }

    fn topology() -> Topology {
        Topology::from_resonances(["Stone", "Ember", "Tide"]).unwrap()
    }

    #[test]
    fn counts_mono_and_exact_dual_as_home() {
        let catalog = Catalog::load(vec![
            member("Stone Warrior", single("Stone"), "Warrior"),
            member("Ember Warrior", single("Ember"), "Warrior"),
            member(
                "Forge Warrior",
                ResonanceField::Dual {
                    dual: vec!["Ember".into(), "Stone".into()],
                },
                "Warrior",
            ),
            member(
                "Reef Warrior",
                ResonanceField::Dual {
                    dual: vec!["Ember".into(), "Tide".into()],
                },
                "Warrior",
            ),
            member("Tide Warrior", single("Tide"), "Warrior"),
        ])
        .unwrap();
        let topology = topology();
        let home = topology.archetype("Ember/Stone").unwrap();
        let result = tribal_home_ratio(&catalog, "Warrior", home);
        assert_eq!(result.total, 5);
        assert_eq!(result.home_count, 3);
        assert!((result.ratio.unwrap() - 0.6).abs() < 1e-9);
        assert_eq!(result.meets(0.65), Some(false));
    }

    #[test]
    fn neutral_members_dilute_but_never_count_home() {
        let catalog = Catalog::load(vec![
            member("Stone Warrior", single("Stone"), "Warrior"),
            member("Boundless Wanderer", single("neutral"), "Warrior"),
        ])
        .unwrap();
        let topology = topology();
        let home = topology.archetype("Ember/Stone").unwrap();
        let result = tribal_home_ratio(&catalog, "Warrior", home);
        assert_eq!(result.total, 2);
        assert_eq!(result.home_count, 1);
        assert_eq!(result.ratio, Some(0.5));
    }

    #[test]
    fn empty_subtype_has_no_ratio() {
        let catalog = Catalog::empty();
        let topology = topology();
        let home = topology.archetype("Ember/Stone").unwrap();
        let result = tribal_home_ratio(&catalog, "Survivor", home);
        assert_eq!(result.total, 0);
        assert!(result.ratio.is_none());
        assert!(result.meets(0.65).is_none());
    }

    #[test]
    fn analyze_tribes_rejects_unknown_home() {
        let tribes = vec![TribeSpec {
            subtype: "Spirit Animal".to_string(),
            home_archetype: "Verdant".to_string(),
        }];
        let err = analyze_tribes(&Catalog::empty(), &topology(), &tribes).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownArchetype { .. }));
    }
}
