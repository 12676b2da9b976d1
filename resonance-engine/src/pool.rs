//! Pool arithmetic: mono counts, neutral count, and accessible pools.
//!
//! Nothing here judges whether a number is acceptable; the cardinality
//! validator owns that.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::catalog::{Card, Catalog};
use crate::constants::UNSPECIFIED_RARITY;
use crate::resonance::{Resonance, ResonanceAssignment, ResonancePair};
use crate::topology::{Archetype, Topology};

/// Every card a drafter of one archetype can legally pick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessiblePool {
    pub archetype: String,
    pub pair: ResonancePair,
    pub count: usize,
    /// Card names in catalog order.
    pub cards: Vec<String>,
}

impl AccessiblePool {
    #[must_use]
    pub fn contains(&self, card: &str) -> bool {
        self.cards.iter().any(|name| name == card)
    }
}

/// Mono X, mono Y, duals on exactly {X, Y}, and every neutral card.
#[must_use]
pub fn accessible_pool(catalog: &Catalog, archetype: &Archetype) -> AccessiblePool {
    let cards: Vec<String> = catalog
        .iter()
        .filter(|card| card.resonance.accessible_to(&archetype.pair))
        .map(|card| card.name.clone())
        .collect();
    AccessiblePool {
        archetype: archetype.name.clone(),
        pair: archetype.pair.clone(),
        count: cards.len(),
        cards,
    }
}

/// Accessible pools for every archetype, in topology order.
#[must_use]
pub fn all_pools(catalog: &Catalog, topology: &Topology) -> Vec<AccessiblePool> {
    let pools: Vec<AccessiblePool> = topology
        .archetypes()
        .iter()
        .map(|archetype| accessible_pool(catalog, archetype))
        .collect();
    log::debug!("pool pass: {} archetype pools computed", pools.len());
    pools
}

/// Mono card count per resonance.
///
/// Every configured resonance is present, zero included. Mono cards naming a
/// resonance outside the topology are counted under their own key.
#[must_use]
pub fn mono_counts(catalog: &Catalog, topology: &Topology) -> BTreeMap<Resonance, usize> {
    let mut counts: BTreeMap<Resonance, usize> = topology
        .resonances()
        .iter()
        .map(|resonance| (resonance.clone(), 0))
        .collect();
    for card in catalog {
        if let ResonanceAssignment::Mono(resonance) = &card.resonance {
            *counts.entry(resonance.clone()).or_insert(0) += 1;
        }
    }
    counts
}

#[must_use]
pub fn neutral_count(catalog: &Catalog) -> usize {
    catalog
        .iter()
        .filter(|card| card.resonance.is_neutral())
        .count()
}

/// Dual card count per archetype name; archetypes without duals map to zero.
///
/// Duals on a pair outside the topology have no archetype and are skipped
/// here; they still count toward the dual total.
#[must_use]
pub fn dual_counts(catalog: &Catalog, topology: &Topology) -> BTreeMap<String, usize> {
    let mut counts: BTreeMap<String, usize> = topology
        .archetypes()
        .iter()
        .map(|archetype| (archetype.name.clone(), 0))
        .collect();
    for card in catalog {
        let ResonanceAssignment::Dual(pair) = &card.resonance else {
            continue;
        };
        if let Some(archetype) = topology.archetype_for_pair(pair) {
            *counts.entry(archetype.name.clone()).or_insert(0) += 1;
        }
    }
    counts
}

/// Mono cards on a resonance outside the topology, and duals on a pair that
/// is not an archetype, in catalog order.
#[must_use]
pub fn off_topology_cards<'a>(catalog: &'a Catalog, topology: &Topology) -> Vec<&'a Card> {
    catalog
        .iter()
        .filter(|card| match &card.resonance {
            ResonanceAssignment::Mono(resonance) => !topology.contains(resonance),
            ResonanceAssignment::Dual(pair) => topology.archetype_for_pair(pair).is_none(),
            ResonanceAssignment::Neutral => false,
        })
        .collect()
}

/// Card counts keyed by resonance group (`Tide`, `Ember+Tide`, `neutral`)
/// then by rarity. Rarity is metadata only and is never validated.
#[must_use]
pub fn rarity_breakdown(catalog: &Catalog) -> BTreeMap<String, BTreeMap<String, usize>> {
    let mut breakdown: BTreeMap<String, BTreeMap<String, usize>> = BTreeMap::new();
    for card in catalog {
        let rarity = card
            .meta
            .rarity
            .clone()
            .unwrap_or_else(|| UNSPECIFIED_RARITY.to_string());
        *breakdown
            .entry(card.resonance.group_label())
            .or_default()
            .entry(rarity)
            .or_insert(0) += 1;
    }
    breakdown
}
