//! Archetype tag accessibility.
//!
//! A tag is a claim that a card serves an archetype. The claim holds only
//! when the archetype's drafter can actually pick the card: a mono card must
//! sit inside the archetype's pair, a dual card must be that exact pair, and
//! neutral cards satisfy every claim.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::catalog::{Card, Catalog};
use crate::topology::{Archetype, Topology};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TagViolationKind {
    /// Mono card tagged for an archetype whose pair excludes its resonance
    OutsidePair,
    /// Dual card tagged for any archetype other than its own pair
    DualMismatch,
    /// Tag names no archetype in the topology
    UnknownArchetype,
}

/// A (card, tag) claim the card cannot structurally deliver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagViolation {
    pub card: String,
    pub archetype: String,
    pub kind: TagViolationKind,
    pub reason: String,
}

/// Check every tag on every card against the current snapshot.
///
/// Violations come back in catalog order, then tag order. A tag repeated on
/// one card is reported once.
#[must_use]
pub fn find_tag_violations(catalog: &Catalog, topology: &Topology) -> Vec<TagViolation> {
    let mut violations = Vec::new();
    for card in catalog {
        let mut seen = HashSet::new();
        for tag in &card.archetype_tags {
            if !seen.insert(tag.as_str()) {
                continue;
            }
            if let Some(violation) = check_tag(card, tag, topology) {
                violations.push(violation);
            }
        }
    }
    log::debug!(
        "tag pass: {} cards checked, {} violations",
        catalog.len(),
        violations.len()
    );
    violations
}

fn check_tag(card: &Card, tag: &str, topology: &Topology) -> Option<TagViolation> {
    if card.resonance.is_neutral() {
        return None;
    }
    let Some(archetype) = topology.archetype(tag) else {
        return Some(TagViolation {
            card: card.name.clone(),
            archetype: tag.to_string(),
            kind: TagViolationKind::UnknownArchetype,
            reason: format!("archetype {tag} is not defined by the configured resonances"),
        });
    };
    if card.resonance.accessible_to(&archetype.pair) {
        return None;
    }
    let kind = if card.resonance.is_dual() {
        TagViolationKind::DualMismatch
    } else {
        TagViolationKind::OutsidePair
    };
    Some(TagViolation {
        card: card.name.clone(),
        archetype: archetype.name.clone(),
        kind,
        reason: structural_reason(card, archetype),
    })
}

fn structural_reason(card: &Card, archetype: &Archetype) -> String {
    format!(
        "archetype {} requires resonances {}; card's resonance {} does not include them",
        archetype.name,
        archetype.pair,
        card.resonance.set_label()
    )
}
