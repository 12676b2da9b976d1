//! Differences between two allocation rounds.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::catalog::Catalog;
use crate::resonance::ResonanceAssignment;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reassignment {
    pub name: String,
    pub from: ResonanceAssignment,
    pub to: ResonanceAssignment,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Retag {
    pub name: String,
    pub added_tags: Vec<String>,
    pub removed_tags: Vec<String>,
}

/// What changed between a previous round and the current one. Every list is
/// sorted by card name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CatalogDiff {
    pub added: Vec<String>,
    pub removed: Vec<String>,
    pub reassigned: Vec<Reassignment>,
    pub retagged: Vec<Retag>,
}

impl CatalogDiff {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.added.is_empty()
            && self.removed.is_empty()
            && self.reassigned.is_empty()
            && self.retagged.is_empty()
    }
}

#[must_use]
pub fn diff_catalogs(previous: &Catalog, current: &Catalog) -> CatalogDiff {
    let before: BTreeSet<&str> = previous.iter().map(|card| card.name.as_str()).collect();
    let after: BTreeSet<&str> = current.iter().map(|card| card.name.as_str()).collect();

    let mut diff = CatalogDiff {
        added: after.difference(&before).map(|s| (*s).to_string()).collect(),
        removed: before.difference(&after).map(|s| (*s).to_string()).collect(),
        ..CatalogDiff::default()
    };

    for name in before.intersection(&after) {
        let (Some(old), Some(new)) = (previous.get(name), current.get(name)) else {
            continue;
        };
        if old.resonance != new.resonance {
            diff.reassigned.push(Reassignment {
                name: (*name).to_string(),
                from: old.resonance.clone(),
                to: new.resonance.clone(),
            });
        }
        let old_tags: BTreeSet<&String> = old.archetype_tags.iter().collect();
        let new_tags: BTreeSet<&String> = new.archetype_tags.iter().collect();
        if old_tags != new_tags {
            diff.retagged.push(Retag {
                name: (*name).to_string(),
                added_tags: new_tags.difference(&old_tags).map(|t| (*t).clone()).collect(),
                removed_tags: old_tags.difference(&new_tags).map(|t| (*t).clone()).collect(),
            });
        }
    }
    log::debug!(
        "round diff: +{} -{} ~{} reassigned, {} retagged",
        diff.added.len(),
        diff.removed.len(),
        diff.reassigned.len(),
        diff.retagged.len()
    );
    diff
}
