//! The closed resonance set and the archetypes it induces.
//!
//! Every unordered pair of configured resonances is an archetype, so `n`
//! resonances always yield `n * (n - 1) / 2` archetypes. Callers may name
//! any of them; unnamed pairs get a canonical `Ember/Tide` style name.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};

use crate::constants::{DEFAULT_RESONANCES, PAIR_NAME_SEPARATOR};
use crate::error::ConfigError;
use crate::resonance::{Resonance, ResonancePair};

/// A named two-resonance draft strategy.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Archetype {
    pub name: String,
    pub pair: ResonancePair,
}

impl Archetype {
    #[must_use]
    pub const fn resonances(&self) -> &ResonancePair {
        &self.pair
    }

    fn canonical_name(pair: &ResonancePair) -> String {
        format!("{}{PAIR_NAME_SEPARATOR}{}", pair.first(), pair.second())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topology {
    resonances: Vec<Resonance>,
    archetypes: Vec<Archetype>,
    by_name: HashMap<String, usize>,
    by_pair: HashMap<ResonancePair, usize>,
}

impl Topology {
    /// Build a topology from resonance names and optional archetype names.
    ///
    /// `names` maps an archetype name to the two resonances it pairs.
    ///
    /// # Errors
    ///
    /// Returns an error if fewer than two distinct resonances are supplied,
    /// if a resonance repeats or is blank, or if a supplied archetype name
    /// does not correspond to exactly one pair of configured resonances.
    pub fn new<I, S>(resonances: I, names: &BTreeMap<String, Vec<String>>) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let resonances = collect_resonances(resonances)?;
        let mut pair_names: HashMap<ResonancePair, String> = HashMap::new();
        for (name, members) in names {
            let pair = resolve_named_pair(name, members, &resonances)?;
            if let Some(existing) = pair_names.get(&pair) {
                return Err(ConfigError::PairNamedTwice {
                    pair: pair.to_string(),
                    first: existing.clone(),
                    second: name.clone(),
                });
            }
            pair_names.insert(pair, name.trim().to_string());
        }

        let mut archetypes = Vec::with_capacity(resonances.len() * (resonances.len() - 1) / 2);
        for (i, a) in resonances.iter().enumerate() {
            for b in &resonances[i + 1..] {
                let Some(pair) = ResonancePair::new(a.clone(), b.clone()) else {
                    continue;
                };
                let name = pair_names
                    .remove(&pair)
                    .unwrap_or_else(|| Archetype::canonical_name(&pair));
                archetypes.push(Archetype { name, pair });
            }
        }
        debug_assert_eq!(
            archetypes.len(),
            resonances.len() * (resonances.len() - 1) / 2
        );

        let mut by_name = HashMap::with_capacity(archetypes.len());
        let mut by_pair = HashMap::with_capacity(archetypes.len());
        for (idx, archetype) in archetypes.iter().enumerate() {
            if by_name.insert(archetype.name.clone(), idx).is_some() {
                return Err(ConfigError::DuplicateArchetypeName {
                    name: archetype.name.clone(),
                });
            }
            by_pair.insert(archetype.pair.clone(), idx);
        }

        log::debug!(
            "topology: {} resonances, {} archetypes",
            resonances.len(),
            archetypes.len()
        );
        Ok(Self {
            resonances,
            archetypes,
            by_name,
            by_pair,
        })
    }

    /// Build a topology where every archetype carries its canonical name.
    ///
    /// # Errors
    ///
    /// See [`Topology::new`].
    pub fn from_resonances<I, S>(resonances: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(resonances, &BTreeMap::new())
    }

    #[must_use]
    pub fn resonances(&self) -> &[Resonance] {
        &self.resonances
    }

    #[must_use]
    pub fn archetypes(&self) -> &[Archetype] {
        &self.archetypes
    }

    #[must_use]
    pub fn archetype(&self, name: &str) -> Option<&Archetype> {
        self.by_name
            .get(name.trim())
            .map(|&idx| &self.archetypes[idx])
    }

    #[must_use]
    pub fn archetype_for_pair(&self, pair: &ResonancePair) -> Option<&Archetype> {
        self.by_pair.get(pair).map(|&idx| &self.archetypes[idx])
    }

    #[must_use]
    pub fn contains(&self, resonance: &Resonance) -> bool {
        self.resonances.contains(resonance)
    }
}

impl Default for Topology {
    fn default() -> Self {
        // The built-in resonance list is distinct and has more than two members.
        Self::from_resonances(DEFAULT_RESONANCES).unwrap_or_else(|_| Self {
            resonances: Vec::new(),
            archetypes: Vec::new(),
            by_name: HashMap::new(),
            by_pair: HashMap::new(),
        })
    }
}

fn collect_resonances<I, S>(resonances: I) -> Result<Vec<Resonance>, ConfigError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for raw in resonances {
        let resonance = Resonance::new(raw);
        if resonance.is_blank() {
            return Err(ConfigError::BlankResonance);
        }
        if resonance.is_neutral_keyword() {
            return Err(ConfigError::ReservedResonance {
                resonance: resonance.to_string(),
            });
        }
        if !seen.insert(resonance.clone()) {
            return Err(ConfigError::DuplicateResonance {
                resonance: resonance.to_string(),
            });
        }
        out.push(resonance);
    }
    if out.len() < 2 {
        return Err(ConfigError::TooFewResonances { count: out.len() });
    }
    Ok(out)
}

fn resolve_named_pair(
    name: &str,
    members: &[String],
    resonances: &[Resonance],
) -> Result<ResonancePair, ConfigError> {
    let unknown = || ConfigError::UnknownArchetypePair {
        name: name.to_string(),
        resonances: members.to_vec(),
    };
    let [a, b] = members else {
        return Err(unknown());
    };
    let (a, b) = (Resonance::new(a.as_str()), Resonance::new(b.as_str()));
    if !resonances.contains(&a) || !resonances.contains(&b) {
        return Err(unknown());
    }
    ResonancePair::new(a, b).ok_or_else(unknown)
}
