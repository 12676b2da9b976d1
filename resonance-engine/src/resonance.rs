//! Resonance names, unordered pairs, and a card's resonance assignment.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::NEUTRAL_KEYWORD;

/// A named card-pool category (a "color").
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Resonance(String);

impl Resonance {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let trimmed = name.trim();
        if trimmed.len() == name.len() {
            Self(name)
        } else {
            Self(trimmed.to_string())
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.0.is_empty()
    }

    /// True for the reserved `neutral` marker, which is never a resonance.
    #[must_use]
    pub fn is_neutral_keyword(&self) -> bool {
        self.0.eq_ignore_ascii_case(NEUTRAL_KEYWORD)
    }
}

impl From<&str> for Resonance {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl fmt::Display for Resonance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Two distinct resonances, stored in canonical (sorted) order so that
/// `{Tide, Ember}` and `{Ember, Tide}` compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ResonancePair {
    first: Resonance,
    second: Resonance,
}

impl ResonancePair {
    /// Build a pair, returning `None` when both sides name the same resonance.
    #[must_use]
    pub fn new(a: Resonance, b: Resonance) -> Option<Self> {
        match a.cmp(&b) {
            std::cmp::Ordering::Less => Some(Self {
                first: a,
                second: b,
            }),
            std::cmp::Ordering::Greater => Some(Self {
                first: b,
                second: a,
            }),
            std::cmp::Ordering::Equal => None,
        }
    }

    #[must_use]
    pub const fn first(&self) -> &Resonance {
        &self.first
    }

    #[must_use]
    pub const fn second(&self) -> &Resonance {
        &self.second
    }

    #[must_use]
    pub fn contains(&self, resonance: &Resonance) -> bool {
        &self.first == resonance || &self.second == resonance
    }

    #[must_use]
    pub const fn members(&self) -> [&Resonance; 2] {
        [&self.first, &self.second]
    }
}

impl fmt::Display for ResonancePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}, {}}}", self.first, self.second)
    }
}

/// How a card sits in the resonance system.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResonanceAssignment {
    /// Exactly one resonance
    Mono(Resonance),
    /// Exactly one pair; the card is the signpost of that pair's archetype
    Dual(ResonancePair),
    /// Colorless; accessible to every archetype
    Neutral,
}

impl ResonanceAssignment {
    #[must_use]
    pub const fn is_mono(&self) -> bool {
        matches!(self, Self::Mono(_))
    }

    #[must_use]
    pub const fn is_dual(&self) -> bool {
        matches!(self, Self::Dual(_))
    }

    #[must_use]
    pub const fn is_neutral(&self) -> bool {
        matches!(self, Self::Neutral)
    }

    /// Whether a drafter of the archetype built on `pair` can pick this card.
    #[must_use]
    pub fn accessible_to(&self, pair: &ResonancePair) -> bool {
        match self {
            Self::Mono(resonance) => pair.contains(resonance),
            Self::Dual(own) => own == pair,
            Self::Neutral => true,
        }
    }

    /// Whether this card lives inside `pair`. Neutral cards are never home to
    /// any archetype even though they are accessible to all of them.
    #[must_use]
    pub fn is_home_in(&self, pair: &ResonancePair) -> bool {
        match self {
            Self::Neutral => false,
            other => other.accessible_to(pair),
        }
    }

    /// Every resonance the assignment names.
    #[must_use]
    pub fn resonances(&self) -> Vec<&Resonance> {
        match self {
            Self::Mono(resonance) => vec![resonance],
            Self::Dual(pair) => pair.members().to_vec(),
            Self::Neutral => Vec::new(),
        }
    }

    /// Set notation used in violation messages, e.g. `{Stone}`.
    #[must_use]
    pub fn set_label(&self) -> String {
        match self {
            Self::Mono(resonance) => format!("{{{resonance}}}"),
            Self::Dual(pair) => pair.to_string(),
            Self::Neutral => "{neutral}".to_string(),
        }
    }

    /// Short grouping key, e.g. `Tide`, `Ember+Tide`, `neutral`.
    #[must_use]
    pub fn group_label(&self) -> String {
        match self {
            Self::Mono(resonance) => resonance.to_string(),
            Self::Dual(pair) => format!("{}+{}", pair.first(), pair.second()),
            Self::Neutral => NEUTRAL_KEYWORD.to_string(),
        }
    }
}

impl fmt::Display for ResonanceAssignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mono(resonance) => write!(f, "mono {resonance}"),
            Self::Dual(pair) => write!(f, "dual {pair}"),
            Self::Neutral => f.write_str("neutral"),
        }
    }
}
