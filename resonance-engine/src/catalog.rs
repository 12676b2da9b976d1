//! Immutable card snapshots.
//!
//! A `Catalog` is one allocation round. It is loaded once from raw records
//! and never mutated; a revised round is a new catalog.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::error::SchemaError;
use crate::resonance::{Resonance, ResonanceAssignment, ResonancePair};

/// The `resonance` field of a raw record.
///
/// Accepts `"Tide"`, `"neutral"`, `{"dual": ["Tide", "Ember"]}`, or a plain
/// list of one or two names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResonanceField {
    Single(String),
    Dual { dual: Vec<String> },
    List(Vec<String>),
}

/// Metadata carried through for reporting but never validated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct CardMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rarity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// One card as it arrives from the catalog source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardRecord {
    pub name: String,
    pub resonance: ResonanceField,
    #[serde(default)]
    pub archetype_tags: Vec<String>,
    #[serde(default)]
    pub subtype: Option<String>,
    #[serde(flatten)]
    pub meta: CardMeta,
}

/// A validated card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub name: String,
    pub resonance: ResonanceAssignment,
    pub archetype_tags: Vec<String>,
    pub subtype: Option<String>,
    #[serde(default)]
    pub meta: CardMeta,
}

impl Card {
    #[must_use]
    pub fn has_tag(&self, archetype: &str) -> bool {
        self.archetype_tags.iter().any(|tag| tag == archetype)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Catalog {
    cards: Vec<Card>,
    index: HashMap<String, usize>,
}

impl Catalog {
    /// Validate raw records into a catalog snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first offending record if a card name is
    /// blank or repeated, or if a resonance assignment names zero, more than
    /// two, or two identical resonances.
    pub fn load<I>(records: I) -> Result<Self, SchemaError>
    where
        I: IntoIterator<Item = CardRecord>,
    {
        let mut cards = Vec::new();
        let mut index = HashMap::new();
        for (idx, record) in records.into_iter().enumerate() {
            let card = validate_record(idx, record)?;
            if let Some(&first) = index.get(&card.name) {
                return Err(SchemaError::DuplicateName {
                    index: idx,
                    name: card.name,
                    first,
                });
            }
            index.insert(card.name.clone(), idx);
            cards.push(card);
        }
        let catalog = Self { cards, index };
        log::info!(
            "catalog loaded: {} cards ({} dual, {} neutral)",
            catalog.len(),
            catalog.dual_cards().len(),
            catalog.neutral_cards().len()
        );
        Ok(catalog)
    }

    /// Load catalog records from a JSON array.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed into records or any
    /// record fails validation.
    pub fn from_json(json: &str) -> Result<Self, SchemaError> {
        let records: Vec<CardRecord> =
            serde_json::from_str(json).map_err(|err| SchemaError::Parse(err.to_string()))?;
        Self::load(records)
    }

    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Card> {
        self.index.get(name).map(|&idx| &self.cards[idx])
    }

    /// Mono cards of one resonance.
    #[must_use]
    pub fn by_resonance(&self, resonance: &Resonance) -> Vec<&Card> {
        self.cards
            .iter()
            .filter(|card| matches!(&card.resonance, ResonanceAssignment::Mono(r) if r == resonance))
            .collect()
    }

    #[must_use]
    pub fn by_archetype_tag(&self, archetype: &str) -> Vec<&Card> {
        self.cards
            .iter()
            .filter(|card| card.has_tag(archetype))
            .collect()
    }

    #[must_use]
    pub fn dual_cards(&self) -> Vec<&Card> {
        self.cards
            .iter()
            .filter(|card| card.resonance.is_dual())
            .collect()
    }

    #[must_use]
    pub fn neutral_cards(&self) -> Vec<&Card> {
        self.cards
            .iter()
            .filter(|card| card.resonance.is_neutral())
            .collect()
    }

    /// Distinct subtypes in sorted order.
    #[must_use]
    pub fn subtypes(&self) -> Vec<&str> {
        self.cards
            .iter()
            .filter_map(|card| card.subtype.as_deref())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Card> {
        self.cards.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a Card;
    type IntoIter = std::slice::Iter<'a, Card>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

fn validate_record(index: usize, record: CardRecord) -> Result<Card, SchemaError> {
    let name = record.name.trim().to_string();
    if name.is_empty() {
        return Err(SchemaError::BlankName { index });
    }
    let resonance = parse_assignment(index, &name, record.resonance)?;
    let archetype_tags = record
        .archetype_tags
        .into_iter()
        .map(|tag| tag.trim().to_string())
        .filter(|tag| !tag.is_empty())
        .collect();
    let subtype = record
        .subtype
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());
    Ok(Card {
        name,
        resonance,
        archetype_tags,
        subtype,
        meta: record.meta,
    })
}

fn parse_assignment(
    index: usize,
    name: &str,
    field: ResonanceField,
) -> Result<ResonanceAssignment, SchemaError> {
    let (names, explicit_dual) = match field {
        ResonanceField::Single(value) => (vec![value], false),
        ResonanceField::Dual { dual } => (dual, true),
        ResonanceField::List(values) => (values, false),
    };

    let resonances: Vec<Resonance> = names.into_iter().map(Resonance::new).collect();
    if resonances.iter().any(Resonance::is_neutral_keyword) {
        if resonances.len() == 1 && !explicit_dual {
            return Ok(ResonanceAssignment::Neutral);
        }
        return Err(SchemaError::NeutralInPair {
            index,
            name: name.to_string(),
        });
    }
    if resonances.iter().any(Resonance::is_blank) {
        return Err(SchemaError::BlankResonance {
            index,
            name: name.to_string(),
        });
    }
    match resonances.as_slice() {
        [] => Err(SchemaError::NoResonance {
            index,
            name: name.to_string(),
        }),
        [single] if !explicit_dual => Ok(ResonanceAssignment::Mono(single.clone())),
        _ if explicit_dual && resonances.len() != 2 => Err(SchemaError::DualNeedsTwo {
            index,
            name: name.to_string(),
            count: resonances.len(),
        }),
        [a, b] => ResonancePair::new(a.clone(), b.clone())
            .map(ResonanceAssignment::Dual)
            .ok_or_else(|| SchemaError::RepeatedDualResonance {
                index,
                name: name.to_string(),
                resonance: a.to_string(),
            }),
        _ => Err(SchemaError::TooManyResonances {
            index,
            name: name.to_string(),
            count: resonances.len(),
        }),
    }
}
