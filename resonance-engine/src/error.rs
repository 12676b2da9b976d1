//! Fatal load-time errors.
//!
//! Findings such as tag or range violations are data, not errors; they live
//! in their analyzer modules. Everything here aborts a run before analysis.

use thiserror::Error;

/// A malformed catalog record.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("catalog could not be parsed: {0}")]
    Parse(String),
    #[error("record {index} has a blank card name")]
    BlankName { index: usize },
    #[error("record {index} duplicates card name {name:?} (first seen at record {first})")]
    DuplicateName {
        index: usize,
        name: String,
        first: usize,
    },
    #[error("record {index} ({name}) lists no resonance; use \"neutral\" for colorless cards")]
    NoResonance { index: usize, name: String },
    #[error("record {index} ({name}) lists {count} resonances; a card carries at most two")]
    TooManyResonances {
        index: usize,
        name: String,
        count: usize,
    },
    #[error("record {index} ({name}) is dual but names {count} resonances instead of two")]
    DualNeedsTwo {
        index: usize,
        name: String,
        count: usize,
    },
    #[error("record {index} ({name}) is dual but names {resonance} twice")]
    RepeatedDualResonance {
        index: usize,
        name: String,
        resonance: String,
    },
    #[error("record {index} ({name}) has a blank resonance name")]
    BlankResonance { index: usize, name: String },
    #[error("record {index} ({name}) combines \"neutral\" with other resonances")]
    NeutralInPair { index: usize, name: String },
}

impl SchemaError {
    /// Index of the offending record, when the error points at one.
    #[must_use]
    pub const fn record_index(&self) -> Option<usize> {
        match self {
            Self::Parse(_) => None,
            Self::BlankName { index }
            | Self::DuplicateName { index, .. }
            | Self::NoResonance { index, .. }
            | Self::TooManyResonances { index, .. }
            | Self::DualNeedsTwo { index, .. }
            | Self::RepeatedDualResonance { index, .. }
            | Self::BlankResonance { index, .. }
            | Self::NeutralInPair { index, .. } => Some(*index),
        }
    }
}

/// Malformed or contradictory configuration.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("config could not be parsed: {0}")]
    Parse(String),
    #[error("at least two resonances are required to form an archetype (got {count})")]
    TooFewResonances { count: usize },
    #[error("resonance {resonance} is listed more than once")]
    DuplicateResonance { resonance: String },
    #[error("resonance names must not be blank")]
    BlankResonance,
    #[error("{resonance} is reserved for neutral cards and cannot be a resonance")]
    ReservedResonance { resonance: String },
    #[error("archetype {name} must name two distinct configured resonances (got {resonances:?})")]
    UnknownArchetypePair {
        name: String,
        resonances: Vec<String>,
    },
    #[error("archetype name {name} is used for more than one pair")]
    DuplicateArchetypeName { name: String },
    #[error("pair {pair} is named both {first} and {second}")]
    PairNamedTwice {
        pair: String,
        first: String,
        second: String,
    },
    #[error("{field} minimum {min} exceeds maximum {max}")]
    InvertedRange {
        field: &'static str,
        min: usize,
        max: usize,
    },
    #[error("tribal threshold must be between 0.00 and 1.00 (got {value:.2})")]
    ThresholdOutOfRange { value: f64 },
    #[error("tribe {subtype} names unknown home archetype {archetype}")]
    UnknownArchetype { subtype: String, archetype: String },
}
