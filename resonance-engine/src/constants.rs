//! Centralized allocation targets for resonance pools.
//!
//! These values mirror the council's stated targets for a full card pool.
//! Every one of them can be overridden through `AuditConfig`; keeping the
//! defaults here means the corpus numbers live in one reviewed place.

// Topology -----------------------------------------------------------------
pub const DEFAULT_RESONANCES: [&str; 5] = ["Ember", "Ruin", "Stone", "Tide", "Zephyr"];
pub(crate) const NEUTRAL_KEYWORD: &str = "neutral";
pub(crate) const PAIR_NAME_SEPARATOR: &str = "/";

// Cardinality --------------------------------------------------------------
pub const DEFAULT_MONO_MIN: usize = 38;
pub const DEFAULT_MONO_MAX: usize = 45;
pub const DEFAULT_NEUTRAL_MIN: usize = 15;
pub const DEFAULT_NEUTRAL_MAX: usize = 25;
pub const DEFAULT_DUAL_EXACT_COUNT: usize = 10;
pub const DEFAULT_DUAL_MAX_PER_ARCHETYPE: usize = 1;

// Tribal -------------------------------------------------------------------
pub const DEFAULT_TRIBAL_THRESHOLD: f64 = 0.65;

// Reporting ----------------------------------------------------------------
pub(crate) const UNSPECIFIED_RARITY: &str = "unspecified";
