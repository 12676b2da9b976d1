//! Resonance Allocation Engine
//!
//! Platform-agnostic bookkeeping over a card catalog: per-resonance counts,
//! archetype pool sizes, tag accessibility, range rules, and tribal
//! concentration. This crate performs no I/O; loading and rendering belong
//! to the caller.

pub mod cardinality;
pub mod catalog;
pub mod config;
pub mod constants;
pub mod diff;
pub mod error;
pub mod numbers;
pub mod pool;
pub mod report;
pub mod resonance;
pub mod tags;
pub mod topology;
pub mod tribal;

// Re-export commonly used types
pub use cardinality::{RangeRules, RuleKind, RuleViolation, validate_ranges};
pub use catalog::{Card, CardMeta, CardRecord, Catalog, ResonanceField};
pub use config::AuditConfig;
pub use diff::{CatalogDiff, Reassignment, Retag, diff_catalogs};
pub use error::{ConfigError, SchemaError};
pub use pool::{
    AccessiblePool, accessible_pool, all_pools, dual_counts, mono_counts, neutral_count,
    off_topology_cards, rarity_breakdown,
};
pub use report::{AuditReport, PoolSummary, ReportSummary, ResonanceCount, TribalFinding};
pub use resonance::{Resonance, ResonanceAssignment, ResonancePair};
pub use tags::{TagViolation, TagViolationKind, find_tag_violations};
pub use topology::{Archetype, Topology};
pub use tribal::{TribalRatio, TribeSpec, analyze_tribes, tribal_home_ratio};

/// Trait for abstracting catalog loading operations
/// Platform-specific implementations should provide this
pub trait CatalogSource {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load the raw records of the round under audit
    ///
    /// # Errors
    ///
    /// Returns an error if the records cannot be read or decoded.
    fn load_records(&self) -> Result<Vec<CardRecord>, Self::Error>;

    /// Load the audit configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be read or decoded.
    fn load_config(&self) -> Result<AuditConfig, Self::Error>;

    /// Load the records of the previous round, if the source has one
    ///
    /// # Errors
    ///
    /// Returns an error if a previous round exists but cannot be read.
    fn load_previous_records(&self) -> Result<Option<Vec<CardRecord>>, Self::Error> {
        Ok(None)
    }
}

/// Everything that can stop an audit before analysis starts.
#[derive(Debug, thiserror::Error)]
pub enum AuditError<E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    #[error("catalog source failed: {0}")]
    Source(#[source] E),
    #[error(transparent)]
    Schema(#[from] SchemaError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Runs audits against a catalog source
pub struct AuditEngine<S>
where
    S: CatalogSource,
{
    source: S,
}

impl<S> AuditEngine<S>
where
    S: CatalogSource,
{
    /// Create a new engine reading from the provided source
    pub const fn new(source: S) -> Self {
        Self { source }
    }

    /// Load and validate configuration and topology, including tribe homes
    ///
    /// # Errors
    ///
    /// Returns an error if the source fails or the configuration is invalid.
    pub fn load_setup(&self) -> Result<(AuditConfig, Topology), AuditError<S::Error>> {
        let config = self.source.load_config().map_err(AuditError::Source)?;
        config.validate()?;
        let topology = config.topology()?;
        Ok((config, topology))
    }

    /// Load the current round as an immutable snapshot
    ///
    /// # Errors
    ///
    /// Returns an error if the source fails or a record is malformed.
    pub fn load_catalog(&self) -> Result<Catalog, AuditError<S::Error>> {
        let records = self.source.load_records().map_err(AuditError::Source)?;
        Ok(Catalog::load(records)?)
    }

    /// Run a full audit, including a round diff when the source has a
    /// previous round
    ///
    /// # Errors
    ///
    /// Returns an error if loading fails; findings never produce errors.
    pub fn audit(&self) -> Result<AuditReport, AuditError<S::Error>> {
        let (config, topology) = self.load_setup()?;
        let catalog = self.load_catalog()?;
        let previous = match self
            .source
            .load_previous_records()
            .map_err(AuditError::Source)?
        {
            Some(records) => Some(Catalog::load(records)?),
            None => None,
        };

        let report = AuditReport::build(&catalog, &topology, &config)?;
        Ok(match previous {
            Some(previous) => report.with_diff(diff_catalogs(&previous, &catalog)),
            None => report,
        })
    }
}
