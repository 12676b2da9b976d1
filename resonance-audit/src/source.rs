use resonance_engine::{AuditConfig, CardRecord, CatalogSource};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Catalog, config and previous round read from JSON files on disk.
#[derive(Debug, Clone)]
pub struct FileSource {
    pub catalog: PathBuf,
    pub config: Option<PathBuf>,
    pub previous: Option<PathBuf>,
}

impl FileSource {
    fn read_json<T>(path: &Path) -> Result<T, SourceError>
    where
        T: serde::de::DeserializeOwned,
    {
        let text = fs::read_to_string(path).map_err(|source| SourceError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| SourceError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl CatalogSource for FileSource {
    type Error = SourceError;

    fn load_records(&self) -> Result<Vec<CardRecord>, Self::Error> {
        log::debug!("reading catalog from {}", self.catalog.display());
        Self::read_json(&self.catalog)
    }

    fn load_config(&self) -> Result<AuditConfig, Self::Error> {
        match &self.config {
            Some(path) => {
                log::debug!("reading config from {}", path.display());
                Self::read_json(path)
            }
            None => Ok(AuditConfig::default()),
        }
    }

    fn load_previous_records(&self) -> Result<Option<Vec<CardRecord>>, Self::Error> {
        self.previous
            .as_deref()
            .map(Self::read_json)
            .transpose()
    }
}
