//! On-disk store for blueprints and contracts.
//!
//! One JSON document holds both repositories:
//!
//! ```json
//! { "version": 1, "blueprints": [...], "contracts": [...] }
//! ```
//!
//! Writes go through [`quill_utils::atomic_write_with_options`], so a crash
//! leaves either the previous file or the new one.

use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use quill_core::demo::{demo_blueprint, demo_contract};
use quill_core::{Blueprint, Contract, InMemoryRepository, Keyed, Repository};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Layout version written by this build.
pub const STORE_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read store at {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to parse store at {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("failed to write store at {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },
    #[error("failed to encode store: {0}")]
    Encode(#[from] serde_json::Error),
}

impl StoreError {
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            StoreError::Read { path, .. }
            | StoreError::Parse { path, .. }
            | StoreError::Write { path, .. } => Some(path),
            StoreError::Encode(_) => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Store {
    blueprints: InMemoryRepository<Blueprint>,
    contracts: InMemoryRepository<Contract>,
}

impl Store {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn blueprints(&self) -> &InMemoryRepository<Blueprint> {
        &self.blueprints
    }

    #[must_use]
    pub fn contracts(&self) -> &InMemoryRepository<Contract> {
        &self.contracts
    }

    pub fn blueprints_mut(&mut self) -> &mut InMemoryRepository<Blueprint> {
        &mut self.blueprints
    }

    pub fn contracts_mut(&mut self) -> &mut InMemoryRepository<Contract> {
        &mut self.contracts
    }

    /// Blueprints for reading alongside contracts for writing, as contract
    /// creation needs.
    pub fn split_mut(
        &mut self,
    ) -> (
        &InMemoryRepository<Blueprint>,
        &mut InMemoryRepository<Contract>,
    ) {
        (&self.blueprints, &mut self.contracts)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blueprints.is_empty() && self.contracts.is_empty()
    }

    /// Add the demo blueprint and contract if the store holds nothing yet.
    ///
    /// Returns whether anything was added.
    pub fn seed_demo(&mut self, now: DateTime<Utc>) -> bool {
        if !self.is_empty() {
            return false;
        }
        self.blueprints.put(demo_blueprint());
        self.contracts.put(demo_contract(now));
        tracing::info!("Seeded demo blueprint and contract");
        true
    }

    /// Read the store at `path`.
    ///
    /// A missing file is an empty store. A backup left by an interrupted write
    /// is restored first.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        quill_utils::recover_bak_file(path);

        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No store file, starting empty");
                return Ok(Self::new());
            }
            Err(source) => {
                return Err(StoreError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        let store: Self = serde_json::from_str(&json).map_err(|source| {
            tracing::warn!("Failed to parse store at {}: {source}", path.display());
            StoreError::Parse {
                path: path.to_path_buf(),
                source,
            }
        })?;
        tracing::info!(
            path = %path.display(),
            blueprints = store.blueprints.len(),
            contracts = store.contracts.len(),
            "Loaded store"
        );
        Ok(store)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), StoreError> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)?;
        quill_utils::atomic_write_with_options(
            path,
            json.as_bytes(),
            quill_utils::WriteOptions {
                mode: Some(0o600),
                ..quill_utils::WriteOptions::default()
            },
        )
        .map_err(|source| StoreError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!(
            path = %path.display(),
            blueprints = self.blueprints.len(),
            contracts = self.contracts.len(),
            "Saved store"
        );
        Ok(())
    }
}

// ── Wire format ──────────────────────────────────────────────

#[derive(Serialize)]
struct StoreFileRef<'a> {
    version: u32,
    blueprints: &'a [Blueprint],
    contracts: &'a [Contract],
}

#[derive(Deserialize)]
struct StoreFile {
    version: u32,
    #[serde(default)]
    blueprints: Vec<Blueprint>,
    #[serde(default)]
    contracts: Vec<Contract>,
}

impl Serialize for Store {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        StoreFileRef {
            version: STORE_VERSION,
            blueprints: self.blueprints.list(),
            contracts: self.contracts.list(),
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Store {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        StoreFile::deserialize(deserializer)?
            .into_store()
            .map_err(serde::de::Error::custom)
    }
}

fn first_duplicate<T: Keyed>(items: &[T]) -> Option<&T::Id> {
    let mut seen = HashSet::new();
    items.iter().map(Keyed::key).find(|id| !seen.insert(*id))
}

impl StoreFile {
    fn into_store(self) -> Result<Store, String> {
        let StoreFile {
            version,
            blueprints,
            contracts,
        } = self;

        if version != STORE_VERSION {
            return Err(format!(
                "unsupported store version {version} (expected {STORE_VERSION})"
            ));
        }
        if let Some(id) = first_duplicate(&blueprints) {
            return Err(format!("duplicate blueprint id {id}"));
        }
        if let Some(id) = first_duplicate(&contracts) {
            return Err(format!("duplicate contract id {id}"));
        }

        Ok(Store {
            blueprints: blueprints.into_iter().collect(),
            contracts: contracts.into_iter().collect(),
        })
    }
}
