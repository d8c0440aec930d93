// dvm-common/src/registry.rs
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::{DvmError, Result};

/// Registry table compiled into the binary.
const BUNDLED_REGISTRIES: &str = include_str!("../registries.json");

pub const DEFAULT_REGISTRY: &str = "denocn";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryEntry {
    /// Base URL; release archives live under `<registry>/v<version>/`.
    pub registry: String,
}

/// Read-only name -> base URL lookup, loaded once at startup.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RegistryTable {
    entries: BTreeMap<String, RegistryEntry>,
}

impl RegistryTable {
    pub fn bundled() -> Result<Self> {
        Self::from_json(BUNDLED_REGISTRIES)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let entries: BTreeMap<String, RegistryEntry> = serde_json::from_str(raw)?;
        Ok(Self { entries })
    }

    pub fn from_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(name, url)| {
                    (
                        name.into(),
                        RegistryEntry {
                            registry: url.into(),
                        },
                    )
                })
                .collect(),
        }
    }

    /// Overlays the entries of a user-supplied registry file on top of this table.
    pub fn merge_file(&mut self, path: &Path) -> Result<()> {
        debug!("Merging registry file {}", path.display());
        let raw = fs::read_to_string(path).map_err(|e| {
            DvmError::Config(format!(
                "Failed to read registry file {}: {}",
                path.display(),
                e
            ))
        })?;
        let extra = Self::from_json(&raw)?;
        self.entries.extend(extra.entries);
        Ok(())
    }

    pub fn base_url(&self, name: &str) -> Result<&str> {
        self.entries
            .get(name)
            .map(|entry| entry.registry.trim_end_matches('/'))
            .ok_or_else(|| DvmError::UnknownRegistry(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(name, entry)| (name.as_str(), entry.registry.as_str()))
    }
}
