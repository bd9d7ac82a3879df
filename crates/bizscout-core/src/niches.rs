use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ConfigError;

/// Returned when a niche key is not present in the registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown niche: '{key}'")]
pub struct UnknownNicheError {
    pub key: String,
}

/// One business category with the terms used to recognise it in free text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NicheDefinition {
    pub key: String,
    pub label: String,
    /// Overrides `label` as the discovery search term when set.
    pub search_query: Option<String>,
    pub vocabulary: Vec<String>,
    pub canonical_services: Vec<String>,
}

impl NicheDefinition {
    /// Terms sent to the listing source, e.g. `"med spa"`.
    #[must_use]
    pub fn search_terms(&self) -> &str {
        self.search_query.as_deref().unwrap_or(&self.label)
    }
}

/// Shape of one entry in the niches YAML file; the key comes from the map.
#[derive(Debug, Deserialize)]
struct NicheEntry {
    label: String,
    #[serde(default)]
    search_query: Option<String>,
    #[serde(default)]
    vocabulary: Vec<String>,
    #[serde(default)]
    canonical_services: Vec<String>,
}

/// Read-only snapshot of every configured niche.
///
/// Built once at startup and shared behind an `Arc`; nothing mutates it
/// afterwards.
#[derive(Debug, Clone, Default)]
pub struct NicheRegistry {
    niches: BTreeMap<String, NicheDefinition>,
}

impl NicheRegistry {
    /// Parse and validate a registry from YAML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NichesFileParse`] on malformed YAML and
    /// [`ConfigError::Validation`] when an entry is unusable.
    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        let entries: BTreeMap<String, NicheEntry> = serde_yaml::from_str(content)?;

        let mut niches = BTreeMap::new();
        for (key, entry) in entries {
            let definition = build_definition(key, entry)?;
            niches.insert(definition.key.clone(), definition);
        }

        Ok(Self { niches })
    }

    /// Build a registry from already-constructed definitions (used by tests
    /// and embedders that source niches elsewhere).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] on duplicate keys.
    pub fn from_definitions(
        definitions: impl IntoIterator<Item = NicheDefinition>,
    ) -> Result<Self, ConfigError> {
        let mut niches = BTreeMap::new();
        for definition in definitions {
            let key = definition.key.clone();
            if niches.insert(key.clone(), definition).is_some() {
                return Err(ConfigError::Validation(format!(
                    "duplicate niche key: '{key}'"
                )));
            }
        }
        Ok(Self { niches })
    }

    /// Look up a niche by key.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownNicheError`] when `key` is not registered.
    pub fn get(&self, key: &str) -> Result<&NicheDefinition, UnknownNicheError> {
        self.niches.get(key).ok_or_else(|| UnknownNicheError {
            key: key.to_string(),
        })
    }

    #[must_use]
    pub fn list_all(&self) -> &BTreeMap<String, NicheDefinition> {
        &self.niches
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.niches.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.niches.is_empty()
    }
}

/// Load and validate the niche registry from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_niches(path: &Path) -> Result<NicheRegistry, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::NichesFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    NicheRegistry::from_yaml_str(&content)
}

fn build_definition(key: String, entry: NicheEntry) -> Result<NicheDefinition, ConfigError> {
    let valid_key = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_');
    if !valid_key {
        return Err(ConfigError::Validation(format!(
            "niche key '{key}' must be lowercase letters, digits, '-' or '_'"
        )));
    }

    let label = entry.label.trim().to_string();
    if label.is_empty() {
        return Err(ConfigError::Validation(format!(
            "niche '{key}' must have a non-empty label"
        )));
    }

    let vocabulary = dedup_terms(entry.vocabulary);
    let canonical_services = dedup_terms(entry.canonical_services);
    if vocabulary.is_empty() && canonical_services.is_empty() {
        return Err(ConfigError::Validation(format!(
            "niche '{key}' needs at least one vocabulary term or canonical service"
        )));
    }

    let search_query = entry
        .search_query
        .map(|q| q.trim().to_string())
        .filter(|q| !q.is_empty());

    Ok(NicheDefinition {
        key,
        label,
        search_query,
        vocabulary,
        canonical_services,
    })
}

/// Trim terms, drop blanks, and drop case-insensitive repeats keeping the
/// first spelling.
fn dedup_terms(terms: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    terms
        .into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty() && seen.insert(t.to_lowercase()))
        .collect()
}

#[cfg(test)]
#[path = "niches_test.rs"]
mod tests;
