use crate::models::CatalogEntry;
use anyhow::{anyhow, Context, Result};
use std::collections::{HashMap, HashSet};
use tracing::info;

/// Immutable, loaded-once table of all recommendable games, indexed by row
/// position for batched scanning and by name for membership checks.
pub struct CatalogService {
    entries: Vec<CatalogEntry>,
    name_index: HashMap<String, usize>,
}

impl CatalogService {
    pub fn load(path: &str) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read catalog artifact {}", path))?;
        let entries: Vec<CatalogEntry> = serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse catalog artifact {}", path))?;

        if entries.is_empty() {
            return Err(anyhow!("catalog artifact {} contains no entries", path));
        }

        let catalog = Self::from_entries(entries);
        info!("Loaded catalog with {} games", catalog.len());
        Ok(catalog)
    }

    pub fn from_entries(entries: Vec<CatalogEntry>) -> Self {
        let name_index = entries
            .iter()
            .enumerate()
            .map(|(index, entry)| (entry.name.clone(), index))
            .collect();

        Self { entries, name_index }
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains_name(&self, name: &str) -> bool {
        self.name_index.contains_key(name)
    }

    /// Catalog rows whose name appears in `names`, in catalog order.
    pub fn match_names(&self, names: &HashSet<&str>) -> Vec<&CatalogEntry> {
        let mut indices: Vec<usize> = names
            .iter()
            .filter_map(|name| self.name_index.get(*name).copied())
            .collect();
        indices.sort_unstable();

        indices.into_iter().map(|index| &self.entries[index]).collect()
    }
}
