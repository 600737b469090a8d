use std::collections::BTreeMap;
use std::ops::Bound;

use tracing::{debug, warn};
use wireplan_engine::engine::{Coord, group_prefix, strip_side_marker};

use super::{Mapping, MappingStore, ResolvedMapping};
use crate::error::Result;

/// Keyed table of component mappings for one document.
///
/// Every mutation is written through to the backing store before it
/// returns. When the write fails the in-memory table keeps the change and
/// stays authoritative; the error is handed back so the caller can warn and
/// retry with [`MappingTable::save`].
#[derive(Debug, Default)]
pub struct MappingTable {
    entries: BTreeMap<String, Mapping>,
    store: Option<MappingStore>,
}

impl MappingTable {
    /// An in-memory table with no persistence.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the table from `store`. Problems reading it are returned as
    /// warnings and leave the table empty.
    pub fn open(store: MappingStore) -> (Self, Vec<String>) {
        let mut warnings = Vec::new();
        let entries = match store.load() {
            Ok(loaded) => normalize(loaded),
            Err(err) => {
                warn!(
                    path = %store.path().display(),
                    error = %err,
                    "mapping table unreadable, starting empty"
                );
                warnings.push(err.to_string());
                BTreeMap::new()
            }
        };
        debug!(path = %store.path().display(), count = entries.len(), "mappings loaded");

        (
            MappingTable {
                entries,
                store: Some(store),
            },
            warnings,
        )
    }

    pub fn store(&self) -> Option<&MappingStore> {
        self.store.as_ref()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All mappings in key order.
    pub fn iter(&self) -> impl Iterator<Item = &Mapping> {
        self.entries.values()
    }

    /// Exact lookup by canonical key.
    pub fn get(&self, key: &str) -> Option<&Mapping> {
        self.entries.get(key)
    }

    /// Insert or overwrite the mapping for `raw_reference`.
    pub fn add(
        &mut self,
        raw_reference: &str,
        coord: Coord,
        description: &str,
        default_to_bottom: bool,
    ) -> Result<()> {
        let (key, _) = strip_side_marker(raw_reference);
        self.entries.insert(
            key.to_string(),
            Mapping {
                key: key.to_string(),
                row: coord.row,
                col: coord.col,
                default_to_bottom,
                description: description.to_string(),
            },
        );
        debug!(key, %coord, "mapping added");
        self.persist()
    }

    /// Delete the mapping for `raw_reference`. Returns whether one existed;
    /// an absent key is not an error and writes nothing.
    pub fn remove(&mut self, raw_reference: &str) -> Result<bool> {
        let (key, _) = strip_side_marker(raw_reference);
        if self.entries.remove(key).is_none() {
            return Ok(false);
        }
        debug!(key, "mapping removed");
        self.persist()?;
        Ok(true)
    }

    /// Whether `raw_reference` resolves, exactly or via its block prefix.
    pub fn has(&self, raw_reference: &str) -> bool {
        let (key, _) = strip_side_marker(raw_reference);
        self.lookup(key).is_some()
    }

    /// Resolve `raw_reference`. The returned side is the explicit marker on
    /// the query if present, otherwise the mapping's default.
    pub fn resolve(&self, raw_reference: &str) -> Option<ResolvedMapping> {
        let (key, marked) = strip_side_marker(raw_reference);
        let mapping = self.lookup(key)?;
        Some(ResolvedMapping {
            mapping: mapping.clone(),
            back_side: marked || mapping.default_to_bottom,
        })
    }

    /// Write the current table to the store, if there is one.
    pub fn save(&self) -> Result<()> {
        self.persist()
    }

    /// Exact key, then the key's block prefix. A bare block query such as
    /// `X20:` also matches the first terminal mapped in that block.
    fn lookup(&self, key: &str) -> Option<&Mapping> {
        if let Some(mapping) = self.entries.get(key) {
            return Some(mapping);
        }
        let prefix = group_prefix(key)?;
        if let Some(mapping) = self.entries.get(prefix) {
            return Some(mapping);
        }
        if prefix.len() != key.len() {
            return None;
        }
        self.entries
            .range::<str, _>((Bound::Included(key), Bound::Unbounded))
            .next()
            .filter(|(k, _)| k.starts_with(key))
            .map(|(_, mapping)| mapping)
    }

    fn persist(&self) -> Result<()> {
        let Some(store) = &self.store else {
            return Ok(());
        };
        store.save(&self.entries).inspect_err(|err| {
            warn!(path = %store.path().display(), error = %err, "mapping table not saved");
        })
    }
}

/// Re-key loaded records by their canonical reference so hand-edited files
/// with side markers in keys still resolve.
fn normalize(loaded: BTreeMap<String, Mapping>) -> BTreeMap<String, Mapping> {
    loaded
        .into_iter()
        .map(|(key, mut mapping)| {
            let canonical = strip_side_marker(&key).0.to_string();
            mapping.key = canonical.clone();
            (canonical, mapping)
        })
        .collect()
}
