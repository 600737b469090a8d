//! JSON persistence for one document's mapping table.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use super::Mapping;
use crate::error::{Result, WireplanError};

const MAX_MAPPING_FILE_BYTES: u64 = 16_777_216; // 16 MiB

/// File name suffix appended to the document's stem.
pub const MAPPING_FILE_SUFFIX: &str = "_ComponentMapping.json";

/// Location of a mapping table on disk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MappingStore {
    path: PathBuf,
}

impl MappingStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        MappingStore { path: path.into() }
    }

    /// Store for `document`: `<dir>/<document stem>_ComponentMapping.json`,
    /// where `dir` defaults to the document's own directory.
    pub fn for_document(document: &Path, dir: Option<&Path>) -> Self {
        let stem = document
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "untitled".to_string());
        let dir = dir
            .map(Path::to_path_buf)
            .or_else(|| document.parent().map(Path::to_path_buf))
            .unwrap_or_default();
        MappingStore::new(dir.join(format!("{}{}", stem, MAPPING_FILE_SUFFIX)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the table. A missing file is an empty table.
    pub fn load(&self) -> Result<BTreeMap<String, Mapping>> {
        let meta = match std::fs::metadata(&self.path) {
            Ok(meta) => meta,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(e.into()),
        };
        if meta.len() > MAX_MAPPING_FILE_BYTES {
            return Err(self.malformed(format!(
                "file too large ({} bytes, max {})",
                meta.len(),
                MAX_MAPPING_FILE_BYTES
            )));
        }

        let content = std::fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&content).map_err(|e| self.malformed(e.to_string()))
    }

    /// Write the whole table. The file is replaced atomically so a failed
    /// write leaves the previous contents in place.
    pub fn save(&self, entries: &BTreeMap<String, Mapping>) -> Result<()> {
        let json = serde_json::to_string_pretty(entries)?;
        self.write_atomic(json.as_bytes())
            .map_err(|source| WireplanError::Persist {
                path: self.path.clone(),
                source,
            })
    }

    fn write_atomic(&self, bytes: &[u8]) -> std::io::Result<()> {
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        let mut file = std::fs::File::create(&tmp)?;
        file.write_all(bytes)?;
        file.sync_all()?;
        drop(file);
        std::fs::rename(&tmp, &self.path)
    }

    fn malformed(&self, message: String) -> WireplanError {
        WireplanError::MalformedMappings {
            path: self.path.clone(),
            message,
        }
    }
}
