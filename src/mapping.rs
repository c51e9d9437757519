//! The persisted slide-image → slide-text mapping.
//!
//! Stored as a YAML block mapping, one entry per slide image, in insertion
//! order:
//!
//! ```yaml
//! talk_slide1.png: Welcome
//! talk_slide2.png: |-
//!   Agenda
//!   Results
//! talk_slide3.png: null
//! ```
//!
//! A `null` value marks a page without an extractable text layer. Keys are
//! inserted at most once; later runs never replace an existing value.

use crate::error::SlideError;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;
use tracing::debug;

/// Insertion-ordered map from generated image filename to extracted text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlideTextMap {
    entries: IndexMap<String, Option<String>>,
}

impl SlideTextMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the mapping at `path`.
    ///
    /// A missing file, an empty file, or a YAML `null` document all yield
    /// an empty map. Anything that is not a mapping of strings is an error.
    pub fn load(path: &Path) -> Result<Self, SlideError> {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No mapping at {}, starting empty", path.display());
                return Ok(Self::new());
            }
            Err(source) => {
                return Err(SlideError::MappingRead {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        let map = Self::from_yaml(&raw).map_err(|detail| SlideError::MappingParse {
            path: path.to_path_buf(),
            detail,
        })?;
        debug!("Loaded {} mapping entries from {}", map.len(), path.display());
        Ok(map)
    }

    /// Parse a YAML document; the error is the parser's message.
    pub fn from_yaml(raw: &str) -> Result<Self, String> {
        if raw.trim().is_empty() {
            return Ok(Self::new());
        }
        let parsed: Option<IndexMap<String, Option<String>>> =
            serde_yaml::from_str(raw).map_err(|e| e.to_string())?;
        Ok(Self {
            entries: parsed.unwrap_or_default(),
        })
    }

    /// Render the mapping as a YAML block mapping. Non-ASCII text is kept verbatim.
    pub fn to_yaml(&self) -> Result<String, SlideError> {
        if self.entries.is_empty() {
            return Ok("{}\n".to_string());
        }
        serde_yaml::to_string(&self.entries)
            .map_err(|e| SlideError::Internal(format!("YAML serialisation failed: {e}")))
    }

    /// Overwrite `path` with the whole mapping.
    ///
    /// Writes to a temporary file in the same directory and renames it over
    /// the target, so readers never observe a half-written mapping.
    pub fn save(&self, path: &Path) -> Result<(), SlideError> {
        let yaml = self.to_yaml()?;
        let write_err = |source: std::io::Error| SlideError::OutputWriteFailed {
            path: path.to_path_buf(),
            source,
        };

        let parent = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(parent).map_err(write_err)?;

        let mut tmp = tempfile::NamedTempFile::new_in(parent).map_err(write_err)?;
        tmp.write_all(yaml.as_bytes()).map_err(write_err)?;
        tmp.persist(path).map_err(|e| write_err(e.error))?;

        debug!("Saved {} mapping entries to {}", self.len(), path.display());
        Ok(())
    }

    /// Insert `key` only if it is absent. Returns whether it was inserted.
    pub fn insert_if_absent(&mut self, key: impl Into<String>, text: Option<String>) -> bool {
        match self.entries.entry(key.into()) {
            indexmap::map::Entry::Occupied(_) => false,
            indexmap::map::Entry::Vacant(slot) => {
                slot.insert(text);
                true
            }
        }
    }

    /// Whether any key contains `base` as a substring.
    ///
    /// This is how a PDF is recognised as already processed. It is a plain
    /// substring test: `lecture1` matches `lecture10_slide1.png`.
    pub fn mentions(&self, base: &str) -> bool {
        self.entries.keys().any(|k| k.contains(base))
    }

    pub fn get(&self, key: &str) -> Option<&Option<String>> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_deref()))
    }
}
