//! Script metadata
//!
//! The frontmatter of a script file is an ordered bag of string pairs.
//! Unknown keys are kept verbatim and in input order.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Reserved frontmatter keys
pub mod keys {
    pub const SCRIPT_ID: &str = "scriptId";
    pub const TITLE: &str = "title";
    pub const EXPORT_DATE: &str = "exportDate";
    pub const VIDEO_PROGRESS: &str = "videoProgress";
    pub const AUDIO_PROGRESS: &str = "audioProgress";
}

/// Ordered key/value metadata for a script
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScriptMeta(IndexMap<String, String>);

impl ScriptMeta {
    /// Creates empty metadata
    pub fn new() -> Self {
        Self(IndexMap::new())
    }

    /// Returns true for keys that are recomputed on export and never read back
    pub fn is_derived_key(key: &str) -> bool {
        key == keys::VIDEO_PROGRESS || key == keys::AUDIO_PROGRESS
    }

    /// Gets a value by key
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Sets a value, keeping the original position if the key already exists
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    /// Returns true if the key is present
    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Iterates over all key-value pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of entries (used by unit tests)
    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `scriptId` unless it is missing or blank
    pub fn script_id(&self) -> Option<&str> {
        self.get(keys::SCRIPT_ID).filter(|v| !v.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preserves_insertion_order() {
        let mut meta = ScriptMeta::new();
        meta.set("zeta", "1");
        meta.set("alpha", "2");
        meta.set("mid", "3");
        meta.set("zeta", "4");

        let pairs: Vec<_> = meta.iter().collect();
        assert_eq!(pairs, vec![("zeta", "4"), ("alpha", "2"), ("mid", "3")]);
    }

    #[test]
    fn blank_script_id_counts_as_missing() {
        let mut meta = ScriptMeta::new();
        assert_eq!(meta.script_id(), None);

        meta.set(keys::SCRIPT_ID, "");
        assert_eq!(meta.script_id(), None);
        assert!(meta.contains(keys::SCRIPT_ID));

        meta.set(keys::SCRIPT_ID, "lesson-1");
        assert_eq!(meta.script_id(), Some("lesson-1"));
    }

    #[test]
    fn derived_keys() {
        assert!(ScriptMeta::is_derived_key("videoProgress"));
        assert!(ScriptMeta::is_derived_key("audioProgress"));
        assert!(!ScriptMeta::is_derived_key("exportDate"));
    }
}
