// src/models.rs

use std::collections::HashMap;
use std::path::PathBuf;

/// A flat variable mapping, as handed to the child process.
pub type EnvMap = HashMap<String, String>;

/// A single `KEY=VALUE` definition, in file order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// The variable name.
    pub key: String,
    /// The raw value, before expansion.
    pub value: String,
}

impl Entry {
    /// Creates a new entry.
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// The four cascade slots, lowest precedence first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Slot {
    /// `.env`
    Base,
    /// `.env.local`
    BaseLocal,
    /// `.env.<mode>`
    Mode,
    /// `.env.<mode>.local`
    ModeLocal,
}

/// A candidate file of the cascade. It may not exist on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefinitionFile {
    /// Which slot of the cascade this file fills.
    pub slot: Slot,
    /// Absolute path of the candidate.
    pub path: PathBuf,
}

/// The union of all loaded definition files.
///
/// Keys keep the position of their first appearance across the cascade; a
/// later file only replaces the value. Expansion walks this order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergedEnv {
    entries: Vec<Entry>,
    positions: HashMap<String, usize>,
}

impl MergedEnv {
    /// Creates an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `entry`, overriding the value of an existing key in place.
    pub fn insert(&mut self, entry: Entry) {
        if let Some(existing) = self
            .positions
            .get(&entry.key)
            .and_then(|&pos| self.entries.get_mut(pos))
        {
            existing.value = entry.value;
            return;
        }
        self.positions.insert(entry.key.clone(), self.entries.len());
        self.entries.push(entry);
    }

    /// Returns the current raw value of `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.positions
            .get(key)
            .and_then(|&pos| self.entries.get(pos))
            .map(|entry| entry.value.as_str())
    }

    /// Iterates the entries in merge order.
    pub fn iter(&self) -> impl Iterator<Item = &Entry> {
        self.entries.iter()
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no file contributed any key.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn later_insert_overrides_value_but_keeps_position() {
        let mut merged = MergedEnv::new();
        merged.insert(Entry::new("A", "1"));
        merged.insert(Entry::new("B", "2"));
        merged.insert(Entry::new("A", "3"));

        assert_eq!(merged.len(), 2);
        assert_eq!(merged.get("A"), Some("3"));
        let keys: Vec<&str> = merged.iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, vec!["A", "B"]);
    }

    #[test]
    fn slots_are_ordered_by_precedence() {
        assert!(Slot::Base < Slot::BaseLocal);
        assert!(Slot::BaseLocal < Slot::Mode);
        assert!(Slot::Mode < Slot::ModeLocal);
    }
}
