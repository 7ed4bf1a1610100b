// Licensed under the Apache-2.0 license

//! Fully-qualified register names recovered from comments.

use std::collections::HashMap;

/// Where a fully-qualified name places a register.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FqnEntry {
    pub fqn: String,
    pub peripheral: String,
    pub register: String,
    /// Description from a `/* PERIPH :: REG :: DESCRIPTION */` comment.
    pub description: Option<String>,
}

/// FQN associations in recording order. The first record of a name wins.
#[derive(Clone, Debug, Default)]
pub struct FqnTable {
    entries: Vec<FqnEntry>,
    index: HashMap<String, usize>,
}

impl FqnTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an association unless the name is already known.
    ///
    /// A description only fills in an entry that has none yet; the
    /// peripheral and register names of the first record are kept.
    /// Returns true if a new entry was added.
    pub fn record(
        &mut self,
        fqn: &str,
        peripheral: &str,
        register: &str,
        description: Option<&str>,
    ) -> bool {
        if let Some(&idx) = self.index.get(fqn) {
            let entry = &mut self.entries[idx];
            if entry.description.is_none() {
                entry.description = description.map(str::to_string);
            }
            return false;
        }
        self.index.insert(fqn.to_string(), self.entries.len());
        self.entries.push(FqnEntry {
            fqn: fqn.to_string(),
            peripheral: peripheral.to_string(),
            register: register.to_string(),
            description: description.map(str::to_string),
        });
        true
    }

    pub fn get(&self, fqn: &str) -> Option<&FqnEntry> {
        self.index.get(fqn).map(|&idx| &self.entries[idx])
    }

    /// Entries in recording order.
    pub fn entries(&self) -> &[FqnEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries sorted by descending name length; equal lengths keep
    /// recording order.
    pub fn by_length_desc(&self) -> Vec<&FqnEntry> {
        let mut sorted: Vec<&FqnEntry> = self.entries.iter().collect();
        sorted.sort_by(|a, b| b.fqn.len().cmp(&a.fqn.len()));
        sorted
    }

    /// The longest recorded name that is a string prefix of `name`.
    pub fn longest_prefix_of(&self, name: &str) -> Option<&FqnEntry> {
        self.by_length_desc()
            .into_iter()
            .find(|entry| name.starts_with(entry.fqn.as_str()))
    }
}
