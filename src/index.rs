//! Immutable name index shared by both registries

use std::collections::HashMap;

use crate::marshal::split_names;

/// Names in engine enumeration order plus an exact-match lookup table
#[derive(Debug, Clone, Default)]
pub struct NameIndex {
    names: Vec<String>,
    positions: HashMap<String, usize>,
}

impl NameIndex {
    /// Build from a delimited enumeration response
    ///
    /// A repeated name keeps its first position; later copies are dropped
    /// with a warning so every indexed name maps to exactly one entry.
    pub fn from_list(list: &str, what: &str) -> Self {
        let mut index = Self::default();
        for name in split_names(list) {
            if index.positions.contains_key(&name) {
                tracing::warn!(
                    "Duplicate {} name {:?} in engine enumeration, keeping the first",
                    what,
                    name
                );
                continue;
            }
            index.positions.insert(name.clone(), index.names.len());
            index.names.push(name);
        }
        index
    }

    /// The stored copy of `name`, if indexed
    pub fn get(&self, name: &str) -> Option<&str> {
        self.positions
            .get(name)
            .map(|&position| self.names[position].as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.positions.contains_key(name)
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = &str> + '_ {
        self.names.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
