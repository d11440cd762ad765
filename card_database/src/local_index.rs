//! Lookup tables over the client's primary cards
//!
//! Built once by folding the client export through [`LocalIndexBuilder`];
//! the finished [`LocalIndex`] is read-only.

use crate::client::LocalCardEntry;
use crate::key::{join_keys, normalize_set_code, JoinKey};
use std::collections::hash_map::Entry;
use std::collections::{BTreeMap, HashMap};

/// Sets whose printing should answer name lookups over earlier printings
const PREFERRED_NAME_SETS: &[&str] = &["jmp", "m21"];

/// Ranks a printing for name lookups. A mapping is replaced by a later
/// printing of rank > 0 whose rank is at least the current one; rank-0
/// printings never displace an existing mapping.
pub type NameRank = fn(&LocalCardEntry) -> u8;

/// Prefer Jumpstart and Core Set 2021 reprints over earlier printings
pub fn preferred_set_rank(entry: &LocalCardEntry) -> u8 {
    let set = normalize_set_code(&entry.set_code);
    u8::from(PREFERRED_NAME_SETS.contains(&set.as_str()))
}

pub struct LocalIndexBuilder {
    by_key: HashMap<JoinKey, u32>,
    by_name: HashMap<String, (u32, u8)>,
    name_rank: NameRank,
    collisions: usize,
}

impl Default for LocalIndexBuilder {
    fn default() -> Self {
        Self::new(preferred_set_rank)
    }
}

impl LocalIndexBuilder {
    pub fn new(name_rank: NameRank) -> Self {
        Self {
            by_key: HashMap::new(),
            by_name: HashMap::new(),
            name_rank,
            collisions: 0,
        }
    }

    pub fn add(mut self, entry: &LocalCardEntry) -> Self {
        for key in join_keys(entry) {
            match self.by_key.entry(key) {
                Entry::Occupied(slot) => {
                    let existing = *slot.get();
                    if existing != entry.internal_id {
                        log::warn!(
                            "Key collision for {}: keeping {}, ignoring {}",
                            slot.key(),
                            existing,
                            entry.internal_id
                        );
                        self.collisions += 1;
                    }
                }
                Entry::Vacant(slot) => {
                    slot.insert(entry.internal_id);
                }
            }
        }

        let rank = (self.name_rank)(entry);
        let replace = match self.by_name.get(&entry.display_name) {
            None => true,
            Some(&(_, current)) => rank > 0 && rank >= current,
        };
        if replace {
            self.by_name
                .insert(entry.display_name.clone(), (entry.internal_id, rank));
        }
        self
    }

    pub fn finish(self) -> LocalIndex {
        if self.collisions > 0 {
            log::warn!("{} conflicting client card keys ignored", self.collisions);
        }
        LocalIndex {
            by_key: self.by_key,
            by_name: self
                .by_name
                .into_iter()
                .map(|(name, (id, _))| (name, id))
                .collect(),
        }
    }
}

/// Join key → internal ID and card name → preferred internal ID
#[derive(Debug, Default, Clone)]
pub struct LocalIndex {
    by_key: HashMap<JoinKey, u32>,
    by_name: HashMap<String, u32>,
}

impl LocalIndex {
    /// Index entries with the default name precedence
    pub fn build<'a>(entries: impl IntoIterator<Item = &'a LocalCardEntry>) -> Self {
        Self::build_with(entries, preferred_set_rank)
    }

    pub fn build_with<'a>(
        entries: impl IntoIterator<Item = &'a LocalCardEntry>,
        name_rank: NameRank,
    ) -> Self {
        entries
            .into_iter()
            .fold(LocalIndexBuilder::new(name_rank), LocalIndexBuilder::add)
            .finish()
    }

    pub fn lookup_by_key(&self, key: &JoinKey) -> Option<u32> {
        self.by_key.get(key).copied()
    }

    pub fn lookup_by_name(&self, name: &str) -> Option<u32> {
        self.by_name.get(name).copied()
    }

    /// Number of join keys
    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }

    /// Key table with rendered keys, for the debug dump
    pub fn key_table(&self) -> BTreeMap<String, u32> {
        self.by_key
            .iter()
            .map(|(key, id)| (key.to_string(), *id))
            .collect()
    }
}

#[cfg(test)]
#[path = "local_index_tests.rs"]
mod tests;
