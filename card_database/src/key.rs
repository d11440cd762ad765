//! Join keys correlating client cards with Scryfall printings

use crate::client::LocalCardEntry;
use std::fmt;

/// Client set codes that Scryfall knows under another code
const SET_ALIASES: &[(&str, &str)] = &[("conf", "con"), ("dar", "dom")];

/// Jumpstart cards live in two Scryfall sets: the paper one and the
/// Arena-only reprint.
const ARENA_VARIANT_SET: &str = "jmp";
const ARENA_VARIANT_TAG: &str = "ajmp";

/// (name, collector number, set code)
///
/// The name is part of the key because Jumpstart reuses
/// (collector number, set) pairs for distinct cards.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct JoinKey {
    pub name: String,
    pub collector_number: String,
    pub set: String,
}

impl JoinKey {
    /// Key with the set code lowercased, as used for Scryfall records
    pub fn new(name: &str, collector_number: &str, set: &str) -> Self {
        Self {
            name: name.to_string(),
            collector_number: collector_number.to_string(),
            set: set.to_lowercase(),
        }
    }
}

impl fmt::Display for JoinKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "('{}', '{}', '{}')",
            self.name, self.collector_number, self.set
        )
    }
}

/// Lowercase a client set code and map it to Scryfall's code
pub fn normalize_set_code(set: &str) -> String {
    let set = set.to_lowercase();
    SET_ALIASES
        .iter()
        .find(|(client, _)| *client == set)
        .map(|(_, scryfall)| scryfall.to_string())
        .unwrap_or(set)
}

/// Keys under which a client card can be found on Scryfall. The first key
/// is the primary one; Jumpstart cards get a second key in the Arena-only set.
pub fn join_keys(entry: &LocalCardEntry) -> Vec<JoinKey> {
    let set = normalize_set_code(&entry.set_code);
    let variant = (set == ARENA_VARIANT_SET).then(|| {
        JoinKey::new(
            &entry.display_name,
            &entry.collector_number,
            ARENA_VARIANT_TAG,
        )
    });

    let primary = JoinKey {
        name: entry.display_name.clone(),
        collector_number: entry.collector_number.clone(),
        set,
    };
    std::iter::once(primary).chain(variant).collect()
}

#[cfg(test)]
#[path = "key_tests.rs"]
mod tests;
