//! Jumpstart booster lists
//!
//! A list file starts with the booster name, followed by `<count> <card name>`
//! lines. Names are swapped through a substitution table, then resolved to
//! internal IDs.

use crate::local_index::LocalIndex;
use crate::projector::CanonicalCard;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Set whose Arena printings may be missing from the card table
const UNRELIABLE_SET: &str = "jmp";

/// Largest copy count accepted on a card line
pub const MAX_COPIES: u32 = 100;

lazy_static! {
    static ref CARD_LINE: Regex = Regex::new(r"^(\d+) (.*)$").expect("card line pattern is valid");
}

/// Requested card name → name to look up instead
pub type SwapTable = HashMap<String, String>;

/// A parsed list file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoosterList {
    pub name: String,
    pub lines: Vec<(u32, String)>,
}

/// A published booster: one entry per card copy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoosterDefinition {
    pub name: String,
    pub cards: Vec<u32>,
}

/// Parse a list file. Lines that are not `<count> <name>` are ignored, as
/// are counts above [`MAX_COPIES`]. Returns `None` for a file without any
/// non-blank line.
pub fn parse_booster_list(text: &str) -> Option<BoosterList> {
    let mut lines = text.lines().map(str::trim).filter(|line| !line.is_empty());
    let name = lines.next()?.to_string();
    let lines = lines
        .filter_map(|line| {
            let caps = CARD_LINE.captures(line)?;
            let count = caps[1].parse::<u32>().ok().filter(|n| *n <= MAX_COPIES);
            if count.is_none() {
                log::warn!("Booster '{}': ignoring card count in '{}'", name, line);
            }
            Some((count?, caps[2].to_string()))
        })
        .collect();
    Some(BoosterList { name, lines })
}

/// Every resolved booster of a run, with the card lines that were dropped
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoosterReport {
    pub boosters: Vec<BoosterDefinition>,
    pub unresolved: Vec<UnresolvedCard>,
}

/// A card line that could not be turned into an internal ID
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UnresolvedCard {
    #[error("Card '{0}' not found")]
    UnknownName(String),
    #[error("Card '{name}' ({id}) not in the card database and no other printing found")]
    NoCandidate { name: String, id: u32 },
}

pub struct BoosterResolver<'a> {
    index: &'a LocalIndex,
    cards: &'a BTreeMap<u32, CanonicalCard>,
    swaps: &'a SwapTable,
}

impl<'a> BoosterResolver<'a> {
    pub fn new(
        index: &'a LocalIndex,
        cards: &'a BTreeMap<u32, CanonicalCard>,
        swaps: &'a SwapTable,
    ) -> Self {
        Self {
            index,
            cards,
            swaps,
        }
    }

    /// Internal ID for a card name. If the client's preferred printing is
    /// missing from the card table, the newest other printing outside the
    /// unreliable set is used instead.
    pub fn resolve_name(&self, name: &str) -> Result<u32, UnresolvedCard> {
        let name = self.swaps.get(name).map_or(name, String::as_str);
        let id = self
            .index
            .lookup_by_name(name)
            .ok_or_else(|| UnresolvedCard::UnknownName(name.to_string()))?;
        if self.cards.contains_key(&id) {
            return Ok(id);
        }

        log::info!("{} ({}) not found in cards...", name, id);
        let newest = self
            .cards
            .iter()
            .filter(|(_, card)| card.name == name && card.set != UNRELIABLE_SET)
            .map(|(candidate, _)| *candidate)
            .max()
            .ok_or_else(|| UnresolvedCard::NoCandidate {
                name: name.to_string(),
                id,
            })?;
        log::info!("> Using {}", newest);
        Ok(newest)
    }

    /// Resolve every line of a list, dropping (and logging) unresolved cards
    pub fn resolve(&self, list: &BoosterList) -> (BoosterDefinition, Vec<UnresolvedCard>) {
        let mut cards = Vec::new();
        let mut unresolved = Vec::new();
        for (count, name) in &list.lines {
            match self.resolve_name(name) {
                Ok(id) => cards.extend(std::iter::repeat(id).take(*count as usize)),
                Err(e) => {
                    log::warn!("Booster '{}': {}", list.name, e);
                    unresolved.push(e);
                }
            }
        }
        (
            BoosterDefinition {
                name: list.name.clone(),
                cards,
            },
            unresolved,
        )
    }

    /// Resolve several lists, in order
    pub fn resolve_all<'l, I>(&self, lists: I) -> BoosterReport
    where
        I: IntoIterator<Item = &'l BoosterList>,
    {
        lists
            .into_iter()
            .fold(BoosterReport::default(), |mut report, list| {
                let (booster, mut unresolved) = self.resolve(list);
                report.boosters.push(booster);
                report.unresolved.append(&mut unresolved);
                report
            })
    }
}

#[cfg(test)]
#[path = "booster_tests.rs"]
mod tests;
