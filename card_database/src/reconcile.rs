//! Matching Scryfall printings against the client's cards
//!
//! The bulk export is far larger than the Arena card pool, so records are
//! streamed out of the JSON array one at a time and only matches are kept.

use crate::key::JoinKey;
use crate::local_index::LocalIndex;
use mtg_common::ScryfallCard;
use serde::de::{SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::io::Read;

const PROGRESS_EVERY: usize = 10_000;

/// A Scryfall printing with the internal ID it was matched to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchedCard {
    pub arena_id: u32,
    pub card: ScryfallCard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchOutcome {
    /// Matched on the full card name
    Direct(u32),
    /// Matched on the front face of a multi-faced name
    FrontFace(u32),
    /// Not an Arena card
    Discarded,
}

impl MatchOutcome {
    pub fn arena_id(self) -> Option<u32> {
        match self {
            MatchOutcome::Direct(id) | MatchOutcome::FrontFace(id) => Some(id),
            MatchOutcome::Discarded => None,
        }
    }
}

/// Look a printing up by its full name, then by its front face name
pub fn classify(index: &LocalIndex, card: &ScryfallCard) -> MatchOutcome {
    let direct = JoinKey::new(&card.name, &card.collector_number, &card.set);
    if let Some(id) = index.lookup_by_key(&direct) {
        return MatchOutcome::Direct(id);
    }

    card.front_face_name()
        .and_then(|front| {
            index.lookup_by_key(&JoinKey::new(front, &card.collector_number, &card.set))
        })
        .map_or(MatchOutcome::Discarded, MatchOutcome::FrontFace)
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReconcileStats {
    pub seen: usize,
    pub direct: usize,
    pub front_face: usize,
    pub discarded: usize,
}

impl ReconcileStats {
    pub fn matched(&self) -> usize {
        self.direct + self.front_face
    }
}

/// Stateful matcher counting outcomes as records go by
pub struct Reconciler<'a> {
    index: &'a LocalIndex,
    stats: ReconcileStats,
}

impl<'a> Reconciler<'a> {
    pub fn new(index: &'a LocalIndex) -> Self {
        Self {
            index,
            stats: ReconcileStats::default(),
        }
    }

    pub fn reconcile(&mut self, card: ScryfallCard) -> Option<MatchedCard> {
        self.stats.seen += 1;
        let outcome = classify(self.index, &card);
        match outcome {
            MatchOutcome::Direct(_) => self.stats.direct += 1,
            MatchOutcome::FrontFace(_) => self.stats.front_face += 1,
            MatchOutcome::Discarded => {
                log::trace!(
                    "No client card for {} ({} #{})",
                    card.name,
                    card.set,
                    card.collector_number
                );
                self.stats.discarded += 1;
            }
        }
        let arena_id = outcome.arena_id()?;
        Some(MatchedCard { arena_id, card })
    }

    pub fn stats(&self) -> ReconcileStats {
        self.stats
    }
}

struct RecordVisitor<F>(F);

impl<'de, F> Visitor<'de> for RecordVisitor<F>
where
    F: FnMut(ScryfallCard),
{
    type Value = usize;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an array of Scryfall cards")
    }

    fn visit_seq<A: SeqAccess<'de>>(mut self, mut seq: A) -> Result<usize, A::Error> {
        let mut count = 0;
        while let Some(card) = seq.next_element::<ScryfallCard>()? {
            (self.0)(card);
            count += 1;
        }
        Ok(count)
    }
}

/// Feed every element of a JSON array of cards to `on_record`, one at a
/// time, without holding the array in memory. Returns the element count.
pub fn stream_records<R, F>(reader: R, on_record: F) -> serde_json::Result<usize>
where
    R: Read,
    F: FnMut(ScryfallCard),
{
    let mut de = serde_json::Deserializer::from_reader(reader);
    let count = (&mut de).deserialize_seq(RecordVisitor(on_record))?;
    de.end()?;
    Ok(count)
}

/// Stream a bulk export and collect the printings matching the index
pub fn extract_matches<R: Read>(
    reader: R,
    index: &LocalIndex,
) -> serde_json::Result<(Vec<MatchedCard>, ReconcileStats)> {
    let mut reconciler = Reconciler::new(index);
    let mut matched = Vec::new();
    stream_records(reader, |card| {
        if let Some(m) = reconciler.reconcile(card) {
            matched.push(m);
            if matched.len() % PROGRESS_EVERY == 0 {
                log::info!("Processing... {} cards added", matched.len());
            }
        }
    })?;

    let stats = reconciler.stats();
    log::info!(
        "{} cards added ({} via front face name), {} of {} records discarded",
        stats.matched(),
        stats.front_face,
        stats.discarded,
        stats.seen
    );
    Ok((matched, stats))
}

#[cfg(test)]
#[path = "reconcile_tests.rs"]
mod tests;
