//! Arena client export: localization tables and card definitions
//!
//! The client ships `data_loc_*.mtga` (title id → text) and
//! `data_cards_*.mtga` (card attribute objects) in its data folder.

use crate::error::{BuildError, Result};
use crate::store;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// One language block of a localization file
#[derive(Debug, Deserialize)]
struct LocalizationBlock {
    #[serde(default, rename = "isoCode")]
    iso_code: Option<String>,
    keys: Vec<LocalizationKey>,
}

#[derive(Debug, Deserialize)]
struct LocalizationKey {
    id: u64,
    text: String,
}

/// Title id → localized text
#[derive(Debug, Default, Clone)]
pub struct Localization {
    texts: HashMap<u64, String>,
}

impl Localization {
    /// Merge the first language block of every localization file
    pub fn load(files: &[impl AsRef<Path>]) -> Result<Self> {
        let mut texts = HashMap::new();
        for path in files {
            let path = path.as_ref();
            let blocks: Vec<LocalizationBlock> = store::read_json(path)?;
            if let Some(block) = blocks.into_iter().next() {
                log::debug!(
                    "Loaded {} localized texts ({}) from {}",
                    block.keys.len(),
                    block.iso_code.as_deref().unwrap_or("unknown"),
                    path.display()
                );
                texts.extend(block.keys.into_iter().map(|k| (k.id, k.text)));
            }
        }
        Ok(Self { texts })
    }

    pub fn get(&self, title_id: u64) -> Option<&str> {
        self.texts.get(&title_id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.texts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }
}

/// A card definition as exported by the client
#[derive(Debug, Deserialize, Clone)]
pub struct ClientCard {
    pub grpid: u32,
    #[serde(rename = "titleId")]
    pub title_id: u64,
    #[serde(rename = "CollectorNumber", default)]
    pub collector_number: String,
    #[serde(default)]
    pub set: String,
    /// False for alternate arts and other variants sharing a primary card
    #[serde(rename = "isPrimaryCard", default)]
    pub is_primary_card: bool,
}

/// A primary client card with its display name resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalCardEntry {
    pub internal_id: u32,
    pub display_name: String,
    pub set_code: String,
    pub collector_number: String,
}

impl ClientCard {
    pub fn resolve(&self, localization: &Localization) -> Result<LocalCardEntry> {
        let display_name =
            localization
                .get(self.title_id)
                .ok_or(BuildError::MissingLocalization {
                    grpid: self.grpid,
                    title_id: self.title_id,
                })?;
        Ok(LocalCardEntry {
            internal_id: self.grpid,
            display_name: display_name.to_string(),
            set_code: self.set.clone(),
            collector_number: self.collector_number.clone(),
        })
    }
}

/// Everything read from the client's data folder
#[derive(Debug)]
pub struct ClientExport {
    pub localization: Localization,
    pub cards: Vec<ClientCard>,
}

impl ClientExport {
    pub fn load(dir: &Path) -> Result<Self> {
        let loc_files = store::list_files(dir, "data_loc_", ".mtga")?;
        let card_files = store::list_files(dir, "data_cards_", ".mtga")?;
        if card_files.is_empty() {
            return Err(BuildError::MissingFile(dir.join("data_cards_*.mtga")));
        }

        let localization = Localization::load(&loc_files)?;
        if localization.is_empty() {
            log::warn!("No localized texts found in {}", dir.display());
        }
        let mut cards = Vec::new();
        for path in &card_files {
            let mut file_cards: Vec<ClientCard> = store::read_json(path)?;
            log::debug!("Loaded {} cards from {}", file_cards.len(), path.display());
            cards.append(&mut file_cards);
        }

        log::info!(
            "Loaded client export: {} cards, {} localized texts",
            cards.len(),
            localization.len()
        );
        Ok(Self {
            localization,
            cards,
        })
    }

    /// Primary cards with resolved names, in export order
    pub fn primary_entries(&self) -> Result<Vec<LocalCardEntry>> {
        self.cards
            .iter()
            .filter(|card| card.is_primary_card)
            .map(|card| card.resolve(&self.localization))
            .collect()
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
