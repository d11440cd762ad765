//! Scryfall record types
//!
//! Only the attributes the card database consults are modelled; everything
//! else in a Scryfall payload is ignored on deserialization.

use serde::{Deserialize, Serialize};

/// Language code of the canonical (gameplay) record
pub const DEFAULT_LANGUAGE: &str = "en";

/// Separator between face names of split, adventure and double-faced cards
pub const MULTI_FACE_SEPARATOR: &str = " //";

/// Names of the five basic lands. Snow-covered and Wastes are not included.
pub const BASIC_LAND_NAMES: &[&str] = &["Plains", "Island", "Swamp", "Mountain", "Forest"];

fn default_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}

/// One printing of a card in one language, as found in Scryfall bulk data
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ScryfallCard {
    pub name: String,
    #[serde(default = "default_language")]
    pub lang: String,
    pub set: String,
    pub collector_number: String,
    #[serde(default)]
    pub rarity: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_line: Option<String>,
    #[serde(default)]
    pub cmc: f64,
    #[serde(default)]
    pub color_identity: Vec<String>,
    /// Whether the printing can be opened in boosters
    #[serde(default)]
    pub booster: bool,
    /// Scryfall's own Arena ID, only present on some printings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arena_id: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub printed_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_uris: Option<ImageUris>,
    /// For multi-faced cards, per-face names and images are in card_faces
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_faces: Option<Vec<CardFace>>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct ImageUris {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_crop: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct CardFace {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub printed_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_uris: Option<ImageUris>,
}

/// Structural view of a card: either one face, or an ordered list of faces
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CardShape<'a> {
    SingleFaced,
    MultiFaced(&'a [CardFace]),
}

impl ScryfallCard {
    pub fn shape(&self) -> CardShape<'_> {
        match self.card_faces.as_deref() {
            Some(faces) if !faces.is_empty() => CardShape::MultiFaced(faces),
            _ => CardShape::SingleFaced,
        }
    }

    fn front_face(&self) -> Option<&CardFace> {
        match self.shape() {
            CardShape::MultiFaced(faces) => faces.first(),
            CardShape::SingleFaced => None,
        }
    }

    /// Localized name, falling back to the front face's
    pub fn localized_name(&self) -> Option<&str> {
        self.printed_name
            .as_deref()
            .or_else(|| self.front_face()?.printed_name.as_deref())
    }

    /// Border-cropped image URL, falling back to the front face's
    pub fn border_crop_url(&self) -> Option<&str> {
        if let Some(url) = self
            .image_uris
            .as_ref()
            .and_then(|uris| uris.border_crop.as_deref())
        {
            return Some(url);
        }
        self.front_face()?.image_uris.as_ref()?.border_crop.as_deref()
    }

    /// Name of the front face: "Fire" for "Fire // Ice"
    pub fn front_face_name(&self) -> Option<&str> {
        self.name
            .split_once(MULTI_FACE_SEPARATOR)
            .map(|(front, _)| front)
    }

    pub fn is_default_language(&self) -> bool {
        self.lang == DEFAULT_LANGUAGE
    }

    /// Basic land by type line, or by name when the type line is missing
    pub fn is_basic_land(&self) -> bool {
        self.type_line
            .as_deref()
            .is_some_and(|line| line.contains("Basic Land"))
            || BASIC_LAND_NAMES.contains(&self.name.as_str())
    }
}

/// Response of the `/bulk-data` endpoint
#[derive(Debug, Deserialize, Clone)]
pub struct BulkDataCatalog {
    pub data: Vec<BulkDataEntry>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BulkDataEntry {
    #[serde(rename = "type")]
    pub kind: String,
    pub download_uri: String,
}

impl BulkDataCatalog {
    /// Download URI of the bulk file of the given type (e.g. "all_cards")
    pub fn download_uri(&self, kind: &str) -> Option<&str> {
        self.data
            .iter()
            .find(|entry| entry.kind == kind)
            .map(|entry| entry.download_uri.as_str())
    }
}

/// One page of a `/cards/search` response
#[derive(Debug, Deserialize, Clone)]
pub struct SearchPage {
    #[serde(default)]
    pub data: Vec<ScryfallCard>,
    #[serde(default)]
    pub has_more: bool,
    #[serde(default)]
    pub next_page: Option<String>,
}

/// Response of the `/sets/{code}` endpoint
#[derive(Debug, Deserialize, Clone)]
pub struct SetMetadata {
    pub code: String,
    #[serde(default)]
    pub icon_svg_uri: Option<String>,
}

#[cfg(test)]
#[path = "scryfall_tests.rs"]
mod tests;
