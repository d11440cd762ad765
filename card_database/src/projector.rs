//! Projection of matched printings into the published card tables
//!
//! Gameplay attributes come from the English printing only and are stored
//! once per internal ID. Names and images are stored per language.

use crate::key::JoinKey;
use crate::local_index::LocalIndex;
use crate::ratings::{rating_for, RatingTable};
use crate::reconcile::MatchedCard;
use mtg_common::ScryfallCard;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Languages that always get a translation file, even an empty one
pub const KNOWN_LANGUAGES: &[&str] = &[
    "en", "es", "fr", "de", "it", "pt", "ja", "ko", "ru", "zhs", "zht", "ph",
];

/// Language-independent card record consumed by the front-end
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalCard {
    pub name: String,
    pub set: String,
    pub cmc: f64,
    pub rarity: String,
    pub collector_number: String,
    pub color_identity: Vec<String>,
    pub rating: f64,
    pub in_booster: bool,
}

/// Per-language presentation data of one card
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Translation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub printed_name: Option<String>,
    /// Image URL, stored without the prefix shared by all images
    #[serde(
        default,
        rename = "image_uris",
        skip_serializing_if = "Option::is_none"
    )]
    pub image: Option<String>,
}

impl Translation {
    pub fn of(card: &ScryfallCard) -> Self {
        Self {
            printed_name: card.localized_name().map(str::to_string),
            image: card.border_crop_url().map(str::to_string),
        }
    }
}

/// Language → internal ID → translation
pub type Translations = BTreeMap<String, BTreeMap<u32, Translation>>;

/// Internal IDs of Arena cards that cannot be opened in boosters, from the
/// results of a `game:arena -in:booster` search
pub fn collect_non_booster_ids<'a, I>(results: I, index: &LocalIndex) -> HashSet<u32>
where
    I: IntoIterator<Item = &'a ScryfallCard>,
{
    results
        .into_iter()
        .filter_map(|card| {
            card.arena_id.or_else(|| {
                index.lookup_by_key(&JoinKey::new(&card.name, &card.collector_number, &card.set))
            })
        })
        .collect()
}

/// Output of a projection run
#[derive(Debug, Clone, Default)]
pub struct CardProjection {
    pub cards: BTreeMap<u32, CanonicalCard>,
    pub translations: Translations,
    /// Prefix removed from every stored image URL
    pub image_prefix: String,
}

pub struct CardProjector<'a> {
    ratings: &'a RatingTable,
    non_booster: &'a HashSet<u32>,
}

impl<'a> CardProjector<'a> {
    pub fn new(ratings: &'a RatingTable, non_booster: &'a HashSet<u32>) -> Self {
        Self {
            ratings,
            non_booster,
        }
    }

    /// Canonical record of a matched English printing
    pub fn canonical(&self, matched: &MatchedCard) -> CanonicalCard {
        let card = &matched.card;
        let excluded = self.non_booster.contains(&matched.arena_id)
            || !card.booster
            || card.is_basic_land();

        CanonicalCard {
            name: card.name.clone(),
            set: card.set.clone(),
            cmc: card.cmc,
            rarity: card.rarity.clone(),
            collector_number: card.collector_number.clone(),
            color_identity: card.color_identity.clone(),
            rating: if excluded {
                0.0
            } else {
                rating_for(self.ratings, &card.name)
            },
            in_booster: !excluded,
        }
    }

    /// Build the card table and translations. When several printings share
    /// an internal ID and language, the last one wins.
    pub fn project<'m, I>(&self, matched: I) -> CardProjection
    where
        I: IntoIterator<Item = &'m MatchedCard>,
    {
        let mut translations: Translations = KNOWN_LANGUAGES
            .iter()
            .map(|lang| (lang.to_string(), BTreeMap::new()))
            .collect();
        let mut cards = BTreeMap::new();

        for m in matched {
            translations
                .entry(m.card.lang.clone())
                .or_default()
                .insert(m.arena_id, Translation::of(&m.card));

            if m.card.is_default_language() {
                cards.insert(m.arena_id, self.canonical(m));
            }
        }

        CardProjection {
            image_prefix: strip_image_prefix(&mut translations),
            cards,
            translations,
        }
    }
}

/// Longest common prefix of `strings`, cut at a character boundary
pub fn common_prefix<'s, I>(strings: I) -> &'s str
where
    I: IntoIterator<Item = &'s str>,
{
    let mut iter = strings.into_iter();
    let Some(first) = iter.next() else {
        return "";
    };

    let mut len = first.len();
    for s in iter {
        len = first
            .bytes()
            .zip(s.bytes())
            .take(len)
            .take_while(|(a, b)| a == b)
            .count();
        if len == 0 {
            break;
        }
    }
    while !first.is_char_boundary(len) {
        len -= 1;
    }
    &first[..len]
}

/// Remove the prefix shared by every stored image URL and return it
pub fn strip_image_prefix(translations: &mut Translations) -> String {
    let prefix = common_prefix(
        translations
            .values()
            .flat_map(BTreeMap::values)
            .filter_map(|t| t.image.as_deref()),
    )
    .to_string();

    if !prefix.is_empty() {
        for translation in translations.values_mut().flat_map(BTreeMap::values_mut) {
            if let Some(image) = translation.image.as_mut() {
                image.replace_range(..prefix.len(), "");
            }
        }
    }
    prefix
}

#[cfg(test)]
#[path = "projector_tests.rs"]
mod tests;
