//! Limited ratings: base table, scraped tier lists and the ratings cache
//!
//! Layers are merged right-biased: a later layer's rating replaces an
//! earlier one for the same card name.

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::BTreeMap;

/// Card name → rating
pub type RatingTable = BTreeMap<String, f64>;

/// Rating given to cards absent from every layer
pub const DEFAULT_RATING: f64 = 0.5;

lazy_static! {
    static ref RATING_ATTRS: Regex =
        Regex::new(r#"<[^>]*?data-name="([^"]+)"[^>]*?data-rating="([^"]+)">"#)
            .expect("rating pattern is valid");
}

/// A rating value that is neither a number nor a `a//b` split-card pair
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Malformed rating '{text}' for {name}")]
pub struct RatingParseError {
    pub name: String,
    pub text: String,
}

/// Parse a rating. Split cards are rated per half as `a//b`; their rating
/// is the mean of the first two halves. Non-finite values are rejected,
/// they cannot be stored in JSON.
pub fn parse_rating(text: &str) -> Option<f64> {
    let text = text.trim();
    let rating = match text.parse::<f64>() {
        Ok(rating) => rating,
        Err(_) => {
            let mut halves = text.split("//").map(|half| half.trim().parse::<f64>());
            let left = halves.next()?.ok()?;
            let right = halves.next()?.ok()?;
            (left + right) / 2.0
        }
    };
    rating.is_finite().then_some(rating)
}

/// (name, rating text) pairs from the `data-name`/`data-rating` attributes
/// of a tier-list page
pub fn scrape_ratings(html: &str) -> Vec<(String, String)> {
    RATING_ATTRS
        .captures_iter(html)
        .map(|caps| (caps[1].to_string(), caps[2].to_string()))
        .collect()
}

/// Build a layer from scraped pairs. Malformed entries are returned
/// alongside so the caller can report them; they never abort the layer.
pub fn parse_layer<I>(pairs: I) -> (RatingTable, Vec<RatingParseError>)
where
    I: IntoIterator<Item = (String, String)>,
{
    let mut table = RatingTable::new();
    let mut errors = Vec::new();
    for (name, text) in pairs {
        match parse_rating(&text) {
            Some(rating) => {
                table.insert(name, rating);
            }
            None => errors.push(RatingParseError { name, text }),
        }
    }
    (table, errors)
}

/// Layered rating merge, folding tables from lowest to highest precedence
#[derive(Debug, Clone)]
pub struct RatingMerger {
    merged: RatingTable,
}

impl RatingMerger {
    pub fn new(base: RatingTable) -> Self {
        Self { merged: base }
    }

    /// Overlay a layer; its entries win over everything merged so far
    pub fn layer(mut self, layer: RatingTable) -> Self {
        self.merged.extend(layer);
        self
    }

    /// Parse and overlay scraped pairs, logging and skipping malformed ones
    pub fn scraped_layer<I>(self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let (layer, errors) = parse_layer(pairs);
        for error in &errors {
            log::warn!("{}", error);
        }
        self.layer(layer)
    }

    pub fn finish(self) -> RatingTable {
        self.merged
    }
}

/// Rating of a card, or the default for unrated cards
pub fn rating_for(table: &RatingTable, name: &str) -> f64 {
    table.get(name).copied().unwrap_or(DEFAULT_RATING)
}

#[cfg(test)]
#[path = "ratings_tests.rs"]
mod tests;
