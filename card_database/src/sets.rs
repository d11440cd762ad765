//! Per-set metadata and set icons

use crate::config::Layout;
use crate::error::Result;
use crate::projector::CanonicalCard;
use crate::scryfall::CardSource;
use crate::store;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const SET_FULL_NAMES: &[(&str, &str)] = &[
    ("ana", "Arena"),
    ("akh", "Amonkhet"),
    ("hou", "Hour of Devastation"),
    ("m19", "Core Set 2019"),
    ("xln", "Ixalan"),
    ("rix", "Rivals of Ixalan"),
    ("dom", "Dominaria"),
    ("grn", "Guilds of Ravnica"),
    ("rna", "Ravnica Allegiance"),
    ("war", "War of the Spark"),
    ("m20", "Core Set 2020"),
    ("eld", "Throne of Eldraine"),
    ("thb", "Theros: Beyond Death"),
    ("m21", "Core Set 2021"),
    ("iko", "Ikoria: Lair of Behemoths"),
    ("jmp", "Jumpstart"),
];

/// "con" is a reserved file name on Windows, so its icon is never downloaded.
/// The front-end still gets a reference to it.
const NO_ICON_SET: &str = "con";

/// Scryfall's Ravnica Allegiance icon has a viewBox much taller than its artwork
const VIEWBOX_FIXES: &[(&str, &str, &str)] = &[("rna", "0 0 32 32", "0 6 32 20")];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    pub full_name: String,
    pub card_count: usize,
    /// `<rarity>Count` → number of cards of that rarity
    #[serde(flatten)]
    pub rarity_counts: BTreeMap<String, usize>,
}

pub fn full_set_name(code: &str) -> &str {
    SET_FULL_NAMES
        .iter()
        .find(|(known, _)| *known == code)
        .map_or(code, |(_, name)| *name)
}

/// Card and per-rarity counts of every set, without icons
pub fn aggregate_sets(cards: &BTreeMap<u32, CanonicalCard>) -> BTreeMap<String, SetInfo> {
    let mut by_set: Vec<&CanonicalCard> = cards.values().collect();
    by_set.sort_by(|a, b| a.set.cmp(&b.set));

    let mut sets = BTreeMap::new();
    for group in by_set.chunk_by(|a, b| a.set == b.set) {
        let code = group[0].set.clone();
        let mut by_rarity = group.to_vec();
        by_rarity.sort_by(|a, b| a.rarity.cmp(&b.rarity));
        let rarity_counts = by_rarity
            .chunk_by(|a, b| a.rarity == b.rarity)
            .map(|cards| (format!("{}Count", cards[0].rarity), cards.len()))
            .collect();

        log::info!("\t{}: {}", code, group.len());
        sets.insert(
            code.clone(),
            SetInfo {
                icon: None,
                full_name: full_set_name(&code).to_string(),
                card_count: group.len(),
                rarity_counts,
            },
        );
    }
    sets
}

/// Replace `viewBox="<expected>"` with `viewBox="<corrected>"`, or `None`
/// if the markup does not carry the expected viewbox
pub fn patch_viewbox(svg: &str, expected: &str, corrected: &str) -> Option<String> {
    let expected = format!("viewBox=\"{}\"", expected);
    if !svg.contains(&expected) {
        return None;
    }
    Some(svg.replace(&expected, &format!("viewBox=\"{}\"", corrected)))
}

fn fix_icon(code: &str, bytes: Vec<u8>) -> Vec<u8> {
    let Some((_, expected, corrected)) = VIEWBOX_FIXES.iter().find(|(set, _, _)| *set == code)
    else {
        return bytes;
    };
    let patched = patch_viewbox(&String::from_utf8_lossy(&bytes), expected, corrected);
    match patched {
        Some(fixed) => fixed.into_bytes(),
        None => {
            log::warn!("svg did not have expected viewbox: {}", code);
            bytes
        }
    }
}

/// Attach icon references, downloading icons not yet on disk
pub fn resolve_icons(
    sets: &mut BTreeMap<String, SetInfo>,
    layout: &Layout,
    source: &dyn CardSource,
) -> Result<()> {
    for (code, info) in sets.iter_mut() {
        let path = layout.set_icon(code);
        if path.is_file() || code == NO_ICON_SET {
            info.icon = Some(Layout::set_icon_ref(code));
            continue;
        }

        let Some(uri) = source.set_metadata(code)?.and_then(|meta| meta.icon_svg_uri) else {
            log::warn!("No icon available for set {}", code);
            continue;
        };
        let bytes = fix_icon(code, source.fetch_bytes(&uri)?);
        store::write_bytes(&path, &bytes)?;
        info.icon = Some(Layout::set_icon_ref(code));
    }
    Ok(())
}

/// IDs of basic lands, per set, ascending
pub fn basic_land_ids(cards: &BTreeMap<u32, CanonicalCard>) -> BTreeMap<String, Vec<u32>> {
    let mut lands: BTreeMap<String, Vec<u32>> = BTreeMap::new();
    for (id, card) in cards {
        if mtg_common::BASIC_LAND_NAMES.contains(&card.name.as_str()) {
            lands.entry(card.set.clone()).or_default().push(*id);
        }
    }
    for ids in lands.values_mut() {
        ids.sort_unstable();
    }
    lands
}

#[cfg(test)]
#[path = "sets_tests.rs"]
mod tests;
