use crate::config::Layout;
use crate::error::{BuildError, Result};
use crate::projector::CanonicalCard;
use crate::scryfall::CardSource;
use crate::sets::{aggregate_sets, basic_land_ids, full_set_name, patch_viewbox, resolve_icons};
use mtg_common::{ScryfallCard, SetMetadata};
use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::io::Write;
use tempfile::TempDir;

const RNA_SVG: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 32 32"><path d="M0 0"/></svg>"#;

/// Serves set metadata and icons from memory, recording requests
#[derive(Default)]
struct FakeSource {
    icons: HashMap<String, String>,
    requested: RefCell<Vec<String>>,
}

impl FakeSource {
    fn with_icon(mut self, set: &str, svg: &str) -> Self {
        self.icons.insert(set.to_string(), svg.to_string());
        self
    }
}

impl CardSource for FakeSource {
    fn bulk_data_uri(&self, kind: &str) -> Result<String> {
        Err(BuildError::BulkDataUnavailable(kind.to_string()))
    }

    fn download(&self, _url: &str, _out: &mut dyn Write) -> Result<u64> {
        unimplemented!("not used by set aggregation")
    }

    fn search(&self, _query: &str) -> Result<Vec<ScryfallCard>> {
        Ok(Vec::new())
    }

    fn set_metadata(&self, code: &str) -> Result<Option<SetMetadata>> {
        self.requested.borrow_mut().push(code.to_string());
        Ok(self.icons.contains_key(code).then(|| SetMetadata {
            code: code.to_string(),
            icon_svg_uri: Some(format!("icon://{}", code)),
        }))
    }

    fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>> {
        let code = url.trim_start_matches("icon://");
        Ok(self.icons[code].clone().into_bytes())
    }
}

fn card(name: &str, set: &str, rarity: &str) -> CanonicalCard {
    CanonicalCard {
        name: name.to_string(),
        set: set.to_string(),
        cmc: 0.0,
        rarity: rarity.to_string(),
        collector_number: "1".to_string(),
        color_identity: Vec::new(),
        rating: 0.5,
        in_booster: true,
    }
}

fn sample_cards() -> BTreeMap<u32, CanonicalCard> {
    let mut cards = BTreeMap::new();
    cards.insert(1, card("Shock", "m21", "common"));
    cards.insert(2, card("Forest", "war", "common"));
    cards.insert(3, card("Opt", "m21", "common"));
    cards.insert(4, card("Ugin", "war", "mythic"));
    cards.insert(5, card("Baneslayer Angel", "m21", "mythic"));
    cards.insert(6, card("Stasis Snare", "zzz", "uncommon"));
    cards.insert(7, card("Forest", "war", "common"));
    cards.insert(8, card("Plains", "m21", "common"));
    cards
}

#[test]
fn test_aggregate_counts_per_set_and_rarity() {
    let sets = aggregate_sets(&sample_cards());

    assert_eq!(sets.len(), 3);
    let m21 = &sets["m21"];
    assert_eq!(m21.full_name, "Core Set 2021");
    assert_eq!(m21.card_count, 4);
    assert_eq!(m21.rarity_counts.get("commonCount"), Some(&3));
    assert_eq!(m21.rarity_counts.get("mythicCount"), Some(&1));
    assert_eq!(m21.rarity_counts.get("rareCount"), None);

    assert_eq!(sets["zzz"].full_name, "zzz");
}

#[test]
fn test_rarity_counts_sum_to_card_count() {
    for info in aggregate_sets(&sample_cards()).values() {
        assert_eq!(info.rarity_counts.values().sum::<usize>(), info.card_count);
    }
}

#[test]
fn test_set_info_serializes_flat_rarity_counts() {
    let sets = aggregate_sets(&sample_cards());
    let value = serde_json::to_value(&sets["war"]).unwrap();
    assert_eq!(
        value,
        serde_json::json!({
            "fullName": "War of the Spark",
            "cardCount": 3,
            "commonCount": 2,
            "mythicCount": 1
        })
    );
}

#[test]
fn test_full_set_name_falls_back_to_code() {
    assert_eq!(full_set_name("jmp"), "Jumpstart");
    assert_eq!(full_set_name("znr"), "znr");
}

#[test]
fn test_patch_viewbox() {
    assert_eq!(
        patch_viewbox(RNA_SVG, "0 0 32 32", "0 6 32 20").unwrap(),
        RNA_SVG.replace("0 0 32 32", "0 6 32 20")
    );
    assert_eq!(patch_viewbox("<svg viewBox=\"0 0 10 10\"/>", "0 0 32 32", "0 6 32 20"), None);
}

#[test]
fn test_resolve_icons_downloads_missing_and_patches_rna() {
    let temp_dir = TempDir::new().unwrap();
    let layout = Layout::new("mtga", temp_dir.path().join("data"), temp_dir.path());
    let source = FakeSource::default()
        .with_icon("rna", RNA_SVG)
        .with_icon("m21", "<svg viewBox=\"0 0 32 32\"/>");

    let mut cards = sample_cards();
    cards.insert(9, card("Growth Spiral", "rna", "common"));
    let mut sets = aggregate_sets(&cards);
    resolve_icons(&mut sets, &layout, &source).unwrap();

    assert_eq!(sets["rna"].icon.as_deref(), Some("img/sets/rna.svg"));
    assert_eq!(sets["m21"].icon.as_deref(), Some("img/sets/m21.svg"));
    // Unknown to Scryfall: no icon, not fatal
    assert_eq!(sets["zzz"].icon, None);

    let rna = std::fs::read_to_string(layout.set_icon("rna")).unwrap();
    assert!(rna.contains("viewBox=\"0 6 32 20\""));
    let m21 = std::fs::read_to_string(layout.set_icon("m21")).unwrap();
    assert!(m21.contains("viewBox=\"0 0 32 32\""));
}

#[test]
fn test_resolve_icons_references_cached_and_reserved_sets_without_requests() {
    let temp_dir = TempDir::new().unwrap();
    let layout = Layout::new("mtga", temp_dir.path().join("data"), temp_dir.path());
    std::fs::create_dir_all(temp_dir.path().join("img/sets")).unwrap();
    std::fs::write(layout.set_icon("m21"), "<svg/>").unwrap();
    let source = FakeSource::default().with_icon("con", "<svg/>");

    let mut cards = BTreeMap::new();
    cards.insert(1, card("Shock", "m21", "common"));
    cards.insert(2, card("Fiery Fall", "con", "common"));
    let mut sets = aggregate_sets(&cards);
    resolve_icons(&mut sets, &layout, &source).unwrap();

    assert_eq!(sets["m21"].icon.as_deref(), Some("img/sets/m21.svg"));
    assert_eq!(sets["con"].icon.as_deref(), Some("img/sets/con.svg"));
    assert!(source.requested.borrow().is_empty());
    assert!(!layout.set_icon("con").exists());
}

#[test]
fn test_basic_land_ids_grouped_and_sorted() {
    let mut cards = sample_cards();
    cards.insert(100, card("Island", "m21", "common"));
    cards.insert(20, card("Island", "m21", "common"));

    let lands = basic_land_ids(&cards);
    assert_eq!(lands.len(), 2);
    assert_eq!(lands["m21"], vec![8, 20, 100]);
    assert_eq!(lands["war"], vec![2, 7]);
}
