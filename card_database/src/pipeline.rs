//! Build driver
//!
//! Stages run in a fixed order. A stage whose artifact already exists is
//! skipped unless its force flag is set, so an interrupted run resumes where
//! it stopped.

use crate::booster::{parse_booster_list, BoosterResolver, SwapTable};
use crate::client::ClientExport;
use crate::config::{ForceFlags, Layout};
use crate::error::{BuildError, Result};
use crate::local_index::LocalIndex;
use crate::projector::{collect_non_booster_ids, CanonicalCard, CardProjector};
use crate::ratings::{scrape_ratings, RatingMerger, RatingTable};
use crate::reconcile::{extract_matches, MatchedCard};
use crate::scryfall::CardSource;
use crate::sets::{aggregate_sets, basic_land_ids, resolve_icons};
use crate::store::{self, PendingFile};
use std::collections::BTreeMap;
use std::path::Path;

/// Bulk export kind holding every printing in every language
pub const BULK_KIND: &str = "all_cards";

/// Search matching Arena cards that are not opened in boosters
pub const NON_BOOSTER_QUERY: &str = "game:arena -in:booster";

/// Counts reported at the end of a run. Stage-specific counts are `None`
/// when the stage was served from its cache.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub join_keys: usize,
    pub matched: Option<usize>,
    pub cards: usize,
    pub sets: usize,
    pub boosters: Option<usize>,
    pub unresolved_booster_cards: usize,
}

/// Run every stage of the build
pub fn run(layout: &Layout, force: ForceFlags, source: &dyn CardSource) -> Result<RunSummary> {
    let mut summary = RunSummary::default();

    let index = load_local_index(layout)?;
    summary.join_keys = index.len();

    download_bulk(layout, force, source)?;
    summary.matched = extract_arena(layout, force, &index)?;

    let ratings = load_ratings(layout, force)?;
    build_card_cache(layout, force, source, &index, &ratings)?;

    let cards: BTreeMap<u32, CanonicalCard> = store::read_json(&layout.cards())?;
    summary.cards = cards.len();
    log::info!("Cards in database: {}", cards.len());
    store::write_json(&layout.basic_land_ids(), &basic_land_ids(&cards))?;

    if let Some((boosters, unresolved)) = build_boosters(layout, force, &index, &cards)? {
        summary.boosters = Some(boosters);
        summary.unresolved_booster_cards = unresolved;
    }

    let mut sets = aggregate_sets(&cards);
    resolve_icons(&mut sets, layout, source)?;
    store::write_json(&layout.sets_infos(), &sets)?;
    summary.sets = sets.len();

    Ok(summary)
}

fn is_stale(path: &Path, forced: bool) -> bool {
    if forced || !path.is_file() {
        return true;
    }
    log::info!("{} already exists, skipping", path.display());
    false
}

/// Read the client export, index its primary cards and dump the key table
pub fn load_local_index(layout: &Layout) -> Result<LocalIndex> {
    let export = ClientExport::load(&layout.mtga_data_dir)?;
    let index = LocalIndex::build(&export.primary_entries()?);
    if index.is_empty() {
        log::warn!("No client cards found in {}", layout.mtga_data_dir.display());
    } else {
        log::info!("Indexed client cards under {} join keys", index.len());
    }

    store::write_json_pretty(&layout.key_table_debug(), &index.key_table())?;
    Ok(index)
}

fn download_bulk(layout: &Layout, force: ForceFlags, source: &dyn CardSource) -> Result<()> {
    let path = layout.bulk_data();
    if !is_stale(&path, force.download) {
        return Ok(());
    }

    let uri = source.bulk_data_uri(BULK_KIND)?;
    let mut file = PendingFile::create(&path)?;
    source.download(&uri, &mut file)?;
    file.commit()
}

/// Stream the bulk file and store the printings that match a client card.
/// Returns the number of matches, or `None` if the stage was skipped.
fn extract_arena(layout: &Layout, force: ForceFlags, index: &LocalIndex) -> Result<Option<usize>> {
    let path = layout.bulk_arena();
    if !is_stale(&path, force.extract) {
        return Ok(None);
    }

    log::info!("Extracting arena cards to {}...", path.display());
    let bulk = layout.bulk_data();
    let (matched, _) =
        extract_matches(store::open(&bulk)?, index).map_err(|e| BuildError::json(&bulk, e))?;
    store::write_json(&path, &matched)?;
    Ok(Some(matched.len()))
}

/// Base ratings overlaid with the scraped ones, scraping only when the
/// merged cache is missing or forced
pub fn load_ratings(layout: &Layout, force: ForceFlags) -> Result<RatingTable> {
    let base: RatingTable = store::read_json(&layout.base_ratings())?;
    let cache = layout.ratings_cache();
    if !is_stale(&cache, force.ratings) {
        let cached: RatingTable = store::read_json(&cache)?;
        return Ok(RatingMerger::new(base).layer(cached).finish());
    }

    let mut merger = RatingMerger::new(base);
    for path in store::list_files(&layout.rating_sources_dir(), "", ".html")? {
        let pairs = scrape_ratings(&store::read_to_string(&path)?);
        log::info!(
            "Extracting ratings from {}: found {} matches",
            path.display(),
            pairs.len()
        );
        merger = merger.scraped_layer(pairs);
    }
    let ratings = merger.finish();
    store::write_json(&cache, &ratings)?;
    Ok(ratings)
}

fn build_card_cache(
    layout: &Layout,
    force: ForceFlags,
    source: &dyn CardSource,
    index: &LocalIndex,
    ratings: &RatingTable,
) -> Result<()> {
    if !is_stale(&layout.cards(), force.cache) {
        return Ok(());
    }

    log::info!("Requesting non-booster cards list...");
    let non_booster = collect_non_booster_ids(&source.search(NON_BOOSTER_QUERY)?, index);
    log::info!("{} cards are not found in boosters", non_booster.len());

    log::info!("Generating card data cache...");
    let matched: Vec<MatchedCard> = store::read_json(&layout.bulk_arena())?;
    let projection = CardProjector::new(ratings, &non_booster).project(&matched);
    log::info!("Scryfall image URL prefix: {}", projection.image_prefix);

    for (lang, table) in &projection.translations {
        store::write_json(&layout.translations(lang), table)?;
    }
    // Written last: its presence marks the whole stage as done
    store::write_json(&layout.cards(), &projection.cards)
}

/// Returns the booster and unresolved card counts, or `None` if skipped
fn build_boosters(
    layout: &Layout,
    force: ForceFlags,
    index: &LocalIndex,
    cards: &BTreeMap<u32, CanonicalCard>,
) -> Result<Option<(usize, usize)>> {
    let path = layout.boosters();
    if !is_stale(&path, force.boosters) {
        return Ok(None);
    }

    log::info!("Extracting Jumpstart boosters...");
    let swaps: SwapTable = store::read_json(&layout.booster_swaps())?;
    let mut lists = Vec::new();
    for file in store::list_files(&layout.booster_definitions_dir(), "", ".txt")? {
        match parse_booster_list(&store::read_to_string(&file)?) {
            Some(list) => lists.push(list),
            None => log::warn!("Empty booster list: {}", file.display()),
        }
    }

    let report = BoosterResolver::new(index, cards, &swaps).resolve_all(&lists);
    log::info!("Jumpstart boosters: {}", report.boosters.len());
    store::write_json(&path, &report.boosters)?;
    Ok(Some((report.boosters.len(), report.unresolved.len())))
}
