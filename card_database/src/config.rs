//! Run configuration: refresh levels and the on-disk layout of every artifact

use std::path::PathBuf;

/// Stage to force-refresh, selected on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum RefreshLevel {
    /// Re-download the Scryfall bulk data (and rebuild everything after it)
    #[value(name = "dl")]
    Download,
    /// Re-extract the Arena subset of the bulk data
    Extract,
    /// Rebuild the card cache and translations
    Cache,
    /// Re-scrape the limited ratings
    Ratings,
    /// Rebuild the Jumpstart booster lists
    #[value(name = "jmp")]
    Boosters,
}

/// Which cached artifacts must be recomputed even if present
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ForceFlags {
    pub download: bool,
    pub extract: bool,
    pub cache: bool,
    pub ratings: bool,
    pub boosters: bool,
}

impl ForceFlags {
    /// Expand a refresh level into flags. Download cascades to extract and
    /// cache, extract cascades to cache.
    pub fn from_level(level: Option<RefreshLevel>) -> Self {
        let download = level == Some(RefreshLevel::Download);
        let extract = download || level == Some(RefreshLevel::Extract);
        let cache = extract || level == Some(RefreshLevel::Cache);
        Self {
            download,
            extract,
            cache,
            ratings: level == Some(RefreshLevel::Ratings),
            boosters: level == Some(RefreshLevel::Boosters),
        }
    }
}

/// File locations of inputs, intermediate caches and published outputs
#[derive(Debug, Clone)]
pub struct Layout {
    /// Directory holding the Arena client's `data_loc_*.mtga` and `data_cards_*.mtga`
    pub mtga_data_dir: PathBuf,
    /// Working directory for downloads, caches and hand-maintained inputs
    pub data_dir: PathBuf,
    /// Public directory of the front-end application
    pub public_dir: PathBuf,
}

impl Layout {
    pub fn new(
        mtga_data_dir: impl Into<PathBuf>,
        data_dir: impl Into<PathBuf>,
        public_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            mtga_data_dir: mtga_data_dir.into(),
            data_dir: data_dir.into(),
            public_dir: public_dir.into(),
        }
    }

    pub fn bulk_data(&self) -> PathBuf {
        self.data_dir.join("scryfall-all-cards.json")
    }

    pub fn bulk_arena(&self) -> PathBuf {
        self.data_dir.join("BulkArena.json")
    }

    pub fn key_table_debug(&self) -> PathBuf {
        self.data_dir.join("MTGADataDebug.json")
    }

    pub fn base_ratings(&self) -> PathBuf {
        self.data_dir.join("ratings_base.json")
    }

    pub fn ratings_cache(&self) -> PathBuf {
        self.data_dir.join("ratings.json")
    }

    pub fn rating_sources_dir(&self) -> PathBuf {
        self.data_dir.join("LimitedRatings")
    }

    pub fn booster_definitions_dir(&self) -> PathBuf {
        self.data_dir.join("JumpstartBoosters")
    }

    pub fn booster_swaps(&self) -> PathBuf {
        self.data_dir.join("JumpstartSwaps.json")
    }

    pub fn boosters(&self) -> PathBuf {
        self.data_dir.join("JumpstartBoosters.json")
    }

    fn public_data(&self) -> PathBuf {
        self.public_dir.join("data")
    }

    pub fn cards(&self) -> PathBuf {
        self.public_data().join("MTGACards.json")
    }

    pub fn translations(&self, lang: &str) -> PathBuf {
        self.public_data().join(format!("MTGACards.{}.json", lang))
    }

    pub fn sets_infos(&self) -> PathBuf {
        self.public_data().join("SetsInfos.json")
    }

    pub fn basic_land_ids(&self) -> PathBuf {
        self.public_data().join("BasicLandIDs.json")
    }

    /// Icon path as referenced by the front-end, relative to the public directory
    pub fn set_icon_ref(set: &str) -> String {
        format!("img/sets/{}.svg", set)
    }

    pub fn set_icon(&self, set: &str) -> PathBuf {
        self.public_dir.join(Self::set_icon_ref(set))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_refresh_level_forces_nothing() {
        assert_eq!(ForceFlags::from_level(None), ForceFlags::default());
    }

    #[test]
    fn download_cascades_to_extract_and_cache() {
        let flags = ForceFlags::from_level(Some(RefreshLevel::Download));
        assert!(flags.download && flags.extract && flags.cache);
        assert!(!flags.ratings && !flags.boosters);
    }

    #[test]
    fn extract_cascades_to_cache_only() {
        let flags = ForceFlags::from_level(Some(RefreshLevel::Extract));
        assert!(!flags.download);
        assert!(flags.extract && flags.cache);
    }

    #[test]
    fn ratings_and_boosters_do_not_cascade() {
        let flags = ForceFlags::from_level(Some(RefreshLevel::Ratings));
        assert_eq!(
            flags,
            ForceFlags {
                ratings: true,
                ..ForceFlags::default()
            }
        );

        let flags = ForceFlags::from_level(Some(RefreshLevel::Boosters));
        assert_eq!(
            flags,
            ForceFlags {
                boosters: true,
                ..ForceFlags::default()
            }
        );
    }

    #[test]
    fn layout_paths() {
        let layout = Layout::new("mtga", "data", "client/public");
        assert_eq!(layout.bulk_arena(), PathBuf::from("data/BulkArena.json"));
        assert_eq!(
            layout.translations("zhs"),
            PathBuf::from("client/public/data/MTGACards.zhs.json")
        );
        assert_eq!(
            layout.set_icon("rna"),
            PathBuf::from("client/public/img/sets/rna.svg")
        );
        assert_eq!(Layout::set_icon_ref("m21"), "img/sets/m21.svg");
    }
}
