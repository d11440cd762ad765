//! Card Database - builds the MTG Arena card data of the draft front-end
//!
//! Every stage caches its output on disk; pass a refresh level to rebuild a
//! stage and the stages depending on it.

use card_database::{run, ForceFlags, Layout, RefreshLevel, ScryfallClient};
use clap::Parser;
use std::path::PathBuf;

/// MTG Arena card database builder
#[derive(Parser, Debug)]
#[command(name = "card_database")]
#[command(version, about, long_about = None)]
struct Args {
    /// Stage to rebuild even if its output exists
    #[arg(value_enum, ignore_case = true)]
    refresh: Option<RefreshLevel>,

    /// Directory holding the client's data_loc_*.mtga and data_cards_*.mtga files
    #[arg(long, default_value = "MTGA_Data/Downloads/Data")]
    mtga_data: PathBuf,

    /// Working directory for downloads, caches and hand-maintained inputs
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,

    /// Public directory of the front-end
    #[arg(long, default_value = "client/public")]
    public_dir: PathBuf,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let force = ForceFlags::from_level(args.refresh);
    let layout = Layout::new(args.mtga_data, args.data_dir, args.public_dir);
    log::debug!("Force flags: {:?}", force);

    let client = match ScryfallClient::new() {
        Ok(client) => client,
        Err(e) => {
            log::error!("Failed to create HTTP client: {}", e);
            std::process::exit(1);
        }
    };

    match run(&layout, force, &client) {
        Ok(summary) => {
            if let Some(matched) = summary.matched {
                log::info!("Extracted {} Scryfall printings", matched);
            }
            if let Some(boosters) = summary.boosters {
                log::info!(
                    "Built {} boosters ({} card lines dropped)",
                    boosters,
                    summary.unresolved_booster_cards
                );
            }
            log::info!(
                "Done: {} client card keys, {} cards, {} sets",
                summary.join_keys,
                summary.cards,
                summary.sets
            );
        }
        Err(e) => {
            log::error!("Build failed: {}", e);
            let mut source = std::error::Error::source(&e);
            while let Some(cause) = source {
                log::error!("  caused by: {}", cause);
                source = cause.source();
            }
            std::process::exit(1);
        }
    }
}
