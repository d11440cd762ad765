//! Card Database - MTG Arena card data builder
//!
//! Joins the card export of the Arena client with Scryfall's bulk data and
//! publishes the card tables, translations, set infos and Jumpstart boosters
//! used by the draft front-end.

pub mod booster;
pub mod client;
pub mod config;
pub mod error;
pub mod key;
pub mod local_index;
pub mod pipeline;
pub mod projector;
pub mod ratings;
pub mod reconcile;
pub mod scryfall;
pub mod sets;
pub mod store;

// Re-export commonly used items
pub use config::{ForceFlags, Layout, RefreshLevel};
pub use error::{BuildError, Result};
pub use key::JoinKey;
pub use local_index::LocalIndex;
pub use pipeline::{run, RunSummary};
pub use projector::CanonicalCard;
pub use reconcile::MatchedCard;
pub use scryfall::{CardSource, ScryfallClient};
