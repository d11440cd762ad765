//! Shared types for MTG card data sources.
//!
//! Holds the Scryfall record shapes consumed by the card database builder
//! and the error body Scryfall returns on failed requests.

pub mod error;
pub mod scryfall;

pub use error::ApiError;
pub use scryfall::{
    BulkDataCatalog, BulkDataEntry, CardFace, CardShape, ImageUris, ScryfallCard, SearchPage,
    SetMetadata, BASIC_LAND_NAMES, DEFAULT_LANGUAGE, MULTI_FACE_SEPARATOR,
};
