//! Payload parsers and page sources
//!
//! Parsers are pure functions from a raw payload to candidate records. They
//! never fail: unreadable fields are left empty and an unreadable page is
//! treated as the last one.

pub mod ancestor;
mod catalogue;
mod jikan;
mod translate;

pub use catalogue::{parse_catalogue_page, CatalogueSelectors, CatalogueSource};
pub use jikan::{
    manga_search_url, parse_manga_search, parse_season_page, season_anime_from_value,
    SeasonSource,
};
pub use translate::Translator;
