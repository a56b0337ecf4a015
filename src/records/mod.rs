//! Record types produced by the parsers
//!
//! Every record is a fixed-shape struct with explicit optional fields. Defaults
//! are applied at the parse boundary, and records are never modified after
//! creation: enrichment steps build new values instead.

mod anime;
mod catalogue;
mod manga;
pub mod sentinel;

pub use anime::SeasonAnime;
pub use catalogue::CatalogueEntry;
pub use manga::{MangaDocument, MangaEntry};

use crate::url::normalize_url;

/// Placeholder written in place of a missing field
pub const SENTINEL: &str = "~";

/// Key deciding whether two records describe the same item
///
/// Records that carry a link are keyed on the normalized link; the others fall
/// back to the `(id, title)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IdentityKey {
    Link(String),
    IdTitle(Option<u64>, Option<String>),
}

impl IdentityKey {
    /// Builds the canonical key from the fields a record exposes
    ///
    /// A link that fails to normalize is used verbatim rather than dropped, so
    /// two identical malformed links still collapse.
    pub fn derive(link: Option<&str>, id: Option<u64>, title: Option<&str>) -> Self {
        match link.map(str::trim).filter(|l| !l.is_empty() && *l != SENTINEL) {
            Some(link) => match normalize_url(link) {
                Ok(url) => Self::Link(url.to_string()),
                Err(_) => Self::Link(link.to_string()),
            },
            None => Self::IdTitle(id, title.map(str::to_string)),
        }
    }
}

/// Records that can be deduplicated
pub trait Identified {
    fn identity_key(&self) -> IdentityKey;
}
