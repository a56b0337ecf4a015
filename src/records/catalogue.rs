use super::{IdentityKey, Identified, SENTINEL};
use serde::{Deserialize, Serialize};

/// One card scraped from an HTML catalogue page
///
/// Serialized with the field names downstream consumers of `animes.json`
/// expect; missing link or image is written as `"~"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogueEntry {
    #[serde(rename = "titre")]
    pub title: String,

    #[serde(rename = "lien", with = "super::sentinel", default)]
    pub link: Option<String>,

    #[serde(with = "super::sentinel", default)]
    pub image: Option<String>,
}

impl CatalogueEntry {
    pub fn new(title: Option<String>, link: Option<String>, image: Option<String>) -> Self {
        Self {
            title: title
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| SENTINEL.to_string()),
            link,
            image,
        }
    }
}

impl Identified for CatalogueEntry {
    fn identity_key(&self) -> IdentityKey {
        IdentityKey::derive(self.link.as_deref(), None, Some(&self.title))
    }
}
