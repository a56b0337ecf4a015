use super::{IdentityKey, Identified};
use serde::{Deserialize, Serialize};

/// One anime from a seasonal schedule
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeasonAnime {
    pub mal_id: Option<u64>,
    pub title: Option<String>,
    /// Full-size JPEG cover URL
    pub cover_url: Option<String>,
    pub score: Option<f64>,
    /// Broadcast weekday as published by the API (e.g. "Mondays")
    pub broadcast_day: Option<String>,
    pub synopsis: Option<String>,
}

impl Identified for SeasonAnime {
    fn identity_key(&self) -> IdentityKey {
        IdentityKey::derive(None, self.mal_id, self.title.as_deref())
    }
}
