//! Compact seasonal schedule format
//!
//! ```json
//! {"h":["i","t","c","s","d"],"n":[[52991,"Sousou no Frieren","1015/138006l",9.3,"Ve"]],"u":[]}
//! ```
//!
//! `h` names the positional fields: id, title, compressed cover, score, day
//! (and `y`, the translated synopsis, when translation is enabled). `n` holds
//! the current season, `u` the upcoming one.

use crate::records::{SeasonAnime, SENTINEL};
use serde::de::Error as _;
use serde::ser::SerializeSeq;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Header without synopsis
pub const HEADER: [&str; 5] = ["i", "t", "c", "s", "d"];

/// Header code of the optional synopsis column
pub const SYNOPSIS_FIELD: &str = "y";

const DAY_ABBREVIATIONS: &[(&str, &str)] = &[
    ("Mondays", "Lu"),
    ("Tuesdays", "Ma"),
    ("Wednesdays", "Me"),
    ("Thursdays", "Je"),
    ("Fridays", "Ve"),
    ("Saturdays", "Sa"),
    ("Sundays", "Di"),
];

/// Reduces a cover URL to the part between `prefix` and `suffix`
///
/// Anything that does not match both ends (or no URL at all) becomes `"~"`.
///
/// ```
/// use anime_harvest::output::compress_cover;
///
/// let prefix = "https://cdn.myanimelist.net/images/anime/";
/// assert_eq!(
///     compress_cover(Some("https://cdn.myanimelist.net/images/anime/1015/138006l.jpg"), prefix, ".jpg"),
///     "1015/138006l"
/// );
/// assert_eq!(compress_cover(Some("https://example.com/x.png"), prefix, ".jpg"), "~");
/// ```
pub fn compress_cover(url: Option<&str>, prefix: &str, suffix: &str) -> String {
    url.filter(|u| u.len() >= prefix.len() + suffix.len())
        .and_then(|u| u.strip_prefix(prefix))
        .and_then(|u| u.strip_suffix(suffix))
        .map(str::to_string)
        .unwrap_or_else(|| SENTINEL.to_string())
}

/// Two-letter day code for a broadcast day such as "Mondays"
pub fn abbreviate_day(day: Option<&str>) -> &'static str {
    day.and_then(|day| {
        DAY_ABBREVIATIONS
            .iter()
            .find(|(name, _)| *name == day)
            .map(|(_, code)| *code)
    })
    .unwrap_or(SENTINEL)
}

/// Score column: a number, or the sentinel when unscored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Score {
    Value(f64),
    Missing(String),
}

impl From<Option<f64>> for Score {
    fn from(score: Option<f64>) -> Self {
        match score {
            Some(value) => Self::Value(value),
            None => Self::Missing(SENTINEL.to_string()),
        }
    }
}

/// One positional row of the compact format
#[derive(Debug, Clone, PartialEq)]
pub struct CompactAnime {
    pub id: Option<u64>,
    pub title: Option<String>,
    pub cover: String,
    pub score: Score,
    pub day: String,
    /// Present only when translation is enabled
    pub synopsis: Option<String>,
}

impl CompactAnime {
    /// Builds a row from a record using the cover prefix/suffix to compress
    pub fn from_record(anime: &SeasonAnime, cover_prefix: &str, cover_suffix: &str) -> Self {
        Self {
            id: anime.mal_id,
            title: anime.title.clone(),
            cover: compress_cover(anime.cover_url.as_deref(), cover_prefix, cover_suffix),
            score: Score::from(anime.score),
            day: abbreviate_day(anime.broadcast_day.as_deref()).to_string(),
            synopsis: None,
        }
    }

    /// Returns the row with a synopsis column
    pub fn with_synopsis(self, synopsis: impl Into<String>) -> Self {
        Self {
            synopsis: Some(synopsis.into()),
            ..self
        }
    }
}

impl Serialize for CompactAnime {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let len = if self.synopsis.is_some() { 6 } else { 5 };
        let mut seq = serializer.serialize_seq(Some(len))?;
        seq.serialize_element(&self.id)?;
        seq.serialize_element(&self.title)?;
        seq.serialize_element(&self.cover)?;
        seq.serialize_element(&self.score)?;
        seq.serialize_element(&self.day)?;
        if let Some(synopsis) = &self.synopsis {
            seq.serialize_element(synopsis)?;
        }
        seq.end()
    }
}

impl<'de> Deserialize<'de> for CompactAnime {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let fields = Vec::<Value>::deserialize(deserializer)?;
        if fields.len() != 5 && fields.len() != 6 {
            return Err(D::Error::invalid_length(
                fields.len(),
                &"a row of 5 or 6 fields",
            ));
        }

        let mut fields = fields.into_iter();
        let mut next = |name: &str| {
            fields
                .next()
                .ok_or_else(|| D::Error::custom(format!("missing field {}", name)))
        };

        let id = serde_json::from_value(next("id")?).map_err(D::Error::custom)?;
        let title = serde_json::from_value(next("title")?).map_err(D::Error::custom)?;
        let cover = serde_json::from_value(next("cover")?).map_err(D::Error::custom)?;
        let score = serde_json::from_value(next("score")?).map_err(D::Error::custom)?;
        let day = serde_json::from_value(next("day")?).map_err(D::Error::custom)?;
        let synopsis = match fields.next() {
            Some(value) => Some(serde_json::from_value(value).map_err(D::Error::custom)?),
            None => None,
        };

        Ok(Self {
            id,
            title,
            cover,
            score,
            day,
            synopsis,
        })
    }
}

/// The whole compact document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompactSeasons {
    #[serde(rename = "h")]
    pub header: Vec<String>,
    #[serde(rename = "n")]
    pub current: Vec<CompactAnime>,
    #[serde(rename = "u")]
    pub upcoming: Vec<CompactAnime>,
}

impl CompactSeasons {
    pub fn new(current: Vec<CompactAnime>, upcoming: Vec<CompactAnime>, with_synopsis: bool) -> Self {
        let mut header: Vec<String> = HEADER.iter().map(|h| h.to_string()).collect();
        if with_synopsis {
            header.push(SYNOPSIS_FIELD.to_string());
        }

        Self {
            header,
            current,
            upcoming,
        }
    }
}
