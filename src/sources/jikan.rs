//! Jikan (MyAnimeList) API payload parsing
//!
//! Two endpoints are used:
//! - `/seasons/{season}?sfw=true&page=n` for seasonal schedules
//! - `/manga?q=name&limit=1` for manga cover lookups

use crate::crawler::{PageResult, PageSource};
use crate::records::SeasonAnime;
use crate::UrlError;
use serde_json::Value;
use url::Url;

/// Parses one page of `/seasons/{season}`
///
/// Items stay untyped until [`season_anime_from_value`] so one odd item cannot
/// sink the whole page. A missing or null `data` means no records and a missing
/// or non-boolean `has_next_page` means last page. Only a body that is not JSON
/// at all yields an empty, terminal page.
pub fn parse_season_page(body: &str) -> PageResult<SeasonAnime> {
    let payload: Value = match serde_json::from_str(body) {
        Ok(payload) => payload,
        Err(e) => {
            tracing::warn!("Unreadable season payload, treating as last page: {}", e);
            return PageResult::empty();
        }
    };

    let records = payload
        .get("data")
        .and_then(Value::as_array)
        .map(|items| items.iter().map(season_anime_from_value).collect())
        .unwrap_or_default();

    let has_next_page = payload
        .pointer("/pagination/has_next_page")
        .and_then(Value::as_bool)
        .unwrap_or(false);

    PageResult {
        records,
        has_next_page,
    }
}

/// Builds a record from one `data[]` item, leaving unreadable fields empty
pub fn season_anime_from_value(item: &Value) -> SeasonAnime {
    SeasonAnime {
        mal_id: item.get("mal_id").and_then(Value::as_u64),
        title: item.get("title").and_then(string_or_number),
        cover_url: item
            .pointer("/images/jpg/large_image_url")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string),
        score: item.get("score").and_then(Value::as_f64),
        broadcast_day: item
            .pointer("/broadcast/day")
            .and_then(Value::as_str)
            .map(str::to_string),
        synopsis: item
            .get("synopsis")
            .and_then(Value::as_str)
            .filter(|s| !s.trim().is_empty())
            .map(str::to_string),
    }
}

/// Some titles are purely numeric and come back as JSON numbers
fn string_or_number(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Returns the first search hit's cover URL, if any
pub fn parse_manga_search(body: &str) -> Option<String> {
    let payload: Value = serde_json::from_str(body).ok()?;

    payload
        .pointer("/data/0/images/jpg/image_url")
        .and_then(Value::as_str)
        .filter(|url| !url.trim().is_empty())
        .map(str::to_string)
}

/// Builds `{api_base}/manga?q={name}&limit=1`
pub fn manga_search_url(api_base: &str, name: &str) -> Result<Url, UrlError> {
    let mut url = endpoint(api_base, &["manga"])?;
    url.query_pairs_mut()
        .append_pair("q", name)
        .append_pair("limit", "1");
    Ok(url)
}

/// Appends path segments to an API base URL
fn endpoint(api_base: &str, segments: &[&str]) -> Result<Url, UrlError> {
    let mut url = Url::parse(api_base).map_err(|e| UrlError::Parse(e.to_string()))?;
    url.path_segments_mut()
        .map_err(|_| UrlError::Malformed(format!("{} cannot be a base URL", api_base)))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// The seasonal schedule endpoint for one season (`now`, `upcoming`, ...)
#[derive(Debug, Clone)]
pub struct SeasonSource {
    name: String,
    base: Url,
    sfw: bool,
    max_pages: Option<u32>,
}

impl SeasonSource {
    pub fn new(
        api_base: &str,
        season: &str,
        sfw: bool,
        max_pages: Option<u32>,
    ) -> Result<Self, UrlError> {
        Ok(Self {
            name: format!("season:{}", season),
            base: endpoint(api_base, &["seasons", season])?,
            sfw,
            max_pages,
        })
    }
}

impl PageSource for SeasonSource {
    type Record = SeasonAnime;

    fn name(&self) -> &str {
        &self.name
    }

    fn page_url(&self, page: u32) -> String {
        let mut url = self.base.clone();
        url.query_pairs_mut()
            .append_pair("sfw", if self.sfw { "true" } else { "false" })
            .append_pair("page", &page.to_string());
        url.to_string()
    }

    fn parse_page(&self, body: &str, _page_url: &str) -> PageResult<SeasonAnime> {
        parse_season_page(body)
    }

    fn max_pages(&self) -> Option<u32> {
        self.max_pages
    }
}
