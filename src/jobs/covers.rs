//! Manga cover job
//!
//! Fills empty `coverUrl` fields of a manga list from the Jikan manga search.
//! Only the first `count` entries are looked at; the rest of the document is
//! written back untouched.

use crate::config::CoversConfig;
use crate::crawler::{FetchError, PageFetcher};
use crate::output::{read_json, write_json_pretty, JobReport};
use crate::records::{MangaDocument, MangaEntry};
use crate::sources::{manga_search_url, parse_manga_search};
use crate::HarvestError;
use std::path::Path;

pub const JOB_NAME: &str = "covers";

/// Counters printed after a covers run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CoverSummary {
    pub processed: usize,
    pub empty_before: usize,
    pub fetched: usize,
}

impl CoverSummary {
    pub fn remaining_empty(&self) -> usize {
        self.empty_before - self.fetched
    }
}

/// Runs the covers job over the first `count` manga entries
pub async fn run_covers<F: PageFetcher>(
    config: &CoversConfig,
    fetcher: &F,
    count: usize,
) -> Result<JobReport, HarvestError> {
    let mut report = JobReport::start(JOB_NAME);

    let document: MangaDocument = read_json(Path::new(&config.input_path))?;
    tracing::info!(
        "Read {} mangas from {}, processing the first {}",
        document.mangas.len(),
        config.input_path,
        count
    );

    let (document, summary) = fill_covers(document, count, |name| {
        let api_base = config.api_base.clone();
        async move { lookup_cover(fetcher, &api_base, &name).await }
    })
    .await;

    write_json_pretty(Path::new(&config.output_path), &document)?;
    tracing::info!("Wrote updated manga list to {}", config.output_path);

    report.detail("Mangas processed", summary.processed);
    report.detail("Empty coverUrl before", summary.empty_before);
    report.detail("Covers fetched", summary.fetched);
    report.detail("Remaining empty", summary.remaining_empty());

    Ok(report.finish())
}

/// Looks up one cover; not-found and errors both mean "no cover"
async fn lookup_cover<F: PageFetcher>(fetcher: &F, api_base: &str, name: &str) -> Option<String> {
    let url = match manga_search_url(api_base, name) {
        Ok(url) => url,
        Err(e) => {
            tracing::warn!("Cannot build search URL for '{}': {}", name, e);
            return None;
        }
    };

    match fetcher.fetch_page(url.as_str()).await {
        Ok(body) => parse_manga_search(&body),
        Err(FetchError::NotFound { .. }) => {
            tracing::info!("'{}' not found", name);
            None
        }
        Err(e) => {
            tracing::warn!("Cover lookup failed for '{}': {}", name, e);
            None
        }
    }
}

/// Fills empty covers among the first `count` entries using `lookup`
///
/// Lookups run one after another; the fetcher behind `lookup` paces them.
pub async fn fill_covers<L, Fut>(
    document: MangaDocument,
    count: usize,
    lookup: L,
) -> (MangaDocument, CoverSummary)
where
    L: Fn(String) -> Fut,
    Fut: std::future::Future<Output = Option<String>>,
{
    let processed = count.min(document.mangas.len());
    let mut summary = CoverSummary {
        processed,
        ..Default::default()
    };

    let mut updated: Vec<MangaEntry> = Vec::with_capacity(document.mangas.len());

    for (index, entry) in document.mangas.iter().enumerate() {
        if index >= processed || entry.has_cover() {
            updated.push(entry.clone());
            continue;
        }

        summary.empty_before += 1;
        tracing::info!("[{}/{}] Fetching cover for: {}", index + 1, processed, entry.name());

        match lookup(entry.name().to_string()).await {
            Some(cover_url) => {
                tracing::info!("Found: {}", cover_url);
                summary.fetched += 1;
                updated.push(entry.with_cover(cover_url));
            }
            None => updated.push(entry.clone()),
        }
    }

    (document.with_mangas(updated), summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document() -> MangaDocument {
        serde_json::from_str(
            r#"{
                "version": 3,
                "mangas": [
                    {"name": "Berserk", "coverUrl": ""},
                    {"name": "Dorohedoro", "coverUrl": "https://cdn.example.com/d.jpg"},
                    {"name": "Unknown Manga", "coverUrl": "", "status": "ongoing"},
                    {"name": "Blame!", "coverUrl": ""}
                ]
            }"#,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_fills_only_empty_covers_within_count() {
        let (doc, summary) = fill_covers(document(), 3, |name| async move {
            (name != "Unknown Manga").then(|| format!("https://cdn.example.com/{}.jpg", name))
        })
        .await;

        assert_eq!(
            summary,
            CoverSummary {
                processed: 3,
                empty_before: 2,
                fetched: 1
            }
        );
        assert_eq!(summary.remaining_empty(), 1);

        assert_eq!(doc.mangas[0].cover_url(), "https://cdn.example.com/Berserk.jpg");
        assert_eq!(doc.mangas[1].cover_url(), "https://cdn.example.com/d.jpg");
        assert_eq!(doc.mangas[2].cover_url(), "");
        assert_eq!(doc.mangas[2].get("status").and_then(|v| v.as_str()), Some("ongoing"));
        // Beyond the count
        assert_eq!(doc.mangas[3].cover_url(), "");
        assert_eq!(doc.get("version").and_then(|v| v.as_u64()), Some(3));
    }

    #[tokio::test]
    async fn test_count_larger_than_list() {
        let (doc, summary) = fill_covers(document(), 100, |_| async { None }).await;
        assert_eq!(summary.processed, 4);
        assert_eq!(summary.empty_before, 3);
        assert_eq!(summary.fetched, 0);
        assert_eq!(doc, document());
    }
}
