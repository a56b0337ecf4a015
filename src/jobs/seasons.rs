//! Seasonal schedule job
//!
//! Pages through the current and upcoming seasons at the same time on one
//! shared fetcher, deduplicates each list, optionally translates synopses and
//! writes the compact schedule file.

use crate::config::SeasonsConfig;
use crate::crawler::{dedup_by_identity, paginate, run_bounded, Fetcher, PaginationOutcome};
use crate::output::{write_compact, CompactAnime, CompactSeasons, JobReport};
use crate::records::{SeasonAnime, SENTINEL};
use crate::sources::{SeasonSource, Translator};
use crate::state::PagerState;
use crate::HarvestError;
use std::path::Path;

pub const JOB_NAME: &str = "seasons";

/// Runs the seasons job
///
/// A fetch failure in either season ends that season's pagination; whatever
/// was gathered is still written and the failure is recorded in the report.
pub async fn run_seasons(config: &SeasonsConfig, fetcher: &Fetcher) -> Result<JobReport, HarvestError> {
    let mut report = JobReport::start(JOB_NAME);

    let current_source = SeasonSource::new(&config.api_base, &config.current, config.sfw, config.max_pages)?;
    let upcoming_source = SeasonSource::new(&config.api_base, &config.upcoming, config.sfw, config.max_pages)?;

    let (current, upcoming) = tokio::join!(
        paginate(&current_source, fetcher),
        paginate(&upcoming_source, fetcher)
    );
    let current = collect(&mut report, current?);
    let upcoming = collect(&mut report, upcoming?);

    report.detail("Current season", current.len());
    report.detail("Upcoming season", upcoming.len());

    let (current_rows, upcoming_rows) = match &config.translate {
        Some(translate) => {
            let translator = Translator::new(fetcher.client().clone(), translate);
            let (rows, translated) =
                translated_rows(&current, &upcoming, config, &translator, translate.max_concurrent).await;
            report.detail("Synopses translated", translated);
            rows
        }
        None => (
            compact_rows(&current, config),
            compact_rows(&upcoming, config),
        ),
    };

    let document = CompactSeasons::new(current_rows, upcoming_rows, config.translate.is_some());
    write_compact(Path::new(&config.output_path), &document)?;
    tracing::info!(
        "Wrote {} current and {} upcoming anime to {}",
        document.current.len(),
        document.upcoming.len(),
        config.output_path
    );

    Ok(report.finish())
}

/// Folds one pagination outcome into the report and deduplicates its records
fn collect(report: &mut JobReport, outcome: PaginationOutcome<SeasonAnime>) -> Vec<SeasonAnime> {
    report.pages_fetched += outcome.pages_fetched;
    report.candidates += outcome.records.len();

    // Either season failing marks the whole job
    if report.final_state != Some(PagerState::FetchFailed) {
        report.final_state = Some(outcome.final_state);
    }
    if let Some(error) = &outcome.error {
        report.fail(error);
    }

    let unique = dedup_by_identity(outcome.records);
    report.unique += unique.len();
    unique
}

fn compact_rows(records: &[SeasonAnime], config: &SeasonsConfig) -> Vec<CompactAnime> {
    records
        .iter()
        .map(|anime| CompactAnime::from_record(anime, &config.cover_prefix, &config.cover_suffix))
        .collect()
}

/// Builds rows with a translated synopsis column
///
/// Both seasons go through one bounded task group; a missing synopsis, a failed
/// translation or a panicked task all leave `"~"`.
async fn translated_rows(
    current: &[SeasonAnime],
    upcoming: &[SeasonAnime],
    config: &SeasonsConfig,
    translator: &Translator,
    limit: usize,
) -> ((Vec<CompactAnime>, Vec<CompactAnime>), usize) {
    let synopses: Vec<Option<String>> = current
        .iter()
        .chain(upcoming)
        .map(|anime| anime.synopsis.clone())
        .collect();

    tracing::info!("Translating {} synopses", synopses.len());

    let translated = run_bounded(synopses, limit, |synopsis| {
        let translator = translator.clone();
        async move {
            let Some(text) = synopsis else {
                return None;
            };
            match translator.translate(&text).await {
                Ok(translation) => Some(translation),
                Err(e) => {
                    tracing::warn!("Translation failed: {}", e);
                    None
                }
            }
        }
    })
    .await;

    let translated: Vec<Option<String>> = translated.into_iter().map(Option::flatten).collect();
    let done = translated.iter().filter(|t| t.is_some()).count();
    let mut synopses = translated
        .into_iter()
        .map(|t| t.unwrap_or_else(|| SENTINEL.to_string()));

    let current_rows = attach_synopses(compact_rows(current, config), &mut synopses);
    let upcoming_rows = attach_synopses(compact_rows(upcoming, config), &mut synopses);

    ((current_rows, upcoming_rows), done)
}

fn attach_synopses(
    rows: Vec<CompactAnime>,
    synopses: &mut impl Iterator<Item = String>,
) -> Vec<CompactAnime> {
    rows.into_iter()
        .map(|row| {
            let synopsis = synopses.next().unwrap_or_else(|| SENTINEL.to_string());
            row.with_synopsis(synopsis)
        })
        .collect()
}
