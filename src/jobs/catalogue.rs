//! HTML catalogue job: paginate, deduplicate on links, write `animes.json`

use crate::config::CatalogueConfig;
use crate::crawler::{dedup_by_identity, paginate, PageFetcher};
use crate::output::{write_json_pretty, JobReport};
use crate::sources::CatalogueSource;
use crate::HarvestError;
use std::path::Path;

pub const JOB_NAME: &str = "catalogue";

/// Runs the catalogue job
///
/// Partial results are written when pagination ends on a fetch failure.
pub async fn run_catalogue<F: PageFetcher>(
    config: &CatalogueConfig,
    fetcher: &F,
) -> Result<JobReport, HarvestError> {
    let mut report = JobReport::start(JOB_NAME);
    let source = CatalogueSource::from_config(config)?;

    let outcome = paginate(&source, fetcher).await?;
    report.pages_fetched = outcome.pages_fetched;
    report.final_state = Some(outcome.final_state);
    report.candidates = outcome.records.len();
    if let Some(error) = &outcome.error {
        report.fail(error);
    }

    let unique = dedup_by_identity(outcome.records);
    report.unique = unique.len();

    write_json_pretty(Path::new(&config.output_path), &unique)?;
    tracing::info!("Wrote {} catalogue entries to {}", unique.len(), config.output_path);

    Ok(report.finish())
}
