//! Job drivers
//!
//! Each job runs its own fetch → parse → dedupe → write sequence and returns a
//! [`JobReport`](crate::output::JobReport). Jobs share nothing but the fetcher.

mod catalogue;
mod covers;
mod seasons;

pub use catalogue::run_catalogue;
pub use covers::{fill_covers, run_covers, CoverSummary};
pub use seasons::run_seasons;

use crate::config::Config;

/// The jobs a config file can enable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobKind {
    Seasons,
    Catalogue,
    Covers,
}

impl JobKind {
    pub const ALL: [JobKind; 3] = [JobKind::Seasons, JobKind::Catalogue, JobKind::Covers];

    pub fn name(&self) -> &'static str {
        match self {
            JobKind::Seasons => seasons::JOB_NAME,
            JobKind::Catalogue => catalogue::JOB_NAME,
            JobKind::Covers => covers::JOB_NAME,
        }
    }

    /// Returns true if `config` has a section for this job
    pub fn is_configured(&self, config: &Config) -> bool {
        match self {
            JobKind::Seasons => config.seasons.is_some(),
            JobKind::Catalogue => config.catalogue.is_some(),
            JobKind::Covers => config.covers.is_some(),
        }
    }

    /// Every job with a section in `config`, in run order
    pub fn configured(config: &Config) -> Vec<JobKind> {
        Self::ALL
            .into_iter()
            .filter(|job| job.is_configured(config))
            .collect()
    }
}

impl std::fmt::Display for JobKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
