//! Per-job run reports
//!
//! Every job returns a [`JobReport`]; `main` prints them once all jobs are
//! done.

use crate::state::PagerState;
use chrono::{DateTime, Utc};

/// Summary of one job run
#[derive(Debug, Clone)]
pub struct JobReport {
    /// Job name (`seasons`, `catalogue`, `covers`)
    pub job: String,

    /// Pages successfully fetched
    pub pages_fetched: u32,

    /// Records parsed before deduplication
    pub candidates: usize,

    /// Records written after deduplication
    pub unique: usize,

    /// Terminal pagination state, when the job paginates
    pub final_state: Option<PagerState>,

    /// Job-specific counters, in display order
    pub details: Vec<(String, usize)>,

    /// What ended the job early, if anything
    pub error: Option<String>,

    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl JobReport {
    /// Starts a report stamped with the current time
    pub fn start(job: &str) -> Self {
        Self {
            job: job.to_string(),
            pages_fetched: 0,
            candidates: 0,
            unique: 0,
            final_state: None,
            details: Vec::new(),
            error: None,
            started_at: Utc::now(),
            finished_at: None,
        }
    }

    pub fn detail(&mut self, name: &str, value: usize) {
        self.details.push((name.to_string(), value));
    }

    /// Records the first failure; later ones are only logged
    pub fn fail(&mut self, error: impl ToString) {
        if self.error.is_none() {
            self.error = Some(error.to_string());
        }
    }

    /// Stamps the finish time
    pub fn finish(mut self) -> Self {
        self.finished_at = Some(Utc::now());
        self
    }

    /// True when the job ran to completion without error
    pub fn succeeded(&self) -> bool {
        self.error.is_none() && self.final_state.map_or(true, |s| s.is_success())
    }

    pub fn duration_seconds(&self) -> Option<i64> {
        self.finished_at
            .map(|finished| (finished - self.started_at).num_seconds())
    }

    pub fn duplicates(&self) -> usize {
        self.candidates.saturating_sub(self.unique)
    }
}

/// Prints reports to stdout in a formatted manner
pub fn print_reports(reports: &[JobReport]) {
    println!("=== Harvest Summary ===\n");

    for report in reports {
        print_report(report);
    }

    let failed = reports.iter().filter(|r| !r.succeeded()).count();
    println!("Jobs: {} run, {} failed", reports.len(), failed);
}

/// Prints one report
pub fn print_report(report: &JobReport) {
    let status = if report.succeeded() { "ok" } else { "FAILED" };
    println!("[{}] {}", report.job, status);

    println!("  Started: {}", report.started_at.to_rfc3339());
    if let Some(seconds) = report.duration_seconds() {
        println!("  Duration: {}s", seconds);
    }

    if let Some(state) = report.final_state {
        println!("  Pages fetched: {}", report.pages_fetched);
        println!("  Final state: {}", state);
    }

    if report.candidates > 0 || report.unique > 0 {
        println!("  Candidates: {}", report.candidates);
        println!(
            "  Written: {} ({} duplicates dropped)",
            report.unique,
            report.duplicates()
        );
    }

    for (name, value) in &report.details {
        println!("  {}: {}", name, value);
    }

    if let Some(error) = &report.error {
        println!("  Error: {}", error);
    }
    println!();
}
