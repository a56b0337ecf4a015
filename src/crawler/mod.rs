//! Crawler module for paginated fetching
//!
//! This module contains the reusable harvesting machinery:
//! - HTTP fetching with retry logic and a politeness delay
//! - The pagination driver loop
//! - Duplicate suppression by identity key
//! - Bounded concurrent enrichment

mod dedup;
mod fetcher;
mod pager;
mod task_group;

pub use dedup::{dedup_by_identity, dedup_by_key};
pub use fetcher::{build_http_client, check_status, classify_error, FetchError, Fetcher, RetryPolicy};
pub use pager::{paginate, PageFetcher, PageResult, PageSource, PaginationOutcome};
pub use task_group::run_bounded;
