//! Pagination driver loop
//!
//! Fetches one page at a time, parses it, and threads an explicit accumulator
//! through the loop until the source runs dry or the fetcher gives up:
//!
//! ```text
//! Fetching(n) -> Parsing -> Accumulating -> Fetching(n+1)
//!      |            |             |
//!      v            v             v
//! FetchFailed   NoMoreData    NoMoreData
//! ```
//!
//! Retries live inside the fetcher; the loop never retries a page itself.

use crate::crawler::fetcher::{FetchError, Fetcher};
use crate::state::PagerState;
use crate::HarvestError;
use std::future::Future;

/// Ordered records parsed from one page plus the continuation flag
#[derive(Debug, Clone, PartialEq)]
pub struct PageResult<R> {
    pub records: Vec<R>,
    pub has_next_page: bool,
}

impl<R> PageResult<R> {
    /// A page that ends pagination
    pub fn empty() -> Self {
        Self {
            records: Vec::new(),
            has_next_page: false,
        }
    }
}

/// Something that can turn a URL into a page body
pub trait PageFetcher {
    fn fetch_page(&self, url: &str) -> impl Future<Output = Result<String, FetchError>> + Send;
}

impl PageFetcher for Fetcher {
    async fn fetch_page(&self, url: &str) -> Result<String, FetchError> {
        self.get(url).await
    }
}

/// A paginated endpoint together with its payload parser
pub trait PageSource {
    type Record;

    /// Label used in logs
    fn name(&self) -> &str;

    /// URL of the page with the given index
    fn page_url(&self, page: u32) -> String;

    /// Parses a page body; must not fail, malformed input yields fewer records
    fn parse_page(&self, body: &str, page_url: &str) -> PageResult<Self::Record>;

    fn first_page(&self) -> u32 {
        1
    }

    /// Upper bound on the number of pages fetched
    fn max_pages(&self) -> Option<u32> {
        None
    }
}

/// What a finished pagination run produced
#[derive(Debug)]
pub struct PaginationOutcome<R> {
    /// Every candidate record, in page order
    pub records: Vec<R>,
    pub pages_fetched: u32,
    /// `NoMoreData` or `FetchFailed`
    pub final_state: PagerState,
    /// The failure that ended the run, for `FetchFailed`
    pub error: Option<FetchError>,
}

impl<R> PaginationOutcome<R> {
    pub fn is_complete(&self) -> bool {
        self.final_state.is_success()
    }
}

/// Loop step carrying the data each state works on
enum Step<R> {
    Fetch {
        page: u32,
    },
    Parse {
        page: u32,
        url: String,
        body: String,
    },
    Accumulate {
        page: u32,
        result: PageResult<R>,
    },
    Done(PagerState),
}

impl<R> Step<R> {
    fn state(&self) -> PagerState {
        match self {
            Self::Fetch { page } => PagerState::Fetching { page: *page },
            Self::Parse { .. } => PagerState::Parsing,
            Self::Accumulate { .. } => PagerState::Accumulating,
            Self::Done(state) => *state,
        }
    }
}

/// Runs the pagination loop for `source` until a terminal state
///
/// Records gathered before a fetch failure are kept in the outcome.
///
/// # Returns
///
/// * `Ok(PaginationOutcome)` - The loop reached `NoMoreData` or `FetchFailed`
/// * `Err(HarvestError::InvalidTransition)` - The state machine was violated
pub async fn paginate<S, F>(
    source: &S,
    fetcher: &F,
) -> Result<PaginationOutcome<S::Record>, HarvestError>
where
    S: PageSource,
    F: PageFetcher,
{
    let mut records: Vec<S::Record> = Vec::new();
    let mut pages_fetched = 0u32;
    let mut error = None;
    let mut step: Step<S::Record> = Step::Fetch {
        page: source.first_page(),
    };

    loop {
        let from = step.state();
        let next = match step {
            Step::Fetch { page } => {
                if source.max_pages().is_some_and(|max| pages_fetched >= max) {
                    tracing::info!(
                        "{}: page cap of {} reached, stopping",
                        source.name(),
                        pages_fetched
                    );
                    Step::Done(PagerState::NoMoreData)
                } else {
                    let url = source.page_url(page);
                    tracing::info!("{}: fetching page {}", source.name(), page);

                    match fetcher.fetch_page(&url).await {
                        Ok(body) => {
                            pages_fetched += 1;
                            Step::Parse { page, url, body }
                        }
                        Err(e) => {
                            tracing::error!("{}: page {} failed: {}", source.name(), page, e);
                            error = Some(e);
                            Step::Done(PagerState::FetchFailed)
                        }
                    }
                }
            }
            Step::Parse { page, url, body } => {
                let result = source.parse_page(&body, &url);
                if result.records.is_empty() {
                    tracing::info!("{}: no data on page {}, stopping", source.name(), page);
                    Step::Done(PagerState::NoMoreData)
                } else {
                    tracing::debug!(
                        "{}: page {} yielded {} records",
                        source.name(),
                        page,
                        result.records.len()
                    );
                    Step::Accumulate { page, result }
                }
            }
            Step::Accumulate { page, result } => {
                records.extend(result.records);
                match page.checked_add(1) {
                    Some(next_page) if result.has_next_page => Step::Fetch { page: next_page },
                    _ => Step::Done(PagerState::NoMoreData),
                }
            }
            Step::Done(final_state) => {
                return Ok(PaginationOutcome {
                    records,
                    pages_fetched,
                    final_state,
                    error,
                });
            }
        };

        let to = next.state();
        if !from.can_transition_to(&to) {
            return Err(HarvestError::InvalidTransition { from, to });
        }
        tracing::trace!("{}: {} -> {}", source.name(), from, to);
        step = next;
    }
}
