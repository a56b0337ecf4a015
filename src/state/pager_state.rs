/// Pagination state definitions for the harvest driver loop
use std::fmt;

/// Represents the current state of a paginated harvest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PagerState {
    // ===== Active States =====
    /// Requesting the given page index
    Fetching { page: u32 },

    /// Turning the raw payload of the current page into candidate records
    Parsing,

    /// Appending the page's records to the accumulator
    Accumulating,

    // ===== Terminal States =====
    /// An empty page was parsed, the source reported no next page, or the page cap was hit
    NoMoreData,

    /// The fetcher gave up on a page after exhausting its retries
    FetchFailed,
}

impl PagerState {
    /// Returns true if this is a terminal state (the loop must stop)
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::NoMoreData | Self::FetchFailed)
    }

    /// Returns true if the harvest ended without a fetch failure
    pub fn is_success(&self) -> bool {
        matches!(self, Self::NoMoreData)
    }

    /// Returns true if moving from `self` to `next` is a legal step
    ///
    /// ```text
    /// Fetching(n) -> Parsing | FetchFailed | NoMoreData
    /// Parsing     -> Accumulating | NoMoreData
    /// Accumulating-> Fetching(n+1) | NoMoreData
    /// ```
    ///
    /// `Fetching -> NoMoreData` covers a page cap reached before the request.
    pub fn can_transition_to(&self, next: &PagerState) -> bool {
        match (self, next) {
            (Self::Fetching { .. }, Self::Parsing)
            | (Self::Fetching { .. }, Self::FetchFailed)
            | (Self::Fetching { .. }, Self::NoMoreData)
            | (Self::Parsing, Self::Accumulating)
            | (Self::Parsing, Self::NoMoreData)
            | (Self::Accumulating, Self::Fetching { .. })
            | (Self::Accumulating, Self::NoMoreData) => true,
            _ => false,
        }
    }

    /// Short label used in logs and reports
    pub fn label(&self) -> &'static str {
        match self {
            Self::Fetching { .. } => "fetching",
            Self::Parsing => "parsing",
            Self::Accumulating => "accumulating",
            Self::NoMoreData => "no_more_data",
            Self::FetchFailed => "fetch_failed",
        }
    }
}

impl fmt::Display for PagerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fetching { page } => write!(f, "fetching(page={})", page),
            other => write!(f, "{}", other.label()),
        }
    }
}
