use serde::Deserialize;

/// Main configuration structure for Anime-Harvest
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub fetcher: FetcherConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub seasons: Option<SeasonsConfig>,
    pub catalogue: Option<CatalogueConfig>,
    pub covers: Option<CoversConfig>,
}

/// HTTP fetch and retry behavior
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct FetcherConfig {
    /// Per-request timeout (seconds)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Connection establishment timeout (seconds)
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// Minimum pause between successive successful requests (milliseconds)
    #[serde(default = "default_politeness_delay_ms")]
    pub politeness_delay_ms: u64,

    /// Fixed delay before retrying a timeout or network error (milliseconds)
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,

    /// Wait after an HTTP 429 before retrying (milliseconds)
    #[serde(default = "default_rate_limit_cooldown_ms")]
    pub rate_limit_cooldown_ms: u64,

    /// Maximum number of retries per request
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            politeness_delay_ms: default_politeness_delay_ms(),
            retry_delay_ms: default_retry_delay_ms(),
            rate_limit_cooldown_ms: default_rate_limit_cooldown_ms(),
            max_retries: default_max_retries(),
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct UserAgentConfig {
    /// Name of the crawler
    pub crawler_name: String,

    /// Version of the crawler
    pub crawler_version: String,

    /// URL with information about the crawler
    pub contact_url: String,

    /// Email address for crawler-related contact
    pub contact_email: String,
}

/// Seasonal schedule job (Jikan `/seasons/{season}` endpoint)
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SeasonsConfig {
    #[serde(default = "default_jikan_base")]
    pub api_base: String,

    /// Season path segment for the current season
    #[serde(default = "default_current_season")]
    pub current: String,

    /// Season path segment for the upcoming season
    #[serde(default = "default_upcoming_season")]
    pub upcoming: String,

    #[serde(default = "default_true")]
    pub sfw: bool,

    pub max_pages: Option<u32>,

    #[serde(default = "default_seasons_output")]
    pub output_path: String,

    #[serde(default = "default_cover_prefix")]
    pub cover_prefix: String,

    #[serde(default = "default_cover_suffix")]
    pub cover_suffix: String,

    pub translate: Option<TranslateConfig>,
}

/// Synopsis translation through a LibreTranslate-compatible endpoint
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TranslateConfig {
    pub endpoint: String,

    #[serde(default = "default_translate_source")]
    pub source: String,

    #[serde(default = "default_translate_target")]
    pub target: String,

    /// Maximum number of translations in flight at once
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent: usize,
}

/// HTML catalogue job
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CatalogueConfig {
    pub base_url: String,

    /// Query parameter carrying the page index
    #[serde(default = "default_page_param")]
    pub page_param: String,

    pub max_pages: Option<u32>,

    #[serde(default = "default_catalogue_output")]
    pub output_path: String,

    /// Selector for the anchor wrapping each catalogue card
    #[serde(default = "default_card_selector")]
    pub card_selector: String,

    #[serde(default = "default_title_selector")]
    pub title_selector: String,

    #[serde(default = "default_image_selector")]
    pub image_selector: String,

    /// Text that must appear in a `<p>` near the card for it to be kept
    #[serde(default = "default_marker")]
    pub marker: String,

    /// How many ancestors above the card anchor to search for the marker
    #[serde(default = "default_marker_depth")]
    pub marker_depth: usize,
}

/// Manga cover backfill job (Jikan `/manga` search)
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CoversConfig {
    #[serde(default = "default_jikan_base")]
    pub api_base: String,

    pub input_path: String,

    pub output_path: String,

    /// Number of leading manga entries to process when none is given on the command line
    #[serde(default = "default_count")]
    pub default_count: usize,
}

fn default_timeout_secs() -> u64 {
    15
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_politeness_delay_ms() -> u64 {
    1000
}

fn default_retry_delay_ms() -> u64 {
    5000
}

fn default_rate_limit_cooldown_ms() -> u64 {
    60_000
}

fn default_max_retries() -> u32 {
    3
}

fn default_jikan_base() -> String {
    "https://api.jikan.moe/v4".to_string()
}

fn default_current_season() -> String {
    "now".to_string()
}

fn default_upcoming_season() -> String {
    "upcoming".to_string()
}

fn default_true() -> bool {
    true
}

fn default_seasons_output() -> String {
    "seasonal_animes.json".to_string()
}

fn default_cover_prefix() -> String {
    "https://cdn.myanimelist.net/images/anime/".to_string()
}

fn default_cover_suffix() -> String {
    ".jpg".to_string()
}

fn default_translate_source() -> String {
    "en".to_string()
}

fn default_translate_target() -> String {
    "fr".to_string()
}

fn default_max_concurrent() -> usize {
    8
}

fn default_page_param() -> String {
    "page".to_string()
}

fn default_catalogue_output() -> String {
    "animes.json".to_string()
}

fn default_card_selector() -> String {
    "a.flex.divide-x".to_string()
}

fn default_title_selector() -> String {
    "h1".to_string()
}

fn default_image_selector() -> String {
    "img[src]".to_string()
}

fn default_marker() -> String {
    "Anime".to_string()
}

fn default_marker_depth() -> usize {
    3
}

fn default_count() -> usize {
    100
}
