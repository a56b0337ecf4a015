//! HTML catalogue page parsing
//!
//! Catalogue pages list cards; each card wraps an anchor with the title and
//! cover image, and a short label telling what kind of entry it is. Only cards
//! labelled with the configured marker are kept. A page with no such card is
//! the end of the catalogue.

use crate::config::CatalogueConfig;
use crate::crawler::{PageResult, PageSource};
use crate::records::CatalogueEntry;
use crate::sources::ancestor::has_marker_within;
use crate::url::{resolve_link, with_query_param};
use crate::{ConfigError, HarvestError};
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Compiled selectors and marker settings
#[derive(Debug, Clone)]
pub struct CatalogueSelectors {
    card: Selector,
    title: Selector,
    image: Selector,
    marker: String,
    marker_depth: usize,
}

impl CatalogueSelectors {
    pub fn new(
        card: &str,
        title: &str,
        image: &str,
        marker: &str,
        marker_depth: usize,
    ) -> Result<Self, ConfigError> {
        let compile = |selector: &str| {
            Selector::parse(selector)
                .map_err(|e| ConfigError::InvalidSelector(format!("'{}': {:?}", selector, e)))
        };

        Ok(Self {
            card: compile(card)?,
            title: compile(title)?,
            image: compile(image)?,
            marker: marker.to_string(),
            marker_depth,
        })
    }

    pub fn from_config(config: &CatalogueConfig) -> Result<Self, ConfigError> {
        Self::new(
            &config.card_selector,
            &config.title_selector,
            &config.image_selector,
            &config.marker,
            config.marker_depth,
        )
    }
}

/// Extracts labelled cards from one catalogue page
///
/// Relative links and image sources are resolved against `page_url`. Missing
/// pieces of a card become `None` (title: the sentinel) instead of dropping it.
pub fn parse_catalogue_page(
    html: &str,
    page_url: &Url,
    selectors: &CatalogueSelectors,
) -> PageResult<CatalogueEntry> {
    let document = Html::parse_document(html);

    let records: Vec<CatalogueEntry> = document
        .select(&selectors.card)
        .filter(|card| has_marker_within(card, &selectors.marker, selectors.marker_depth))
        .map(|card| extract_entry(&card, page_url, selectors))
        .collect();

    PageResult {
        has_next_page: !records.is_empty(),
        records,
    }
}

fn extract_entry(card: &ElementRef, page_url: &Url, selectors: &CatalogueSelectors) -> CatalogueEntry {
    let title = card
        .select(&selectors.title)
        .next()
        .map(|h| h.text().collect::<String>().trim().to_string());

    let link = card
        .value()
        .attr("href")
        .and_then(|href| resolve_link(href, page_url));

    let image = card
        .select(&selectors.image)
        .next()
        .and_then(|img| img.value().attr("src"))
        .and_then(|src| resolve_link(src, page_url));

    CatalogueEntry::new(title, link, image)
}

/// A paginated HTML catalogue (`base-url?page=n`)
#[derive(Debug, Clone)]
pub struct CatalogueSource {
    base: Url,
    page_param: String,
    max_pages: Option<u32>,
    selectors: CatalogueSelectors,
}

impl CatalogueSource {
    pub fn new(
        base_url: &str,
        page_param: &str,
        max_pages: Option<u32>,
        selectors: CatalogueSelectors,
    ) -> Result<Self, HarvestError> {
        Ok(Self {
            base: Url::parse(base_url)?,
            page_param: page_param.to_string(),
            max_pages,
            selectors,
        })
    }

    pub fn from_config(config: &CatalogueConfig) -> Result<Self, HarvestError> {
        Self::new(
            &config.base_url,
            &config.page_param,
            config.max_pages,
            CatalogueSelectors::from_config(config)?,
        )
    }
}

impl PageSource for CatalogueSource {
    type Record = CatalogueEntry;

    fn name(&self) -> &str {
        "catalogue"
    }

    fn page_url(&self, page: u32) -> String {
        with_query_param(&self.base, &self.page_param, &page.to_string()).to_string()
    }

    fn parse_page(&self, body: &str, page_url: &str) -> PageResult<CatalogueEntry> {
        let page_url = Url::parse(page_url).unwrap_or_else(|_| self.base.clone());
        parse_catalogue_page(body, &page_url, &self.selectors)
    }

    fn max_pages(&self) -> Option<u32> {
        self.max_pages
    }
}
