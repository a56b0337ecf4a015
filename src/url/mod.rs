//! URL handling module for Anime-Harvest
//!
//! This module builds paginated request URLs, resolves links found in HTML
//! against the page they came from, and normalizes links into identity keys.

mod normalize;
mod resolve;

pub use normalize::normalize_url;
pub use resolve::{resolve_link, with_query_param};
