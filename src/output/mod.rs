//! Output module for writing harvested collections and run reports
//!
//! This module handles:
//! - Pretty array-of-objects JSON files
//! - The compact seasonal schedule format
//! - Per-job run summaries

pub mod compact;
pub mod stats;
mod writer;

pub use compact::{abbreviate_day, compress_cover, CompactAnime, CompactSeasons, Score};
pub use stats::{print_report, print_reports, JobReport};
pub use writer::{
    read_compact, read_json, read_json_array, to_pretty_string, write_compact, write_json_pretty,
};
