//! JSON file writers and readers
//!
//! Files are overwritten in place. Non-ASCII text is written as UTF-8, never
//! escaped.

use crate::output::compact::CompactSeasons;
use crate::HarvestError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

const INDENT: &[u8] = b"    ";

/// Serializes `value` pretty printed with 4-space indentation
pub fn to_pretty_string<T: Serialize + ?Sized>(value: &T) -> Result<String, HarvestError> {
    let mut buffer = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(INDENT));
    value.serialize(&mut serializer)?;

    String::from_utf8(buffer).map_err(|e| HarvestError::MalformedDocument {
        path: "<memory>".to_string(),
        message: e.to_string(),
    })
}

/// Writes `value` to `path`, pretty printed with 4-space indentation
pub fn write_json_pretty<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), HarvestError> {
    let mut writer = BufWriter::new(File::create(path)?);
    let mut serializer = Serializer::with_formatter(&mut writer, PrettyFormatter::with_indent(INDENT));
    value.serialize(&mut serializer)?;
    writer.write_all(b"\n")?;
    writer.flush()?;

    tracing::debug!("Wrote {}", path.display());
    Ok(())
}

/// Writes the compact seasonal document without whitespace
pub fn write_compact(path: &Path, seasons: &CompactSeasons) -> Result<(), HarvestError> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer(&mut writer, seasons)?;
    writer.flush()?;

    tracing::debug!("Wrote {}", path.display());
    Ok(())
}

/// Reads any JSON document back from `path`
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, HarvestError> {
    let reader = BufReader::new(File::open(path)?);
    serde_json::from_reader(reader).map_err(|e| HarvestError::MalformedDocument {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

/// Reads an array-of-objects file written by [`write_json_pretty`]
pub fn read_json_array<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, HarvestError> {
    read_json(path)
}

/// Reads a file written by [`write_compact`]
pub fn read_compact(path: &Path) -> Result<CompactSeasons, HarvestError> {
    read_json(path)
}
