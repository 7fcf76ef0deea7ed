//! Mapping resource loading.
//!
//! Mappings ship as properties-style text: one `key=value` pair per line,
//! `#` or `!` comment lines, blank lines ignored. A javax -> jakarta default
//! mapping is embedded in the binary; `-m`/`--mapping` overrides it with a
//! file of the same format.

use std::fs;
use std::path::Path;

use crate::common::{Error, Result};
use crate::transform::MappingTable;

/// Embedded default mapping: the javax EE to jakarta namespace moves
pub const DEFAULT_MAPPING: &str = include_str!("../resources/default.mapping");

/// Parse properties-style mapping text into ordered `(from, to)` pairs.
/// The value starts at the first `=`; keys must be unique.
pub fn parse_mapping(text: &str) -> Result<Vec<(String, String)>> {
    let mut pairs: Vec<(String, String)> = Vec::new();
    for (lineno, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            return Err(Error::mapping_file(format!(
                "line {}: expected key=value, got '{line}'",
                lineno + 1
            )));
        };
        let key = key.trim();
        let value = value.trim();
        if key.is_empty() || value.is_empty() {
            return Err(Error::mapping_file(format!(
                "line {}: empty key or value",
                lineno + 1
            )));
        }
        if pairs.iter().any(|(existing, _)| existing == key) {
            return Err(Error::mapping_file(format!(
                "line {}: duplicate key '{key}'",
                lineno + 1
            )));
        }
        pairs.push((key.to_owned(), value.to_owned()));
    }
    Ok(pairs)
}

/// Build a validated table from mapping text.
pub fn table_from_str(text: &str) -> Result<MappingTable> {
    let pairs = parse_mapping(text)?;
    let mut builder = MappingTable::builder();
    for (from, to) in &pairs {
        builder.add(from, to)?;
    }
    builder.build()
}

/// Table built from the embedded default mapping.
pub fn default_table() -> Result<MappingTable> {
    table_from_str(DEFAULT_MAPPING)
}

/// Table loaded from a properties file on disk.
pub fn table_from_path(path: &Path) -> Result<MappingTable> {
    let text = fs::read_to_string(path)?;
    table_from_str(&text)
}
