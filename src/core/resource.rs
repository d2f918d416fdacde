//! Reads the JSON-like data files that configure the engine: the per-version
//! standard library catalogs and the package-name override maps.
//!
//! The shape of every document is validated before it is used; a document of
//! the wrong shape is rejected with a [ResourceError] rather than partially
//! accepted.

use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

#[derive(Debug, PartialEq, thiserror::Error)]
pub enum ResourceError {
    #[error("no resource is available for {0:?}")]
    Missing(String),
    #[error("failed to read {0:?}: {1}")]
    Unreadable(PathBuf, String),
    #[error("{0} is not valid json: {1}")]
    Malformed(String, String),
    #[error("{0} must contain {1}")]
    WrongShape(String, &'static str),
}

/// Supplies the raw text of a standard library catalog by its version tag.
pub trait CatalogSource {
    fn catalog_text(&self, tag: &str) -> Result<String, ResourceError>;
}

/// The catalogs compiled into the binary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bundled;

impl CatalogSource for Bundled {
    fn catalog_text(&self, tag: &str) -> Result<String, ResourceError> {
        let text = match tag {
            "3.8" => include_str!("../../data/stdlib/stdlib_3_8.json"),
            "3.9" => include_str!("../../data/stdlib/stdlib_3_9.json"),
            "3.10" => include_str!("../../data/stdlib/stdlib_3_10.json"),
            "3.11" => include_str!("../../data/stdlib/stdlib_3_11.json"),
            "3.12" => include_str!("../../data/stdlib/stdlib_3_12.json"),
            _ => return Err(ResourceError::Missing(format!("stdlib {}", tag))),
        };
        Ok(text.to_string())
    }
}

/// Parses `text` as a json array of strings.
pub fn parse_string_array(name: &str, text: &str) -> Result<Vec<String>, ResourceError> {
    let value: Value = serde_json::from_str(text)
        .map_err(|e| ResourceError::Malformed(name.to_string(), e.to_string()))?;
    let items = match value {
        Value::Array(items) => items,
        _ => return Err(ResourceError::WrongShape(name.to_string(), "a json array")),
    };
    items
        .into_iter()
        .map(|v| match v {
            Value::String(s) => Ok(s),
            _ => Err(ResourceError::WrongShape(
                name.to_string(),
                "a json array of strings",
            )),
        })
        .collect()
}

/// Parses `text` as a flat json object mapping strings to strings.
pub fn parse_string_map(name: &str, text: &str) -> Result<HashMap<String, String>, ResourceError> {
    let value: Value = serde_json::from_str(text)
        .map_err(|e| ResourceError::Malformed(name.to_string(), e.to_string()))?;
    let entries = match value {
        Value::Object(entries) => entries,
        _ => return Err(ResourceError::WrongShape(name.to_string(), "a json object")),
    };
    entries
        .into_iter()
        .map(|(k, v)| match v {
            Value::String(s) => Ok((k, s)),
            _ => Err(ResourceError::WrongShape(
                name.to_string(),
                "a flat json object of strings",
            )),
        })
        .collect()
}

/// Reads and parses a user-supplied override map from the filesystem.
pub fn read_string_map(path: &Path) -> Result<HashMap<String, String>, ResourceError> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| ResourceError::Unreadable(path.to_path_buf(), e.to_string()))?;
    parse_string_map(&path.display().to_string(), &text)
}
