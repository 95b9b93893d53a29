//! Favorites read from a JSON export, and the JSON shape shared with Transmit.

use super::traits::FavoritesSource;
use crate::favorite::{FetchedFavorites, Folder};
use crate::Result;
use anyhow::{anyhow, Context};
use serde_json::Value;
use std::fs;
use std::path::PathBuf;
use tracing::{debug, warn};

/// Fields per favorite record.
pub(crate) const RECORD_ARITY: usize = 7;

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

/// Checks the overall shape of a favorites list: a list of 7-field lists.
pub(crate) fn records_from(value: Value) -> Result<Vec<Value>> {
    let Value::Array(records) = value else {
        return Err(anyhow!("expected a list of favorites, got {}", kind(&value)));
    };
    for (index, record) in records.iter().enumerate() {
        match record {
            Value::Array(fields) if fields.len() == RECORD_ARITY => {}
            other => {
                return Err(anyhow!(
                    "favorite #{} is not a {RECORD_ARITY}-field record: {other}",
                    index + 1
                ))
            }
        }
    }
    Ok(records)
}

/// Folder layout, or `None` when it is missing, empty or unreadable.
pub(crate) fn folders_from(value: Value) -> Option<Vec<Folder>> {
    if value.is_null() {
        return None;
    }
    match serde_json::from_value::<Vec<Folder>>(value) {
        Ok(folders) if folders.is_empty() => None,
        Ok(folders) => Some(folders),
        Err(e) => {
            warn!(error = %e, "ignoring unreadable folder list; using flat names");
            None
        }
    }
}

/// Reads favorites from a file instead of asking Transmit.
///
/// Accepts `{"favorites": [...], "folders": [...]}` or a bare favorites list.
/// Folders may be `[name, [favorite, ...]]` pairs or
/// `{"name": ..., "favorites": [...]}` objects.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl FavoritesSource for JsonFileSource {
    fn name(&self) -> &'static str {
        "favorites file"
    }

    fn fetch(&self) -> Result<FetchedFavorites> {
        let text = fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read {}", self.path.display()))?;
        let doc: Value = serde_json::from_str(&text)
            .with_context(|| format!("failed to parse {}", self.path.display()))?;

        let (records, folders) = match doc {
            Value::Object(mut map) => (
                map.remove("favorites").unwrap_or(Value::Null),
                map.remove("folders").unwrap_or(Value::Null),
            ),
            other => (other, Value::Null),
        };
        let records = records_from(records)
            .with_context(|| format!("unexpected content in {}", self.path.display()))?;
        debug!(path = %self.path.display(), count = records.len(), "read favorites export");

        Ok(FetchedFavorites {
            records,
            folders: folders_from(folders),
        })
    }
}
