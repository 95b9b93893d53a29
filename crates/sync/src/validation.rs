//! Turning fetched records into validated favorites.

use crate::error::SyncError;
use crate::favorite::{Favorite, FetchedFavorites, RawFavorite};
use crate::report::SkipReason;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, warn};

/// What to do with a record that fails validation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationPolicy {
    /// Skip the record and report it.
    #[default]
    Lenient,
    /// Abort the whole sync.
    Strict,
}

impl ValidationPolicy {
    pub fn from_strict(strict: bool) -> Self {
        if strict {
            Self::Strict
        } else {
            Self::Lenient
        }
    }
}

/// Favorites that passed validation, plus everything left out.
#[derive(Debug, Clone, Default)]
pub struct FavoriteBatch {
    pub favorites: Vec<Favorite>,
    pub skipped: Vec<SkipReason>,
}

fn reject(
    policy: ValidationPolicy,
    skipped: &mut Vec<SkipReason>,
    item: String,
    error: String,
) -> Result<(), SyncError> {
    match policy {
        ValidationPolicy::Strict => Err(SyncError::Validation {
            name: item,
            reason: error,
        }),
        ValidationPolicy::Lenient => {
            warn!(favorite = %item, %error, "skipping invalid favorite");
            skipped.push(SkipReason::InvalidRecord { item, error });
            Ok(())
        }
    }
}

/// Validates every fetched record.
///
/// Records whose protocol is not `protocol` (case-insensitive) are dropped
/// before validation, so they can never fail a strict run. A record that
/// is not a 7-element array counts as invalid.
pub fn collect_favorites(
    fetched: &FetchedFavorites,
    protocol: &str,
    policy: ValidationPolicy,
) -> Result<FavoriteBatch, SyncError> {
    let mut batch = FavoriteBatch::default();

    for (index, record) in fetched.records.iter().enumerate() {
        let raw: RawFavorite = match serde_json::from_value(record.clone()) {
            Ok(raw) => raw,
            Err(e) => {
                reject(
                    policy,
                    &mut batch.skipped,
                    format!("record #{}", index + 1),
                    format!("malformed record: {e}"),
                )?;
                continue;
            }
        };

        match raw.protocol() {
            Some(p) if p.eq_ignore_ascii_case(protocol) => {}
            other => {
                let found = other.unwrap_or("unknown").to_string();
                debug!(favorite = %raw.label(), protocol = %found, "filtered by protocol");
                batch.skipped.push(SkipReason::UnsupportedProtocol {
                    item: raw.label(),
                    protocol: found,
                });
                continue;
            }
        }

        let folder = raw.name.as_str().and_then(|name| fetched.folder_of(name));
        match Favorite::from_raw(&raw, folder) {
            Ok(favorite) => batch.favorites.push(favorite),
            Err(error) => reject(policy, &mut batch.skipped, raw.label(), error)?,
        }
    }

    let mut aliases: HashMap<&str, usize> = HashMap::new();
    for favorite in &batch.favorites {
        *aliases.entry(favorite.host.as_str()).or_default() += 1;
    }
    for (alias, count) in aliases.into_iter().filter(|(_, n)| *n > 1) {
        warn!(%alias, count, "several favorites share one alias; ssh will only use the first");
    }

    Ok(batch)
}
