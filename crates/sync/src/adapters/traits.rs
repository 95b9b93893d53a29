//! Trait definitions for favorites sources and configuration targets.

use crate::favorite::FetchedFavorites;
use crate::Result;
use std::path::Path;
use t2sc_sshconfig::ConfigModel;

#[cfg(test)]
use mockall::automock;

/// Somewhere favorites can be fetched from.
#[cfg_attr(test, automock)]
pub trait FavoritesSource {
    /// Source identifier for messages (e.g., "Transmit")
    fn name(&self) -> &'static str;

    /// Fetches every favorite record and, when available, the folder layout.
    ///
    /// A failure here aborts the sync before any file is touched.
    fn fetch(&self) -> Result<FetchedFavorites>;
}

/// The SSH configuration file that receives managed `Host` blocks.
pub trait ConfigTarget {
    /// Target identifier for messages
    fn name(&self) -> &'static str;

    /// File that holds the managed blocks.
    fn location(&self) -> &Path;

    /// Current contents; a missing file reads as empty.
    fn read(&self) -> Result<ConfigModel>;

    /// Replaces the file with `model`.
    fn write(&self, model: &ConfigModel) -> Result<()>;

    /// Makes sure the main configuration pulls the managed file in.
    ///
    /// Returns whether the main configuration was (or, with `dry_run`,
    /// would be) changed.
    fn ensure_included(&self, _dry_run: bool) -> Result<bool> {
        Ok(false)
    }
}
