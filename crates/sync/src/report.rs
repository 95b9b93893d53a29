//! Sync reporting types for tracking what changed and what was skipped.

use crate::reconcile::HostChange;
use serde::Serialize;
use std::path::PathBuf;

/// Reasons why a fetched favorite did not make it into the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum SkipReason {
    /// Not an SFTP favorite (FTP, S3, WebDAV, ...).
    UnsupportedProtocol { item: String, protocol: String },
    /// The record failed validation under the lenient policy.
    InvalidRecord { item: String, error: String },
}

impl SkipReason {
    /// Returns a human-readable description of the skip reason.
    pub fn description(&self) -> String {
        match self {
            Self::UnsupportedProtocol { item, protocol } => {
                format!("{} uses unsupported protocol {}", item, protocol)
            }
            Self::InvalidRecord { item, error } => {
                format!("Skipped {}: {}", item, error)
            }
        }
    }

    /// Returns actionable guidance for the user.
    pub fn guidance(&self) -> Option<&str> {
        match self {
            Self::UnsupportedProtocol { .. } => None,
            Self::InvalidRecord { .. } => {
                Some("Fix the favorite in Transmit, or run with --strict to fail instead")
            }
        }
    }

    pub fn item(&self) -> &str {
        match self {
            Self::UnsupportedProtocol { item, .. } | Self::InvalidRecord { item, .. } => item,
        }
    }
}

/// Complete report of one sync run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SyncReport {
    /// Favorites source name.
    pub source: String,
    /// File holding the managed `Host` blocks.
    pub target: PathBuf,
    pub added: Vec<HostChange>,
    pub updated: Vec<HostChange>,
    pub deleted: Vec<HostChange>,
    /// Favorites left out, with reasons.
    pub skipped: Vec<SkipReason>,
    /// Number of favorites that made it through validation.
    pub favorites: usize,
    /// The target file was rewritten.
    pub written: bool,
    /// Nothing was written because this was a preview.
    pub dry_run: bool,
    /// An `Include` line was added (or would be, in a dry run) to the main config.
    pub include_added: bool,
    /// Unified diff of the target, filled for dry runs with changes.
    pub preview: Option<String>,
    /// Summary message
    pub summary: String,
}

impl SyncReport {
    /// Creates an empty report for `source` → `target`.
    pub fn new(source: impl Into<String>, target: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            ..Default::default()
        }
    }

    /// Returns total hosts added, updated and removed.
    pub fn total_changes(&self) -> usize {
        self.added.len() + self.updated.len() + self.deleted.len()
    }

    /// No host changed.
    pub fn is_noop(&self) -> bool {
        self.total_changes() == 0
    }

    /// Per-change lines, in the order additions, updates, removals.
    pub fn change_lines(&self) -> Vec<String> {
        let verb = |live: &'static str, planned: &'static str| {
            if self.dry_run {
                planned
            } else {
                live
            }
        };
        let mut lines = Vec::with_capacity(self.total_changes());
        for change in &self.added {
            lines.push(format!("✓ {} {}", verb("Adding", "Would add"), change.details));
        }
        for change in &self.updated {
            lines.push(format!(
                "✓ {} {}",
                verb("Updating", "Would update"),
                change.details
            ));
        }
        for change in &self.deleted {
            lines.push(format!(
                "✓ {} {}",
                verb("Removing", "Would remove"),
                change.details
            ));
        }
        lines
    }

    /// Generates a formatted summary for display.
    pub fn format_summary(&self) -> String {
        let target = self.target.display();
        if self.is_noop() {
            return format!(
                "{} favorites from {} already in sync with {}",
                self.favorites, self.source, target
            );
        }
        let counts = format!(
            "{} added, {} updated, {} removed",
            self.added.len(),
            self.updated.len(),
            self.deleted.len()
        );
        if self.dry_run {
            format!("Dry run: {} → {} ({}, nothing written)", self.source, target, counts)
        } else {
            format!("Synced {} → {} ({})", self.source, target, counts)
        }
    }
}
