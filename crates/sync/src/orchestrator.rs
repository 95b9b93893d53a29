//! Sync orchestrator that coordinates source, reconciler and target.

use crate::adapters::{ConfigTarget, FavoritesSource};
use crate::diff::unified_diff;
use crate::error::SyncError;
use crate::mapping::favorite_to_entry;
use crate::reconcile::reconcile;
use crate::report::SyncReport;
use crate::validation::{collect_favorites, ValidationPolicy};
use crate::Result;
use serde::{Deserialize, Serialize};
use t2sc_sshconfig::Entry;
use tracing::{debug, info};

/// Parameters for a sync operation.
///
/// ```
/// use t2sc_sync::{SyncParams, ValidationPolicy};
///
/// let params = SyncParams { dry_run: true, ..Default::default() };
/// assert_eq!(params.protocol, "SFTP");
/// assert_eq!(params.policy, ValidationPolicy::Lenient);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncParams {
    /// Perform dry run (preview only)
    #[serde(default)]
    pub dry_run: bool,
    /// How invalid favorites are handled
    #[serde(default)]
    pub policy: ValidationPolicy,
    /// Only favorites using this protocol are synced
    #[serde(default = "default_protocol")]
    pub protocol: String,
}

impl Default for SyncParams {
    fn default() -> Self {
        Self {
            dry_run: false,
            policy: ValidationPolicy::default(),
            protocol: default_protocol(),
        }
    }
}

fn default_protocol() -> String {
    t2sc_state::DEFAULT_PROTOCOL.to_string()
}

/// Orchestrates one sync from a favorites source into a config target.
pub struct SyncOrchestrator<S: FavoritesSource, T: ConfigTarget> {
    source: S,
    target: T,
}

impl<S: FavoritesSource, T: ConfigTarget> SyncOrchestrator<S, T> {
    /// Creates a new orchestrator with source and target adapters.
    pub fn new(source: S, target: T) -> Self {
        Self { source, target }
    }

    /// Returns the source adapter name.
    pub fn source_name(&self) -> &str {
        self.source.name()
    }

    /// Returns the target adapter name.
    pub fn target_name(&self) -> &str {
        self.target.name()
    }

    /// Performs the sync operation.
    ///
    /// Nothing is written when the fetch fails, when no favorite survives
    /// validation, when the configuration is already in sync, or on a dry run.
    pub fn sync(&self, params: &SyncParams) -> Result<SyncReport> {
        let source_name = self.source.name();
        let fetched = self.source.fetch().map_err(|e| SyncError::Fetch {
            source_name: source_name.to_string(),
            message: format!("{e:#}"),
        })?;
        debug!(records = fetched.records.len(), "fetched favorites");

        let batch = collect_favorites(&fetched, &params.protocol, params.policy)?;
        if batch.favorites.is_empty() {
            return Err(SyncError::NoFavorites {
                source_name: source_name.to_string(),
                protocol: params.protocol.clone(),
            }
            .into());
        }

        let mut report = SyncReport::new(source_name, self.target.location());
        report.dry_run = params.dry_run;
        report.favorites = batch.favorites.len();
        report.skipped = batch.skipped;

        let desired: Vec<Entry> = batch.favorites.iter().map(favorite_to_entry).collect();
        let existing = self.target.read()?;
        let before = existing.serialize();
        let result = reconcile(existing, &desired);

        if !result.is_noop() {
            if params.dry_run {
                let location = self.target.location().display();
                report.preview = Some(format!(
                    "--- {location}\n+++ {location}\n{}",
                    unified_diff(&before, &result.model.serialize(), 3)
                ));
            } else {
                self.target.write(&result.model)?;
                report.written = true;
            }
        }
        report.include_added = self.target.ensure_included(params.dry_run)?;

        report.added = result.added;
        report.updated = result.updated;
        report.deleted = result.deleted;
        report.summary = report.format_summary();
        info!(
            added = report.added.len(),
            updated = report.updated.len(),
            removed = report.deleted.len(),
            skipped = report.skipped.len(),
            dry_run = params.dry_run,
            "sync finished"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{MockFavoritesSource, SshConfigTarget};
    use crate::favorite::FetchedFavorites;
    use serde_json::json;
    use std::fs;
    use std::path::Path;
    use t2sc_state::SyncPaths;
    use tempfile::tempdir;

    const ID_A: &str = "11111111-1111-1111-1111-111111111111";

    fn source(records: Vec<serde_json::Value>) -> MockFavoritesSource {
        let mut source = MockFavoritesSource::new();
        source.expect_name().return_const("Transmit");
        source.expect_fetch().times(1).returning(move || {
            Ok(FetchedFavorites {
                records: records.clone(),
                folders: None,
            })
        });
        source
    }

    fn target(root: &Path) -> SshConfigTarget {
        let ssh_dir = root.join(".ssh");
        SshConfigTarget::new(SyncPaths {
            main_config: ssh_dir.join("config"),
            fragment: Some(ssh_dir.join("config.d/transmit")),
            include_pattern: "config.d/*".into(),
            ssh_dir,
        })
    }

    #[test]
    fn fetch_failure_touches_nothing() {
        let tmp = tempdir().unwrap();
        let mut source = MockFavoritesSource::new();
        source.expect_name().return_const("Transmit");
        source
            .expect_fetch()
            .returning(|| Err(anyhow::anyhow!("Transmit is not installed")));

        let err = SyncOrchestrator::new(source, target(tmp.path()))
            .sync(&SyncParams::default())
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SyncError>(),
            Some(SyncError::Fetch { message, .. }) if message.contains("not installed")
        ));
        assert!(!tmp.path().join(".ssh").exists());
    }

    #[test]
    fn no_sftp_favorites_is_an_error() {
        let tmp = tempdir().unwrap();
        let src = source(vec![json!(["ftp", "h", "u", 21, "FTP", null, ID_A])]);
        let err = SyncOrchestrator::new(src, target(tmp.path()))
            .sync(&SyncParams::default())
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SyncError>(),
            Some(SyncError::NoFavorites { .. })
        ));
        assert!(!tmp.path().join(".ssh").exists());
    }

    #[test]
    fn sync_writes_fragment_and_include() {
        let tmp = tempdir().unwrap();
        let src = source(vec![json!(["alpha", "h1", "u", 0, "SFTP", "missing value", ID_A])]);
        let report = SyncOrchestrator::new(src, target(tmp.path()))
            .sync(&SyncParams::default())
            .unwrap();

        assert!(report.written);
        assert!(report.include_added);
        assert_eq!(report.added.len(), 1);
        assert_eq!(
            fs::read_to_string(tmp.path().join(".ssh/config.d/transmit")).unwrap(),
            format!("Host alpha\n  #{ID_A}\n  HostName h1\n  User u\n")
        );
        assert_eq!(
            fs::read_to_string(tmp.path().join(".ssh/config")).unwrap(),
            "Include config.d/*\n"
        );
    }

    #[test]
    fn dry_run_previews_without_writing() {
        let tmp = tempdir().unwrap();
        let src = source(vec![json!(["alpha", "h1", "u", 2222, "SFTP", null, ID_A])]);
        let report = SyncOrchestrator::new(src, target(tmp.path()))
            .sync(&SyncParams {
                dry_run: true,
                ..Default::default()
            })
            .unwrap();

        assert!(!report.written);
        assert!(report.include_added);
        let preview = report.preview.expect("preview");
        assert!(preview.contains("+Host alpha"), "{preview}");
        assert!(preview.contains("+  Port 2222"), "{preview}");
        assert!(!tmp.path().join(".ssh").exists());
    }

    #[test]
    fn strict_policy_surfaces_validation_error() {
        let tmp = tempdir().unwrap();
        let src = source(vec![json!(["bad", "", "u", 22, "SFTP", null, ID_A])]);
        let err = SyncOrchestrator::new(src, target(tmp.path()))
            .sync(&SyncParams {
                policy: ValidationPolicy::Strict,
                ..Default::default()
            })
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SyncError>(),
            Some(SyncError::Validation { name, .. }) if name == "bad"
        ));
    }
}
