//! The user's SSH client configuration as sync target.

use super::traits::ConfigTarget;
use crate::error::SyncError;
use crate::Result;
use std::path::Path;
use t2sc_sshconfig::{ConfigModel, Directive, Entry};
use t2sc_state::{
    ensure_directory, ensure_private_file, read_or_empty, write_atomic, SyncPaths,
    PRIVATE_DIR_MODE,
};
use tracing::{debug, info};

/// Writes managed blocks to the fragment file (or the main config when
/// running inline) and keeps the main config's `Include` in place.
#[derive(Debug, Clone)]
pub struct SshConfigTarget {
    paths: SyncPaths,
}

impl SshConfigTarget {
    pub fn new(paths: SyncPaths) -> Self {
        Self { paths }
    }

    pub fn paths(&self) -> &SyncPaths {
        &self.paths
    }

    fn read_model(path: &Path) -> Result<ConfigModel> {
        let text = read_or_empty(path).map_err(|e| SyncError::config_io(path, e))?;
        Ok(ConfigModel::parse(&text))
    }

    fn write_model(&self, path: &Path, model: &ConfigModel) -> Result<()> {
        let prepare = || -> Result<()> {
            ensure_directory(&self.paths.ssh_dir, PRIVATE_DIR_MODE)?;
            if let Some(parent) = path.parent() {
                ensure_directory(parent, PRIVATE_DIR_MODE)?;
            }
            write_atomic(path, &model.serialize())
        };
        prepare().map_err(|e| SyncError::config_io(path, e))?;
        Ok(())
    }
}

impl ConfigTarget for SshConfigTarget {
    fn name(&self) -> &'static str {
        "SSH config"
    }

    fn location(&self) -> &Path {
        self.paths.managed_file()
    }

    fn read(&self) -> Result<ConfigModel> {
        Self::read_model(self.location())
    }

    fn write(&self, model: &ConfigModel) -> Result<()> {
        let path = self.location();
        self.write_model(path, model)?;
        debug!(path = %path.display(), "wrote managed hosts");
        Ok(())
    }

    fn ensure_included(&self, dry_run: bool) -> Result<bool> {
        if self.paths.fragment.is_none() {
            return Ok(false);
        }
        let main = &self.paths.main_config;
        let mut model = Self::read_model(main)?;
        if model
            .find_directive("Include", &self.paths.include_pattern)
            .is_some()
        {
            return Ok(false);
        }
        if dry_run {
            return Ok(true);
        }

        ensure_directory(&self.paths.ssh_dir, PRIVATE_DIR_MODE)
            .and_then(|_| ensure_private_file(main))
            .map_err(|e| SyncError::config_io(main, e))?;

        // Include must come before any Host/Match block, or ssh scopes it
        // to that block.
        let ending = model.line_ending().to_string();
        if !model.is_empty() {
            let mut blank = Entry::blank();
            blank.set_line_ending(&ending);
            model.prepend(blank);
        }
        let mut include = Entry::from(Directive::new("Include", &self.paths.include_pattern));
        include.set_line_ending(&ending);
        model.prepend(include);
        self.write_model(main, &model)?;
        info!(path = %main.display(), pattern = %self.paths.include_pattern, "added Include");
        Ok(true)
    }
}
