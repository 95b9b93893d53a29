//! Resolution of the effective run configuration.
//!
//! Precedence, highest first: command-line flags, `T2SC_*` environment
//! variables, the settings file, built-in defaults.

use crate::env::{home_dir, load_settings, Settings};
use anyhow::Result;
use glob::{MatchOptions, Pattern};
use std::path::{Path, PathBuf};
use tracing::warn;

pub const DEFAULT_FRAGMENT: &str = "config.d/transmit";
pub const DEFAULT_INCLUDE_PATTERN: &str = "config.d/*";
pub const DEFAULT_PROTOCOL: &str = "SFTP";

/// Where managed hosts are read from and written to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncPaths {
    pub ssh_dir: PathBuf,
    /// The user's primary client config (`~/.ssh/config`).
    pub main_config: PathBuf,
    /// Dedicated file for managed hosts; `None` writes into `main_config`.
    pub fragment: Option<PathBuf>,
    /// `Include` value that pulls the fragment into `main_config`.
    pub include_pattern: String,
}

impl SyncPaths {
    /// The file holding managed `Host` blocks.
    pub fn managed_file(&self) -> &Path {
        self.fragment.as_deref().unwrap_or(&self.main_config)
    }

    /// Whether ssh reaches the fragment through `include_pattern`.
    ///
    /// Relative patterns resolve against `ssh_dir`, `~/` against `home`.
    /// As in ssh, `*` does not cross a `/`. Always true in inline mode.
    pub fn fragment_is_included(&self, home: &Path) -> bool {
        let Some(fragment) = &self.fragment else {
            return true;
        };
        let pattern = match self.include_pattern.strip_prefix("~/") {
            Some(rest) => home.join(rest),
            None => self.ssh_dir.join(&self.include_pattern),
        };
        let options = MatchOptions {
            require_literal_separator: true,
            ..MatchOptions::new()
        };
        Pattern::new(&pattern.to_string_lossy())
            .is_ok_and(|p| p.matches_path_with(fragment, options))
    }
}

/// Flags given on the command line.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub ssh_dir: Option<PathBuf>,
    pub inline: bool,
    pub strict: bool,
}

/// Fully resolved options for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub paths: SyncPaths,
    pub strict: bool,
    pub protocol: String,
}

impl RunConfig {
    /// Resolves the configuration from flags, environment and settings file.
    pub fn resolve(cli: &CliOverrides) -> Result<Self> {
        let home = home_dir()?;
        let file = load_settings()?;
        Ok(Self::from_sources(cli, &Settings::from_env(), &file, &home))
    }

    /// Pure resolution step, separated for testing.
    pub fn from_sources(
        cli: &CliOverrides,
        env: &Settings,
        file: &Settings,
        home: &Path,
    ) -> Self {
        let default_ssh_dir = home.join(".ssh");
        let ssh_dir = cli
            .ssh_dir
            .clone()
            .or_else(|| env.ssh_dir.clone())
            .or_else(|| file.ssh_dir.clone())
            .unwrap_or_else(|| default_ssh_dir.clone());

        let inline = cli.inline || env.inline.or(file.inline).unwrap_or(false);
        let strict = cli.strict || env.strict.or(file.strict).unwrap_or(false);

        let fragment = env
            .fragment
            .clone()
            .or_else(|| file.fragment.clone())
            .unwrap_or_else(|| DEFAULT_FRAGMENT.to_string());
        let pattern = env
            .include_pattern
            .clone()
            .or_else(|| file.include_pattern.clone())
            .unwrap_or_else(|| DEFAULT_INCLUDE_PATTERN.to_string());

        // ssh resolves relative Include paths against ~/.ssh only, so anything
        // living elsewhere has to be referenced absolutely.
        let include_pattern = if ssh_dir == default_ssh_dir || Path::new(&pattern).is_absolute() {
            pattern
        } else {
            ssh_dir.join(&pattern).to_string_lossy().into_owned()
        };

        let protocol = env
            .protocol
            .clone()
            .or_else(|| file.protocol.clone())
            .unwrap_or_else(|| DEFAULT_PROTOCOL.to_string());

        let paths = SyncPaths {
            main_config: ssh_dir.join("config"),
            fragment: (!inline).then(|| ssh_dir.join(&fragment)),
            include_pattern,
            ssh_dir,
        };
        if !paths.fragment_is_included(home) {
            warn!(
                fragment = %paths.managed_file().display(),
                include = %paths.include_pattern,
                "fragment does not match the Include pattern; ssh will not read it"
            );
        }

        Self {
            paths,
            strict,
            protocol,
        }
    }
}
