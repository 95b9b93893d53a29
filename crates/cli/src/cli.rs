use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use t2sc_state::CliOverrides;

/// Command-line interface for the `t2sc` application.
#[derive(Debug, Parser)]
#[command(
    name = "t2sc",
    version,
    about = "Sync Transmit SFTP favorites into your SSH config"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub options: SyncOptions,
}

/// Available `t2sc` commands. Without one, `sync` runs.
#[derive(Debug, Clone, Copy, Default, Subcommand)]
pub enum Commands {
    /// Adds, updates and removes Host blocks to match your favorites.
    #[default]
    Sync,
    /// Lists the Host blocks managed by t2sc.
    List,
}

/// Options shared by every command.
#[derive(Debug, Clone, Default, Args)]
pub struct SyncOptions {
    /// Shows what would change as a diff without writing anything.
    #[arg(long, global = true, default_value_t = false)]
    pub dry_run: bool,
    /// Fails on the first invalid favorite instead of skipping it (or set `T2SC_STRICT`).
    #[arg(long, global = true, default_value_t = false)]
    pub strict: bool,
    /// Writes hosts straight into ~/.ssh/config instead of a separate included file.
    #[arg(long, global = true, default_value_t = false)]
    pub inline: bool,
    /// SSH directory to manage (overrides `T2SC_SSH_DIR`).
    #[arg(long, global = true, value_name = "DIR")]
    pub ssh_dir: Option<PathBuf>,
    /// Reads favorites from a JSON export instead of asking Transmit.
    #[arg(long, short = 'f', global = true, value_name = "JSON")]
    pub file: Option<PathBuf>,
}

impl SyncOptions {
    pub fn overrides(&self) -> CliOverrides {
        CliOverrides {
            ssh_dir: self.ssh_dir.clone(),
            inline: self.inline,
            strict: self.strict,
        }
    }
}
