//! `t2sc`: keeps `~/.ssh` in sync with Transmit SFTP favorites.
//!
//! The binary resolves a [`t2sc_state::RunConfig`] from flags, environment
//! and settings, then hands it to the sync core in [`t2sc_sync`].

#![deny(unsafe_code)]

pub mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use t2sc_sync::SyncError;
use tracing_subscriber::EnvFilter;

/// Parses arguments and runs the requested command.
pub fn run() -> Result<()> {
    // Logs go to stderr so stdout stays a clean report; RUST_LOG overrides.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command.unwrap_or_default() {
        Commands::Sync => commands::handle_sync_command(&cli.options),
        Commands::List => commands::handle_list_command(&cli.options),
    }
}

/// Follow-up advice for errors the user can act on.
pub fn hint_for(err: &anyhow::Error) -> Option<&'static str> {
    match err.downcast_ref::<SyncError>()? {
        SyncError::Fetch { .. } => {
            Some("Is Transmit installed? Use --file <JSON> to sync from an exported list.")
        }
        SyncError::Validation { .. } => Some("Fix the favorite in Transmit, or drop --strict."),
        SyncError::NoFavorites { .. } => {
            Some("Only SFTP favorites are synced; nothing was written.")
        }
        SyncError::ConfigIo { .. } => Some("Check the permissions of your ~/.ssh directory."),
    }
}
