//! Manages run configuration and on-disk state for t2sc.
//!
//! This crate provides utilities for:
//! - Reading `T2SC_*` environment variables and the optional settings file.
//! - Resolving the SSH paths a sync run reads and writes.
//! - Bootstrapping private directories/files and replacing files atomically.
//!
//! Nothing in the sync core reads the environment; the binary resolves a
//! [`RunConfig`] here and passes it down.

pub mod config;
pub mod env;
pub mod persistence;

pub use config::{
    CliOverrides, RunConfig, SyncPaths, DEFAULT_FRAGMENT, DEFAULT_INCLUDE_PATTERN,
    DEFAULT_PROTOCOL,
};
pub use env::{
    env_fragment, env_inline, env_ssh_dir, env_strict, home_dir, load_settings, settings_file,
    Settings,
};
pub use persistence::{
    ensure_directory, ensure_private_file, read_or_empty, write_atomic, PRIVATE_DIR_MODE,
    PRIVATE_FILE_MODE,
};
