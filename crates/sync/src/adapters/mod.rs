//! Favorites sources and SSH configuration targets.

mod json_file;
mod ssh_config;
pub mod traits;
mod transmit;

pub use json_file::JsonFileSource;
pub use ssh_config::SshConfigTarget;
pub use traits::{ConfigTarget, FavoritesSource};
pub use transmit::{Osascript, ScriptRunner, TransmitSource};

#[cfg(test)]
pub use traits::MockFavoritesSource;
