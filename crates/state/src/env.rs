use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

/// Returns the user's home directory.
pub fn home_dir() -> Result<PathBuf> {
    #[cfg(unix)]
    if let Ok(home) = std::env::var("HOME") {
        return Ok(PathBuf::from(home));
    }
    dirs::home_dir().ok_or_else(|| anyhow::anyhow!("home directory not found"))
}

fn env_flag(name: &str) -> Option<bool> {
    std::env::var(name)
        .ok()
        .map(|s| s == "1" || s.eq_ignore_ascii_case("true"))
}

fn env_string(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|s| !s.trim().is_empty())
}

/// Returns the SSH directory override from `T2SC_SSH_DIR`.
pub fn env_ssh_dir() -> Option<PathBuf> {
    env_string("T2SC_SSH_DIR").map(PathBuf::from)
}

/// Returns the fragment path (relative to the SSH directory) from `T2SC_FRAGMENT`.
pub fn env_fragment() -> Option<String> {
    env_string("T2SC_FRAGMENT")
}

/// Checks if `T2SC_STRICT` is set to true.
pub fn env_strict() -> Option<bool> {
    env_flag("T2SC_STRICT")
}

/// Checks if `T2SC_INLINE` is set to true.
pub fn env_inline() -> Option<bool> {
    env_flag("T2SC_INLINE")
}

/// Returns the path to the settings file.
///
/// `T2SC_SETTINGS` wins over `~/.config/t2sc/settings.json`.
pub fn settings_file() -> Option<PathBuf> {
    if let Ok(custom) = std::env::var("T2SC_SETTINGS") {
        return Some(PathBuf::from(custom));
    }
    home_dir()
        .ok()
        .map(|h| h.join(".config/t2sc/settings.json"))
}

/// Optional settings, as found in `settings.json` or the environment.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    #[serde(default)]
    pub ssh_dir: Option<PathBuf>,
    /// Fragment file relative to the SSH directory.
    #[serde(default)]
    pub fragment: Option<String>,
    /// Value of the `Include` directive added to the primary config.
    #[serde(default)]
    pub include_pattern: Option<String>,
    /// Write hosts straight into the primary config instead of a fragment.
    #[serde(default)]
    pub inline: Option<bool>,
    /// Abort on the first invalid favorite instead of skipping it.
    #[serde(default)]
    pub strict: Option<bool>,
    /// Transfer protocol favorites must use to be synced.
    #[serde(default)]
    pub protocol: Option<String>,
}

impl Settings {
    /// Settings taken from `T2SC_*` environment variables.
    pub fn from_env() -> Self {
        Self {
            ssh_dir: env_ssh_dir(),
            fragment: env_fragment(),
            include_pattern: env_string("T2SC_INCLUDE"),
            inline: env_inline(),
            strict: env_strict(),
            protocol: env_string("T2SC_PROTOCOL"),
        }
    }
}

/// Loads settings from disk if available.
///
/// A missing file yields defaults; an unreadable or malformed one is an error
/// so a typo never silently changes where hosts are written.
pub fn load_settings() -> Result<Settings> {
    let Some(path) = settings_file() else {
        return Ok(Settings::default());
    };
    if !path.exists() {
        return Ok(Settings::default());
    }
    let text = fs::read_to_string(&path)
        .with_context(|| format!("failed to read settings: {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("failed to parse settings: {}", path.display()))
}
