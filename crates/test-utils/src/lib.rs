//! Shared test utilities for t2sc crates.
//!
//! This crate provides common test fixtures and utilities used across
//! multiple crates in the t2sc workspace.

use std::path::{Path, PathBuf};
use std::sync::{LazyLock, Mutex, MutexGuard};

/// Serialize tests that mutate process-global state (env vars, cwd, etc).
///
/// Acquire this guard at the start of any test that modifies environment
/// variables to prevent race conditions between parallel tests.
pub fn env_guard() -> MutexGuard<'static, ()> {
    static TEST_SERIAL: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));
    TEST_SERIAL.lock().unwrap_or_else(|e| e.into_inner())
}

/// RAII guard for environment variables - restores original value on drop.
pub struct EnvVarGuard {
    key: &'static str,
    previous: Option<String>,
}

impl Drop for EnvVarGuard {
    fn drop(&mut self) {
        if let Some(v) = &self.previous {
            std::env::set_var(self.key, v);
        } else {
            std::env::remove_var(self.key);
        }
    }
}

/// Set an environment variable and return a guard that restores the original on drop.
///
/// # Example
/// ```
/// let _guard = t2sc_test_utils::set_env_var("MY_VAR", Some("value"));
/// // MY_VAR is set to "value"
/// // When _guard drops, MY_VAR is restored to its original value
/// ```
pub fn set_env_var(key: &'static str, value: Option<&str>) -> EnvVarGuard {
    let previous = std::env::var(key).ok();
    if let Some(val) = value {
        std::env::set_var(key, val);
    } else {
        std::env::remove_var(key);
    }
    EnvVarGuard { key, previous }
}

/// Favorite ids used across tests.
pub const ID_A: &str = "11111111-1111-1111-1111-111111111111";
pub const ID_B: &str = "22222222-2222-2222-2222-222222222222";
pub const ID_C: &str = "33333333-3333-3333-3333-333333333333";

/// One raw favorite record in the shape the favorites source returns:
/// `[name, address, user, port, protocol, remote path, id]`.
pub fn raw_record(
    name: &str,
    address: &str,
    user: &str,
    port: u16,
    protocol: &str,
    id: &str,
) -> serde_json::Value {
    serde_json::json!([name, address, user, port, protocol, "missing value", id])
}

/// Standard test fixture with a temporary home and `.ssh` directory.
///
/// The tempdir is automatically cleaned up when this struct is dropped.
pub struct TestFixture {
    pub tempdir: tempfile::TempDir,
    /// Path to ~/.ssh in the temp environment
    pub ssh_dir: PathBuf,
}

impl TestFixture {
    /// Create a new test fixture with `$HOME/.ssh/` created.
    ///
    /// Does NOT set HOME env var - use `home_guard()` for that.
    pub fn new() -> std::io::Result<Self> {
        let tempdir = tempfile::tempdir()?;
        let ssh_dir = tempdir.path().join(".ssh");
        std::fs::create_dir_all(&ssh_dir)?;
        Ok(Self { tempdir, ssh_dir })
    }

    /// Get the path that should be set as HOME.
    pub fn home_path(&self) -> &Path {
        self.tempdir.path()
    }

    /// Create an RAII guard that sets HOME to this fixture's temp directory.
    pub fn home_guard(&self) -> EnvVarGuard {
        set_env_var("HOME", Some(self.home_path().to_str().unwrap()))
    }

    /// `~/.ssh/config` in the temp environment.
    pub fn main_config(&self) -> PathBuf {
        self.ssh_dir.join("config")
    }

    /// `~/.ssh/config.d/transmit` in the temp environment.
    pub fn fragment(&self) -> PathBuf {
        self.ssh_dir.join("config.d/transmit")
    }

    /// Write `content` to a path relative to the `.ssh` directory.
    pub fn write_ssh_file(&self, relative: &str, content: &str) -> std::io::Result<PathBuf> {
        let path = self.ssh_dir.join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, content)?;
        Ok(path)
    }

    /// Read a file relative to the `.ssh` directory, empty if missing.
    pub fn read_ssh_file(&self, relative: &str) -> String {
        std::fs::read_to_string(self.ssh_dir.join(relative)).unwrap_or_default()
    }

    /// Write a favorites export (`{"favorites": [...], "folders": [...]}`).
    pub fn write_favorites_export(
        &self,
        favorites: &[serde_json::Value],
        folders: Option<serde_json::Value>,
    ) -> std::io::Result<PathBuf> {
        let mut doc = serde_json::json!({ "favorites": favorites });
        if let Some(folders) = folders {
            doc["folders"] = folders;
        }
        let path = self.tempdir.path().join("favorites.json");
        std::fs::write(&path, serde_json::to_string_pretty(&doc)?)?;
        Ok(path)
    }
}
