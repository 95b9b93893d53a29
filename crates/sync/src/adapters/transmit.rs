//! Favorites fetched from a running Transmit through JavaScript for Automation.

use super::json_file::{folders_from, records_from};
use super::traits::FavoritesSource;
use crate::favorite::FetchedFavorites;
use crate::Result;
use anyhow::{bail, Context};
use serde_json::Value;
use std::process::Command;
use tracing::{debug, warn};

const FAVORITES_SCRIPT: &str = r#"
(() => {
  const transmit = Application('Transmit');
  const records = [];
  transmit.favorites().forEach((fav, index) => {
    try {
      records.push([
        fav.name(),
        fav.address(),
        fav.userName(),
        fav.port(),
        String(fav.protocol()),
        fav.remotePath() || 'missing value',
        fav.identifier(),
      ]);
    } catch (error) {
      console.log('Warning: failed to read favorite ' + (index + 1) + ': ' + error);
    }
  });
  return JSON.stringify(records);
})();
"#;

// Folders are only visible through the "Go" menu. Favorites sit between the
// second and third separators; each folder is a submenu whose entries end
// at the first separator ("Open in Tabs" follows it).
const FOLDERS_SCRIPT: &str = r#"
(() => {
  const bar = Application('System Events').processes.byName('Transmit').menuBars[0];
  let index = bar.menuBarItems.title().indexOf('Go');
  if (index < 0) index = 7;
  const folders = [];
  let separators = 0;
  for (const item of bar.menuBarItems[index].menus[0].menuItems()) {
    try {
      const title = item.title();
      if (title === '') {
        separators += 1;
        if (separators > 2) break;
        continue;
      }
      const submenus = item.menus();
      if (submenus.length === 0) continue;
      const names = [];
      for (const child of submenus[0].menuItems()) {
        const name = child.title();
        if (name === '') break;
        names.push(name);
      }
      if (names.length > 0) folders.push([title, names]);
    } catch (error) {}
  }
  return JSON.stringify(folders);
})();
"#;

const RUNNING_SCRIPT: &str = "Application('Transmit').running()";
const QUIT_SCRIPT: &str = "Application('Transmit').quit()";

/// Runs an automation script and returns its trimmed standard output.
pub trait ScriptRunner {
    fn run(&self, script: &str) -> Result<String>;
}

/// Executes scripts with `osascript -l JavaScript`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Osascript;

impl ScriptRunner for Osascript {
    fn run(&self, script: &str) -> Result<String> {
        let output = Command::new("osascript")
            .args(["-l", "JavaScript", "-e", script])
            .output()
            .context("failed to run osascript (is this macOS?)")?;
        let stderr = String::from_utf8_lossy(&output.stderr);
        if !output.status.success() {
            bail!("osascript exited with {}: {}", output.status, stderr.trim());
        }
        // console.log output from the scripts lands on stderr.
        for line in stderr.lines().map(str::trim).filter(|l| !l.is_empty()) {
            warn!("{line}");
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

/// Reads favorites (and their folders) out of Transmit.
///
/// Scripting Transmit launches it. If it was not running before the fetch
/// it is quit again afterwards, unless the user closed it meanwhile.
#[derive(Debug, Clone, Default)]
pub struct TransmitSource<R: ScriptRunner = Osascript> {
    runner: R,
}

impl TransmitSource {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<R: ScriptRunner> TransmitSource<R> {
    pub fn with_runner(runner: R) -> Self {
        Self { runner }
    }

    fn is_running(&self) -> Result<bool> {
        let answer = self.runner.run(RUNNING_SCRIPT)?;
        Ok(answer == "true")
    }

    fn fetch_favorites(&self) -> Result<FetchedFavorites> {
        let stdout = self
            .runner
            .run(FAVORITES_SCRIPT)
            .context("Transmit did not return its favorites")?;
        if stdout.is_empty() {
            return Ok(FetchedFavorites::default());
        }
        let value: Value =
            serde_json::from_str(&stdout).context("Transmit returned malformed favorites")?;
        let records = records_from(value)?;
        if records.is_empty() {
            return Ok(FetchedFavorites::default());
        }

        let folders = match self.runner.run(FOLDERS_SCRIPT) {
            Ok(text) if text.is_empty() => None,
            Ok(text) => match serde_json::from_str(&text) {
                Ok(value) => folders_from(value),
                Err(e) => {
                    warn!(error = %e, "malformed folder list; using flat names");
                    None
                }
            },
            Err(e) => {
                warn!(error = %format!("{e:#}"), "could not read favorite folders; using flat names");
                None
            }
        };

        Ok(FetchedFavorites { records, folders })
    }

    /// Quits Transmit if the fetch launched it. Failures are only logged.
    fn maybe_quit(&self, was_running: bool) {
        if was_running {
            return;
        }
        match self.is_running() {
            Ok(true) => {
                debug!("quitting Transmit");
                if let Err(e) = self.runner.run(QUIT_SCRIPT) {
                    warn!(error = %format!("{e:#}"), "failed to quit Transmit");
                }
            }
            Ok(false) => {}
            Err(e) => warn!(error = %format!("{e:#}"), "could not check whether Transmit is running"),
        }
    }
}

impl<R: ScriptRunner> FavoritesSource for TransmitSource<R> {
    fn name(&self) -> &'static str {
        "Transmit"
    }

    fn fetch(&self) -> Result<FetchedFavorites> {
        // Unknown state: assume it was running so the user's app is left alone.
        let was_running = self.is_running().unwrap_or_else(|e| {
            warn!(error = %format!("{e:#}"), "could not check whether Transmit is running");
            true
        });
        debug!(was_running, "fetching favorites from Transmit");

        let fetched = self.fetch_favorites();
        self.maybe_quit(was_running);
        fetched
    }
}
