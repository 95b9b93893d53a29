//! Whole-file configuration model.

use crate::entry::{Directive, Entry, NormalizedEntry};
use crate::parser::parse_entries;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Ordered top-level entries of one SSH configuration file.
///
/// `ConfigModel::parse(text).serialize() == text` holds for any input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigModel {
    entries: Vec<Entry>,
}

impl ConfigModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses configuration text. Never fails; see [`crate::parser`].
    pub fn parse(text: &str) -> Self {
        Self {
            entries: parse_entries(text),
        }
    }

    pub fn from_entries(entries: Vec<Entry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<Entry> {
        self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Entry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Renders the model back to configuration text.
    pub fn serialize(&self) -> String {
        let mut out = String::new();
        for entry in &self.entries {
            entry.write_to(&mut out);
        }
        out
    }

    /// Top-level entries matching `predicate`, in file order.
    pub fn find<P>(&self, predicate: P) -> Vec<&Entry>
    where
        P: Fn(&Entry) -> bool,
    {
        self.entries.iter().filter(|e| predicate(e)).collect()
    }

    /// First top-level directive with the given keyword and exact value.
    pub fn find_directive(&self, name: &str, value: &str) -> Option<&Directive> {
        self.entries
            .iter()
            .filter_map(Entry::as_directive)
            .find(|d| d.is(name) && d.value == value)
    }

    /// Line ending used by the file: the first one found, `"\n"` by default.
    pub fn line_ending(&self) -> &str {
        self.entries
            .iter()
            .find_map(Entry::line_ending)
            .unwrap_or("\n")
    }

    /// Adds `entry` after every existing entry.
    ///
    /// If the file currently ends without a newline one is added, otherwise
    /// the new entry would be glued onto the last line.
    pub fn append(&mut self, entry: impl Into<Entry>) {
        let ending = self.line_ending().to_string();
        if let Some(last) = self.entries.last_mut() {
            let eol = last.last_eol_mut();
            if eol.is_empty() {
                eol.push_str(&ending);
            }
        }
        self.entries.push(entry.into());
    }

    /// Appends a `Host` block, separated from previous content by a blank line.
    ///
    /// The block's lines are converted to the file's line ending.
    pub fn append_block(&mut self, entry: impl Into<Entry>) {
        let ending = self.line_ending().to_string();
        if self.entries.last().is_some_and(|last| !last.ends_with_blank()) {
            let mut blank = Entry::blank();
            blank.set_line_ending(&ending);
            self.append(blank);
        }
        let mut entry = entry.into();
        entry.set_line_ending(&ending);
        self.append(entry);
    }

    /// Inserts `entry` before every existing entry.
    pub fn prepend(&mut self, entry: impl Into<Entry>) {
        let mut entry = entry.into();
        if !self.entries.is_empty() {
            let ending = self.line_ending().to_string();
            let eol = entry.last_eol_mut();
            if eol.is_empty() {
                eol.push_str(&ending);
            }
        }
        self.entries.insert(0, entry);
    }

    /// Formatting-free view of the whole model.
    pub fn normalized(&self) -> Vec<NormalizedEntry> {
        self.entries.iter().filter_map(Entry::normalized).collect()
    }
}

impl fmt::Display for ConfigModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.serialize())
    }
}

impl FromStr for ConfigModel {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl<'a> IntoIterator for &'a ConfigModel {
    type Item = &'a Entry;
    type IntoIter = std::slice::Iter<'a, Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl FromIterator<Entry> for ConfigModel {
    fn from_iter<I: IntoIterator<Item = Entry>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
