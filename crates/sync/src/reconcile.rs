//! Merging freshly mapped favorites into an existing configuration.
//!
//! Entries are matched by their identity comment, never by alias. Entries
//! without an identity belong to the user and pass through untouched.

use crate::favorite::FavoriteId;
use crate::identity::identity_of;
use crate::mapping::HostDetails;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use t2sc_sshconfig::{ConfigModel, Entry};
use tracing::debug;

/// One added, updated or removed `Host` block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HostChange {
    pub id: FavoriteId,
    /// Alias after the change (before it, for removals).
    pub host: String,
    /// `alias (user@host:port)` of the resulting block.
    pub details: String,
    /// Details of the replaced block, for updates.
    pub previous: Option<String>,
}

impl HostChange {
    fn of(id: FavoriteId, entry: &Entry) -> Self {
        let details = HostDetails::of(entry);
        Self {
            id,
            host: details.alias.clone(),
            details: details.to_string(),
            previous: None,
        }
    }

    fn replacing(mut self, old: &Entry) -> Self {
        self.previous = Some(HostDetails::of(old).to_string());
        self
    }
}

/// Result of [`reconcile`]: the merged model and what changed.
#[derive(Debug, Clone)]
pub struct Reconciliation {
    pub model: ConfigModel,
    pub added: Vec<HostChange>,
    pub updated: Vec<HostChange>,
    pub deleted: Vec<HostChange>,
}

impl Reconciliation {
    /// Nothing to add, update or delete; the file must not be rewritten.
    pub fn is_noop(&self) -> bool {
        self.added.is_empty() && self.updated.is_empty() && self.deleted.is_empty()
    }
}

/// Detaches the lines that follow a block's first run of blank lines.
///
/// The parser hands every line up to the next `Host`/`Match` to the block,
/// but a managed block ends at its blank separator. Anything after it was
/// written by hand and must survive updates and removals.
fn split_trailing(entry: &mut Entry) -> Vec<Entry> {
    let Some(host) = entry.as_directive_mut() else {
        return Vec::new();
    };
    let Some(first_blank) = host.children.iter().position(Entry::is_blank) else {
        return Vec::new();
    };
    let end = first_blank
        + host.children[first_blank..]
            .iter()
            .take_while(|child| child.is_blank())
            .count();
    host.children.split_off(end)
}

/// Desired block with the old block's trailing blank lines carried over,
/// so the separation from the next block survives the update.
fn replacement_for(old: &Entry, desired: &Entry, line_ending: &str) -> Entry {
    let mut new = desired.clone();
    new.set_line_ending(line_ending);
    if let (Some(old), Some(new)) = (old.as_directive(), new.as_directive_mut()) {
        let kept = old
            .children
            .iter()
            .rev()
            .take_while(|child| child.is_blank())
            .count();
        new.children
            .extend_from_slice(&old.children[old.children.len() - kept..]);
    }
    new
}

/// Applies `desired` to `existing`.
///
/// * existing managed blocks whose id is not desired are deleted;
/// * blocks whose content differs are replaced where they stand;
/// * desired blocks not present yet are appended, one blank line apart.
///
/// When `desired` repeats an id the last entry wins. When `existing` holds
/// the same id more than once the first block is kept and the rest are
/// deleted. Desired entries without an identity are ignored.
pub fn reconcile(existing: ConfigModel, desired: &[Entry]) -> Reconciliation {
    let line_ending = existing.line_ending().to_string();

    let mut wanted: HashMap<FavoriteId, &Entry> = HashMap::new();
    let mut order = Vec::new();
    for entry in desired {
        match identity_of(entry) {
            Some(id) => {
                if wanted.insert(id.clone(), entry).is_none() {
                    order.push(id);
                }
            }
            None => debug!(entry = %HostDetails::of(entry), "ignoring desired entry without identity"),
        }
    }

    // Unmanaged entries keep their lines; managed ones are cut at their end.
    let mut blocks = Vec::with_capacity(existing.len());
    for mut entry in existing.into_entries() {
        let mut tail = split_trailing(&mut entry);
        let id = identity_of(&entry);
        if id.is_none() {
            if let Some(d) = entry.as_directive_mut() {
                d.children.append(&mut tail);
            }
        }
        blocks.push((entry, id, tail));
    }
    let present: HashSet<FavoriteId> = blocks
        .iter()
        .filter_map(|(_, id, _)| id.clone())
        .collect();

    let mut added = Vec::new();
    let mut updated = Vec::new();
    let mut deleted = Vec::new();
    let mut seen = HashSet::new();
    let mut entries = Vec::with_capacity(blocks.len() + order.len());

    for (entry, id, tail) in blocks {
        let Some(id) = id else {
            entries.push(entry);
            continue;
        };
        match wanted.get(&id) {
            Some(target) if seen.insert(id.clone()) => {
                if entry.same_structure(target) {
                    debug!(%id, "unchanged");
                    entries.push(entry);
                } else {
                    let replacement = replacement_for(&entry, target, &line_ending);
                    debug!(%id, "updating in place");
                    updated.push(HostChange::of(id, &replacement).replacing(&entry));
                    entries.push(replacement);
                }
            }
            Some(_) => {
                debug!(%id, "removing duplicate block");
                deleted.push(HostChange::of(id, &entry));
            }
            None => {
                debug!(%id, "removing block no longer wanted");
                deleted.push(HostChange::of(id, &entry));
            }
        }
        if !tail.is_empty() {
            debug!(lines = tail.len(), "keeping lines after managed block");
            entries.extend(tail);
        }
    }

    let mut model = ConfigModel::from_entries(entries);
    for id in order {
        if present.contains(&id) {
            continue;
        }
        if let Some(entry) = wanted.remove(&id) {
            debug!(%id, "adding");
            added.push(HostChange::of(id, entry));
            model.append_block(entry.clone());
        }
    }

    Reconciliation {
        model,
        added,
        updated,
        deleted,
    }
}
