//! Matching written `Host` blocks back to favorites.

use crate::favorite::FavoriteId;
use t2sc_sshconfig::Entry;

/// Favorite id carried by a `Host` block's identity comment.
///
/// Only direct children are inspected. When several comments hold a valid
/// id the first one wins.
pub fn identity_of(entry: &Entry) -> Option<FavoriteId> {
    let host = entry.as_directive().filter(|d| d.is_host())?;
    host.children
        .iter()
        .filter_map(Entry::as_comment)
        .find_map(|comment| FavoriteId::parse(comment.body()))
}
