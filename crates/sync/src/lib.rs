//! Transmit favorites → SSH client configuration sync.
//!
//! Fetches favorites from a [`FavoritesSource`], validates them, maps each
//! one to a `Host` block and merges the blocks into a [`ConfigTarget`] with
//! [`reconcile`]. Blocks are tracked by an identity comment holding the
//! favorite id, so renamed favorites update in place and everything else in
//! the file is left alone.
//!
//! # Examples
//!
//! ```
//! use t2sc_sshconfig::ConfigModel;
//! use t2sc_sync::{favorite_to_entry, reconcile, Favorite, FavoriteId};
//!
//! let favorite = Favorite {
//!     id: FavoriteId::parse("11111111-1111-1111-1111-111111111111").unwrap(),
//!     host: "alpha".into(),
//!     name: "alpha".into(),
//!     hostname: "h1".into(),
//!     user: "u".into(),
//!     port: None,
//!     protocol: "SFTP".into(),
//!     remote_path: None,
//! };
//!
//! let existing = ConfigModel::parse("Host personal\n  User me\n");
//! let result = reconcile(existing, &[favorite_to_entry(&favorite)]);
//! assert_eq!(result.added.len(), 1);
//! assert_eq!(
//!     result.model.serialize(),
//!     "Host personal\n  User me\n\nHost alpha\n  #11111111-1111-1111-1111-111111111111\n  HostName h1\n  User u\n"
//! );
//!
//! // A second run finds nothing to do.
//! let again = reconcile(result.model, &[favorite_to_entry(&favorite)]);
//! assert!(again.is_noop());
//! ```

#![deny(unsafe_code)]

pub type Error = anyhow::Error;
pub type Result<T> = std::result::Result<T, Error>;

pub mod adapters;
pub mod diff;
pub mod error;
pub mod favorite;
pub mod identity;
pub mod mapping;
pub mod orchestrator;
pub mod reconcile;
pub mod report;
pub mod slug;
pub mod validation;

pub use adapters::{ConfigTarget, FavoritesSource, JsonFileSource, SshConfigTarget, TransmitSource};
pub use diff::unified_diff;
pub use error::SyncError;
pub use favorite::{Favorite, FavoriteId, FetchedFavorites, Folder, RawFavorite};
pub use identity::identity_of;
pub use mapping::{favorite_to_entry, HostDetails};
pub use orchestrator::{SyncOrchestrator, SyncParams};
pub use reconcile::{reconcile, HostChange, Reconciliation};
pub use report::{SkipReason, SyncReport};
pub use slug::{host_alias, slugify};
pub use validation::{collect_favorites, FavoriteBatch, ValidationPolicy};
