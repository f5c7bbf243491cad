//! Storage abstraction for revision history.
//!
//! The [`RevisionStore`] trait is the owning collection of every known
//! revision of one document. The session layer is its only writer apart
//! from host appends, and removal always goes through
//! [`HistorySession::delete`](crate::session::HistorySession::delete) so that
//! selection side effects are applied.
//!
//! # Operations
//!
//! | Method | Purpose |
//! |--------|---------|
//! | [`list`](RevisionStore::list) | All revisions in creation order |
//! | [`get`](RevisionStore::get) | Look up one revision by id |
//! | [`append`](RevisionStore::append) | Accept a host-created revision |
//! | [`remove`](RevisionStore::remove) | Permanently drop a revision |
//! | [`highest_version`](RevisionStore::highest_version) | Highest version ever accepted |

pub mod memory;

use crate::error::RevisionError;
use crate::models::Revision;

/// Abstract owner of a document's revisions.
///
/// Implementations must keep `version` strictly increasing across appends,
/// including versions of revisions that have since been removed.
pub trait RevisionStore {
    /// All revisions in creation order (not display order).
    fn list(&self) -> &[Revision];

    fn get(&self, id: &str) -> Option<&Revision> {
        self.list().iter().find(|r| r.id == id)
    }

    fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Accept a new revision from the host.
    fn append(&mut self, revision: Revision) -> Result<(), RevisionError>;

    /// Remove a revision permanently. Returns `None` if the id is unknown.
    fn remove(&mut self, id: &str) -> Option<Revision>;

    /// Highest version ever accepted, even if that revision was removed.
    fn highest_version(&self) -> Option<u64>;

    fn len(&self) -> usize {
        self.list().len()
    }

    fn is_empty(&self) -> bool {
        self.list().is_empty()
    }
}
