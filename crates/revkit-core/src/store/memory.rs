//! In-memory [`RevisionStore`] implementation.
//!
//! Revisions live in a `Vec` in the order they were accepted. The highest
//! accepted version is tracked separately so deleting the newest revision
//! does not allow its version to be handed out again.

use crate::error::RevisionError;
use crate::models::Revision;

use super::RevisionStore;

/// In-memory store backing a single editing session.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    revisions: Vec<Revision>,
    highest_version: Option<u64>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from an initial collection.
    ///
    /// Revisions are accepted in version order; duplicates and repeated
    /// versions are rejected just like later appends.
    pub fn from_revisions(
        revisions: impl IntoIterator<Item = Revision>,
    ) -> Result<Self, RevisionError> {
        let mut initial: Vec<Revision> = revisions.into_iter().collect();
        initial.sort_by_key(|r| r.version);

        let mut store = Self::new();
        for revision in initial {
            store.append(revision)?;
        }
        Ok(store)
    }

    /// Raise the version floor to `version`, typically one persisted by a
    /// host after the newest revisions were deleted.
    ///
    /// A floor below the highest accepted version has no effect.
    pub fn with_highest_version(mut self, version: u64) -> Self {
        self.highest_version = Some(self.highest_version.map_or(version, |h| h.max(version)));
        self
    }
}

impl RevisionStore for InMemoryStore {
    fn list(&self) -> &[Revision] {
        &self.revisions
    }

    fn append(&mut self, revision: Revision) -> Result<(), RevisionError> {
        if self.contains(&revision.id) {
            tracing::warn!(id = %revision.id, "rejected revision with duplicate id");
            return Err(RevisionError::DuplicateId(revision.id));
        }
        if let Some(highest) = self.highest_version {
            if revision.version <= highest {
                tracing::warn!(
                    id = %revision.id,
                    version = revision.version,
                    highest,
                    "rejected revision with non-increasing version"
                );
                return Err(RevisionError::VersionNotIncreasing {
                    version: revision.version,
                    highest,
                });
            }
        }

        tracing::debug!(id = %revision.id, version = revision.version, "revision appended");
        self.highest_version = Some(revision.version);
        self.revisions.push(revision);
        Ok(())
    }

    fn remove(&mut self, id: &str) -> Option<Revision> {
        let pos = self.revisions.iter().position(|r| r.id == id)?;
        Some(self.revisions.remove(pos))
    }

    fn highest_version(&self) -> Option<u64> {
        self.highest_version
    }
}
