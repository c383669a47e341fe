//! Persistence seam for the shared session document.
//!
//! The coordinator only requires read / compare-and-swap semantics; what sits
//! behind them (a file, a database, a network service) is a deployment
//! concern. `overwrite` is the documented last-writer-wins blind write the
//! reference behavior used: if both actors act between one actor's read and
//! its write, the second write silently discards the first actor's update.
//! Coordinator paths never use it.

use std::sync::Mutex;

use crate::document::SessionDocument;
use crate::error::SessionError;

mod file;

pub use file::FileStore;

pub trait SessionStore {
    /// Reads the current document. A missing or unparseable document is
    /// replaced by a freshly initialized default, never an error.
    fn load(&self) -> Result<SessionDocument, SessionError>;

    /// Strict read for diagnostics: `None` when no document exists,
    /// `MalformedDocument` when one exists but cannot be parsed.
    fn load_strict(&self) -> Result<Option<SessionDocument>, SessionError>;

    /// Commits `doc` iff the stored version still equals `expected`,
    /// returning the committed document with its version bumped. Rejects
    /// with `StaleWriteConflict` otherwise.
    fn compare_and_swap(
        &self,
        expected: u64,
        doc: SessionDocument,
    ) -> Result<SessionDocument, SessionError>;

    /// Unconditional write with no version check. Last writer wins.
    fn overwrite(&self, doc: SessionDocument) -> Result<(), SessionError>;
}

/// In-process store for tests and single-process embedding.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<SessionDocument>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, SessionDocument> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl SessionStore for MemoryStore {
    fn load(&self) -> Result<SessionDocument, SessionError> {
        Ok(self.lock().clone())
    }

    fn load_strict(&self) -> Result<Option<SessionDocument>, SessionError> {
        Ok(Some(self.lock().clone()))
    }

    fn compare_and_swap(
        &self,
        expected: u64,
        mut doc: SessionDocument,
    ) -> Result<SessionDocument, SessionError> {
        let mut current = self.lock();
        if current.version != expected {
            return Err(SessionError::StaleWriteConflict {
                expected,
                found: current.version,
            });
        }
        doc.version = expected + 1;
        *current = doc.clone();
        Ok(doc)
    }

    fn overwrite(&self, mut doc: SessionDocument) -> Result<(), SessionError> {
        let mut current = self.lock();
        doc.version += 1;
        *current = doc;
        Ok(())
    }
}

impl<S: SessionStore + ?Sized> SessionStore for &S {
    fn load(&self) -> Result<SessionDocument, SessionError> {
        (**self).load()
    }

    fn load_strict(&self) -> Result<Option<SessionDocument>, SessionError> {
        (**self).load_strict()
    }

    fn compare_and_swap(
        &self,
        expected: u64,
        doc: SessionDocument,
    ) -> Result<SessionDocument, SessionError> {
        (**self).compare_and_swap(expected, doc)
    }

    fn overwrite(&self, doc: SessionDocument) -> Result<(), SessionError> {
        (**self).overwrite(doc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::phase::Phase;

    #[test]
    fn cas_commits_and_bumps_the_version() {
        let store = MemoryStore::new();
        let mut doc = store.load().unwrap();
        doc.sender = "alice".to_string();
        let committed = store.compare_and_swap(0, doc).unwrap();
        assert_eq!(committed.version, 1);
        assert_eq!(store.load().unwrap().sender, "alice");
    }

    #[test]
    fn cas_rejects_the_second_writer_of_a_race() {
        // Both actors read the same prior document; only the first CAS lands.
        let store = MemoryStore::new();
        let mut from_sender = store.load().unwrap();
        let mut from_receiver = store.load().unwrap();

        from_sender.sender = "alice".to_string();
        from_receiver.partner = "bob".to_string();

        store.compare_and_swap(0, from_sender).unwrap();
        let err = store.compare_and_swap(0, from_receiver).unwrap_err();
        assert!(matches!(
            err,
            SessionError::StaleWriteConflict {
                expected: 0,
                found: 1
            }
        ));
        // The first writer's update survived.
        let current = store.load().unwrap();
        assert_eq!(current.sender, "alice");
        assert_eq!(current.partner, "");
    }

    #[test]
    fn blind_overwrite_loses_the_first_writers_update() {
        // The documented race: unsynchronized read-then-write from both
        // actors keeps only the second writer's change.
        let store = MemoryStore::new();
        let mut from_sender = store.load().unwrap();
        let mut from_receiver = store.load().unwrap();

        from_sender.sender = "alice".to_string();
        from_receiver.partner = "bob".to_string();

        store.overwrite(from_sender).unwrap();
        store.overwrite(from_receiver).unwrap();

        let current = store.load().unwrap();
        assert_eq!(current.sender, "");
        assert_eq!(current.partner, "bob");
    }

    #[test]
    fn retry_after_conflict_succeeds_against_the_fresh_version() {
        let store = MemoryStore::new();
        let doc = store.load().unwrap();
        store.compare_and_swap(0, doc).unwrap();

        let mut fresh = store.load().unwrap();
        fresh.phase = Phase::AwaitingPeerReply;
        let committed = store.compare_and_swap(1, fresh).unwrap();
        assert_eq!(committed.version, 2);
        assert_eq!(store.load().unwrap().phase, Phase::AwaitingPeerReply);
    }
}
