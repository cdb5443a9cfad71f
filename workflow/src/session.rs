//! Session state store: the pending photo slot, the latest archived photo and
//! the verifier set.
//!
//! Nothing here is persisted; state lives for the lifetime of the process.
//! Only the workflow engine holds a mutable reference.

use std::collections::BTreeSet;
use witness_types::{ArchivedPhoto, Identity, PendingPhoto};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionStore {
    /// At most one photo awaits confirmation, process-wide.
    pending: Option<PendingPhoto>,
    /// The most recent successful archival.
    archived: Option<ArchivedPhoto>,
    /// Registered verifiers. Grows only.
    verifiers: BTreeSet<Identity>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> Option<&PendingPhoto> {
        self.pending.as_ref()
    }

    /// Store a pending photo, returning whichever photo it replaced.
    pub fn set_pending(&mut self, photo: PendingPhoto) -> Option<PendingPhoto> {
        self.pending.replace(photo)
    }

    pub fn clear_pending(&mut self) -> Option<PendingPhoto> {
        self.pending.take()
    }

    pub fn archived(&self) -> Option<&ArchivedPhoto> {
        self.archived.as_ref()
    }

    pub fn set_archived(&mut self, photo: ArchivedPhoto) {
        self.archived = Some(photo);
    }

    /// Add a verifier. Returns `true` if the identity was not yet registered.
    pub fn add_verifier(&mut self, id: Identity) -> bool {
        self.verifiers.insert(id)
    }

    pub fn is_verifier(&self, id: &Identity) -> bool {
        self.verifiers.contains(id)
    }

    pub fn verifiers(&self) -> impl Iterator<Item = &Identity> {
        self.verifiers.iter()
    }

    pub fn verifier_count(&self) -> usize {
        self.verifiers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use witness_types::Cid;

    fn pending(reference: &str, submitter: &str) -> PendingPhoto {
        PendingPhoto {
            reference: reference.into(),
            content_type: "image/png".into(),
            submitter: Identity::new(submitter),
        }
    }

    #[test]
    fn pending_slot_is_last_write_wins() {
        let mut store = SessionStore::new();
        assert!(store.set_pending(pending("a.png", "+1")).is_none());
        let replaced = store.set_pending(pending("b.png", "+2"));
        assert_eq!(replaced.unwrap().reference, "a.png");
        assert_eq!(store.pending().unwrap().reference, "b.png");
        assert_eq!(store.clear_pending().unwrap().reference, "b.png");
        assert!(store.pending().is_none());
    }

    #[test]
    fn archived_slot_is_replaced() {
        let mut store = SessionStore::new();
        for cid in ["bafy1", "bafy2"] {
            store.set_archived(ArchivedPhoto {
                cid: Cid::new(cid),
                url: format!("https://ipfs.io/ipfs/{cid}"),
                submitter: Identity::new("+1"),
            });
        }
        assert_eq!(store.archived().unwrap().cid, Cid::new("bafy2"));
    }

    #[test]
    fn verifier_registration_is_idempotent() {
        let mut store = SessionStore::new();
        let id = Identity::new("+3");
        assert!(store.add_verifier(id.clone()));
        assert!(!store.add_verifier(id.clone()));
        assert_eq!(store.verifier_count(), 1);
        assert!(store.is_verifier(&id));
        assert!(!store.is_verifier(&Identity::new("+4")));
    }
}
