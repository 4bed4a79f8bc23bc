//! Edit capture and reconciliation.
//!
//! Pending edits queue in a session-scoped, caller-owned `EditQueue`
//! keyed by run address: re-editing a run before commit replaces its
//! record instead of appending a conflicting one. `commit` is a pure
//! function from (snapshot, queue) to a new snapshot; the inputs are
//! never mutated, so the pre-commit document stays safe to read while
//! the copy is built.

use folio_model::{Document, RunAddress, percent};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One pending, addressed text replacement awaiting commit. Text is
/// stored in wire form (percent-encoded) so applying it is a plain
/// assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditRecord {
    pub address: RunAddress,
    pub encoded_text: String,
}

/// The pending-edit queue for one editing session.
///
/// Ordered by address (page-major), so reconciliation is deterministic
/// regardless of the order edits arrived in. Last writer wins per
/// address.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EditQueue {
    records: BTreeMap<RunAddress, String>,
}

impl EditQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a replacement for the run at `address`. The text arrives
    /// decoded (as the user typed it) and is re-encoded into wire form.
    ///
    /// An address that does not resolve in the current snapshot is
    /// dropped: the signal is stale (a prior commit may have changed the
    /// layout) and dropping it is the contract, not an error. Returns
    /// whether the edit was queued.
    pub fn capture(&mut self, snapshot: &Document, address: RunAddress, new_text: &str) -> bool {
        if !snapshot.resolves(address) {
            log::warn!("dropping edit for unresolvable address {}", address);
            return false;
        }
        self.records.insert(address, percent::encode(new_text));
        true
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn contains(&self, address: RunAddress) -> bool {
        self.records.contains_key(&address)
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    pub fn records(&self) -> impl Iterator<Item = EditRecord> + '_ {
        self.records.iter().map(|(address, encoded_text)| EditRecord {
            address: *address,
            encoded_text: encoded_text.clone(),
        })
    }
}

/// Produce a new document snapshot with every queued edit applied.
///
/// Pure: neither the snapshot nor the queue is mutated. Records whose
/// address no longer resolves are skipped. Each record resolves against
/// its own page index, so cross-page edits apply no matter which page
/// is currently visible. An empty queue yields a deep-equal copy.
pub fn commit(snapshot: &Document, pending: &EditQueue) -> Document {
    let mut next = snapshot.clone();
    for (address, encoded_text) in &pending.records {
        match next.run_at_mut(*address) {
            Some(run) => run.text = encoded_text.clone(),
            None => log::warn!("skipping edit for unresolvable address {}", address),
        }
    }
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn snapshot() -> Document {
        Document::from_payload(json!({
            "pages": [
                {
                    "Texts": [{
                        "x": 1, "y": 1, "w": 10,
                        "R": [
                            { "T": "Hello", "TS": [0, 12, 0, 0] },
                            { "T": "World", "TS": [0, 12, 0, 0] }
                        ]
                    }]
                },
                {
                    "Texts": [{ "x": 1, "y": 1, "w": 10, "R": [{ "T": "page2" }] }]
                }
            ]
        }))
        .unwrap()
    }

    #[test]
    fn test_capture_validates_address() {
        let doc = snapshot();
        let mut queue = EditQueue::new();
        assert!(queue.capture(&doc, RunAddress::new(0, 0, 1), "Planet"));
        assert!(!queue.capture(&doc, RunAddress::new(2, 5, 1), "nope"));
        assert_eq!(queue.len(), 1);
        assert!(!queue.contains(RunAddress::new(2, 5, 1)));
    }

    #[test]
    fn test_last_writer_wins_per_address() {
        let doc = snapshot();
        let mut queue = EditQueue::new();
        queue.capture(&doc, RunAddress::new(0, 0, 0), "first");
        queue.capture(&doc, RunAddress::new(0, 0, 0), "second");
        assert_eq!(queue.len(), 1);
        let committed = commit(&doc, &queue);
        assert_eq!(committed.run_at(RunAddress::new(0, 0, 0)).unwrap().text, "second");
    }

    #[test]
    fn test_commit_does_not_mutate_inputs() {
        let doc = snapshot();
        let original = doc.clone();
        let mut queue = EditQueue::new();
        queue.capture(&doc, RunAddress::new(0, 0, 0), "Goodbye");
        let queue_before = queue.clone();

        let committed = commit(&doc, &queue);

        assert_eq!(doc, original);
        assert_eq!(queue, queue_before);
        assert_eq!(committed.run_at(RunAddress::new(0, 0, 0)).unwrap().text, "Goodbye");
        assert_eq!(committed.run_at(RunAddress::new(0, 0, 1)).unwrap().text, "World");
    }

    #[test]
    fn test_empty_queue_commits_to_deep_equal_copy() {
        let doc = snapshot();
        let committed = commit(&doc, &EditQueue::new());
        assert_eq!(committed, doc);
    }

    #[test]
    fn test_captured_text_is_re_encoded_to_wire_form() {
        let doc = snapshot();
        let mut queue = EditQueue::new();
        queue.capture(&doc, RunAddress::new(0, 0, 0), "Hello there");
        let committed = commit(&doc, &queue);
        assert_eq!(
            committed.run_at(RunAddress::new(0, 0, 0)).unwrap().text,
            "Hello%20there"
        );
    }

    #[test]
    fn test_cross_page_edits_resolve_against_their_own_page() {
        let doc = snapshot();
        let mut queue = EditQueue::new();
        queue.capture(&doc, RunAddress::new(1, 0, 0), "edited");
        queue.capture(&doc, RunAddress::new(0, 0, 0), "front");
        let committed = commit(&doc, &queue);
        assert_eq!(committed.run_at(RunAddress::new(1, 0, 0)).unwrap().text, "edited");
        assert_eq!(committed.run_at(RunAddress::new(0, 0, 0)).unwrap().text, "front");
    }

    #[test]
    fn test_stale_record_is_skipped_at_commit() {
        // Capture against a two-page snapshot, then commit against a
        // shrunk one: the stale record is skipped, the rest applies.
        let doc = snapshot();
        let mut queue = EditQueue::new();
        queue.capture(&doc, RunAddress::new(1, 0, 0), "stale");
        queue.capture(&doc, RunAddress::new(0, 0, 0), "fresh");

        let mut shrunk = doc.clone();
        shrunk.pages.truncate(1);
        let committed = commit(&shrunk, &queue);
        assert_eq!(committed.page_count(), 1);
        assert_eq!(committed.run_at(RunAddress::new(0, 0, 0)).unwrap().text, "fresh");
    }
}
