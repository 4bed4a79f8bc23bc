//! One editing session over one document snapshot.
//!
//! The session owns the snapshot, the viewport, and the pending-edit
//! queue, and drives the read-only/editing/committing phases. All
//! operations are synchronous except `commit`, which suspends on the
//! re-encoding call; navigation and zoom stay available while a commit
//! is in flight, but a second commit is rejected rather than queued.

use crate::error::SessionError;
use folio_compose::{ComposeMode, Compositor, RenderTree, render_html};
use folio_edit::EditQueue;
use folio_export::{ExportArtifact, Reencoder, snapshot_value};
use folio_model::{Document, Page, RunAddress};
use folio_view::{ViewController, ViewState};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// The editing phase of the session state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditPhase {
    ReadOnly,
    Editing,
    Committing,
}

struct SessionState {
    snapshot: Arc<Document>,
    view: ViewController,
    queue: EditQueue,
    phase: EditPhase,
    staged: Option<ExportArtifact>,
}

pub struct Session {
    state: Mutex<SessionState>,
    commit_in_flight: AtomicBool,
    reencoder: Arc<dyn Reencoder>,
}

impl Session {
    pub fn new(document: Document, reencoder: Arc<dyn Reencoder>) -> Self {
        let view = ViewController::new(document.page_count());
        Self {
            state: Mutex::new(SessionState {
                snapshot: Arc::new(document),
                view,
                queue: EditQueue::new(),
                phase: EditPhase::ReadOnly,
                staged: None,
            }),
            commit_in_flight: AtomicBool::new(false),
            reencoder,
        }
    }

    /// Open a session from the parsing collaborator's payload (a
    /// document object or a one-element array of documents).
    pub fn load(
        payload: serde_json::Value,
        reencoder: Arc<dyn Reencoder>,
    ) -> Result<Self, SessionError> {
        let document = Document::from_payload(payload)?;
        Ok(Self::new(document, reencoder))
    }

    /// The current snapshot. Cheap: snapshots are shared by reference
    /// and replaced atomically on commit.
    pub fn snapshot(&self) -> Arc<Document> {
        self.lock().snapshot.clone()
    }

    pub fn phase(&self) -> EditPhase {
        self.lock().phase
    }

    pub fn view_state(&self) -> ViewState {
        self.lock().view.state()
    }

    pub fn pending_edits(&self) -> usize {
        self.lock().queue.len()
    }

    pub fn has_pending_edit(&self, address: RunAddress) -> bool {
        self.lock().queue.contains(address)
    }

    // --- Navigation and zoom -------------------------------------------

    pub fn next_page(&self) -> ViewState {
        self.lock().view.next()
    }

    pub fn prev_page(&self) -> ViewState {
        self.lock().view.prev()
    }

    pub fn zoom_in(&self) -> ViewState {
        self.lock().view.zoom_in()
    }

    pub fn zoom_out(&self) -> ViewState {
        self.lock().view.zoom_out()
    }

    // --- Rendering ------------------------------------------------------

    /// Compose the currently visible page. Lazy: only this page is
    /// composed, and composing is side-effect free, so callers may
    /// invoke it as often as they re-render.
    pub fn compose_current(&self) -> RenderTree {
        let (snapshot, view, phase) = {
            let state = self.lock();
            (state.snapshot.clone(), state.view.state(), state.phase)
        };
        let mode = match phase {
            EditPhase::Editing => ComposeMode::Interactive,
            EditPhase::ReadOnly | EditPhase::Committing => ComposeMode::ReadOnly,
        };

        let compositor = Compositor::for_document(&snapshot);
        match snapshot.pages.get(view.page_index) {
            Some(page) => compositor.compose(page, view.page_index, view.zoom(), mode),
            // An empty document composes as a single blank page.
            None => compositor.compose(&Page::default(), view.page_index, view.zoom(), mode),
        }
    }

    /// The current page as an HTML fragment for a DOM host.
    pub fn current_html(&self) -> String {
        render_html(&self.compose_current())
    }

    // --- Edit capture ----------------------------------------------------

    pub fn begin_editing(&self) {
        let mut state = self.lock();
        if state.phase == EditPhase::ReadOnly {
            state.phase = EditPhase::Editing;
        }
    }

    /// Discard pending edits and return to read-only.
    pub fn cancel_editing(&self) {
        let mut state = self.lock();
        if state.phase == EditPhase::Editing {
            state.queue.clear();
            state.phase = EditPhase::ReadOnly;
        }
    }

    /// Capture one finished edit (the run at `address` lost focus with
    /// `new_text` in it). Returns whether the edit was queued; stale
    /// addresses and captures outside the editing phase are dropped.
    pub fn capture_edit(&self, address: RunAddress, new_text: &str) -> bool {
        let mut state = self.lock();
        if state.phase != EditPhase::Editing {
            log::warn!("ignoring edit for {} outside the editing phase", address);
            return false;
        }
        let snapshot = state.snapshot.clone();
        state.queue.capture(&snapshot, address, new_text)
    }

    // --- Commit -----------------------------------------------------------

    /// Apply all pending edits to a new snapshot, submit it for
    /// re-encoding, and stage the returned artifact.
    ///
    /// On success the new snapshot replaces the old one atomically and
    /// the queue clears. On any failure the snapshot, queue, and phase
    /// are left as they were so the user may retry. A commit arriving
    /// while another is in flight is rejected, not queued.
    pub async fn commit(&self) -> Result<ExportArtifact, SessionError> {
        if self
            .commit_in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(SessionError::CommitInFlight);
        }

        let (snapshot, queue, prior_phase) = {
            let mut state = self.lock();
            let prior = state.phase;
            state.phase = EditPhase::Committing;
            (state.snapshot.clone(), state.queue.clone(), prior)
        };

        let result = self.submit(&snapshot, &queue).await;

        let mut state = self.lock();
        self.commit_in_flight.store(false, Ordering::Release);
        match result {
            Ok((next, artifact)) => {
                let page_count = next.page_count();
                state.snapshot = Arc::new(next);
                state.view.set_page_count(page_count);
                state.queue.clear();
                state.phase = EditPhase::ReadOnly;
                state.staged = Some(artifact.clone());
                log::debug!("commit succeeded; staged {} bytes", artifact.bytes.len());
                Ok(artifact)
            }
            Err(err) => {
                state.phase = prior_phase;
                Err(err)
            }
        }
    }

    /// Hand over the artifact staged by the last successful commit.
    pub fn take_artifact(&self) -> Option<ExportArtifact> {
        self.lock().staged.take()
    }

    async fn submit(
        &self,
        snapshot: &Document,
        queue: &EditQueue,
    ) -> Result<(Document, ExportArtifact), SessionError> {
        let next = folio_edit::commit(snapshot, queue);
        let value = snapshot_value(&next)?;
        log::debug!(
            "submitting snapshot ({} pages, {} edits) to '{}' re-encoder",
            next.page_count(),
            queue.len(),
            self.reencoder.name()
        );
        let artifact = self.reencoder.reencode(value).await?;
        Ok((next, artifact))
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, SessionState> {
        // Session state is only held across synchronous sections, so the
        // lock cannot be poisoned by an await and contention is benign.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_export::InMemoryReencoder;
    use serde_json::json;

    fn session() -> Session {
        Session::load(
            json!({
                "pages": [{
                    "Texts": [{
                        "x": 1, "y": 1, "w": 10,
                        "R": [{ "T": "Hello" }, { "T": "World" }]
                    }]
                }]
            }),
            Arc::new(InMemoryReencoder::succeeding(vec![0x25, 0x50, 0x44, 0x46])),
        )
        .unwrap()
    }

    #[test]
    fn test_capture_requires_editing_phase() {
        let session = session();
        assert!(!session.capture_edit(RunAddress::new(0, 0, 0), "nope"));
        session.begin_editing();
        assert!(session.capture_edit(RunAddress::new(0, 0, 0), "yes"));
        assert_eq!(session.pending_edits(), 1);
    }

    #[test]
    fn test_cancel_editing_discards_queue() {
        let session = session();
        session.begin_editing();
        session.capture_edit(RunAddress::new(0, 0, 0), "draft");
        session.cancel_editing();
        assert_eq!(session.pending_edits(), 0);
        assert_eq!(session.phase(), EditPhase::ReadOnly);
    }

    #[tokio::test]
    async fn test_commit_swaps_snapshot_and_stages_artifact() {
        let session = session();
        session.begin_editing();
        session.capture_edit(RunAddress::new(0, 0, 0), "Goodbye");

        let before = session.snapshot();
        let artifact = session.commit().await.unwrap();
        assert_eq!(artifact.bytes, vec![0x25, 0x50, 0x44, 0x46]);

        // The prior snapshot is untouched; the new one carries the edit.
        assert_eq!(before.run_at(RunAddress::new(0, 0, 0)).unwrap().text, "Hello");
        let after = session.snapshot();
        assert_eq!(after.run_at(RunAddress::new(0, 0, 0)).unwrap().text, "Goodbye");
        assert_eq!(session.pending_edits(), 0);
        assert_eq!(session.phase(), EditPhase::ReadOnly);
        assert!(session.take_artifact().is_some());
        assert!(session.take_artifact().is_none());
    }

    #[tokio::test]
    async fn test_failed_commit_preserves_state() {
        let session = Session::load(
            json!({ "pages": [{ "Texts": [{ "x": 0, "y": 0, "R": [{ "T": "keep" }] }] }] }),
            Arc::new(InMemoryReencoder::failing(502, None)),
        )
        .unwrap();
        session.begin_editing();
        session.capture_edit(RunAddress::new(0, 0, 0), "changed");

        let err = session.commit().await.unwrap_err();
        assert!(matches!(err, SessionError::Export(_)));
        assert_eq!(session.pending_edits(), 1);
        assert_eq!(session.phase(), EditPhase::Editing);
        assert_eq!(
            session.snapshot().run_at(RunAddress::new(0, 0, 0)).unwrap().text,
            "keep"
        );
        assert!(session.take_artifact().is_none());
    }

    #[test]
    fn test_compose_of_empty_document_is_a_blank_page() {
        let session = Session::load(
            json!({ "pages": [] }),
            Arc::new(InMemoryReencoder::default()),
        )
        .unwrap();
        let tree = session.compose_current();
        assert!(tree.nodes.is_empty());
        assert_eq!(tree.page_index, 0);
    }
}
