//! End-to-end editing scenarios: load, edit, commit, export.

use async_trait::async_trait;
use folio::{
    EditPhase, ExportArtifact, ExportError, InMemoryReencoder, Reencoder, RunAddress, Session,
    SessionError,
};
use serde_json::{Value, json};
use std::sync::Arc;
use tokio::sync::Notify;

fn two_run_document() -> serde_json::Value {
    let _ = env_logger::builder().is_test(true).try_init();
    json!({
        "pages": [{
            "Width": 612,
            "Height": 792,
            "Texts": [{
                "x": 10, "y": 20, "w": 100, "A": "left",
                "R": [
                    { "T": "Hello", "TS": [0, 12, 0, 0] },
                    { "T": "World", "TS": [0, 12, 0, 0] }
                ]
            }]
        }],
        "color_dict": {}
    })
}

#[tokio::test]
async fn edit_one_run_and_commit() {
    let fake = Arc::new(InMemoryReencoder::succeeding(b"%PDF-1.7".to_vec()));
    let session = Session::load(two_run_document(), fake).unwrap();

    session.begin_editing();
    assert_eq!(session.phase(), EditPhase::Editing);

    // The user rewrites run 0 and focus leaves the element.
    assert!(session.capture_edit(RunAddress::new(0, 0, 0), "Goodbye"));

    let original = session.snapshot();
    let artifact = session.commit().await.unwrap();
    assert_eq!(artifact.bytes, b"%PDF-1.7");

    let committed = session.snapshot();
    assert_eq!(
        committed.run_at(RunAddress::new(0, 0, 0)).unwrap().text,
        "Goodbye"
    );
    assert_eq!(
        committed.run_at(RunAddress::new(0, 0, 1)).unwrap().text,
        "World"
    );
    // The pre-commit snapshot was never mutated.
    assert_eq!(
        original.run_at(RunAddress::new(0, 0, 0)).unwrap().text,
        "Hello"
    );
    assert_eq!(session.pending_edits(), 0);
}

#[tokio::test]
async fn stale_address_is_dropped_without_erroring() {
    let session = Session::load(
        two_run_document(),
        Arc::new(InMemoryReencoder::default()),
    )
    .unwrap();
    session.begin_editing();

    // The snapshot has one page; this address points at page 2.
    let stale = RunAddress::new(2, 5, 1);
    assert!(!session.capture_edit(stale, "ghost"));
    assert!(!session.has_pending_edit(stale));
    assert_eq!(session.pending_edits(), 0);
}

#[tokio::test]
async fn re_editing_a_run_before_commit_keeps_one_record() {
    let fake = Arc::new(InMemoryReencoder::succeeding(Vec::new()));
    let session = Session::load(two_run_document(), fake).unwrap();
    session.begin_editing();

    session.capture_edit(RunAddress::new(0, 0, 0), "first draft");
    session.capture_edit(RunAddress::new(0, 0, 0), "final");
    assert_eq!(session.pending_edits(), 1);

    session.commit().await.unwrap();
    assert_eq!(
        session.snapshot().run_at(RunAddress::new(0, 0, 0)).unwrap().text,
        "final"
    );
}

#[tokio::test]
async fn pending_edits_survive_navigation_until_commit() {
    let payload = json!({
        "pages": [
            { "Texts": [{ "x": 0, "y": 0, "w": 5, "R": [{ "T": "one" }] }] },
            { "Texts": [{ "x": 0, "y": 0, "w": 5, "R": [{ "T": "two" }] }] }
        ]
    });
    let fake = Arc::new(InMemoryReencoder::succeeding(Vec::new()));
    let session = Session::load(payload, fake).unwrap();
    session.begin_editing();
    session.capture_edit(RunAddress::new(0, 0, 0), "edited one");

    // Navigating away does not cancel the queued edit.
    session.next_page();
    assert_eq!(session.view_state().page_index, 1);
    assert_eq!(session.pending_edits(), 1);

    session.commit().await.unwrap();
    let doc = session.snapshot();
    assert_eq!(doc.run_at(RunAddress::new(0, 0, 0)).unwrap().text, "edited%20one");
    assert_eq!(doc.run_at(RunAddress::new(1, 0, 0)).unwrap().text, "two");
}

#[tokio::test]
async fn failed_export_preserves_snapshot_and_queue() {
    let fake = Arc::new(InMemoryReencoder::failing(
        503,
        Some(json!({ "detail": "re-encoder busy" })),
    ));
    let session = Session::load(two_run_document(), fake).unwrap();
    session.begin_editing();
    session.capture_edit(RunAddress::new(0, 0, 1), "Mars");

    let err = session.commit().await.unwrap_err();
    assert!(matches!(err, SessionError::Export(_)));

    // Everything is as it was; the user may retry.
    assert_eq!(session.pending_edits(), 1);
    assert_eq!(session.phase(), EditPhase::Editing);
    assert_eq!(
        session.snapshot().run_at(RunAddress::new(0, 0, 1)).unwrap().text,
        "World"
    );
}

#[tokio::test]
async fn submitted_snapshot_is_wire_form_json() {
    let fake = Arc::new(InMemoryReencoder::succeeding(Vec::new()));
    let session = Session::load(two_run_document(), fake.clone()).unwrap();
    session.begin_editing();
    session.capture_edit(RunAddress::new(0, 0, 0), "Good bye");
    session.commit().await.unwrap();

    let submissions = fake.submissions();
    assert_eq!(submissions.len(), 1);
    let run_text = submissions[0]["pages"][0]["Texts"][0]["R"][0]["T"]
        .as_str()
        .unwrap();
    assert_eq!(run_text, "Good%20bye");
}

/// A re-encoder that holds every submission until the gate is released,
/// so a commit can be kept suspended mid-flight.
struct GatedReencoder {
    gate: Arc<Notify>,
}

#[async_trait]
impl Reencoder for GatedReencoder {
    async fn reencode(&self, _snapshot: Value) -> Result<ExportArtifact, ExportError> {
        self.gate.notified().await;
        Ok(ExportArtifact {
            bytes: vec![0x25],
            content_type: "application/pdf".to_string(),
            suggested_name: "edited.pdf".to_string(),
        })
    }

    fn name(&self) -> &'static str {
        "gated"
    }
}

#[tokio::test]
async fn second_commit_while_one_is_suspended_is_rejected() {
    let gate = Arc::new(Notify::new());
    let session = Arc::new(
        Session::load(two_run_document(), Arc::new(GatedReencoder { gate: gate.clone() }))
            .unwrap(),
    );
    session.begin_editing();
    session.capture_edit(RunAddress::new(0, 0, 0), "draft");

    let first = tokio::spawn({
        let session = session.clone();
        async move { session.commit().await }
    });
    while session.phase() != EditPhase::Committing {
        tokio::task::yield_now().await;
    }

    // The viewport stays usable while the commit is suspended.
    session.zoom_in();
    assert_eq!(session.view_state().zoom(), 1.1);

    let err = session.commit().await.unwrap_err();
    assert!(matches!(err, SessionError::CommitInFlight));
    // The rejection disturbed nothing.
    assert_eq!(session.pending_edits(), 1);
    assert_eq!(session.phase(), EditPhase::Committing);

    gate.notify_one();
    let artifact = first.await.unwrap().unwrap();
    assert_eq!(artifact.bytes, vec![0x25]);
    assert_eq!(session.pending_edits(), 0);
    assert_eq!(session.phase(), EditPhase::ReadOnly);
}

#[tokio::test]
async fn empty_queue_commit_round_trips_the_snapshot() {
    let fake = Arc::new(InMemoryReencoder::succeeding(Vec::new()));
    let session = Session::load(two_run_document(), fake).unwrap();
    let before = session.snapshot();

    session.commit().await.unwrap();

    assert_eq!(*session.snapshot(), *before);
}
