//! End-to-end conversations against the workflow engine with nullable
//! gateway and payload loader.

use std::sync::Arc;
use std::time::Duration;

use witness_gateway::{FsPayloadLoader, GatewayError};
use witness_nullables::{NullGateway, NullLoader};
use witness_types::{Attachment, Cid, Decision, Identity, InboundEvent};
use witness_workflow::replies;
use witness_workflow::{EngineConfig, WorkflowEngine};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

struct Harness {
    engine: WorkflowEngine,
    gateway: Arc<NullGateway>,
    loader: Arc<NullLoader>,
}

fn harness() -> Harness {
    let gateway = Arc::new(NullGateway::new());
    let loader = Arc::new(NullLoader::new());
    let engine = WorkflowEngine::new(gateway.clone(), loader.clone(), EngineConfig::default());
    Harness {
        engine,
        gateway,
        loader,
    }
}

fn photo(sender: &str, reference: &str) -> InboundEvent {
    InboundEvent::attachments(sender, vec![Attachment::new("image/jpeg", reference)])
}

fn text(sender: &str, body: &str) -> InboundEvent {
    InboundEvent::text(sender, body)
}

const ALICE: &str = "+15550000001";
const BOB: &str = "+15550000002";
const CAROL: &str = "+15550000003";

/// Alice's photo archived as `bafy123`, Bob registered.
async fn archived_with_verifier(h: &Harness) {
    h.gateway.push_ok("bafy123");
    h.engine.handle(&photo(ALICE, "photo.jpg")).await;
    h.engine.handle(&text(ALICE, "yes")).await;
    h.engine.handle(&text(BOB, "/register")).await;
}

// ---------------------------------------------------------------------------
// Scenarios A-F
// ---------------------------------------------------------------------------

#[tokio::test]
async fn full_conversation() {
    let h = harness();
    let alice = Identity::new(ALICE);
    let bob = Identity::new(BOB);
    let carol = Identity::new(CAROL);

    // A: attachment stored as pending, archive prompt sent.
    let d = h.engine.handle(&photo(ALICE, "photo.jpg")).await;
    assert_eq!(d.bodies_for(&alice), vec![replies::ARCHIVE_PROMPT]);
    let session = h.engine.session().await;
    let pending = session.pending().expect("pending photo");
    assert_eq!(pending.reference, "photo.jpg");
    assert_eq!(pending.submitter, alice);

    // B: confirmation archives it.
    h.gateway.push_ok("bafy123");
    let d = h.engine.handle(&text(ALICE, "yes")).await;
    let bodies = d.bodies_for(&alice);
    assert_eq!(bodies.len(), 1);
    assert!(bodies[0].contains("https://ipfs.null/ipfs/bafy123"));
    let session = h.engine.session().await;
    assert!(session.pending().is_none());
    let archived = session.archived().expect("archived photo");
    assert_eq!(archived.cid, Cid::new("bafy123"));
    assert_eq!(archived.url, "https://ipfs.null/ipfs/bafy123");
    assert_eq!(archived.submitter, alice);
    assert_eq!(h.loader.loaded(), vec!["photo.jpg".to_string()]);
    assert_eq!(h.gateway.uploads()[0].mime_type, "image/jpeg");

    // C: a second identity registers.
    let d = h.engine.handle(&text(BOB, "/register")).await;
    assert_eq!(d.bodies_for(&bob), vec![replies::registered(&bob).as_str()]);
    assert!(h.engine.session().await.is_verifier(&bob));

    // D: the verifier gets the archived URL.
    let d = h.engine.handle(&text(BOB, "/verify")).await;
    assert_eq!(d.bodies_for(&bob).len(), 1);
    assert!(d.bodies_for(&bob)[0].contains("https://ipfs.null/ipfs/bafy123"));

    // E: an unregistered identity cannot decide.
    let before = h.engine.session().await;
    let d = h.engine.handle(&text(CAROL, "/agree y")).await;
    assert_eq!(d.bodies_for(&carol), vec![replies::REGISTRATION_PROMPT]);
    assert!(d.outcome.is_none());
    assert_eq!(h.engine.session().await, before);

    // F: unmatched text is echoed.
    let d = h.engine.handle(&text(CAROL, "hello there")).await;
    assert_eq!(d.bodies_for(&carol), vec!["hello there"]);
}

// ---------------------------------------------------------------------------
// Decisions and rewards
// ---------------------------------------------------------------------------

#[tokio::test]
async fn agree_pays_verifier_and_submitter() {
    let h = harness();
    archived_with_verifier(&h).await;
    let alice = Identity::new(ALICE);
    let bob = Identity::new(BOB);

    let d = h.engine.handle(&text(BOB, "/agree y")).await;
    let outcome = d.outcome.clone().expect("outcome");
    assert_eq!(outcome.verifier, bob);
    assert_eq!(outcome.submitter, alice);
    assert_eq!(outcome.target_cid, Cid::new("bafy123"));
    assert_eq!(outcome.decision, Decision::Agree);

    let to_bob = d.bodies_for(&bob);
    assert_eq!(to_bob.len(), 2);
    assert!(to_bob[0].contains("\"verified\""));
    assert_eq!(to_bob[1], "Payment has been sent to you and the content creator.");
    assert_eq!(d.bodies_for(&alice).len(), 1);
}

#[tokio::test]
async fn disagree_pays_verifier_only() {
    let h = harness();
    archived_with_verifier(&h).await;

    let d = h.engine.handle(&text(BOB, "/agree n")).await;
    assert_eq!(d.outcome.as_ref().map(|o| o.decision), Some(Decision::Disagree));
    assert!(d.bodies_for(&Identity::new(ALICE)).is_empty());
    let to_bob = d.bodies_for(&Identity::new(BOB));
    assert!(to_bob[0].contains("\"not verified\""));
    assert_eq!(to_bob[1], "Payment has been sent to you.");
}

#[tokio::test]
async fn deprecated_decision_commands_still_work() {
    let h = harness();
    archived_with_verifier(&h).await;

    let d = h.engine.handle(&text(BOB, "/verified")).await;
    assert_eq!(d.outcome.map(|o| o.decision), Some(Decision::Agree));
    let d = h.engine.handle(&text(BOB, "/not-verified")).await;
    assert_eq!(d.outcome.map(|o| o.decision), Some(Decision::Disagree));
}

#[tokio::test]
async fn verify_without_archived_photo() {
    let h = harness();
    let bob = Identity::new(BOB);
    h.engine.handle(&text(BOB, "/register")).await;

    let d = h.engine.handle(&text(BOB, "/verify")).await;
    assert_eq!(d.bodies_for(&bob), vec![replies::NOTHING_TO_VERIFY]);
    let d = h.engine.handle(&text(BOB, "/agree y")).await;
    assert_eq!(d.bodies_for(&bob), vec![replies::NOTHING_TO_VERIFY]);
    assert!(d.outcome.is_none());
}

// ---------------------------------------------------------------------------
// Pending photo lifecycle
// ---------------------------------------------------------------------------

#[tokio::test]
async fn decline_clears_pending_but_keeps_archive() {
    let h = harness();
    archived_with_verifier(&h).await;
    h.engine.handle(&photo(ALICE, "second.jpg")).await;

    let d = h.engine.handle(&text(ALICE, "n")).await;
    assert_eq!(d.bodies_for(&Identity::new(ALICE)), vec![replies::ARCHIVE_DECLINED]);
    let session = h.engine.session().await;
    assert!(session.pending().is_none());
    assert_eq!(session.archived().map(|a| a.cid.as_str()), Some("bafy123"));
}

#[tokio::test]
async fn newer_photo_replaces_pending() {
    let h = harness();
    h.engine.handle(&photo(ALICE, "first.jpg")).await;
    h.engine.handle(&photo(CAROL, "second.jpg")).await;

    let session = h.engine.session().await;
    let pending = session.pending().expect("pending");
    assert_eq!(pending.reference, "second.jpg");
    assert_eq!(pending.submitter, Identity::new(CAROL));

    // Alice's "y" is no longer a confirmation for the pending photo.
    let d = h.engine.handle(&text(ALICE, "y")).await;
    assert_eq!(d.bodies_for(&Identity::new(ALICE)), vec!["y"]);
    assert_eq!(h.gateway.upload_count(), 0);
}

#[tokio::test]
async fn gateway_failure_keeps_pending_photo() {
    let h = harness();
    h.engine.handle(&photo(ALICE, "photo.jpg")).await;
    let before = h.engine.session().await;

    h.gateway
        .push_err(GatewayError::Unreachable("connection refused".into()));
    let d = h.engine.handle(&text(ALICE, "y")).await;
    assert!(d.messages[0].body.contains("could not be archived"));
    assert_eq!(h.engine.session().await, before);

    // Retry succeeds.
    let d = h.engine.handle(&text(ALICE, "y")).await;
    assert!(d.messages[0].body.contains("https://ipfs.null/ipfs/bafynull1"));
    assert!(h.engine.session().await.pending().is_none());
}

#[tokio::test]
async fn missing_payload_keeps_pending_photo() {
    let h = harness();
    h.loader.mark_missing("gone.jpg");
    h.engine.handle(&photo(ALICE, "gone.jpg")).await;
    let before = h.engine.session().await;

    let d = h.engine.handle(&text(ALICE, "yes")).await;
    assert!(d.messages[0].body.contains("could not be archived"));
    assert_eq!(h.engine.session().await, before);
    assert_eq!(h.gateway.upload_count(), 0);
}

#[tokio::test]
async fn confirmation_without_pending_photo_is_echoed() {
    let h = harness();
    let d = h.engine.handle(&text(ALICE, "yes")).await;
    assert_eq!(d.bodies_for(&Identity::new(ALICE)), vec!["yes"]);
}

#[tokio::test]
async fn unsupported_attachment_is_ignored() {
    let h = harness();
    let event = InboundEvent::attachments(ALICE, vec![Attachment::new("application/pdf", "a.pdf")]);
    let d = h.engine.handle(&event).await;
    assert!(d.messages.is_empty());
    assert!(h.engine.session().await.pending().is_none());
}

#[tokio::test]
async fn new_photo_waits_for_in_flight_archival() {
    let gateway = Arc::new(NullGateway::new().with_delay(Duration::from_millis(200)));
    let engine = Arc::new(WorkflowEngine::new(
        gateway.clone(),
        Arc::new(NullLoader::new()),
        EngineConfig::default(),
    ));
    engine
        .handle(&InboundEvent::attachments(ALICE, vec![Attachment::new("image/png", "a.png")]))
        .await;

    let confirming = Arc::clone(&engine);
    let confirmation = tokio::spawn(async move { confirming.handle(&text(ALICE, "y")).await });

    // Let the confirmation take the lock and start uploading.
    while gateway.upload_count() == 0 {
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    engine
        .handle(&InboundEvent::attachments(CAROL, vec![Attachment::new("image/png", "b.png")]))
        .await;

    let d = confirmation.await.expect("confirmation task");
    assert!(d.messages[0].body.contains("https://ipfs.null/ipfs/bafynull1"));

    let uploads: Vec<_> = gateway.uploads().into_iter().map(|p| p.file_name).collect();
    assert_eq!(uploads, vec!["a.png".to_string()]);

    let session = engine.session().await;
    let archived = session.archived().expect("archived photo");
    assert_eq!(archived.cid, Cid::new("bafynull1"));
    assert_eq!(archived.submitter, Identity::new(ALICE));
    let pending = session.pending().expect("pending photo");
    assert_eq!(pending.reference, "b.png");
    assert_eq!(pending.submitter, Identity::new(CAROL));
}

// ---------------------------------------------------------------------------
// Verifier broadcast
// ---------------------------------------------------------------------------

#[tokio::test]
async fn verifiers_are_told_about_new_photos() {
    let h = harness();
    let bob = Identity::new(BOB);
    let carol = Identity::new(CAROL);
    h.engine.handle(&text(BOB, "/register")).await;
    h.engine.handle(&text(CAROL, "/register")).await;

    // Carol submits; only Bob is notified.
    h.engine.handle(&photo(CAROL, "photo.png")).await;
    let d = h.engine.handle(&text(CAROL, "y")).await;
    let to_bob = d.bodies_for(&bob);
    assert_eq!(to_bob.len(), 1);
    assert!(to_bob[0].contains("https://ipfs.null/ipfs/bafynull1"));
    assert_eq!(d.bodies_for(&carol).len(), 1);
    assert_eq!(d.messages[0].recipient, carol);
}

#[tokio::test]
async fn broadcast_can_be_disabled() {
    let gateway = Arc::new(NullGateway::new());
    let engine = WorkflowEngine::new(
        gateway,
        Arc::new(NullLoader::new()),
        EngineConfig {
            notify_verifiers: false,
            ..Default::default()
        },
    );
    engine.handle(&text(BOB, "/register")).await;
    engine.handle(&photo(ALICE, "photo.jpg")).await;
    let d = engine.handle(&text(ALICE, "y")).await;
    assert_eq!(d.messages.len(), 1);
}

// ---------------------------------------------------------------------------
// Filesystem payloads
// ---------------------------------------------------------------------------

#[tokio::test]
async fn archives_file_from_attachments_dir() {
    let dir = tempfile::tempdir().expect("temp dir");
    std::fs::write(dir.path().join("photo.png"), b"\x89PNG fake").unwrap();

    let gateway = Arc::new(NullGateway::new());
    let loader = FsPayloadLoader::new(Some(dir.path().to_path_buf()), 1024);
    let engine = WorkflowEngine::new(gateway.clone(), Arc::new(loader), EngineConfig::default());

    engine
        .handle(&InboundEvent::attachments(
            ALICE,
            vec![Attachment::new("image/png", "photo.png")],
        ))
        .await;
    engine.handle(&text(ALICE, "y")).await;

    let uploads = gateway.uploads();
    assert_eq!(uploads.len(), 1);
    assert_eq!(uploads[0].bytes, b"\x89PNG fake");
    assert_eq!(uploads[0].file_name, "photo.png");
    assert_eq!(uploads[0].mime_type, "image/png");
}
