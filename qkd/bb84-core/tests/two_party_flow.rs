use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use rand_chacha::ChaCha20Rng;
use rand_core::SeedableRng;

use bb84_core::{
    AwaitOutcome, CoordinatorConfig, FileStore, Method, Phase, Role, SessionCoordinator,
    SessionError, SessionStore,
};

fn scratch_dir(tag: &str) -> PathBuf {
    let root = std::env::var("CARGO_TARGET_DIR").unwrap_or_else(|_| "target".to_string());
    let dir = PathBuf::from(root)
        .join("bb84-test-tmp")
        .join(format!("{tag}-{}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn actor(
    session: &PathBuf,
    role: Role,
    name: &str,
    seed: u8,
) -> SessionCoordinator<FileStore> {
    SessionCoordinator::new(
        FileStore::new(session),
        role,
        name,
        Box::new(ChaCha20Rng::from_seed([seed; 32])),
    )
    .with_config(CoordinatorConfig {
        poll_interval: Duration::from_millis(10),
        max_wait: Duration::from_millis(500),
        retry_limit: 3,
    })
}

#[test]
fn two_actors_drive_one_file_to_a_shared_key() {
    let session = scratch_dir("two-party-ok").join("session.json");
    let mut alice = actor(&session, Role::Sender, "alice", 1);
    let mut bob = actor(&session, Role::Receiver, "bob", 2);

    alice
        .sender_greet("bob", "ready for quantum key exchange?", false)
        .unwrap();

    // The receiver observes the greeting by polling, exactly as a separate
    // process would.
    let outcome = bob.await_phase(&[Phase::AwaitingPeerReply]).unwrap();
    assert_eq!(outcome, AwaitOutcome::Reached(Phase::AwaitingPeerReply));

    bob.receiver_respond(true, "ready!").unwrap();
    alice.await_phase(&[Phase::Preparing]).unwrap();
    alice.prepare(64, Method::Random).unwrap();
    alice.transmit().unwrap();

    bob.await_phase(&[Phase::AwaitingMeasurement]).unwrap();
    bob.measure(Method::Random).unwrap();
    bob.sift().unwrap();
    bob.check_errors().unwrap();
    let summary = bob.distill_key().unwrap();
    assert_eq!(summary.phase, Phase::Complete);
    assert_eq!(summary.key_len, 64);

    // Both actors read the same final key out of the shared document.
    let from_alice = alice.snapshot().unwrap().final_key;
    let from_bob = bob.snapshot().unwrap().final_key;
    assert!(from_alice.is_some());
    assert_eq!(from_alice, from_bob);
}

#[test]
fn measurement_from_the_sender_side_is_rejected_on_disk_too() {
    let session = scratch_dir("two-party-gate").join("session.json");
    let mut alice = actor(&session, Role::Sender, "alice", 3);
    let mut bob = actor(&session, Role::Receiver, "bob", 4);

    alice.sender_greet("bob", "hello", false).unwrap();
    bob.receiver_respond(true, "hi").unwrap();
    alice.prepare(32, Method::Random).unwrap();

    let before = alice.snapshot().unwrap();
    assert!(matches!(
        alice.measure(Method::Random),
        Err(SessionError::RoleNotPermitted { .. })
    ));
    assert_eq!(alice.snapshot().unwrap(), before);
}

#[test]
fn peer_reset_invalidates_a_session_in_flight() {
    let session = scratch_dir("two-party-reset").join("session.json");
    let mut alice = actor(&session, Role::Sender, "alice", 5);
    let mut bob = actor(&session, Role::Receiver, "bob", 6);

    alice.sender_greet("bob", "hello", false).unwrap();
    bob.receiver_respond(true, "hi").unwrap();
    alice.prepare(16, Method::Random).unwrap();

    let waiter = actor(&session, Role::Sender, "alice", 7);
    std::thread::scope(|scope| {
        scope.spawn(|| {
            std::thread::sleep(Duration::from_millis(40));
            bob.reset().unwrap();
        });
        let outcome = waiter.await_phase(&[Phase::Complete]).unwrap();
        assert_eq!(outcome, AwaitOutcome::PeerReset);
    });

    let doc = waiter.snapshot().unwrap();
    assert_eq!(doc.phase, Phase::Greeting);
    assert!(doc.sender_bits.is_empty());
}

#[test]
fn conflicting_writes_retry_through_compare_and_swap() {
    // Two handles race a mutation from the same observed version; the
    // coordinator's retry loop must absorb the conflict and commit both
    // participants' updates.
    let session = scratch_dir("two-party-cas").join("session.json");
    let store_a = FileStore::new(&session);
    let store_b = FileStore::new(&session);

    let base = store_a.load().unwrap();
    let mut first = base.clone();
    first.sender = "alice".to_string();
    store_a.compare_and_swap(base.version, first).unwrap();

    // A writer holding the stale base version is rejected, re-reads, and
    // lands cleanly.
    let mut second = base.clone();
    second.partner = "bob".to_string();
    let err = store_b.compare_and_swap(base.version, second).unwrap_err();
    assert!(matches!(err, SessionError::StaleWriteConflict { .. }));

    let fresh = store_b.load().unwrap();
    let mut retried = fresh.clone();
    retried.partner = "bob".to_string();
    store_b.compare_and_swap(fresh.version, retried).unwrap();

    let current = store_a.load().unwrap();
    assert_eq!(current.sender, "alice");
    assert_eq!(current.partner, "bob");
    assert_eq!(current.version, 2);
}
