//! Redemption view tests.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use super::{MockConnector, MockWallet, TestHarness};
use paidproof::event::TimedEvent;
use paidproof::orchestrator::STUB_PROOF_TOKEN;
use paidproof::{
    ClientConfig, DelayVerifier, Error, FlowEvent, ProofVerifier, RedemptionError, RedemptionFlow,
    RedemptionState, Result, Route, Shell, View,
};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

/// Accepts only proofs it has been told about, recording every check.
#[derive(Clone, Default)]
struct AllowListVerifier {
    accepted: Arc<Mutex<Vec<String>>>,
    checked: Arc<Mutex<Vec<String>>>,
}

impl AllowListVerifier {
    fn accept(&self, proof: &str) {
        self.accepted.lock().push(proof.to_string());
    }
}

impl ProofVerifier for AllowListVerifier {
    async fn verify(&self, proof: &str) -> Result<()> {
        self.checked.lock().push(proof.to_string());
        if self.accepted.lock().iter().any(|p| p == proof) {
            Ok(())
        } else {
            Err(Error::Prover(format!("no such proof: {proof}")))
        }
    }
}

fn harness_with_delay(ms: u64) -> TestHarness {
    let mut config = ClientConfig::default();
    config.redemption.check_delay_ms = ms;
    let wallet = MockWallet::new(TestHarness::ACCOUNT);
    TestHarness::with_config(config, MockConnector::new(wallet.clone()), wallet)
}

fn verify_view(harness: &mut TestHarness) -> RedemptionFlow<DelayVerifier> {
    match harness.shell.open(Route::Verify) {
        View::Verify(view) => view,
        View::Pay(_) => panic!("expected verify view"),
    }
}

#[tokio::test(start_paused = true)]
async fn test_paste_and_unlock() {
    let mut harness = harness_with_delay(2000);
    let mut view = verify_view(&mut harness);
    assert_eq!(view.state(), RedemptionState::AwaitingInput);
    assert!(!view.can_submit());

    view.set_input(STUB_PROOF_TOKEN);
    assert!(view.can_submit());

    let started = Instant::now();
    assert_eq!(view.submit().await, Ok(RedemptionState::Unlocked));
    assert!(started.elapsed() >= Duration::from_millis(2000));

    let events = harness.drain_events();
    assert!(matches!(
        events.as_slice(),
        [FlowEvent::RedemptionChecking, FlowEvent::Unlocked]
    ));
}

#[tokio::test(start_paused = true)]
async fn test_garbage_is_accepted() {
    // The check accepts any non-empty text; redemption does not consult
    // the payment flow or the chain.
    let mut harness = harness_with_delay(50);
    let mut view = verify_view(&mut harness);
    view.set_input("definitely not a proof");
    assert_eq!(view.submit().await, Ok(RedemptionState::Unlocked));
    assert!(harness.wallet.requests().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_empty_submit_is_rejected() {
    let mut harness = harness_with_delay(50);
    let mut view = verify_view(&mut harness);
    view.set_input("\n\t ");
    assert_eq!(view.submit().await, Err(RedemptionError::EmptyInput));
    assert_eq!(view.state(), RedemptionState::AwaitingInput);
    assert!(harness.drain_events().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_leaving_during_check_cancels() {
    let mut harness = harness_with_delay(2000);
    let mut view = verify_view(&mut harness);
    view.set_input(STUB_PROOF_TOKEN);

    let shell = &mut harness.shell;
    let leave = async {
        tokio::time::sleep(Duration::from_millis(100)).await;
        shell.navigate("/").unwrap();
    };
    let (result, ()) = tokio::join!(view.submit(), leave);

    assert_eq!(result, Err(RedemptionError::Cancelled));
    assert_ne!(view.state(), RedemptionState::Unlocked);

    // The abandoned view stays closed instead of reporting missing input.
    assert_eq!(view.submit().await, Err(RedemptionError::Cancelled));
    assert!(!harness
        .drain_events()
        .iter()
        .any(|e| matches!(e, FlowEvent::Unlocked)));
}

#[tokio::test]
async fn test_rejected_proof_can_be_resubmitted() {
    let verifier = AllowListVerifier::default();
    let wallet = MockWallet::new(TestHarness::ACCOUNT);
    let mut shell = Shell::with_verifier(
        ClientConfig::default(),
        MockConnector::new(wallet),
        verifier.clone(),
    );
    let mut events = shell.events().unwrap();
    let View::Verify(mut view) = shell.open(Route::Verify) else {
        panic!("expected verify view");
    };

    view.set_input("  0xfeed  ");
    let err = view.submit().await.unwrap_err();
    assert!(matches!(err, RedemptionError::Rejected(ref m) if m.contains("0xfeed")));
    assert_eq!(view.state(), RedemptionState::AwaitingInput);
    assert_eq!(view.input(), Some("  0xfeed  "));

    let mut seen = Vec::new();
    while let Ok(TimedEvent { event, .. }) = events.try_recv() {
        seen.push(event);
    }
    assert!(matches!(seen.as_slice(), [FlowEvent::RedemptionChecking]));

    verifier.accept("0xfeed");
    assert_eq!(view.submit().await, Ok(RedemptionState::Unlocked));
    assert_eq!(*verifier.checked.lock(), vec!["0xfeed", "0xfeed"]);
}
