//! Shell, session and lifecycle tests.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use super::{MockConnector, MockWallet, TestHarness};
use paidproof::{ClientConfig, Error, FlowEvent, PaymentError, Route, Step, View};
use std::time::Duration;

#[tokio::test]
async fn test_connect_without_provider_fails() {
    let wallet = MockWallet::new(TestHarness::ACCOUNT);
    let harness = TestHarness::with_config(
        ClientConfig::default(),
        MockConnector::unavailable(wallet.clone()),
        wallet,
    );
    assert!(!harness.shell.can_connect().await);
    assert!(matches!(
        harness.shell.connect().await,
        Err(Error::Wallet(_))
    ));
    assert!(!harness.shell.session().is_connected());
}

#[tokio::test]
async fn test_connect_and_disconnect() {
    let mut harness = TestHarness::setup();
    assert!(harness.shell.can_connect().await);

    let session = harness.shell.connect().await.unwrap();
    assert!(session.connected);
    assert_eq!(session.address, Some(TestHarness::ACCOUNT));
    assert!(!harness.shell.can_connect().await);

    harness.shell.disconnect();
    // Second disconnect is a no-op and emits nothing.
    harness.shell.disconnect();
    assert!(!harness.shell.session().snapshot().connected);

    let events = harness.drain_events();
    assert!(matches!(
        events.as_slice(),
        [
            FlowEvent::WalletConnected { .. },
            FlowEvent::WalletDisconnected
        ]
    ));
}

#[tokio::test]
async fn test_navigation() {
    let mut harness = TestHarness::connected().await;
    assert_eq!(harness.shell.navigate("/").unwrap().route(), Route::Pay);
    assert_eq!(
        harness.shell.navigate("/verify").unwrap().route(),
        Route::Verify
    );
    assert!(harness.shell.navigate("/nowhere").is_err());
}

#[tokio::test(start_paused = true)]
async fn test_unmount_abandons_pending_payment() {
    let mut harness = TestHarness::connected().await;
    harness.wallet.delay_sends(Duration::from_secs(30));
    let View::Pay(mut view) = harness.shell.open(Route::Pay) else {
        panic!("expected payment view");
    };
    let request = view.payment_request().unwrap();

    let shell = &mut harness.shell;
    let leave = async {
        tokio::time::sleep(Duration::from_secs(1)).await;
        shell.close();
    };
    let (result, ()) = tokio::join!(view.submit_payment(request), leave);

    assert_eq!(result, Err(PaymentError::Cancelled));
    // The approval was requested but its outcome is never recorded.
    assert_eq!(harness.wallet.sent().len(), 1);
    assert_eq!(view.state().approve_tx(), None);
    assert_ne!(view.step(), Step::Paying);
    assert!(!harness
        .drain_events()
        .iter()
        .any(|e| matches!(e, FlowEvent::ApproveSubmitted { .. })));

    // Retrying on the closed view does not touch the wallet again.
    assert_eq!(
        view.submit_payment(request).await,
        Err(PaymentError::Cancelled)
    );
    assert_eq!(harness.wallet.sent().len(), 1);
}

#[tokio::test]
async fn test_session_shared_between_views() {
    let mut harness = TestHarness::setup();
    let View::Pay(view) = harness.shell.open(Route::Pay) else {
        panic!("expected payment view");
    };
    assert!(!view.can_submit_payment());

    harness.shell.connect().await.unwrap();
    assert!(view.can_submit_payment());

    // A fresh view sees the same session.
    let View::Pay(other) = harness.shell.open(Route::Pay) else {
        panic!("expected payment view");
    };
    assert!(other.can_submit_payment());
}
