//! Payment-and-proof flow tests.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use super::{MockWallet, TestHarness, WalletRequest};
use alloy_primitives::{Address, U256};
use alloy_sol_types::SolCall;
use paidproof::contracts::{IPaymentReceiver, SubscriptionContract, IERC20};
use paidproof::orchestrator::{ATTESTATION_MESSAGE, STUB_PROOF_TOKEN};
use paidproof::{
    ClientConfig, FlowEvent, Month, PaymentError, PaymentOrchestrator, PeriodId, Route, Step,
    View, Wallet, Year,
};

fn pay_view(harness: &mut TestHarness) -> PaymentOrchestrator<MockWallet> {
    match harness.shell.open(Route::Pay) {
        View::Pay(view) => view,
        View::Verify(_) => panic!("expected payment view"),
    }
}

/// connect → select 06/2025 → pay → generate proof.
#[tokio::test]
async fn test_end_to_end_payment_and_proof() {
    let mut harness = TestHarness::connected().await;
    let config = ClientConfig::default();
    let mut view = pay_view(&mut harness);

    view.select_month("06".parse().unwrap());
    view.select_year("2025".parse().unwrap());
    assert!(view.can_submit_payment());
    assert!(!view.can_generate_proof());

    let request = view.payment_request().unwrap();
    let receipt = view.submit_payment(request).await.unwrap();
    assert_eq!(view.step(), Step::Paid);
    assert_eq!(view.state().pay_tx(), Some(receipt.pay_tx));

    let sent = harness.wallet.sent();
    assert_eq!(sent.len(), 2);

    // Approval of the fixed allowance to the subscription contract.
    let (to, data) = &sent[0];
    assert_eq!(*to, config.contracts.token);
    let approve = IERC20::approveCall::abi_decode(data, true).unwrap();
    assert_eq!(approve.spender, config.contracts.subscription);
    assert_eq!(approve.value, U256::from(10_000_000_000_000_000_000u128));

    // Payment keyed by month‖year.
    let (to, data) = &sent[1];
    assert_eq!(*to, config.contracts.subscription);
    let pay = IPaymentReceiver::payCall::abi_decode(data, true).unwrap();
    assert_eq!(pay.month, 62025);

    assert!(view.can_generate_proof());
    let token = view.generate_proof().await.unwrap();
    assert_eq!(harness.wallet.signed(), vec![ATTESTATION_MESSAGE.to_string()]);
    assert_eq!(token.as_str(), STUB_PROOF_TOKEN);
    assert_eq!(view.state().proof_token(), Some(&token));
    assert_eq!(view.step(), Step::Signed);

    let events = harness.drain_events();
    assert!(matches!(
        events[0],
        FlowEvent::WalletConnected { address } if address == TestHarness::ACCOUNT
    ));
    assert!(matches!(events[1], FlowEvent::ApproveSubmitted { .. }));
    assert!(matches!(
        events[2],
        FlowEvent::PaySubmitted { period, .. } if period.get() == 62025
    ));
    assert!(matches!(events[3], FlowEvent::ProofGenerated));
}

#[tokio::test]
async fn test_december_2026_period() {
    let mut harness = TestHarness::connected().await;
    let mut view = pay_view(&mut harness);
    view.select_month(Month::December);
    view.select_year(Year::Y2026);

    let request = view.payment_request().unwrap();
    view.submit_payment(request).await.unwrap();

    let (_, data) = &harness.wallet.sent()[1];
    let pay = IPaymentReceiver::payCall::abi_decode(data, true).unwrap();
    assert_eq!(pay.month, 122_026);
}

#[tokio::test]
async fn test_actions_disabled_until_connected() {
    let mut harness = TestHarness::setup();
    let mut view = pay_view(&mut harness);
    assert!(!view.can_submit_payment());
    assert!(!view.can_generate_proof());

    let request = view.payment_request().unwrap();
    assert_eq!(
        view.submit_payment(request).await,
        Err(PaymentError::WalletNotConnected)
    );
    assert!(harness.wallet.requests().is_empty());

    // Connecting after the view opened enables it: the session is shared.
    harness.shell.connect().await.unwrap();
    assert!(view.can_submit_payment());
    view.submit_payment(request).await.unwrap();
}

#[tokio::test]
async fn test_disconnect_disables_proof() {
    let mut harness = TestHarness::connected().await;
    let mut view = pay_view(&mut harness);
    let request = view.payment_request().unwrap();
    view.submit_payment(request).await.unwrap();
    assert!(view.can_generate_proof());

    harness.shell.disconnect();
    assert!(!view.can_generate_proof());
    assert_eq!(
        view.generate_proof().await,
        Err(PaymentError::WalletNotConnected)
    );
    assert!(harness
        .drain_events()
        .iter()
        .any(|e| matches!(e, FlowEvent::WalletDisconnected)));
}

#[tokio::test]
async fn test_failed_approval_is_retryable() {
    let mut harness = TestHarness::connected().await;
    harness.wallet.fail_sends(vec![true]);
    let mut view = pay_view(&mut harness);
    let request = view.payment_request().unwrap();

    let err = view.submit_payment(request).await.unwrap_err();
    assert!(matches!(err, PaymentError::ApproveFailed(_)));
    assert_eq!(view.step(), Step::ApproveFailed);
    assert_eq!(harness.wallet.sent().len(), 1, "pay must not be issued");
    assert!(harness.drain_events().iter().any(|e| matches!(
        e,
        FlowEvent::StepFailed {
            step: Step::ApproveFailed,
            ..
        }
    )));

    view.submit_payment(request).await.unwrap();
    assert_eq!(view.step(), Step::Paid);
}

#[tokio::test]
async fn test_pay_retry_after_wallet_switch_reapproves() {
    let mut harness = TestHarness::connected().await;
    harness.wallet.fail_sends(vec![false, true]);
    let mut view = pay_view(&mut harness);
    let request = view.payment_request().unwrap();

    let err = view.submit_payment(request).await.unwrap_err();
    assert!(matches!(err, PaymentError::PayFailed(_)));
    assert_eq!(view.state().approver(), Some(TestHarness::ACCOUNT));

    // The allowance belongs to the first account; the new one has none.
    let other = MockWallet::new(Address::repeat_byte(0xb2));
    harness.shell.disconnect();
    harness.shell.session().attach(other.clone());

    view.submit_payment(request).await.unwrap();
    assert_eq!(view.step(), Step::Paid);
    assert_eq!(view.state().approver(), Some(other.address()));

    let sent = other.sent();
    assert_eq!(sent.len(), 2);
    let approve = IERC20::approveCall::abi_decode(&sent[0].1, true).unwrap();
    assert_eq!(approve.spender, ClientConfig::default().contracts.subscription);
    IPaymentReceiver::payCall::abi_decode(&sent[1].1, true).unwrap();
    // Nothing more went through the first wallet.
    assert_eq!(harness.wallet.sent().len(), 2);
}

#[tokio::test]
async fn test_pay_retry_with_same_wallet_skips_approval() {
    let mut harness = TestHarness::connected().await;
    harness.wallet.fail_sends(vec![false, true]);
    let mut view = pay_view(&mut harness);
    let request = view.payment_request().unwrap();

    view.submit_payment(request).await.unwrap_err();
    view.submit_payment(request).await.unwrap();

    let sent = harness.wallet.sent();
    assert_eq!(sent.len(), 3);
    IPaymentReceiver::payCall::abi_decode(&sent[2].1, true).unwrap();
}

#[tokio::test]
async fn test_proof_token_is_not_bound_to_signer() {
    // Documents a defect: the revealed token is a constant, so it proves
    // nothing about who paid. Two different wallets receive the same token.
    let mut tokens = Vec::new();
    let mut signers = Vec::new();
    for byte in [0x01, 0x02] {
        let wallet = MockWallet::new(Address::repeat_byte(byte));
        let mut harness = TestHarness::with_wallet(wallet.clone());
        harness.shell.connect().await.unwrap();
        let mut view = pay_view(&mut harness);
        let request = view.payment_request().unwrap();
        view.submit_payment(request).await.unwrap();
        tokens.push(view.generate_proof().await.unwrap());
        signers.push(wallet.address());
    }

    assert_ne!(signers[0], signers[1]);
    assert_eq!(tokens[0], tokens[1]);
}

#[tokio::test]
async fn test_has_paid_query() {
    let harness = TestHarness::connected().await;
    let mut word = [0u8; 32];
    word[31] = 1;
    harness.wallet.answer_calls(word.to_vec().into());

    let wallet = harness.shell.session().wallet().unwrap();
    let config = ClientConfig::default();
    let subscription = SubscriptionContract::new(wallet.as_ref(), config.contracts.subscription);
    let period = PeriodId::encode(Month::June, Year::Y2025);
    assert!(subscription
        .has_paid(TestHarness::ACCOUNT, period)
        .await
        .unwrap());

    let WalletRequest::Call { to, data } = &harness.wallet.requests()[0] else {
        panic!("expected eth_call");
    };
    assert_eq!(*to, config.contracts.subscription);
    let call = IPaymentReceiver::hasPaidCall::abi_decode(data, true).unwrap();
    assert_eq!(call.userAddr, TestHarness::ACCOUNT);
    assert_eq!(call.month, 62025);
}
