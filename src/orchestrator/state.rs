//! Orchestrator step machine.

use crate::catalog::PaymentRequest;
use alloy_primitives::{Address, Bytes, TxHash};
use std::fmt;

/// Fixed token revealed after the attestation is signed.
///
/// Not derived from the signature or the signer: every wallet receives the
/// same value.
pub const STUB_PROOF_TOKEN: &str = "0x89f23c7a14e5892ba8c7f4adbe3090f46da179c02f8e1acb6ef9417bc0af034cdd5e097832e17b5dc1ac87a4fa93571a97b6c4e29d290ce78dc27411d65a11a0f68a431ae0c7d2e23f790da3c0cfcde8e065b76ae12497a8417e998a68ea5d68e2aabf19ff32bb46a83a55ef15df51a2a274872c4936716dd690fe5e5fc02112d227d8122cb5fd93eb7eecaf5a03790f6015e63aa5a89f93e5c9ef61c0f7293f587dfaa8f177b7e7e2575e0e1325ae6a4ed06c42c94bdfdc0844f412cd055d4a5d7eaa4b123cf2d8b6608fa3b420b2bb322ee4f0f24dc2f43172e3283f55645a1a7ae14f5c6e230ddee2e75040f3f487205cc2dc5a7eb1fa356f25ef80487e6a5e3f3cc0b67e58d4f3e73a00cc9c53df22b36e4bc297af25c36cf21a0e68984cc56d0c8f45c6c1452188422e4b515c139a48e63a5b252cad59c56a8e157fc6a2e1fd8aa40e0b32983a518f84328261d9823ae1e647479c0b2148f7a5347ffb5f1e6e7f";

/// Opaque proof token shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProofToken(String);

impl ProofToken {
    /// The token handed out after signing.
    #[must_use]
    pub fn issued() -> Self {
        Self(STUB_PROOF_TOKEN.to_string())
    }

    /// Token text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProofToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A signed attestation message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attestation {
    /// Signing account.
    pub signer: Address,
    /// Signature returned by the wallet.
    pub signature: Bytes,
}

/// Where the payment flow currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    /// Nothing submitted yet.
    Idle,
    /// Approval transaction requested.
    Approving,
    /// Approval failed; submitting again retries it.
    ApproveFailed,
    /// Payment transaction requested.
    Paying,
    /// Payment failed; submitting again retries only the payment.
    PayFailed,
    /// Payment submitted; proof generation is enabled.
    Paid,
    /// Attestation signed and proof token revealed.
    Signed,
}

impl Step {
    /// Position in the forward order. Failure steps share the rank of the
    /// step that failed.
    #[must_use]
    pub const fn rank(self) -> u8 {
        match self {
            Self::Idle => 0,
            Self::Approving | Self::ApproveFailed => 1,
            Self::Paying | Self::PayFailed => 2,
            Self::Paid => 3,
            Self::Signed => 4,
        }
    }

    /// Whether a payment may be submitted from this step.
    #[must_use]
    pub const fn accepts_payment(self) -> bool {
        matches!(self, Self::Idle | Self::ApproveFailed | Self::PayFailed)
    }

    /// Whether the step is a retry-eligible failure.
    #[must_use]
    pub const fn is_failed(self) -> bool {
        matches!(self, Self::ApproveFailed | Self::PayFailed)
    }

    /// Whether a payment transaction has been recorded.
    #[must_use]
    pub const fn is_paid(self) -> bool {
        matches!(self, Self::Paid | Self::Signed)
    }

    /// Whether moving to `next` keeps the flow moving forward.
    #[must_use]
    pub const fn can_advance_to(self, next: Self) -> bool {
        match (self, next) {
            (Self::Idle | Self::ApproveFailed, Self::Approving)
            | (Self::Approving, Self::ApproveFailed | Self::Paying)
            | (Self::PayFailed, Self::Paying)
            | (Self::Paying, Self::PayFailed | Self::Paid)
            | (Self::Paid | Self::Signed, Self::Signed) => true,
            _ => false,
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Approving => "approving",
            Self::ApproveFailed => "approve-failed",
            Self::Paying => "paying",
            Self::PayFailed => "pay-failed",
            Self::Paid => "paid",
            Self::Signed => "signed",
        };
        f.write_str(name)
    }
}

/// Full orchestrator state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrchestratorState {
    step: Step,
    request: Option<PaymentRequest>,
    approval: Option<(Address, TxHash)>,
    pay_tx: Option<TxHash>,
    proof_token: Option<ProofToken>,
    attestation: Option<Attestation>,
}

impl Default for OrchestratorState {
    fn default() -> Self {
        Self {
            step: Step::Idle,
            request: None,
            approval: None,
            pay_tx: None,
            proof_token: None,
            attestation: None,
        }
    }
}

impl OrchestratorState {
    /// Current step.
    #[must_use]
    pub fn step(&self) -> Step {
        self.step
    }

    /// Request locked in by the first submission.
    #[must_use]
    pub fn request(&self) -> Option<&PaymentRequest> {
        self.request.as_ref()
    }

    /// Approval transaction hash.
    #[must_use]
    pub fn approve_tx(&self) -> Option<TxHash> {
        self.approval.map(|(_, tx)| tx)
    }

    /// Account that granted the recorded approval.
    #[must_use]
    pub fn approver(&self) -> Option<Address> {
        self.approval.map(|(owner, _)| owner)
    }

    /// Approval granted by `owner`, if that account made the recorded one.
    #[must_use]
    pub fn approval_by(&self, owner: Address) -> Option<TxHash> {
        self.approval
            .filter(|(approver, _)| *approver == owner)
            .map(|(_, tx)| tx)
    }

    /// Payment transaction hash.
    #[must_use]
    pub fn pay_tx(&self) -> Option<TxHash> {
        self.pay_tx
    }

    /// Revealed proof token.
    #[must_use]
    pub fn proof_token(&self) -> Option<&ProofToken> {
        self.proof_token.as_ref()
    }

    /// Latest signed attestation.
    #[must_use]
    pub fn attestation(&self) -> Option<&Attestation> {
        self.attestation.as_ref()
    }

    pub(super) fn advance(&mut self, next: Step) {
        debug_assert!(
            self.step.can_advance_to(next),
            "illegal step transition {} -> {}",
            self.step,
            next
        );
        self.step = next;
    }

    pub(super) fn lock_request(&mut self, request: PaymentRequest) {
        self.request = Some(request);
    }

    /// Record an approval. A first approval moves on to `Paying`; a
    /// re-approval during a payment retry is already there.
    pub(super) fn record_approval(&mut self, owner: Address, tx: TxHash) {
        self.approval = Some((owner, tx));
        if self.step == Step::Approving {
            self.advance(Step::Paying);
        }
    }

    pub(super) fn record_payment(&mut self, tx: TxHash) {
        self.pay_tx = Some(tx);
        self.advance(Step::Paid);
    }

    pub(super) fn record_proof(&mut self, token: ProofToken, attestation: Attestation) {
        debug_assert!(self.pay_tx.is_some(), "proof without payment");
        self.proof_token = Some(token);
        self.attestation = Some(attestation);
        self.advance(Step::Signed);
    }
}
