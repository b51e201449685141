//! Payment-and-proof orchestrator.
//!
//! Drives a connected wallet through the payment screen:
//!
//! ```text
//! Idle ──submit──▶ Approving ──ok──▶ Paying ──ok──▶ Paid ──sign──▶ Signed
//!                     │                 │                  ◀──sign──┘
//!                    err               err
//!                     ▼                 ▼
//!               ApproveFailed       PayFailed
//!                (retry: approve)    (retry: pay)
//! ```
//!
//! The step never moves backwards. Failures are logged, broadcast as
//! [`FlowEvent::StepFailed`] and returned, leaving the action available for
//! another attempt.

mod state;

pub use state::{Attestation, OrchestratorState, ProofToken, Step, STUB_PROOF_TOKEN};

use crate::catalog::{Month, PaymentRequest, Plan, Year};
use crate::config::ClientConfig;
use crate::contracts::{SubscriptionContract, TokenContract};
use crate::event::{emit, FlowEvent, FlowEventsSender};
use crate::lifecycle::MountToken;
use crate::prover::GenerateProofRequest;
use crate::wallet::{SessionContext, Wallet};
use alloy_primitives::{Address, TxHash, U256};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Message the wallet signs before the proof token is revealed.
pub const ATTESTATION_MESSAGE: &str =
    "This message proofs your ownership of your address in zk proof";

/// Errors of the payment flow.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaymentError {
    /// No wallet is connected.
    #[error("wallet not connected")]
    WalletNotConnected,

    /// The current step does not accept this action.
    #[error("action not available in step {0}")]
    InvalidState(Step),

    /// A retry must resubmit the request that was first submitted.
    #[error("payment request already submitted for a different period")]
    RequestLocked,

    /// The selection does not form a purchasable request.
    #[error("invalid selection: {0}")]
    Selection(String),

    /// The configured allowance cannot be expressed in base units.
    #[error("invalid allowance: {0}")]
    InvalidAmount(String),

    /// The approval call failed.
    #[error("approval failed: {0}")]
    ApproveFailed(String),

    /// The payment call failed.
    #[error("payment failed: {0}")]
    PayFailed(String),

    /// Proof generation requires a recorded payment.
    #[error("no payment recorded")]
    NoPayment,

    /// The signature request failed.
    #[error("signing failed: {0}")]
    SignFailed(String),

    /// The view was closed while a call was in flight.
    #[error("view closed before the call completed")]
    Cancelled,
}

/// Transaction hashes of a completed payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaymentReceipt {
    /// Token approval.
    pub approve_tx: TxHash,
    /// Subscription payment.
    pub pay_tx: TxHash,
}

/// Current picker values on the payment screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    /// Selected plan.
    pub plan: Plan,
    /// Selected month.
    pub month: Month,
    /// Selected year.
    pub year: Year,
}

impl Default for Selection {
    fn default() -> Self {
        Self {
            plan: Plan::VfpMonthly,
            month: Month::June,
            year: Year::Y2025,
        }
    }
}

/// Payment screen state machine.
pub struct PaymentOrchestrator<W> {
    session: SessionContext<W>,
    token: Address,
    subscription: Address,
    allowance: std::result::Result<U256, String>,
    selection: Selection,
    state: OrchestratorState,
    mount: MountToken,
    events: FlowEventsSender,
}

impl<W: Wallet> PaymentOrchestrator<W> {
    /// Create an orchestrator reading the wallet from `session`.
    #[must_use]
    pub fn new(
        config: &ClientConfig,
        session: SessionContext<W>,
        mount: MountToken,
        events: FlowEventsSender,
    ) -> Self {
        Self {
            session,
            token: config.contracts.token,
            subscription: config.contracts.subscription,
            allowance: config.payment.amount_owed().map_err(|e| e.to_string()),
            selection: Selection {
                plan: config.payment.plan,
                ..Selection::default()
            },
            state: OrchestratorState::default(),
            mount,
            events,
        }
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> &OrchestratorState {
        &self.state
    }

    /// Current step.
    #[must_use]
    pub fn step(&self) -> Step {
        self.state.step()
    }

    /// Current picker values.
    #[must_use]
    pub fn selection(&self) -> Selection {
        self.selection
    }

    /// Select a plan. Disabled plans cannot be selected.
    ///
    /// # Errors
    ///
    /// Returns [`PaymentError::Selection`] for a disabled plan.
    pub fn select_plan(&mut self, plan: Plan) -> Result<(), PaymentError> {
        if !plan.is_enabled() {
            return Err(PaymentError::Selection(format!(
                "plan '{plan}' is not available"
            )));
        }
        self.selection.plan = plan;
        Ok(())
    }

    /// Select the billing month.
    pub fn select_month(&mut self, month: Month) {
        self.selection.month = month;
    }

    /// Select the billing year.
    pub fn select_year(&mut self, year: Year) {
        self.selection.year = year;
    }

    /// Request built from the current selection.
    ///
    /// # Errors
    ///
    /// Returns [`PaymentError::Selection`] if the selection is not purchasable
    /// and [`PaymentError::InvalidAmount`] if the configured allowance
    /// overflows.
    pub fn payment_request(&self) -> Result<PaymentRequest, PaymentError> {
        let amount_owed = self
            .allowance
            .clone()
            .map_err(PaymentError::InvalidAmount)?;
        PaymentRequest::new(
            self.selection.plan,
            self.selection.month,
            self.selection.year,
            amount_owed,
        )
        .map_err(|e| PaymentError::Selection(e.to_string()))
    }

    /// Whether the pay action is enabled.
    #[must_use]
    pub fn can_submit_payment(&self) -> bool {
        self.session.is_connected() && self.state.step().accepts_payment()
    }

    /// Whether the generate-proof action is enabled.
    #[must_use]
    pub fn can_generate_proof(&self) -> bool {
        self.session.is_connected() && self.state.pay_tx().is_some()
    }

    /// Approve the allowance, then pay for the requested period.
    ///
    /// A retry after a failed payment reuses the recorded approval only when
    /// the connected account granted it; otherwise it approves again first.
    ///
    /// A view whose call was cancelled by closing it stays closed: further
    /// actions return [`PaymentError::Cancelled`].
    ///
    /// # Errors
    ///
    /// Returns [`PaymentError::WalletNotConnected`] without a wallet,
    /// [`PaymentError::InvalidState`] when a payment is already recorded,
    /// [`PaymentError::RequestLocked`] when retrying with a different request,
    /// and [`PaymentError::ApproveFailed`] / [`PaymentError::PayFailed`]
    /// when an external call fails (the step then allows a retry).
    pub async fn submit_payment(
        &mut self,
        request: PaymentRequest,
    ) -> Result<PaymentReceipt, PaymentError> {
        let wallet = self
            .session
            .wallet()
            .ok_or(PaymentError::WalletNotConnected)?;
        if !self.mount.is_mounted() {
            return Err(PaymentError::Cancelled);
        }

        let step = self.state.step();
        if !step.accepts_payment() {
            return Err(PaymentError::InvalidState(step));
        }
        if self.state.request().is_some_and(|locked| *locked != request) {
            return Err(PaymentError::RequestLocked);
        }
        self.state.lock_request(request);

        let owner = wallet.address();
        let approve_tx = match self.state.approval_by(owner) {
            Some(tx) => {
                debug!("Reusing approval {tx} by {owner}");
                tx
            }
            None => {
                if let Some(previous) = self.state.approver() {
                    info!("Approval was granted by {previous}, re-approving from {owner}");
                }
                self.approve(wallet.as_ref(), request).await?
            }
        };

        let pay_tx = self.pay(wallet.as_ref(), request).await?;

        Ok(PaymentReceipt { approve_tx, pay_tx })
    }

    async fn approve(
        &mut self,
        wallet: &W,
        request: PaymentRequest,
    ) -> Result<TxHash, PaymentError> {
        // A payment retry from another account re-approves under `Paying`.
        let failed_step = if self.state.step() == Step::PayFailed {
            self.state.advance(Step::Paying);
            Step::PayFailed
        } else {
            self.state.advance(Step::Approving);
            Step::ApproveFailed
        };
        info!(
            "Approving {} base units for subscription {}",
            request.amount_owed, self.subscription
        );

        let token = TokenContract::new(wallet, self.token);
        let result = self
            .mount
            .run(token.approve(self.subscription, request.amount_owed))
            .await
            .ok_or(PaymentError::Cancelled)?;

        match result {
            Ok(tx) => {
                info!("Approval submitted: {tx}");
                self.state.record_approval(wallet.address(), tx);
                emit(&self.events, FlowEvent::ApproveSubmitted { tx });
                Ok(tx)
            }
            Err(e) => {
                warn!("Approval failed: {e}");
                self.fail(failed_step, &e.to_string());
                Err(PaymentError::ApproveFailed(e.to_string()))
            }
        }
    }

    async fn pay(
        &mut self,
        wallet: &W,
        request: PaymentRequest,
    ) -> Result<TxHash, PaymentError> {
        if self.state.step() == Step::PayFailed {
            self.state.advance(Step::Paying);
        }
        let period = request.period_id();
        info!(
            "Paying for period {period} ({} {})",
            request.month.name(),
            request.year
        );

        let subscription = SubscriptionContract::new(wallet, self.subscription);
        let result = self
            .mount
            .run(subscription.pay(period))
            .await
            .ok_or(PaymentError::Cancelled)?;

        match result {
            Ok(tx) => {
                info!("Payment submitted: {tx}");
                self.state.record_payment(tx);
                emit(&self.events, FlowEvent::PaySubmitted { tx, period });
                Ok(tx)
            }
            Err(e) => {
                warn!("Payment failed: {e}");
                self.fail(Step::PayFailed, &e.to_string());
                Err(PaymentError::PayFailed(e.to_string()))
            }
        }
    }

    fn fail(&mut self, step: Step, message: &str) {
        self.state.advance(step);
        emit(
            &self.events,
            FlowEvent::StepFailed {
                step,
                message: message.to_string(),
            },
        );
    }

    /// Sign the attestation message and reveal the proof token.
    ///
    /// The returned token is the fixed [`STUB_PROOF_TOKEN`]; the signature is
    /// requested but not used to derive it.
    ///
    /// # Errors
    ///
    /// Returns [`PaymentError::WalletNotConnected`] without a wallet,
    /// [`PaymentError::NoPayment`] before a payment is recorded and
    /// [`PaymentError::SignFailed`] if the wallet does not sign.
    pub async fn generate_proof(&mut self) -> Result<ProofToken, PaymentError> {
        let wallet = self
            .session
            .wallet()
            .ok_or(PaymentError::WalletNotConnected)?;

        if !self.mount.is_mounted() {
            return Err(PaymentError::Cancelled);
        }
        if self.state.pay_tx().is_none() || !self.state.step().is_paid() {
            return Err(PaymentError::NoPayment);
        }

        let signer = wallet.address();
        info!("Requesting attestation signature from {signer}");
        let signature = self
            .mount
            .run(wallet.sign_message(ATTESTATION_MESSAGE))
            .await
            .ok_or(PaymentError::Cancelled)?
            .map_err(|e| {
                warn!("Signing failed: {e}");
                PaymentError::SignFailed(e.to_string())
            })?;
        debug!(
            "Attestation signed ({} bytes); token is not derived from it",
            signature.len()
        );

        let token = ProofToken::issued();
        self.state
            .record_proof(token.clone(), Attestation { signer, signature });
        emit(&self.events, FlowEvent::ProofGenerated);
        Ok(token)
    }

    /// Proof backend request for the latest attestation, available once a
    /// proof has been generated.
    #[must_use]
    pub fn proof_request(&self) -> Option<GenerateProofRequest> {
        let request = self.state.request()?;
        let attestation = self.state.attestation()?;
        Some(GenerateProofRequest {
            user_address: attestation.signer,
            payment_receiver: self.subscription,
            month: request.period_id(),
            signature: attestation.signature.clone(),
        })
    }
}
