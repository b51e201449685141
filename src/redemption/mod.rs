//! Proof redemption view.
//!
//! `AwaitingInput ──submit (non-empty)──▶ Checking ──accepted──▶ Unlocked`
//!
//! The check is delegated to a [`ProofVerifier`]. The default
//! [`DelayVerifier`] accepts everything after a fixed delay; a verifier
//! backed by the on-chain router can replace it without changing the
//! state machine.

mod verifier;

pub use verifier::{DelayVerifier, ProofVerifier};

use crate::event::{emit, FlowEvent, FlowEventsSender};
use crate::lifecycle::MountToken;
use thiserror::Error;
use tracing::{info, warn};

/// Where the redemption view stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RedemptionState {
    /// Waiting for a pasted proof.
    AwaitingInput,
    /// Proof submitted, check in progress.
    Checking,
    /// Content unlocked. Terminal.
    Unlocked,
}

/// Errors of the redemption view.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RedemptionError {
    /// Submit was attempted without input.
    #[error("no proof entered")]
    EmptyInput,

    /// The verifier rejected the proof.
    #[error("proof rejected: {0}")]
    Rejected(String),

    /// The view was closed while the check was running.
    #[error("view closed before the check completed")]
    Cancelled,
}

/// Redemption view state machine.
pub struct RedemptionFlow<V> {
    state: RedemptionState,
    input: Option<String>,
    verifier: V,
    mount: MountToken,
    events: FlowEventsSender,
}

impl<V: ProofVerifier> RedemptionFlow<V> {
    /// Create a view awaiting input.
    #[must_use]
    pub fn new(verifier: V, mount: MountToken, events: FlowEventsSender) -> Self {
        Self {
            state: RedemptionState::AwaitingInput,
            input: None,
            verifier,
            mount,
            events,
        }
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> RedemptionState {
        self.state
    }

    /// Raw pasted text.
    #[must_use]
    pub fn input(&self) -> Option<&str> {
        self.input.as_deref()
    }

    /// Record the pasted text. Ignored once unlocked.
    pub fn set_input(&mut self, text: impl Into<String>) {
        if self.state == RedemptionState::Unlocked {
            return;
        }
        self.input = Some(text.into());
    }

    /// Whether the submit action is enabled.
    #[must_use]
    pub fn can_submit(&self) -> bool {
        self.state == RedemptionState::AwaitingInput
            && self.input.as_deref().is_some_and(|t| !t.trim().is_empty())
    }

    /// Check the pasted proof and unlock on acceptance.
    ///
    /// Submitting after unlocking is a no-op that returns
    /// [`RedemptionState::Unlocked`]. A view closed during a check stays in
    /// `Checking` and every later submit returns
    /// [`RedemptionError::Cancelled`].
    ///
    /// # Errors
    ///
    /// Returns [`RedemptionError::EmptyInput`] without input (state
    /// unchanged), [`RedemptionError::Rejected`] if the verifier refuses
    /// (state back to `AwaitingInput`), or [`RedemptionError::Cancelled`]
    /// if the view was closed.
    pub async fn submit(&mut self) -> Result<RedemptionState, RedemptionError> {
        match self.state {
            RedemptionState::Unlocked => return Ok(RedemptionState::Unlocked),
            // Only reachable when a check was abandoned by closing the view.
            RedemptionState::Checking => return Err(RedemptionError::Cancelled),
            RedemptionState::AwaitingInput => {}
        }
        if !self.mount.is_mounted() {
            return Err(RedemptionError::Cancelled);
        }
        if !self.can_submit() {
            return Err(RedemptionError::EmptyInput);
        }
        let proof = self.input.clone().unwrap_or_default();

        self.state = RedemptionState::Checking;
        emit(&self.events, FlowEvent::RedemptionChecking);
        info!("Checking pasted proof ({} bytes)", proof.len());

        let outcome = self
            .mount
            .run(self.verifier.verify(proof.trim()))
            .await
            .ok_or(RedemptionError::Cancelled)?;

        match outcome {
            Ok(()) => {
                self.state = RedemptionState::Unlocked;
                emit(&self.events, FlowEvent::Unlocked);
                info!("Content unlocked");
                Ok(RedemptionState::Unlocked)
            }
            Err(e) => {
                warn!("Proof rejected: {e}");
                self.state = RedemptionState::AwaitingInput;
                Err(RedemptionError::Rejected(e.to_string()))
            }
        }
    }
}
