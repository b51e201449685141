//! Flow event system.

use crate::catalog::PeriodId;
use crate::orchestrator::Step;
use alloy_primitives::{Address, TxHash};
use chrono::{DateTime, Utc};
use tokio::sync::broadcast;

/// Events emitted by the shell and its views.
#[derive(Debug, Clone)]
pub enum FlowEvent {
    /// A wallet session was established.
    WalletConnected {
        /// Connected account.
        address: Address,
    },

    /// The wallet session was torn down.
    WalletDisconnected,

    /// The token approval transaction was submitted.
    ApproveSubmitted {
        /// Approval transaction hash.
        tx: TxHash,
    },

    /// The subscription payment transaction was submitted.
    PaySubmitted {
        /// Payment transaction hash.
        tx: TxHash,
        /// Period that was paid for.
        period: PeriodId,
    },

    /// A payment step failed and can be retried.
    StepFailed {
        /// Step that the orchestrator is now in.
        step: Step,
        /// Failure description.
        message: String,
    },

    /// A proof token was revealed.
    ProofGenerated,

    /// The redemption view started checking a pasted proof.
    RedemptionChecking,

    /// The redemption view unlocked.
    Unlocked,
}

/// Event together with the time it was emitted.
#[derive(Debug, Clone)]
pub struct TimedEvent {
    /// When the event was emitted.
    pub at: DateTime<Utc>,
    /// The event itself.
    pub event: FlowEvent,
}

/// Channel for receiving flow events.
pub type FlowEventsChannel = broadcast::Receiver<TimedEvent>;

/// Sender for flow events.
pub type FlowEventsSender = broadcast::Sender<TimedEvent>;

/// Create a new event channel pair.
#[must_use]
pub fn create_event_channel() -> (FlowEventsSender, FlowEventsChannel) {
    broadcast::channel(256)
}

/// Stamp and broadcast an event. Having no subscribers is not an error.
pub fn emit(tx: &FlowEventsSender, event: FlowEvent) {
    let _ = tx.send(TimedEvent {
        at: Utc::now(),
        event,
    });
}
