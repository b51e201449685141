//! # paidproof
//!
//! Wallet-driven subscription payments with a proof token.
//!
//! A user connects a wallet, approves the subscription contract to spend a
//! fixed token allowance, pays for a month, and signs an attestation message
//! to receive a proof token. The token is later pasted into a redemption view
//! that unlocks content.
//!
//! ```text
//!   Shell ── SessionContext ──┬── "/"       PaymentOrchestrator
//!     │                       │              approve → pay → sign
//!     │                       └── "/verify" RedemptionFlow
//!     │                                      input → checking → unlocked
//!     └── FlowEvent broadcast
//! ```
//!
//! All ledger logic lives in external contracts reached through the
//! [`wallet::Wallet`] trait. [`wallet::RpcConnector`] talks to a JSON-RPC
//! wallet endpoint; tests plug in their own implementation. An optional
//! [`prover::ProverClient`] forwards the signed attestation to a proof
//! backend.

pub mod catalog;
pub mod config;
pub mod contracts;
pub mod error;
pub mod event;
pub mod lifecycle;
pub mod orchestrator;
pub mod prover;
pub mod redemption;
pub mod shell;
pub mod wallet;

pub use catalog::{Month, PaymentRequest, PeriodId, Plan, Year};
pub use config::ClientConfig;
pub use error::{Error, Result};
pub use event::{FlowEvent, FlowEventsChannel, FlowEventsSender};
pub use orchestrator::{
    OrchestratorState, PaymentError, PaymentOrchestrator, PaymentReceipt, ProofToken, Step,
};
pub use prover::{BackendVerifier, ProverClient};
pub use redemption::{
    DelayVerifier, ProofVerifier, RedemptionError, RedemptionFlow, RedemptionState,
};
pub use shell::{Route, Shell, View};
pub use wallet::{SessionContext, Wallet, WalletConnector, WalletSession};
