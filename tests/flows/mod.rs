//! Flow tests for paidproof.
//!
//! These drive the shell, the payment orchestrator and the redemption view
//! against an in-memory wallet that records every request it receives.
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test --test flows
//! ```

mod harness;
mod payment;
mod redemption;
mod shell;

pub use harness::{MockConnector, MockWallet, TestHarness, WalletRequest};
