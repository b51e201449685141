//! Error types for paidproof.

use crate::contracts::ContractRevert;
use crate::orchestrator::PaymentError;
use crate::redemption::RedemptionError;
use thiserror::Error;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in paidproof.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Transport or JSON-RPC error from the wallet endpoint.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// Wallet connector error (no provider, rejected request, wrong chain).
    #[error("Wallet error: {0}")]
    Wallet(String),

    /// A contract call reverted.
    #[error("Contract reverted: {0}")]
    Revert(#[from] ContractRevert),

    /// ABI encoding or decoding failed.
    #[error("ABI error: {0}")]
    Abi(String),

    /// The proof backend refused a request or reported failure.
    #[error("Prover error: {0}")]
    Prover(String),

    /// A value outside the enumerated option sets.
    #[error("Invalid selection: {0}")]
    Selection(String),

    /// Payment flow error.
    #[error("Payment error: {0}")]
    Payment(#[from] PaymentError),

    /// Redemption flow error.
    #[error("Redemption error: {0}")]
    Redemption(#[from] RedemptionError),
}

impl From<alloy_sol_types::Error> for Error {
    fn from(e: alloy_sol_types::Error) -> Self {
        Self::Abi(e.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Self::Rpc(e.to_string())
    }
}
