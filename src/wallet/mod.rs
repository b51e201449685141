//! Wallet connector seam and session context.
//!
//! A [`WalletConnector`] authorizes a session; the resulting [`Wallet`]
//! signs messages and submits transactions on the user's behalf. The
//! [`SessionContext`] is the explicit, passed-down replacement for ambient
//! global connection state: the shell initializes it when a connector
//! succeeds and tears it down on disconnect, and every view reads it.

mod rpc;
mod session;

pub use rpc::{RpcConnector, RpcWallet};
pub use session::{SessionContext, WalletSession};

use crate::error::Result;
use alloy_primitives::{Address, Bytes, TxHash};
use std::future::Future;

/// A connected wallet able to act for one account.
pub trait Wallet: Send + Sync {
    /// The connected account.
    fn address(&self) -> Address;

    /// Submit a state-changing transaction and return its hash.
    ///
    /// The future resolves once the wallet has broadcast the transaction,
    /// not once it is mined.
    fn send_transaction(
        &self,
        to: Address,
        data: Bytes,
    ) -> impl Future<Output = Result<TxHash>> + Send;

    /// Sign a plain-text message with the account key (EIP-191).
    fn sign_message(&self, message: &str) -> impl Future<Output = Result<Bytes>> + Send;

    /// Execute a read-only call against the latest block.
    fn call(&self, to: Address, data: Bytes) -> impl Future<Output = Result<Bytes>> + Send;
}

/// Authorizes a wallet session.
pub trait WalletConnector: Send + Sync {
    /// Wallet produced by a successful connection.
    type Wallet: Wallet;

    /// Display name of the connector.
    fn name(&self) -> &str;

    /// Whether a provider is reachable. Connecting is disabled otherwise.
    fn provider_available(&self) -> impl Future<Output = bool> + Send;

    /// Request account access.
    fn connect(&self) -> impl Future<Output = Result<Self::Wallet>> + Send;
}
