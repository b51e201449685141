//! Subscription payment receiver client.

use super::{decode_returns, IPaymentReceiver};
use crate::catalog::PeriodId;
use crate::error::Result;
use crate::wallet::Wallet;
use alloy_primitives::{Address, TxHash, U256};
use alloy_sol_types::SolCall;
use tracing::debug;

/// Typed access to the subscription contract.
pub struct SubscriptionContract<'a, W> {
    wallet: &'a W,
    address: Address,
}

impl<'a, W: Wallet> SubscriptionContract<'a, W> {
    /// Bind the contract at `address` to `wallet`.
    #[must_use]
    pub fn new(wallet: &'a W, address: Address) -> Self {
        Self { wallet, address }
    }

    /// Contract address.
    #[must_use]
    pub fn address(&self) -> Address {
        self.address
    }

    /// Pay for `period`. The contract pulls the fee from the prior approval.
    ///
    /// # Errors
    ///
    /// Returns an error if the wallet refuses or the RPC call fails.
    pub async fn pay(&self, period: PeriodId) -> Result<TxHash> {
        debug!("pay({period}) on subscription {}", self.address);
        let call = IPaymentReceiver::payCall {
            month: period.get(),
        };
        self.wallet
            .send_transaction(self.address, call.abi_encode().into())
            .await
    }

    /// Whether `user` has paid for `period`.
    ///
    /// # Errors
    ///
    /// Returns an error if the call fails or returns malformed data.
    pub async fn has_paid(&self, user: Address, period: PeriodId) -> Result<bool> {
        let call = IPaymentReceiver::hasPaidCall {
            userAddr: user,
            month: period.get(),
        };
        let out = self
            .wallet
            .call(self.address, call.abi_encode().into())
            .await?;
        Ok(decode_returns::<IPaymentReceiver::hasPaidCall>(&out)?.paid)
    }

    /// Fee the contract charges per period.
    ///
    /// # Errors
    ///
    /// Returns an error if the call fails or returns malformed data.
    pub async fn amount_to_pay(&self) -> Result<U256> {
        let out = self
            .wallet
            .call(
                self.address,
                IPaymentReceiver::AMOUNT_TO_PAYCall {}.abi_encode().into(),
            )
            .await?;
        Ok(decode_returns::<IPaymentReceiver::AMOUNT_TO_PAYCall>(&out)?.amount)
    }

    /// Sweep collected fees to the contract owner.
    ///
    /// # Errors
    ///
    /// Returns an error if the wallet refuses or the RPC call fails.
    pub async fn withdraw_all_tokens(&self) -> Result<TxHash> {
        self.wallet
            .send_transaction(
                self.address,
                IPaymentReceiver::withdrawAllTokensCall {}.abi_encode().into(),
            )
            .await
    }
}
