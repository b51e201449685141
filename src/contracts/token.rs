//! ERC-20 payment token client.

use super::{decode_returns, IERC20};
use crate::error::Result;
use crate::wallet::Wallet;
use alloy_primitives::{Address, TxHash, U256};
use alloy_sol_types::SolCall;
use tracing::debug;

/// Typed access to the payment token.
pub struct TokenContract<'a, W> {
    wallet: &'a W,
    address: Address,
}

impl<'a, W: Wallet> TokenContract<'a, W> {
    /// Bind the token at `address` to `wallet`.
    #[must_use]
    pub fn new(wallet: &'a W, address: Address) -> Self {
        Self { wallet, address }
    }

    /// Allow `spender` to transfer up to `amount` from the wallet's account.
    ///
    /// # Errors
    ///
    /// Returns an error if the wallet refuses or the RPC call fails.
    pub async fn approve(&self, spender: Address, amount: U256) -> Result<TxHash> {
        debug!("approve({spender}, {amount}) on token {}", self.address);
        let call = IERC20::approveCall {
            spender,
            value: amount,
        };
        self.wallet
            .send_transaction(self.address, call.abi_encode().into())
            .await
    }

    /// Remaining allowance of `spender` over `owner`'s tokens.
    ///
    /// # Errors
    ///
    /// Returns an error if the call fails or returns malformed data.
    pub async fn allowance(&self, owner: Address, spender: Address) -> Result<U256> {
        let call = IERC20::allowanceCall { owner, spender };
        let out = self
            .wallet
            .call(self.address, call.abi_encode().into())
            .await?;
        Ok(decode_returns::<IERC20::allowanceCall>(&out)?.remaining)
    }

    /// Token balance of `account`.
    ///
    /// # Errors
    ///
    /// Returns an error if the call fails or returns malformed data.
    pub async fn balance_of(&self, account: Address) -> Result<U256> {
        let call = IERC20::balanceOfCall { account };
        let out = self
            .wallet
            .call(self.address, call.abi_encode().into())
            .await?;
        Ok(decode_returns::<IERC20::balanceOfCall>(&out)?.balance)
    }

    /// Number of decimals of the token.
    ///
    /// # Errors
    ///
    /// Returns an error if the call fails or returns malformed data.
    pub async fn decimals(&self) -> Result<u8> {
        let out = self
            .wallet
            .call(self.address, IERC20::decimalsCall {}.abi_encode().into())
            .await?;
        Ok(decode_returns::<IERC20::decimalsCall>(&out)?.places)
    }

    /// Ticker symbol.
    ///
    /// # Errors
    ///
    /// Returns an error if the call fails or returns malformed data.
    pub async fn symbol(&self) -> Result<String> {
        let out = self
            .wallet
            .call(self.address, IERC20::symbolCall {}.abi_encode().into())
            .await?;
        Ok(decode_returns::<IERC20::symbolCall>(&out)?.tokenSymbol)
    }
}
