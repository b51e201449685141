//! Verifier router client.
//!
//! The router forwards `verify` to the verifier registered for the first
//! four bytes of the seal. Selector registration and ownership transfer are
//! owner-only; ownership moves in two steps (propose, then accept).

use super::{decode_returns, IRiscZeroVerifierRouter};
use crate::error::Result;
use crate::wallet::Wallet;
use alloy_primitives::{Address, Bytes, FixedBytes, TxHash, B256};
use alloy_sol_types::SolCall;

/// Inputs of `verify(seal, imageId, journalDigest)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationPayload {
    /// Proof seal; its first four bytes select the verifier.
    pub seal: Bytes,
    /// Guest program image id.
    pub image_id: B256,
    /// Digest of the public journal.
    pub journal_digest: B256,
}

/// Inputs of `verifyIntegrity(receipt)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntegrityPayload {
    /// Proof seal.
    pub seal: Bytes,
    /// Digest of the receipt claim.
    pub claim_digest: B256,
}

impl VerificationPayload {
    /// Verifier selector carried in the seal, if the seal is long enough.
    #[must_use]
    pub fn selector(&self) -> Option<FixedBytes<4>> {
        self.seal
            .get(..4)
            .map(FixedBytes::<4>::from_slice)
    }
}

/// Typed access to the verifier router.
pub struct VerifierRouter<'a, W> {
    wallet: &'a W,
    address: Address,
}

impl<'a, W: Wallet> VerifierRouter<'a, W> {
    /// Bind the router at `address` to `wallet`.
    #[must_use]
    pub fn new(wallet: &'a W, address: Address) -> Self {
        Self { wallet, address }
    }

    async fn read(&self, data: Vec<u8>) -> Result<Bytes> {
        self.wallet.call(self.address, data.into()).await
    }

    async fn write(&self, data: Vec<u8>) -> Result<TxHash> {
        self.wallet.send_transaction(self.address, data.into()).await
    }

    /// Verify a proof. Succeeds when the router does not revert.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Revert`](crate::Error::Revert) when verification
    /// fails on chain, or a transport error.
    pub async fn verify(&self, payload: &VerificationPayload) -> Result<()> {
        let call = IRiscZeroVerifierRouter::verifyCall {
            seal: payload.seal.clone(),
            imageId: payload.image_id,
            journalDigest: payload.journal_digest,
        };
        self.read(call.abi_encode()).await.map(|_| ())
    }

    /// Check the integrity of a receipt. Succeeds when the router does not revert.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Revert`](crate::Error::Revert) when the check fails
    /// on chain, or a transport error.
    pub async fn verify_integrity(&self, payload: &IntegrityPayload) -> Result<()> {
        let call = IRiscZeroVerifierRouter::verifyIntegrityCall {
            receipt: IRiscZeroVerifierRouter::Receipt {
                seal: payload.seal.clone(),
                claimDigest: payload.claim_digest,
            },
        };
        self.read(call.abi_encode()).await.map(|_| ())
    }

    /// Verifier registered for `selector`.
    ///
    /// # Errors
    ///
    /// Returns a revert if the selector is unknown or removed.
    pub async fn get_verifier(&self, selector: FixedBytes<4>) -> Result<Address> {
        let out = self
            .read(IRiscZeroVerifierRouter::getVerifierCall { selector }.abi_encode())
            .await?;
        Ok(decode_returns::<IRiscZeroVerifierRouter::getVerifierCall>(&out)?.verifier)
    }

    /// Register `verifier` under `selector` (owner only).
    ///
    /// # Errors
    ///
    /// Returns an error if the wallet refuses or the RPC call fails.
    pub async fn add_verifier(&self, selector: FixedBytes<4>, verifier: Address) -> Result<TxHash> {
        self.write(IRiscZeroVerifierRouter::addVerifierCall { selector, verifier }.abi_encode())
            .await
    }

    /// Permanently remove `selector` (owner only).
    ///
    /// # Errors
    ///
    /// Returns an error if the wallet refuses or the RPC call fails.
    pub async fn remove_verifier(&self, selector: FixedBytes<4>) -> Result<TxHash> {
        self.write(IRiscZeroVerifierRouter::removeVerifierCall { selector }.abi_encode())
            .await
    }

    /// Current owner.
    ///
    /// # Errors
    ///
    /// Returns an error if the call fails or returns malformed data.
    pub async fn owner(&self) -> Result<Address> {
        let out = self
            .read(IRiscZeroVerifierRouter::ownerCall {}.abi_encode())
            .await?;
        Ok(decode_returns::<IRiscZeroVerifierRouter::ownerCall>(&out)?.currentOwner)
    }

    /// Proposed owner awaiting acceptance.
    ///
    /// # Errors
    ///
    /// Returns an error if the call fails or returns malformed data.
    pub async fn pending_owner(&self) -> Result<Address> {
        let out = self
            .read(IRiscZeroVerifierRouter::pendingOwnerCall {}.abi_encode())
            .await?;
        Ok(decode_returns::<IRiscZeroVerifierRouter::pendingOwnerCall>(&out)?.pending)
    }

    /// Propose `new_owner` (owner only).
    ///
    /// # Errors
    ///
    /// Returns an error if the wallet refuses or the RPC call fails.
    pub async fn transfer_ownership(&self, new_owner: Address) -> Result<TxHash> {
        self.write(
            IRiscZeroVerifierRouter::transferOwnershipCall {
                newOwner: new_owner,
            }
            .abi_encode(),
        )
        .await
    }

    /// Accept a pending ownership transfer (pending owner only).
    ///
    /// # Errors
    ///
    /// Returns an error if the wallet refuses or the RPC call fails.
    pub async fn accept_ownership(&self) -> Result<TxHash> {
        self.write(IRiscZeroVerifierRouter::acceptOwnershipCall {}.abi_encode())
            .await
    }
}
