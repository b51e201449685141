//! Named revert conditions of the token and verifier contracts.

use super::{IRiscZeroVerifierRouter, IERC20};
use alloy_primitives::{Address, Bytes, FixedBytes, U256};
use alloy_sol_types::SolInterface;
use thiserror::Error;

/// A decoded contract revert.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContractRevert {
    /// Spender's allowance is below the transferred amount.
    #[error("insufficient allowance for {spender}: have {allowance}, need {needed}")]
    InsufficientAllowance {
        /// Spender.
        spender: Address,
        /// Current allowance.
        allowance: U256,
        /// Required amount.
        needed: U256,
    },

    /// Sender's balance is below the transferred amount.
    #[error("insufficient balance for {sender}: have {balance}, need {needed}")]
    InsufficientBalance {
        /// Sender.
        sender: Address,
        /// Current balance.
        balance: U256,
        /// Required amount.
        needed: U256,
    },

    /// Approval from the zero address.
    #[error("invalid approver {0}")]
    InvalidApprover(Address),

    /// Transfer to the zero address.
    #[error("invalid receiver {0}")]
    InvalidReceiver(Address),

    /// Transfer from the zero address.
    #[error("invalid sender {0}")]
    InvalidSender(Address),

    /// Approval for the zero address.
    #[error("invalid spender {0}")]
    InvalidSpender(Address),

    /// No verifier registered for the selector.
    #[error("unknown verifier selector {0}")]
    SelectorUnknown(FixedBytes<4>),

    /// Selector already has a verifier.
    #[error("verifier selector {0} already in use")]
    SelectorInUse(FixedBytes<4>),

    /// Selector was removed and cannot be reused.
    #[error("verifier selector {0} was removed")]
    SelectorRemoved(FixedBytes<4>),

    /// Caller is not the owner.
    #[error("account {0} is not authorized")]
    Unauthorized(Address),

    /// Ownership transfer to an invalid owner.
    #[error("invalid owner {0}")]
    InvalidOwner(Address),

    /// Revert data that matches none of the known errors.
    #[error("unrecognized revert data 0x{}", hex::encode(.0))]
    Unknown(Bytes),
}

impl ContractRevert {
    /// Decode raw revert data.
    #[must_use]
    pub fn decode(data: &[u8]) -> Self {
        use IERC20::IERC20Errors as Token;
        use IRiscZeroVerifierRouter::IRiscZeroVerifierRouterErrors as Router;

        if let Ok(err) = Token::abi_decode(data, true) {
            return match err {
                Token::ERC20InsufficientAllowance(e) => Self::InsufficientAllowance {
                    spender: e.spender,
                    allowance: e.allowance,
                    needed: e.needed,
                },
                Token::ERC20InsufficientBalance(e) => Self::InsufficientBalance {
                    sender: e.sender,
                    balance: e.balance,
                    needed: e.needed,
                },
                Token::ERC20InvalidApprover(e) => Self::InvalidApprover(e.approver),
                Token::ERC20InvalidReceiver(e) => Self::InvalidReceiver(e.receiver),
                Token::ERC20InvalidSender(e) => Self::InvalidSender(e.sender),
                Token::ERC20InvalidSpender(e) => Self::InvalidSpender(e.spender),
            };
        }

        if let Ok(err) = Router::abi_decode(data, true) {
            return match err {
                Router::OwnableInvalidOwner(e) => Self::InvalidOwner(e.owner),
                Router::OwnableUnauthorizedAccount(e) => Self::Unauthorized(e.account),
                Router::SelectorInUse(e) => Self::SelectorInUse(e.selector),
                Router::SelectorRemoved(e) => Self::SelectorRemoved(e.selector),
                Router::SelectorUnknown(e) => Self::SelectorUnknown(e.selector),
            };
        }

        Self::Unknown(Bytes::copy_from_slice(data))
    }
}
