//! Contract ABIs and typed clients.
//!
//! Three deployed contracts are involved:
//!
//! - the ERC-20 payment token, approved to be spent by
//! - the subscription contract, which records `pay(period)` per user, and
//! - the verifier router, which dispatches zero-knowledge receipts to a
//!   verifier by the first four bytes of the seal.
//!
//! Clients encode calls with `alloy-sol-types` and hand them to a
//! [`Wallet`](crate::wallet::Wallet) as raw calldata.

mod revert;
mod subscription;
mod token;
mod verifier;

pub use revert::ContractRevert;
pub use subscription::SubscriptionContract;
pub use token::TokenContract;
pub use verifier::{IntegrityPayload, VerificationPayload, VerifierRouter};

use crate::error::Result;
use alloy_sol_types::{sol, SolCall};

sol! {
    /// ERC-20 payment token.
    #[derive(Debug, PartialEq, Eq)]
    interface IERC20 {
        error ERC20InsufficientAllowance(address spender, uint256 allowance, uint256 needed);
        error ERC20InsufficientBalance(address sender, uint256 balance, uint256 needed);
        error ERC20InvalidApprover(address approver);
        error ERC20InvalidReceiver(address receiver);
        error ERC20InvalidSender(address sender);
        error ERC20InvalidSpender(address spender);

        event Approval(address indexed owner, address indexed spender, uint256 value);
        event Transfer(address indexed from, address indexed to, uint256 value);

        function allowance(address owner, address spender) external view returns (uint256 remaining);
        function approve(address spender, uint256 value) external returns (bool success);
        function balanceOf(address account) external view returns (uint256 balance);
        function decimals() external view returns (uint8 places);
        function name() external view returns (string tokenName);
        function symbol() external view returns (string tokenSymbol);
        function totalSupply() external view returns (uint256 supply);
        function transfer(address to, uint256 value) external returns (bool success);
        function transferFrom(address from, address to, uint256 value) external returns (bool success);
    }

    /// Subscription payment receiver.
    #[derive(Debug, PartialEq, Eq)]
    interface IPaymentReceiver {
        function AMOUNT_TO_PAY() external view returns (uint256 amount);
        function erc20Token() external view returns (address token);
        function hasPaid(address userAddr, uint64 month) external view returns (bool paid);
        function pay(uint64 month) external;
        function withdrawAllTokens() external;
    }

    /// Zero-knowledge verifier router.
    #[derive(Debug, PartialEq, Eq)]
    interface IRiscZeroVerifierRouter {
        struct Receipt {
            bytes seal;
            bytes32 claimDigest;
        }

        error OwnableInvalidOwner(address owner);
        error OwnableUnauthorizedAccount(address account);
        error SelectorInUse(bytes4 selector);
        error SelectorRemoved(bytes4 selector);
        error SelectorUnknown(bytes4 selector);

        event OwnershipTransferStarted(address indexed previousOwner, address indexed newOwner);
        event OwnershipTransferred(address indexed previousOwner, address indexed newOwner);

        function acceptOwnership() external;
        function addVerifier(bytes4 selector, address verifier) external;
        function getVerifier(bytes4 selector) external view returns (address verifier);
        function owner() external view returns (address currentOwner);
        function pendingOwner() external view returns (address pending);
        function removeVerifier(bytes4 selector) external;
        function renounceOwnership() external;
        function transferOwnership(address newOwner) external;
        function verifiers(bytes4 selector) external view returns (address verifier);
        function verify(bytes seal, bytes32 imageId, bytes32 journalDigest) external view;
        function verifyIntegrity(Receipt receipt) external view;
    }
}

/// Decode the return data of a read-only call.
pub(crate) fn decode_returns<C: SolCall>(data: &[u8]) -> Result<C::Return> {
    Ok(C::abi_decode_returns(data, true)?)
}
