//! In-memory wallet and shell harness.
//!
//! `MockWallet` answers every request immediately (or after a scripted
//! delay) and records it, so tests can assert on the exact calldata and
//! messages a flow produced.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use alloy_primitives::{Address, Bytes, TxHash, B256};
use paidproof::event::TimedEvent;
use paidproof::{
    ClientConfig, Error, FlowEvent, FlowEventsChannel, Result, Shell, Wallet, WalletConnector,
};
use parking_lot::Mutex;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// A request received by the mock wallet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalletRequest {
    /// `eth_sendTransaction`.
    Send {
        /// Target contract.
        to: Address,
        /// Calldata.
        data: Bytes,
    },
    /// `personal_sign`.
    Sign {
        /// Plain-text message.
        message: String,
    },
    /// `eth_call`.
    Call {
        /// Target contract.
        to: Address,
        /// Calldata.
        data: Bytes,
    },
}

#[derive(Default)]
struct Script {
    fail_sends: Vec<bool>,
    send_delay: Option<Duration>,
    call_result: Bytes,
}

/// Recording wallet.
#[derive(Clone)]
pub struct MockWallet {
    address: Address,
    requests: Arc<Mutex<Vec<WalletRequest>>>,
    script: Arc<Mutex<Script>>,
}

impl MockWallet {
    /// Wallet for `address` that accepts everything.
    #[must_use]
    pub fn new(address: Address) -> Self {
        Self {
            address,
            requests: Arc::new(Mutex::new(Vec::new())),
            script: Arc::new(Mutex::new(Script::default())),
        }
    }

    /// Fail the next transactions according to `pattern` (true = fail).
    pub fn fail_sends(&self, pattern: Vec<bool>) {
        self.script.lock().fail_sends = pattern;
    }

    /// Delay every transaction by `delay`.
    pub fn delay_sends(&self, delay: Duration) {
        self.script.lock().send_delay = Some(delay);
    }

    /// Return `data` from every read-only call.
    pub fn answer_calls(&self, data: Bytes) {
        self.script.lock().call_result = data;
    }

    /// Everything the wallet was asked to do, in order.
    #[must_use]
    pub fn requests(&self) -> Vec<WalletRequest> {
        self.requests.lock().clone()
    }

    /// Calldata of the transactions sent, in order.
    #[must_use]
    pub fn sent(&self) -> Vec<(Address, Bytes)> {
        self.requests()
            .into_iter()
            .filter_map(|r| match r {
                WalletRequest::Send { to, data } => Some((to, data)),
                _ => None,
            })
            .collect()
    }

    /// Messages signed, in order.
    #[must_use]
    pub fn signed(&self) -> Vec<String> {
        self.requests()
            .into_iter()
            .filter_map(|r| match r {
                WalletRequest::Sign { message } => Some(message),
                _ => None,
            })
            .collect()
    }
}

impl Wallet for MockWallet {
    fn address(&self) -> Address {
        self.address
    }

    fn send_transaction(
        &self,
        to: Address,
        data: Bytes,
    ) -> impl Future<Output = Result<TxHash>> + Send {
        let mut requests = self.requests.lock();
        requests.push(WalletRequest::Send { to, data });
        let n = u8::try_from(requests.len()).unwrap_or(u8::MAX);
        drop(requests);

        let mut script = self.script.lock();
        let fail = if script.fail_sends.is_empty() {
            false
        } else {
            script.fail_sends.remove(0)
        };
        let delay = script.send_delay;
        drop(script);

        async move {
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            if fail {
                Err(Error::Wallet("user rejected the request".to_string()))
            } else {
                Ok(B256::repeat_byte(n))
            }
        }
    }

    fn sign_message(&self, message: &str) -> impl Future<Output = Result<Bytes>> + Send {
        self.requests.lock().push(WalletRequest::Sign {
            message: message.to_string(),
        });
        // Signature bytes depend on the signer so tests can tell wallets apart.
        let mut sig = vec![0u8; 65];
        sig[..20].copy_from_slice(self.address.as_slice());
        async move { Ok(Bytes::from(sig)) }
    }

    fn call(&self, to: Address, data: Bytes) -> impl Future<Output = Result<Bytes>> + Send {
        self.requests.lock().push(WalletRequest::Call { to, data });
        let out = self.script.lock().call_result.clone();
        async move { Ok(out) }
    }
}

/// Connector handing out a fixed [`MockWallet`].
pub struct MockConnector {
    wallet: MockWallet,
    available: bool,
}

impl MockConnector {
    /// Connector with a provider.
    #[must_use]
    pub fn new(wallet: MockWallet) -> Self {
        Self {
            wallet,
            available: true,
        }
    }

    /// Connector without a provider.
    #[must_use]
    pub fn unavailable(wallet: MockWallet) -> Self {
        Self {
            wallet,
            available: false,
        }
    }
}

impl WalletConnector for MockConnector {
    type Wallet = MockWallet;

    fn name(&self) -> &str {
        "mock"
    }

    fn provider_available(&self) -> impl Future<Output = bool> + Send {
        let available = self.available;
        async move { available }
    }

    fn connect(&self) -> impl Future<Output = Result<MockWallet>> + Send {
        let wallet = self.wallet.clone();
        async move { Ok(wallet) }
    }
}

/// Shell wired to a mock wallet.
pub struct TestHarness {
    /// The shell under test.
    pub shell: Shell<MockConnector>,
    /// The wallet the connector hands out.
    pub wallet: MockWallet,
    events: FlowEventsChannel,
}

impl TestHarness {
    /// Default test account.
    pub const ACCOUNT: Address = Address::repeat_byte(0xa1);

    /// Shell with default config and a wallet for [`Self::ACCOUNT`].
    #[must_use]
    pub fn setup() -> Self {
        Self::with_wallet(MockWallet::new(Self::ACCOUNT))
    }

    /// Shell with default config and the given wallet.
    #[must_use]
    pub fn with_wallet(wallet: MockWallet) -> Self {
        Self::with_config(
            ClientConfig::default(),
            MockConnector::new(wallet.clone()),
            wallet,
        )
    }

    /// Shell with explicit config and connector.
    #[must_use]
    pub fn with_config(config: ClientConfig, connector: MockConnector, wallet: MockWallet) -> Self {
        let mut shell = Shell::new(config, connector);
        let events = shell.events().expect("first call");
        Self {
            shell,
            wallet,
            events,
        }
    }

    /// Shell with the wallet already connected.
    pub async fn connected() -> Self {
        let harness = Self::setup();
        harness.shell.connect().await.expect("connect");
        harness
    }

    /// Events emitted so far.
    pub fn drain_events(&mut self) -> Vec<FlowEvent> {
        let mut out = Vec::new();
        while let Ok(TimedEvent { event, .. }) = self.events.try_recv() {
            out.push(event);
        }
        out
    }
}
