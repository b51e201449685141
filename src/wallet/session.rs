//! Wallet session context shared by the shell and its views.

use super::{Wallet, WalletConnector};
use crate::error::{Error, Result};
use alloy_primitives::Address;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{info, warn};

/// Snapshot of the connection state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WalletSession {
    /// Whether a wallet is connected.
    pub connected: bool,
    /// Connected account, if any.
    pub address: Option<Address>,
}

/// Shared handle to the current wallet, if any.
pub struct SessionContext<W> {
    inner: Arc<RwLock<Option<Arc<W>>>>,
}

impl<W> Clone for SessionContext<W> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<W> Default for SessionContext<W> {
    fn default() -> Self {
        Self {
            inner: Arc::new(RwLock::new(None)),
        }
    }
}

impl<W: Wallet> SessionContext<W> {
    /// Create an empty (disconnected) context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Connect through `connector` and install the resulting wallet.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Wallet`] if the connector has no provider, or the
    /// connector's error if account access is refused.
    pub async fn connect<C>(&self, connector: &C) -> Result<WalletSession>
    where
        C: WalletConnector<Wallet = W>,
    {
        if !connector.provider_available().await {
            warn!("Connector {} has no provider", connector.name());
            return Err(Error::Wallet(format!(
                "no provider available for {}",
                connector.name()
            )));
        }

        let wallet = connector.connect().await?;
        let address = wallet.address();
        *self.inner.write() = Some(Arc::new(wallet));
        info!("Wallet connected via {}: {}", connector.name(), address);

        Ok(self.snapshot())
    }

    /// Install an already connected wallet.
    pub fn attach(&self, wallet: W) {
        *self.inner.write() = Some(Arc::new(wallet));
    }

    /// Tear down the session. Returns whether a wallet was connected.
    pub fn disconnect(&self) -> bool {
        let previous = self.inner.write().take();
        if let Some(wallet) = &previous {
            info!("Wallet disconnected: {}", wallet.address());
        }
        previous.is_some()
    }

    /// The connected wallet.
    #[must_use]
    pub fn wallet(&self) -> Option<Arc<W>> {
        self.inner.read().clone()
    }

    /// Whether a wallet is connected.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.inner.read().is_some()
    }

    /// Current connection state.
    #[must_use]
    pub fn snapshot(&self) -> WalletSession {
        let address = self.inner.read().as_ref().map(|w| w.address());
        WalletSession {
            connected: address.is_some(),
            address,
        }
    }
}
