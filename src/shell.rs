//! Application shell: wallet session, routing and view lifecycle.

use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::event::{create_event_channel, emit, FlowEvent, FlowEventsChannel, FlowEventsSender};
use crate::lifecycle::MountGuard;
use crate::orchestrator::PaymentOrchestrator;
use crate::redemption::{DelayVerifier, ProofVerifier, RedemptionFlow};
use crate::wallet::{SessionContext, WalletConnector, WalletSession};
use std::str::FromStr;
use tracing::{debug, info};

/// Routable screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    /// `/`: pay and generate a proof.
    Pay,
    /// `/verify`: redeem a proof.
    Verify,
}

impl Route {
    /// Path of the route.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Pay => "/",
            Self::Verify => "/verify",
        }
    }

    /// Resolve a path. A trailing slash is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Selection`] for unknown paths.
    pub fn from_path(path: &str) -> Result<Self> {
        match path.trim_end_matches('/') {
            "" => Ok(Self::Pay),
            "/verify" => Ok(Self::Verify),
            other => Err(Error::Selection(format!("no route for '{other}'"))),
        }
    }
}

impl FromStr for Route {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_path(s)
    }
}

/// The view currently shown.
pub enum View<W, V = DelayVerifier> {
    /// Payment screen.
    Pay(PaymentOrchestrator<W>),
    /// Redemption screen.
    Verify(RedemptionFlow<V>),
}

impl<W, V> View<W, V> {
    /// Route the view was opened for.
    #[must_use]
    pub fn route(&self) -> Route {
        match self {
            Self::Pay(_) => Route::Pay,
            Self::Verify(_) => Route::Verify,
        }
    }
}

/// Owns the wallet session and opens views.
///
/// Each opened redemption view gets a clone of `V`.
pub struct Shell<C: WalletConnector, V = DelayVerifier> {
    config: ClientConfig,
    connector: C,
    verifier: V,
    session: SessionContext<C::Wallet>,
    events_tx: FlowEventsSender,
    events_rx: Option<FlowEventsChannel>,
    mounted: Option<MountGuard>,
}

impl<C: WalletConnector> Shell<C> {
    /// Create a shell with no wallet connected, redeeming through the
    /// configured [`DelayVerifier`].
    #[must_use]
    pub fn new(config: ClientConfig, connector: C) -> Self {
        let verifier = DelayVerifier::new(config.redemption.check_delay());
        Self::with_verifier(config, connector, verifier)
    }
}

impl<C: WalletConnector, V: ProofVerifier + Clone> Shell<C, V> {
    /// Create a shell with no wallet connected, redeeming through `verifier`.
    #[must_use]
    pub fn with_verifier(config: ClientConfig, connector: C, verifier: V) -> Self {
        let (events_tx, events_rx) = create_event_channel();
        Self {
            config,
            connector,
            verifier,
            session: SessionContext::new(),
            events_tx,
            events_rx: Some(events_rx),
            mounted: None,
        }
    }

    /// Configuration the shell was built with.
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Session context handed to views.
    #[must_use]
    pub fn session(&self) -> &SessionContext<C::Wallet> {
        &self.session
    }

    /// Whether the connect action is enabled.
    pub async fn can_connect(&self) -> bool {
        !self.session.is_connected() && self.connector.provider_available().await
    }

    /// Connect the wallet.
    ///
    /// # Errors
    ///
    /// Returns an error if no provider is available or access is refused.
    pub async fn connect(&self) -> Result<WalletSession> {
        let session = self.session.connect(&self.connector).await?;
        if let Some(address) = session.address {
            emit(&self.events_tx, FlowEvent::WalletConnected { address });
        }
        Ok(session)
    }

    /// Disconnect the wallet.
    pub fn disconnect(&self) {
        if self.session.disconnect() {
            emit(&self.events_tx, FlowEvent::WalletDisconnected);
        }
    }

    /// Get a receiver for flow events.
    ///
    /// Note: Can only be called once. Subsequent calls return None.
    pub fn events(&mut self) -> Option<FlowEventsChannel> {
        self.events_rx.take()
    }

    /// Subscribe to flow events.
    #[must_use]
    pub fn subscribe_events(&self) -> FlowEventsChannel {
        self.events_tx.subscribe()
    }

    /// Open the view for `route`, unmounting the previous one.
    pub fn open(&mut self, route: Route) -> View<C::Wallet, V> {
        self.close();
        let (guard, token) = MountGuard::mount();
        self.mounted = Some(guard);
        info!("Opening {}", route.path());

        match route {
            Route::Pay => View::Pay(PaymentOrchestrator::new(
                &self.config,
                self.session.clone(),
                token,
                self.events_tx.clone(),
            )),
            Route::Verify => View::Verify(RedemptionFlow::new(
                self.verifier.clone(),
                token,
                self.events_tx.clone(),
            )),
        }
    }

    /// Open the view for a path.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Selection`] for unknown paths.
    pub fn navigate(&mut self, path: &str) -> Result<View<C::Wallet, V>> {
        Ok(self.open(Route::from_path(path)?))
    }

    /// Unmount the current view. Calls it still awaits are abandoned.
    pub fn close(&mut self) {
        if let Some(guard) = self.mounted.take() {
            debug!("Unmounting current view");
            drop(guard);
        }
    }
}
