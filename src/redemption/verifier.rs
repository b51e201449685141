//! Proof check seam used by the redemption view.

use crate::error::Result;
use std::future::Future;
use std::time::Duration;
use tracing::debug;

/// Decides whether a pasted proof unlocks content.
pub trait ProofVerifier: Send + Sync {
    /// Accept (`Ok`) or reject (`Err`) the pasted proof.
    fn verify(&self, proof: &str) -> impl Future<Output = Result<()>> + Send;
}

/// Accepts every proof after a fixed delay.
///
/// This is the behavior of the deployed verify screen: nothing is checked.
#[derive(Debug, Clone, Copy)]
pub struct DelayVerifier {
    delay: Duration,
}

impl DelayVerifier {
    /// Accept after `delay`.
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// Configured delay.
    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.delay
    }
}

impl ProofVerifier for DelayVerifier {
    async fn verify(&self, proof: &str) -> Result<()> {
        debug!(
            "Mock check of {} byte proof, accepting in {:?}",
            proof.len(),
            self.delay
        );
        tokio::time::sleep(self.delay).await;
        Ok(())
    }
}
