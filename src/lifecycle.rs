//! View mount lifecycle.
//!
//! Each open view holds a [`MountToken`]. When the shell replaces or closes
//! the view it drops the matching [`MountGuard`], after which any external
//! call the view is still awaiting resolves to `None` and its late result
//! is discarded.

use std::future::Future;
use std::sync::Arc;
use tokio::sync::watch;

/// Owned by the shell for as long as a view is shown.
#[derive(Debug)]
pub struct MountGuard {
    tx: watch::Sender<bool>,
}

/// Held by a view; observes whether it is still mounted.
#[derive(Debug, Clone)]
pub struct MountToken {
    rx: watch::Receiver<bool>,
    _keepalive: Option<Arc<watch::Sender<bool>>>,
}

impl MountGuard {
    /// Create a mounted guard and its token.
    #[must_use]
    pub fn mount() -> (Self, MountToken) {
        let (tx, rx) = watch::channel(true);
        (
            Self { tx },
            MountToken {
                rx,
                _keepalive: None,
            },
        )
    }

    /// Hand out another token for the same mount.
    #[must_use]
    pub fn token(&self) -> MountToken {
        MountToken {
            rx: self.tx.subscribe(),
            _keepalive: None,
        }
    }

    /// Unmount explicitly.
    pub fn unmount(&self) {
        self.tx.send_replace(false);
    }
}

impl Drop for MountGuard {
    fn drop(&mut self) {
        self.tx.send_replace(false);
    }
}

impl MountToken {
    /// A token that is never unmounted, for views driven without a shell.
    #[must_use]
    pub fn detached() -> Self {
        let (tx, rx) = watch::channel(true);
        Self {
            rx,
            _keepalive: Some(Arc::new(tx)),
        }
    }

    /// Whether the view is still mounted.
    #[must_use]
    pub fn is_mounted(&self) -> bool {
        *self.rx.borrow()
    }

    /// Await `fut` unless the view is unmounted first.
    ///
    /// Returns `None` if the view was unmounted before or while `fut` ran.
    pub async fn run<F: Future>(&self, fut: F) -> Option<F::Output> {
        if !self.is_mounted() {
            return None;
        }

        let mut rx = self.rx.clone();
        let output = tokio::select! {
            out = fut => Some(out),
            _ = rx.wait_for(|mounted| !*mounted) => None,
        };

        output.filter(|_| self.is_mounted())
    }
}
