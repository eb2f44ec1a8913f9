//! Redirect Latch - One-shot debounced gate
//!
//! When the backend reports an expired session, every in-flight call fails
//! at once. The latch makes sure the registered redirect callback runs at
//! most once per debounce window; triggers while the latch is armed are
//! dropped, not deferred.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// Zero-argument callback registered by the hosting application
pub type RedirectCallback = Arc<dyn Fn() + Send + Sync>;

/// Default debounce window
pub const DEFAULT_REDIRECT_WINDOW: Duration = Duration::from_millis(1000);

/// One-shot redirect gate
///
/// Owns its own state; there are no module-level flags. The callback is
/// injected at construction. Without a callback the trigger is a no-op.
#[derive(Clone)]
pub struct RedirectLatch {
    callback: Option<RedirectCallback>,
    window: Duration,
    armed: Arc<AtomicBool>,
}

impl RedirectLatch {
    /// Create a latch with an optional callback and debounce window
    pub fn new(callback: Option<RedirectCallback>, window: Duration) -> Self {
        Self {
            callback,
            window,
            armed: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Create a latch with the default window
    pub fn with_callback(callback: RedirectCallback) -> Self {
        Self::new(Some(callback), DEFAULT_REDIRECT_WINDOW)
    }

    /// Create a latch that never fires (no callback registered)
    pub fn disabled() -> Self {
        Self::new(None, DEFAULT_REDIRECT_WINDOW)
    }

    /// Whether the latch is currently armed
    pub fn is_armed(&self) -> bool {
        self.armed.load(Ordering::SeqCst)
    }

    /// Fire the callback unless the latch is armed
    ///
    /// Arms the latch before invoking the callback so a burst of failing
    /// calls produces at most one redirect per window. A background task
    /// disarms the latch after the window elapses.
    ///
    /// Must be called from within a tokio runtime.
    pub fn trigger(&self) {
        let Some(callback) = &self.callback else {
            return;
        };

        if self
            .armed
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            tracing::debug!("Redirect already triggered in this window, dropping");
            return;
        }

        tracing::info!("Session expired, redirecting to sign-in");
        callback();

        let armed = Arc::clone(&self.armed);
        let window = self.window;
        tokio::spawn(async move {
            tokio::time::sleep(window).await;
            armed.store(false, Ordering::SeqCst);
        });
    }
}

impl std::fmt::Debug for RedirectLatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedirectLatch")
            .field("registered", &self.callback.is_some())
            .field("window", &self.window)
            .field("armed", &self.is_armed())
            .finish()
    }
}
