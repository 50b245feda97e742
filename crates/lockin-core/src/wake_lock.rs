//! Keeps the screen awake while a focus run is active.
//!
//! The coordinator tracks a single "should stay awake" signal and a
//! platform lock. Platforms commonly drop the lock when the app loses
//! visibility, so it is requested again when the app comes back while the
//! signal is still set. Failures are logged and never surface to callers.

use tracing::{debug, error};

use crate::error::WakeLockError;

pub trait WakeLockPlatform {
    fn acquire(&mut self) -> Result<(), WakeLockError>;
    fn release(&mut self) -> Result<(), WakeLockError>;
}

/// Platform without a screen lock. Logs the requests and succeeds.
#[derive(Debug, Default)]
pub struct NoopPlatform;

impl WakeLockPlatform for NoopPlatform {
    fn acquire(&mut self) -> Result<(), WakeLockError> {
        debug!("wake lock acquired (noop)");
        Ok(())
    }

    fn release(&mut self) -> Result<(), WakeLockError> {
        debug!("wake lock released (noop)");
        Ok(())
    }
}

pub struct WakeLock<P: WakeLockPlatform> {
    platform: P,
    should_lock: bool,
    held: bool,
}

impl<P: WakeLockPlatform> WakeLock<P> {
    pub fn new(platform: P) -> Self {
        Self {
            platform,
            should_lock: false,
            held: false,
        }
    }

    pub fn is_held(&self) -> bool {
        self.held
    }

    /// Feed the current "should stay awake" signal.
    pub fn set_should_lock(&mut self, should_lock: bool) {
        self.should_lock = should_lock;
        if should_lock {
            self.request();
        } else {
            self.release();
        }
    }

    /// Report a visibility change of the application.
    pub fn on_visibility_change(&mut self, visible: bool) {
        if !visible {
            // The platform drops the lock on its own when we are hidden.
            self.held = false;
        } else if self.should_lock {
            self.request();
        }
    }

    fn request(&mut self) {
        if self.held {
            return;
        }
        match self.platform.acquire() {
            Ok(()) => self.held = true,
            Err(e) => error!(error = %e, "failed to acquire wake lock"),
        }
    }

    fn release(&mut self) {
        if !self.held {
            return;
        }
        match self.platform.release() {
            Ok(()) => self.held = false,
            Err(e) => error!(error = %e, "failed to release wake lock"),
        }
    }
}

impl<P: WakeLockPlatform> Drop for WakeLock<P> {
    fn drop(&mut self) {
        self.release();
    }
}
