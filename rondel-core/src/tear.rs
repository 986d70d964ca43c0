//! Tear-effect synchronization gate
//!
//! The panel raises its TE line during the vertical blanking interval and
//! drops it while scanning out. A flush that wants to avoid visible
//! tearing must confine its write window to the blanked period, so the
//! gate mirrors the electrical level of the line: Ready while TE is high,
//! Blocked while the panel is mid-scan.
//!
//! Only the most recent transition is remembered. A rising edge followed
//! by a falling edge before any waiter runs leaves the gate Blocked;
//! intermediate edges collapse rather than coalesce into extra tokens.

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::signal::Signal;
use portable_atomic::{AtomicBool, Ordering};

/// Two-state gate mirroring the TE line level
///
/// The TE watcher task calls [`on_te_edge`](Self::on_te_edge) from task
/// context after each pin interrupt; the flush pipeline blocks in
/// [`wait_ready`](Self::wait_ready) until the blanking window opens.
pub struct TearGate<M: RawMutex> {
    ready: AtomicBool,
    changed: Signal<M, ()>,
}

impl<M: RawMutex> TearGate<M> {
    /// Create a gate in the Blocked state
    pub const fn new() -> Self {
        Self {
            ready: AtomicBool::new(false),
            changed: Signal::new(),
        }
    }

    /// Record a TE line transition
    ///
    /// Rising edge opens the gate and wakes a waiter; falling edge closes
    /// it and withdraws any readiness that was never consumed.
    pub fn on_te_edge(&self, level: bool) {
        if level {
            self.ready.store(true, Ordering::Release);
            self.changed.signal(());
        } else {
            self.ready.store(false, Ordering::Release);
            self.changed.reset();
        }
    }

    /// Observe the gate state without consuming readiness
    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    /// Consume readiness if the gate is open (binary-semaphore take)
    ///
    /// Returns `true` at most once per rising edge; the gate reverts to
    /// Blocked until the next blanking interval.
    pub fn try_acquire(&self) -> bool {
        self.ready.swap(false, Ordering::AcqRel)
    }

    /// Block until the blanking window opens, consuming the readiness
    pub async fn wait_ready(&self) {
        loop {
            if self.try_acquire() {
                return;
            }
            self.changed.wait().await;
        }
    }
}

impl<M: RawMutex> Default for TearGate<M> {
    fn default() -> Self {
        Self::new()
    }
}
