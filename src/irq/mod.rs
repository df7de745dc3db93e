//! Interrupt latch for the transceiver's packet-done signal.
//!
//! The only thing the interrupt context is allowed to do is mark a packet as
//! pending, and only while the latch is enabled. Signals arriving while the
//! latch is disabled are dropped, not queued. The main loop consumes the
//! pending flag on its next tick.
//!
//! Both fields are single-word atomics that are only ever loaded or stored,
//! so the latch also works on cores without compare-and-swap (e.g.
//! `thumbv6m`). The one compound operation, [`InterruptLatch::disarm`], runs
//! inside a `critical_section` so the ISR cannot interleave with it.
//!
//! ## Example
//! ```rust
//! use satlink::irq::InterruptLatch;
//!
//! static LATCH: InterruptLatch = InterruptLatch::new();
//!
//! // in the DIO0 handler:
//! LATCH.signal();
//! ```
//!
//! Or, use the [`declare_packet_latch!`](crate::declare_packet_latch) and
//! [`packet_received!`](crate::packet_received) macros.

use core::sync::atomic::{AtomicBool, Ordering};

mod macros;

/// Pending-packet flag gated by an enable switch.
///
/// Shared by reference between the ISR and the [`Node`](crate::node::Node).
/// It starts disabled; the node enables it once the radio is listening.
#[derive(Debug)]
pub struct InterruptLatch {
    pending: AtomicBool,
    enabled: AtomicBool,
}

impl Default for InterruptLatch {
    fn default() -> Self {
        Self::new()
    }
}

impl InterruptLatch {
    /// Creates a disabled latch with nothing pending. Usable in a `static`.
    pub const fn new() -> Self {
        Self {
            pending: AtomicBool::new(false),
            enabled: AtomicBool::new(false),
        }
    }

    /// Records a packet-done signal. Call this from the interrupt handler.
    ///
    /// Does nothing while the latch is disabled.
    pub fn signal(&self) {
        if !self.enabled.load(Ordering::Acquire) {
            return;
        }
        self.pending.store(true, Ordering::Release);
    }

    /// Whether a packet is waiting to be handled.
    pub fn is_pending(&self) -> bool {
        self.pending.load(Ordering::Acquire)
    }

    /// Whether signals are currently accepted.
    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Acquire)
    }

    /// Starts accepting signals again.
    pub fn enable(&self) {
        self.enabled.store(true, Ordering::Release);
    }

    /// Stops accepting signals, leaving any pending flag in place.
    pub fn disable(&self) {
        self.enabled.store(false, Ordering::Release);
    }

    /// Disables the latch and clears the pending flag in one step.
    ///
    /// Must be called before the received buffer is read, so a new signal
    /// cannot land while the packet is being processed.
    ///
    /// # Returns
    /// Whether a packet was pending.
    pub fn disarm(&self) -> bool {
        critical_section::with(|_| {
            self.enabled.store(false, Ordering::Release);
            let was_pending = self.pending.load(Ordering::Acquire);
            self.pending.store(false, Ordering::Release);
            was_pending
        })
    }
}
