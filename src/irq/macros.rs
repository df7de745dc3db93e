/// Declares a static `PACKET_LATCH` shared by the packet-done ISR and the main loop.
///
/// # Example
/// ```rust
/// satlink::declare_packet_latch!();
///
/// fn main() {
///     assert!(!PACKET_LATCH.is_pending());
/// }
/// ```
#[macro_export]
macro_rules! declare_packet_latch {
    () => {
        pub static PACKET_LATCH: $crate::irq::InterruptLatch = $crate::irq::InterruptLatch::new();
    };
}

/// Body of the packet-done interrupt handler.
///
/// # Example
/// ```rust,ignore
/// #[interrupt]
/// fn EXTI0() {
///     satlink::packet_received!();
/// }
/// ```
///
/// # Notes
/// - Assumes `PACKET_LATCH` was declared with `declare_packet_latch!`.
/// - Safe to call at any time; the signal is dropped while the latch is disabled.
#[macro_export]
macro_rules! packet_received {
    () => {
        PACKET_LATCH.signal();
    };
}
