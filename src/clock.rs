//! Monotonic millisecond time source.
//!
//! The node only ever compares two readings of the clock, so a free-running
//! 32-bit millisecond counter is enough. It wraps after about 49.7 days;
//! [`elapsed_ms`] uses wrapping subtraction so a window that straddles the
//! wrap is still measured correctly.

/// Milliseconds since an arbitrary, fixed epoch (usually boot).
pub type Millis = u32;

/// A monotonic millisecond clock.
///
/// Any `FnMut() -> Millis` is a clock, which keeps board glue to a closure:
///
/// ```rust
/// use satlink::clock::Clock;
///
/// let mut ticks = 0u32;
/// let mut clock = || {
///     ticks += 10;
///     ticks
/// };
/// assert_eq!(clock.now_ms(), 10);
/// ```
pub trait Clock {
    /// Current time in milliseconds.
    fn now_ms(&mut self) -> Millis;
}

impl<F> Clock for F
where
    F: FnMut() -> Millis,
{
    fn now_ms(&mut self) -> Millis {
        (*self)()
    }
}

/// Milliseconds from `since` to `now`, tolerant of counter wrap.
pub fn elapsed_ms(since: Millis, now: Millis) -> Millis {
    now.wrapping_sub(since)
}
