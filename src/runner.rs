//! Blocking main loop for firmware without an executor.

use core::convert::Infallible;

use embedded_hal::delay::DelayNs;
use embedded_io::{Read, ReadReady};

use crate::clock::Clock;
use crate::error::Error;
use crate::node::Node;
use crate::radio::Transceiver;

/// Boots the node and runs the main loop forever.
///
/// A node that is already booted is not booted again.
///
/// Each iteration drains the command source, ticks the state machine, and
/// sleeps `tick_ms` through the provided delay.
///
/// # Arguments
/// - `node`: The node, not yet booted.
/// - `serial`: The operator command source.
/// - `delay`: A delay provider implementing `DelayNs`, typically from the HAL.
/// - `tick_ms`: Pause between iterations. Keep it well under the listen period.
///
/// # Example
/// ```rust,ignore
/// let Err(err) = satlink::runner::run_node_loop(&mut node, &mut uart, &mut delay, 10);
/// // Only a failed boot gets here.
/// defmt::error!("halting: {}", err);
/// loop {}
/// ```
///
/// # Returns
/// Only on boot failure, with [`Error::Init`]. The caller is expected to
/// report it and halt; a node without its radio has nothing to do.
pub fn run_node_loop<R, C, S, D>(
    node: &mut Node<'_, R, C>,
    serial: &mut S,
    delay: &mut D,
    tick_ms: u32,
) -> Result<Infallible, Error>
where
    R: Transceiver,
    C: Clock,
    S: Read + ReadReady,
    D: DelayNs,
{
    ensure_booted(node)?;
    loop {
        let _ = node.step(serial);
        delay.delay_ms(tick_ms);
    }
}

/// Like [`run_node_loop`], but stops after `steps` iterations.
///
/// Boots the node first if it is not booted yet.
pub fn run_node_steps<R, C, S, D>(
    node: &mut Node<'_, R, C>,
    serial: &mut S,
    delay: &mut D,
    tick_ms: u32,
    steps: usize,
) -> Result<(), Error>
where
    R: Transceiver,
    C: Clock,
    S: Read + ReadReady,
    D: DelayNs,
{
    ensure_booted(node)?;
    for _ in 0..steps {
        let _ = node.step(serial);
        delay.delay_ms(tick_ms);
    }
    Ok(())
}

fn ensure_booted<R, C>(node: &mut Node<'_, R, C>) -> Result<(), Error>
where
    R: Transceiver,
    C: Clock,
{
    if node.is_booted() {
        return Ok(());
    }
    node.boot()
}
