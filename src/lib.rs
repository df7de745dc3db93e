//! # satlink
//!
//! A portable, no_std packet state machine for a small LoRa radio node that
//! talks to a satellite (or a ground station) on a listen/transmit cycle.
//!
//! The crate covers the part of the firmware with real control flow:
//! - when the node listens and when it transmits
//! - how the transceiver's interrupt-driven "packet received" signal is consumed
//! - how received packets are classified (beacon, data, failure)
//! - how operator commands arrive on a serial line and select the response
//! - how the 3-byte response frame is encoded
//!
//! Radio register configuration, displays and board bring-up stay outside:
//! the node drives the transceiver through the [`radio::Transceiver`] trait
//! and reads time through [`clock::Clock`].
//!
//! ## Crate features
//! | Feature                | Description |
//! |------------------------|-------------|
//! | `std`                  | Disables `#![no_std]` support |
//! | `delay-loop` (default) | Blocking main loop driven by `embedded_hal::delay::DelayNs` |
//! | `defmt-0-3`            | Uses `defmt` logging |
//! | `log`                  | Uses `log` logging |
//!
//! ## Usage
//!
//! ```rust,ignore
//! use satlink::config::NodeConfig;
//! use satlink::node::Node;
//!
//! satlink::declare_packet_latch!();
//!
//! #[interrupt]
//! fn EXTI0() {
//!     satlink::packet_received!(); // DIO0 rising edge
//! }
//!
//! let mut node = Node::new(radio, || millis(), &PACKET_LATCH, NodeConfig::default());
//! let Err(err) = satlink::runner::run_node_loop(&mut node, &mut uart, &mut delay, 10);
//! ```
//!
//! ## Integration Notes
//!
//! - Only the latch crosses the interrupt boundary. The ISR must do nothing
//!   but call [`irq::InterruptLatch::signal`].
//! - The main loop must tick well inside the listen period (5 s by default);
//!   every tick in the transmit window re-sends the response.
//! - A failed [`node::Node::boot`] is terminal: report and halt.
//!
//! --
//! Designed for `#![no_std]` use in resource-constrained embedded environments.

#![deny(
    bad_style,
    dead_code,
    improper_ctypes,
    non_shorthand_field_patterns,
    no_mangle_generic_items,
    overflowing_literals,
    path_statements,
    patterns_in_fns_without_body,
    unconditional_recursion,
    unused,
    while_true,
    missing_debug_implementations,
    missing_docs,
    trivial_casts,
    trivial_numeric_casts,
    unused_extern_crates,
    unused_import_braces,
    unused_qualifications,
    unused_results
)]
#![cfg_attr(not(feature = "std"), no_std)]

// This mod MUST go first, so that the others see its macros.
mod fmt;

pub use critical_section;

#[cfg(not(feature = "std"))]
pub use heapless;

pub mod clock;
pub mod command;
pub mod config;
pub mod consts;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod irq;
pub mod node;
pub mod radio;
#[cfg(feature = "delay-loop")]
pub mod runner;

#[cfg(test)]
mod testing;

pub use error::Error;
