//! Constants used across the packet state machine.
//!
//! This module defines the protocol-wide values shared by the decoder,
//! the command parser and the response encoder: buffer sizes, the beacon
//! sentinel, the mode-flag location and the response opcodes.
//!
//! ## Key Concepts
//!
//! - **Received buffer**: every receive cycle reads a fixed 15-byte packet.
//! - **Beacon**: a callsign frame whose first byte is an ASCII `'K'`.
//! - **Mode flag**: one bit of a data packet telling us the remote end is listening.
//! - **Response frame**: always exactly 3 bytes, big-endian payload.
//!
//! Defaults that an integrator may want to change at runtime live in
//! [`NodeConfig`](crate::config::NodeConfig); the values here seed it.

/// Length (in bytes) of the packet read from the transceiver on every receive cycle.
pub const RX_PACKET_LEN: usize = 15;

/// Length (in bytes) of the outbound response frame.
pub const RESPONSE_LEN: usize = 3;

/// First byte of a beacon ("callsign") packet.
///
/// Beacons identify the sender and are never answered.
pub const BEACON_SENTINEL: u8 = b'K';

/// Byte position of the mode flag inside a data packet.
///
/// This is the last byte of the [`RX_PACKET_LEN`] buffer.
pub const MODE_FLAG_INDEX: usize = RX_PACKET_LEN - 1;

/// Bitmask of the mode flag within the byte at [`MODE_FLAG_INDEX`].
///
/// When set, the remote sender is in listen mode and expects a response.
pub const MODE_FLAG_MASK: u8 = 1 << 5;

/// Opcode byte of a no-op response.
pub const OPCODE_NO_OP: u8 = 0x00;

/// Opcode byte of a change-downlink-period response.
pub const OPCODE_CHANGE_DOWNLINK_PERIOD: u8 = 0x11;

/// Default maximum time (ms) spent in the transmit state before returning to listening.
pub const LISTEN_PERIOD_MS: u32 = 5_000;

/// Downlink period used until an operator sets one.
pub const DEFAULT_DOWNLINK_PERIOD: u16 = 0;

/// Capacity of the command line buffer, excluding the terminator.
pub const MAX_COMMAND_LEN: usize = 32;

/// Line terminator of the command channel.
pub const COMMAND_TERMINATOR: u8 = b'\n';

/// Byte discarded by the command parser.
pub const COMMAND_IGNORED: u8 = b'\r';
