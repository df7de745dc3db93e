//! Response framing.
//!
//! Every response is exactly [`RESPONSE_LEN`] bytes:
//!
//! | Offset | Meaning                                          |
//! |--------|--------------------------------------------------|
//! | 0      | opcode (`0x00` no-op, `0x11` change-downlink-period) |
//! | 1      | downlink period, high byte (`0x11` only)         |
//! | 2      | downlink period, low byte (`0x11` only)          |
//!
//! Encoding cannot fail. A command code without a known framing produces
//! the all-zero frame and a diagnostic, so the transmit path always has
//! something to send.

use crate::command::PacketType;
use crate::consts::RESPONSE_LEN;

/// A response frame ready for the transceiver.
pub type ResponseFrame = [u8; RESPONSE_LEN];

/// The all-zero (no-op) frame.
pub const ZERO_FRAME: ResponseFrame = [0; RESPONSE_LEN];

/// Frames a response for `packet_type`.
///
/// `downlink_period` is only carried by [`PacketType::ChangeDownlinkPeriod`].
pub fn encode_response(packet_type: PacketType, downlink_period: u16) -> ResponseFrame {
    match packet_type {
        PacketType::NoOp => ZERO_FRAME,
        PacketType::ChangeDownlinkPeriod => {
            let [hi, lo] = downlink_period.to_be_bytes();
            [packet_type.opcode(), hi, lo]
        }
    }
}

/// Frames a response from a raw command code.
///
/// Unknown codes are reported and framed as [`ZERO_FRAME`].
pub fn encode_raw(code: u8, downlink_period: u16) -> ResponseFrame {
    match PacketType::try_from(code) {
        Ok(packet_type) => encode_response(packet_type, downlink_period),
        Err(err) => {
            warn!("{:?}: check serial input, sending no-op", err);
            ZERO_FRAME
        }
    }
}

/// Recovers the downlink period carried by a change-downlink-period frame.
pub fn downlink_period_of(frame: &ResponseFrame) -> u16 {
    u16::from_be_bytes([frame[1], frame[2]])
}
