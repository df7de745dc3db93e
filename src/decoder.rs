//! Classification of received packets.
//!
//! Every receive cycle yields a fixed [`RX_PACKET_LEN`]-byte buffer and the
//! status of the read. The [`PacketDecoder`] turns the pair into a
//! [`Classification`] that the node acts on:
//!
//! | First byte      | Read status | Mode flag | Result                      |
//! |-----------------|-------------|-----------|-----------------------------|
//! | beacon sentinel | any         | -         | [`Classification::Beacon`]     |
//! | other           | success     | set       | [`Classification::DataAccept`] |
//! | other           | success     | clear     | [`Classification::DataReject`] |
//! | other           | error       | -         | [`Classification::Failure`]    |
//!
//! The decoder never retries and never repairs the buffer; a failed read
//! is passed through with its status so it can be reported.

use crate::config::NodeConfig;
use crate::consts::RX_PACKET_LEN;
use crate::radio::RadioError;

/// What a received packet means to the node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum Classification {
    /// A callsign beacon. Nothing to answer.
    Beacon,
    /// A data packet whose sender is listening and expects a response.
    DataAccept,
    /// A data packet whose sender is not listening.
    DataReject,
    /// The read failed; the raw status is kept for diagnostics.
    Failure(RadioError),
}

/// Beacon and mode-flag rules applied to received buffers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacketDecoder {
    beacon_sentinel: u8,
    mode_flag_index: usize,
    mode_flag_mask: u8,
}

impl Default for PacketDecoder {
    fn default() -> Self {
        Self::from_config(&NodeConfig::default())
    }
}

impl PacketDecoder {
    /// Creates a decoder with the beacon sentinel and mode-flag location from `config`.
    pub fn from_config(config: &NodeConfig) -> Self {
        Self {
            beacon_sentinel: config.beacon_sentinel,
            mode_flag_index: config.mode_flag_index,
            mode_flag_mask: config.mode_flag_mask,
        }
    }

    /// Whether `buf` is a beacon, regardless of its remaining bytes.
    pub fn is_beacon(&self, buf: &[u8; RX_PACKET_LEN]) -> bool {
        buf[0] == self.beacon_sentinel
    }

    /// Whether the sender of a data packet says it is in listen mode.
    ///
    /// A flag index past the end of the buffer reads as "not listening".
    pub fn sender_listening(&self, buf: &[u8; RX_PACKET_LEN]) -> bool {
        buf.get(self.mode_flag_index)
            .is_some_and(|byte| byte & self.mode_flag_mask != 0)
    }

    /// Classifies a received buffer given the status of the read that filled it.
    pub fn classify(
        &self,
        buf: &[u8; RX_PACKET_LEN],
        status: Result<(), RadioError>,
    ) -> Classification {
        if self.is_beacon(buf) {
            return Classification::Beacon;
        }
        match status {
            Err(err) => Classification::Failure(err),
            Ok(()) if self.sender_listening(buf) => Classification::DataAccept,
            Ok(()) => Classification::DataReject,
        }
    }
}
