//! Node and radio settings.
//!
//! [`NodeConfig`] tunes the packet state machine; [`RadioConfig`] is handed
//! untouched to [`Transceiver::begin`](crate::radio::Transceiver::begin). The
//! radio defaults match the ground station's link budget, so both ends must be
//! changed together.

use crate::consts::{
    BEACON_SENTINEL, DEFAULT_DOWNLINK_PERIOD, LISTEN_PERIOD_MS, MODE_FLAG_INDEX, MODE_FLAG_MASK,
};

/// Tuning of the packet state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeConfig {
    /// Longest time (ms) the node keeps re-sending its response before listening again.
    pub listen_period_ms: u32,
    /// Downlink period carried by `C` commands until an operator sets one.
    pub default_downlink_period: u16,
    /// First byte that marks a beacon packet.
    pub beacon_sentinel: u8,
    /// Byte position of the mode flag in a data packet.
    pub mode_flag_index: usize,
    /// Bitmask of the mode flag within that byte.
    pub mode_flag_mask: u8,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            listen_period_ms: LISTEN_PERIOD_MS,
            default_downlink_period: DEFAULT_DOWNLINK_PERIOD,
            beacon_sentinel: BEACON_SENTINEL,
            mode_flag_index: MODE_FLAG_INDEX,
            mode_flag_mask: MODE_FLAG_MASK,
        }
    }
}

/// LoRa modem parameters for an SX127x-class transceiver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadioConfig {
    /// Carrier frequency in MHz.
    pub frequency_mhz: f32,
    /// Bandwidth in kHz.
    pub bandwidth_khz: f32,
    /// Spreading factor (6 to 12).
    pub spreading_factor: u8,
    /// Coding rate denominator (5 to 8, i.e. 4/5 to 4/8).
    pub coding_rate: u8,
    /// Sync word.
    pub sync_word: u8,
    /// Output power in dBm.
    pub output_power_dbm: i8,
    /// Preamble length in symbols.
    pub preamble_len: u16,
    /// LNA gain, 0 selects automatic gain control.
    pub gain: u8,
    /// Append and check a payload CRC.
    pub crc: bool,
    /// Force low data rate optimisation.
    pub force_ldro: bool,
}

impl Default for RadioConfig {
    fn default() -> Self {
        Self {
            frequency_mhz: 433.0,
            bandwidth_khz: 125.0,
            spreading_factor: 12,
            coding_rate: 5,
            sync_word: 0x12,
            output_power_dbm: 20,
            preamble_len: 8,
            gain: 0,
            crc: true,
            force_ldro: true,
        }
    }
}
