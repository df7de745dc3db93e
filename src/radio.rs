//! Transceiver collaborator interface.
//!
//! The node never touches radio registers itself. Everything it needs from
//! the LoRa chip is behind the [`Transceiver`] trait: bring-up, arming
//! receive mode, reading the last packet and sending a frame. Board support
//! code implements the trait on top of whatever driver it uses and wires the
//! chip's packet-done line (DIO0 on SX127x parts) to
//! [`InterruptLatch::signal`](crate::irq::InterruptLatch::signal).
//!
//! Status codes follow the RadioLib numbering so that adapters around
//! existing C drivers can use [`RadioError::from_code`] directly.

use crate::config::RadioConfig;
use crate::consts::RX_PACKET_LEN;
use crate::error::Error;

/// Non-success status codes a transceiver call can return.
///
/// The set is closed: an adapter converting raw integers goes through
/// [`RadioError::from_code`], which rejects codes it does not know instead
/// of folding them into a catch-all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum RadioError {
    /// Generic failure reported by the driver.
    #[error("unknown error (-1)")]
    Unknown,
    /// The chip did not answer during bring-up.
    #[error("chip not found (-2)")]
    ChipNotFound,
    /// The frame is larger than the FIFO.
    #[error("packet too long (-4)")]
    PacketTooLong,
    /// Transmission did not complete in time.
    #[error("TX timeout (-5)")]
    TxTimeout,
    /// No packet arrived in time.
    #[error("RX timeout (-6)")]
    RxTimeout,
    /// A packet arrived but its CRC did not match.
    #[error("CRC mismatch (-7)")]
    CrcMismatch,
    /// Bandwidth not supported by the chip.
    #[error("invalid bandwidth (-8)")]
    InvalidBandwidth,
    /// Spreading factor not supported by the chip.
    #[error("invalid spreading factor (-9)")]
    InvalidSpreadingFactor,
    /// Coding rate not supported by the chip.
    #[error("invalid coding rate (-10)")]
    InvalidCodingRate,
    /// Carrier frequency out of range.
    #[error("invalid frequency (-12)")]
    InvalidFrequency,
    /// Output power out of range.
    #[error("invalid output power (-13)")]
    InvalidOutputPower,
    /// Register write over SPI did not stick.
    #[error("SPI write failed (-16)")]
    SpiWriteFailed,
    /// Preamble length out of range.
    #[error("invalid preamble length (-18)")]
    InvalidPreambleLength,
    /// Receiver gain out of range.
    #[error("invalid gain (-19)")]
    InvalidGain,
    /// The chip is configured for a different modem.
    #[error("wrong modem (-20)")]
    WrongModem,
}

impl RadioError {
    /// Maps a raw driver status code.
    ///
    /// # Returns
    /// - `Ok(None)` for `0` (success)
    /// - `Ok(Some(err))` for a known failure code
    /// - `Err(Error::UnknownStatus(code))` for anything else
    pub fn from_code(code: i16) -> Result<Option<Self>, Error> {
        let err = match code {
            0 => return Ok(None),
            -1 => RadioError::Unknown,
            -2 => RadioError::ChipNotFound,
            -4 => RadioError::PacketTooLong,
            -5 => RadioError::TxTimeout,
            -6 => RadioError::RxTimeout,
            -7 => RadioError::CrcMismatch,
            -8 => RadioError::InvalidBandwidth,
            -9 => RadioError::InvalidSpreadingFactor,
            -10 => RadioError::InvalidCodingRate,
            -12 => RadioError::InvalidFrequency,
            -13 => RadioError::InvalidOutputPower,
            -16 => RadioError::SpiWriteFailed,
            -18 => RadioError::InvalidPreambleLength,
            -19 => RadioError::InvalidGain,
            -20 => RadioError::WrongModem,
            unknown => return Err(Error::UnknownStatus(unknown)),
        };
        Ok(Some(err))
    }

    /// The raw driver status code of this error.
    pub fn code(&self) -> i16 {
        match self {
            RadioError::Unknown => -1,
            RadioError::ChipNotFound => -2,
            RadioError::PacketTooLong => -4,
            RadioError::TxTimeout => -5,
            RadioError::RxTimeout => -6,
            RadioError::CrcMismatch => -7,
            RadioError::InvalidBandwidth => -8,
            RadioError::InvalidSpreadingFactor => -9,
            RadioError::InvalidCodingRate => -10,
            RadioError::InvalidFrequency => -12,
            RadioError::InvalidOutputPower => -13,
            RadioError::SpiWriteFailed => -16,
            RadioError::InvalidPreambleLength => -18,
            RadioError::InvalidGain => -19,
            RadioError::WrongModem => -20,
        }
    }
}

/// The LoRa transceiver as seen by the node.
///
/// Every call is bounded; a driver that can stall indefinitely must enforce
/// its own timeout and report it as [`RadioError::TxTimeout`] or
/// [`RadioError::RxTimeout`].
pub trait Transceiver {
    /// Powers up and configures the chip.
    fn begin(&mut self, config: &RadioConfig) -> Result<(), RadioError>;

    /// Arms continuous receive. The packet-done signal fires when a packet lands.
    fn start_receive(&mut self) -> Result<(), RadioError>;

    /// Copies the last received packet into `buf`.
    ///
    /// The buffer is written even when the status is an error, so the
    /// caller can still dump it for diagnostics.
    fn read_data(&mut self, buf: &mut [u8; RX_PACKET_LEN]) -> Result<(), RadioError>;

    /// Sends `frame` and returns once it is on air (or failed).
    fn transmit(&mut self, frame: &[u8]) -> Result<(), RadioError>;
}

impl<T: Transceiver + ?Sized> Transceiver for &mut T {
    fn begin(&mut self, config: &RadioConfig) -> Result<(), RadioError> {
        T::begin(self, config)
    }

    fn start_receive(&mut self) -> Result<(), RadioError> {
        T::start_receive(self)
    }

    fn read_data(&mut self, buf: &mut [u8; RX_PACKET_LEN]) -> Result<(), RadioError> {
        T::read_data(self, buf)
    }

    fn transmit(&mut self, frame: &[u8]) -> Result<(), RadioError> {
        T::transmit(self, frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_is_success() {
        assert_eq!(RadioError::from_code(0), Ok(None));
    }

    #[test]
    fn test_known_codes_map_back() {
        for code in [-1i16, -2, -4, -5, -6, -7, -8, -9, -10, -12, -13, -16, -18, -19, -20] {
            let err = RadioError::from_code(code).unwrap().unwrap();
            assert_eq!(err.code(), code);
        }
    }

    #[test]
    fn test_unknown_codes_fail_loudly() {
        assert_eq!(RadioError::from_code(-3), Err(Error::UnknownStatus(-3)));
        assert_eq!(RadioError::from_code(7), Err(Error::UnknownStatus(7)));
    }
}
