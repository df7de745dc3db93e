//! Error taxonomy for the node.
//!
//! Only [`Error::Init`] is terminal: a node that cannot bring its radio up
//! has nothing useful to do. Every other variant is reported through the
//! diagnostic sink and recovered locally by falling back to listening or by
//! keeping the previously selected command.

use crate::radio::RadioError;

/// Reasons a command line was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum CommandFault {
    /// The first character of the line is not a known command.
    #[error("unknown command byte {0}")]
    UnknownCommand(u8),
    /// A command that needs a numeric argument was given none.
    #[error("missing value")]
    MissingArgument,
    /// The line did not fit in the command buffer.
    #[error("line too long")]
    LineTooLong,
}

/// Errors reported by the packet state machine and its collaborators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum Error {
    /// A receive, re-arm or transmit call on the transceiver failed.
    #[error("transceiver failed: {0}")]
    Transceiver(RadioError),
    /// The transceiver read a packet whose CRC did not match.
    #[error("CRC mismatch")]
    CrcMismatch,
    /// The radio could not be initialized. The node halts.
    #[error("radio initialization failed: {0}")]
    Init(RadioError),
    /// A line on the command channel could not be parsed.
    #[error("malformed command: {0}")]
    MalformedCommand(CommandFault),
    /// A command code with no response encoding was selected.
    #[error("unknown command selected: {0}")]
    UnknownCommandSelected(u8),
    /// The transceiver returned a status code outside the known set.
    #[error("unknown transceiver status code {0}")]
    UnknownStatus(i16),
}

impl From<RadioError> for Error {
    fn from(err: RadioError) -> Self {
        match err {
            RadioError::CrcMismatch => Error::CrcMismatch,
            other => Error::Transceiver(other),
        }
    }
}

impl From<CommandFault> for Error {
    fn from(fault: CommandFault) -> Self {
        Error::MalformedCommand(fault)
    }
}
