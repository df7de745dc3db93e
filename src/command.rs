//! Operator command channel.
//!
//! Commands arrive as text lines on a serial link:
//!
//! | Line        | Effect                                            |
//! |-------------|---------------------------------------------------|
//! | `N`         | answer with a no-op frame                         |
//! | `C<digits>` | answer with a change-downlink-period frame        |
//!
//! `\r` bytes are dropped, `\n` ends a line. Anything else on the line is
//! kept, so `N garbage` is still a no-op. The numeric argument is parsed
//! leniently, in the manner of C's `atol`: leading whitespace and a sign are
//! accepted, parsing stops at the first non-digit, and a value with no
//! digits is zero. The result is truncated to 16 bits.
//!
//! The parser keeps partial lines between calls, so bytes can be fed as they
//! trickle in.
//!
//! A line holds at most [`MAX_COMMAND_LEN`] bytes, `\r` not counted. A longer
//! line is rejected as a whole with [`CommandFault::LineTooLong`], even if it
//! is a valid command padded with whitespace (`C` followed by 40 spaces and a
//! number, say). The selected response does not change.

use embedded_io::{Error as _, Read, ReadReady};
use heapless::Vec;

use crate::consts::{
    COMMAND_IGNORED, COMMAND_TERMINATOR, MAX_COMMAND_LEN, OPCODE_CHANGE_DOWNLINK_PERIOD,
    OPCODE_NO_OP,
};
use crate::error::{CommandFault, Error};

/// The response the node sends when a listening sender asks for one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
#[repr(u8)]
pub enum PacketType {
    /// Answer with an all-zero frame.
    #[default]
    NoOp = OPCODE_NO_OP,
    /// Answer with the configured downlink period.
    ChangeDownlinkPeriod = OPCODE_CHANGE_DOWNLINK_PERIOD,
}

impl PacketType {
    /// The opcode byte this packet type is framed with.
    pub const fn opcode(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for PacketType {
    type Error = Error;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            OPCODE_NO_OP => Ok(PacketType::NoOp),
            OPCODE_CHANGE_DOWNLINK_PERIOD => Ok(PacketType::ChangeDownlinkPeriod),
            unknown => Err(Error::UnknownCommandSelected(unknown)),
        }
    }
}

/// A parsed operator command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum Command {
    /// `N`
    NoOp,
    /// `C<digits>`
    ChangeDownlinkPeriod(u16),
}

impl Command {
    /// The packet type this command selects.
    pub fn packet_type(&self) -> PacketType {
        match self {
            Command::NoOp => PacketType::NoOp,
            Command::ChangeDownlinkPeriod(_) => PacketType::ChangeDownlinkPeriod,
        }
    }
}

/// Line-buffered parser for the command channel.
///
/// The line buffer is bounded; a line longer than [`MAX_COMMAND_LEN`] is
/// rejected with [`CommandFault::LineTooLong`] when its terminator arrives.
#[derive(Debug, Default)]
pub struct CommandParser {
    line: Vec<u8, MAX_COMMAND_LEN>,
    overflowed: bool,
}

impl CommandParser {
    /// Creates a parser with an empty line buffer.
    pub const fn new() -> Self {
        Self {
            line: Vec::new(),
            overflowed: false,
        }
    }

    /// Drops any partial line.
    pub fn clear(&mut self) {
        self.line.clear();
        self.overflowed = false;
    }

    /// Feeds one byte.
    ///
    /// # Returns
    /// - `Ok(command)` when `byte` completes a valid line
    /// - `Err(nb::Error::Other(_))` when it completes an invalid line
    /// - `Err(nb::Error::WouldBlock)` otherwise, including for empty lines
    pub fn feed(&mut self, byte: u8) -> nb::Result<Command, Error> {
        match byte {
            COMMAND_TERMINATOR => {
                let parsed = self.parse_line();
                self.clear();
                match parsed {
                    Ok(Some(command)) => Ok(command),
                    Ok(None) => Err(nb::Error::WouldBlock),
                    Err(err) => Err(nb::Error::Other(err)),
                }
            }
            COMMAND_IGNORED => Err(nb::Error::WouldBlock),
            other => {
                if self.line.push(other).is_err() {
                    self.overflowed = true;
                }
                Err(nb::Error::WouldBlock)
            }
        }
    }

    /// Consumes whatever bytes `serial` has ready, stopping at the first complete line.
    ///
    /// Never blocks: returns `WouldBlock` as soon as the source runs dry. Bytes
    /// after a completed line stay in the source for the next call. A source
    /// error is reported and treated as "nothing available".
    pub fn poll<S>(&mut self, serial: &mut S) -> nb::Result<Command, Error>
    where
        S: Read + ReadReady,
    {
        loop {
            match serial.read_ready() {
                Ok(true) => {}
                Ok(false) => return Err(nb::Error::WouldBlock),
                Err(err) => {
                    warn!("command input not readable: {:?}", err.kind());
                    return Err(nb::Error::WouldBlock);
                }
            }

            let mut byte = [0u8; 1];
            match serial.read(&mut byte) {
                Ok(0) => return Err(nb::Error::WouldBlock),
                Ok(_) => {}
                Err(err) => {
                    warn!("command input read failed: {:?}", err.kind());
                    return Err(nb::Error::WouldBlock);
                }
            }

            match self.feed(byte[0]) {
                Err(nb::Error::WouldBlock) => continue,
                done => return done,
            }
        }
    }

    fn parse_line(&self) -> Result<Option<Command>, Error> {
        if self.overflowed {
            return Err(CommandFault::LineTooLong.into());
        }
        let Some((&first, rest)) = self.line.split_first() else {
            return Ok(None);
        };
        match first {
            b'N' => Ok(Some(Command::NoOp)),
            b'C' if !rest.is_empty() => Ok(Some(Command::ChangeDownlinkPeriod(parse_lenient(
                rest,
            )))),
            b'C' => Err(CommandFault::MissingArgument.into()),
            unknown => Err(CommandFault::UnknownCommand(unknown).into()),
        }
    }
}

/// `atol`-style integer parse, truncated to 16 bits.
fn parse_lenient(text: &[u8]) -> u16 {
    let mut rest = text
        .iter()
        .copied()
        .skip_while(u8::is_ascii_whitespace)
        .peekable();
    let negative = match rest.peek() {
        Some(b'-') => {
            let _ = rest.next();
            true
        }
        Some(b'+') => {
            let _ = rest.next();
            false
        }
        _ => false,
    };
    let value = rest
        .take_while(u8::is_ascii_digit)
        .fold(0u16, |acc, digit| {
            acc.wrapping_mul(10).wrapping_add(u16::from(digit - b'0'))
        });
    if negative { value.wrapping_neg() } else { value }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeSerial;

    fn feed_str(parser: &mut CommandParser, text: &[u8]) -> nb::Result<Command, Error> {
        let mut last = Err(nb::Error::WouldBlock);
        for &b in text {
            last = parser.feed(b);
        }
        last
    }

    #[test]
    fn test_no_op() {
        let mut parser = CommandParser::new();
        assert_eq!(feed_str(&mut parser, b"N\n"), Ok(Command::NoOp));
    }

    #[test]
    fn test_change_downlink_period() {
        let mut parser = CommandParser::new();
        assert_eq!(
            feed_str(&mut parser, b"C42\n"),
            Ok(Command::ChangeDownlinkPeriod(42))
        );
    }

    #[test]
    fn test_carriage_return_is_dropped() {
        let mut parser = CommandParser::new();
        assert_eq!(
            feed_str(&mut parser, b"C3\r00\r\n"),
            Ok(Command::ChangeDownlinkPeriod(300))
        );
    }

    #[test]
    fn test_missing_argument() {
        let mut parser = CommandParser::new();
        assert_eq!(
            feed_str(&mut parser, b"C\n"),
            Err(nb::Error::Other(Error::MalformedCommand(
                CommandFault::MissingArgument
            )))
        );
    }

    #[test]
    fn test_unknown_command() {
        let mut parser = CommandParser::new();
        assert_eq!(
            feed_str(&mut parser, b"X\n"),
            Err(nb::Error::Other(Error::MalformedCommand(
                CommandFault::UnknownCommand(b'X')
            )))
        );
    }

    #[test]
    fn test_empty_line_is_ignored() {
        let mut parser = CommandParser::new();
        assert_eq!(feed_str(&mut parser, b"\r\n"), Err(nb::Error::WouldBlock));
    }

    #[test]
    fn test_lenient_numbers() {
        let mut parser = CommandParser::new();
        assert_eq!(
            feed_str(&mut parser, b"Cabc\n"),
            Ok(Command::ChangeDownlinkPeriod(0))
        );
        assert_eq!(
            feed_str(&mut parser, b"C 12x4\n"),
            Ok(Command::ChangeDownlinkPeriod(12))
        );
        assert_eq!(
            feed_str(&mut parser, b"C70000\n"),
            Ok(Command::ChangeDownlinkPeriod(70000u32 as u16))
        );
        assert_eq!(
            feed_str(&mut parser, b"C-1\n"),
            Ok(Command::ChangeDownlinkPeriod(u16::MAX))
        );
    }

    #[test]
    fn test_buffer_resets_after_error() {
        let mut parser = CommandParser::new();
        assert!(feed_str(&mut parser, b"Q\n").is_err());
        assert_eq!(feed_str(&mut parser, b"N\n"), Ok(Command::NoOp));
    }

    #[test]
    fn test_overlong_line_is_rejected_then_recovers() {
        let mut parser = CommandParser::new();
        for _ in 0..(MAX_COMMAND_LEN + 5) {
            assert_eq!(parser.feed(b'C'), Err(nb::Error::WouldBlock));
        }
        assert_eq!(
            parser.feed(b'\n'),
            Err(nb::Error::Other(Error::MalformedCommand(
                CommandFault::LineTooLong
            )))
        );
        assert_eq!(feed_str(&mut parser, b"C7\n"), Ok(Command::ChangeDownlinkPeriod(7)));
    }

    #[test]
    fn test_padded_command_must_fit_the_buffer() {
        let mut parser = CommandParser::new();
        let mut line = [b' '; MAX_COMMAND_LEN];
        line[0] = b'C';
        line[MAX_COMMAND_LEN - 2..].copy_from_slice(b"12");
        assert_eq!(feed_str(&mut parser, &line), Err(nb::Error::WouldBlock));
        assert_eq!(parser.feed(b'\n'), Ok(Command::ChangeDownlinkPeriod(12)));

        let _ = feed_str(&mut parser, b"C ");
        let _ = feed_str(&mut parser, &line[1..]);
        assert_eq!(
            parser.feed(b'\n'),
            Err(nb::Error::Other(Error::MalformedCommand(
                CommandFault::LineTooLong
            )))
        );
    }

    #[test]
    fn test_poll_spans_calls() {
        let mut parser = CommandParser::new();

        let mut first = FakeSerial::new(b"C12");
        assert_eq!(parser.poll(&mut first), Err(nb::Error::WouldBlock));

        let mut second = FakeSerial::new(b"34\nN\n");
        assert_eq!(
            parser.poll(&mut second),
            Ok(Command::ChangeDownlinkPeriod(1234))
        );
        assert_eq!(parser.poll(&mut second), Ok(Command::NoOp));
        assert_eq!(parser.poll(&mut second), Err(nb::Error::WouldBlock));
    }

    #[test]
    fn test_packet_type_codes() {
        assert_eq!(PacketType::NoOp.opcode(), 0x00);
        assert_eq!(PacketType::ChangeDownlinkPeriod.opcode(), 0x11);
        assert_eq!(PacketType::try_from(0x11), Ok(PacketType::ChangeDownlinkPeriod));
        assert_eq!(
            PacketType::try_from(0x42),
            Err(Error::UnknownCommandSelected(0x42))
        );
    }
}
