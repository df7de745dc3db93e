#![allow(dead_code)]

// Test doubles for the transceiver and the command input.

use core::convert::Infallible;

use heapless::Vec;

use crate::config::RadioConfig;
use crate::consts::{RESPONSE_LEN, RX_PACKET_LEN};
use crate::encoder::ResponseFrame;
use crate::irq::InterruptLatch;
use crate::radio::{RadioError, Transceiver};

/// Serial source backed by a byte slice.
pub(crate) struct FakeSerial<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> FakeSerial<'a> {
    pub(crate) fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub(crate) fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }
}

impl embedded_io::ErrorType for FakeSerial<'_> {
    type Error = Infallible;
}

impl embedded_io::Read for FakeSerial<'_> {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        let n = buf.len().min(self.remaining());
        buf[..n].copy_from_slice(&self.data[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }
}

impl embedded_io::ReadReady for FakeSerial<'_> {
    fn read_ready(&mut self) -> Result<bool, Self::Error> {
        Ok(self.remaining() > 0)
    }
}

/// Scriptable transceiver that records every call.
///
/// With `irq` set, `read_data` fires the packet interrupt while the buffer is
/// being read, the way a back-to-back packet would.
pub(crate) struct FakeRadio<'l> {
    pub(crate) begin_result: Result<(), RadioError>,
    pub(crate) start_receive_result: Result<(), RadioError>,
    pub(crate) read_result: Result<(), RadioError>,
    pub(crate) transmit_result: Result<(), RadioError>,
    pub(crate) packet: [u8; RX_PACKET_LEN],
    pub(crate) begin_calls: u32,
    pub(crate) start_receive_calls: u32,
    pub(crate) read_calls: u32,
    pub(crate) sent: Vec<ResponseFrame, 64>,
    pub(crate) irq: Option<&'l InterruptLatch>,
    pub(crate) latched_during_read: bool,
}

impl FakeRadio<'_> {
    pub(crate) fn new() -> Self {
        Self {
            begin_result: Ok(()),
            start_receive_result: Ok(()),
            read_result: Ok(()),
            transmit_result: Ok(()),
            packet: [0; RX_PACKET_LEN],
            begin_calls: 0,
            start_receive_calls: 0,
            read_calls: 0,
            sent: Vec::new(),
            irq: None,
            latched_during_read: false,
        }
    }
}

impl Transceiver for FakeRadio<'_> {
    fn begin(&mut self, _config: &RadioConfig) -> Result<(), RadioError> {
        self.begin_calls += 1;
        self.begin_result
    }

    fn start_receive(&mut self) -> Result<(), RadioError> {
        self.start_receive_calls += 1;
        self.start_receive_result
    }

    fn read_data(&mut self, buf: &mut [u8; RX_PACKET_LEN]) -> Result<(), RadioError> {
        self.read_calls += 1;
        if let Some(latch) = self.irq {
            latch.signal();
            self.latched_during_read |= latch.is_pending();
        }
        *buf = self.packet;
        self.read_result
    }

    fn transmit(&mut self, frame: &[u8]) -> Result<(), RadioError> {
        let mut copy = [0u8; RESPONSE_LEN];
        copy.copy_from_slice(frame);
        let _ = self.sent.push(copy);
        self.transmit_result
    }
}
