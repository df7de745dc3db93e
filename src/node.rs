//! Listen/transmit state machine of the radio node.
//!
//! This module provides the [`Node`] struct, which owns the transceiver and
//! decides on every main-loop iteration whether to process a received
//! packet, keep answering a listening sender, or do nothing.
//!
//! ## States
//!
//! | Current      | Event              | Condition                     | Next         | Side effect            |
//! |--------------|--------------------|-------------------------------|--------------|------------------------|
//! | Listening    | packet pending     | beacon                        | Listening    | re-arm receive         |
//! | Listening    | packet pending     | data, mode flag set           | Transmitting | record window start    |
//! | Listening    | packet pending     | data, flag clear, or failure  | Listening    | re-arm receive         |
//! | Transmitting | tick               | elapsed <= listen period      | Transmitting | send response          |
//! | Transmitting | tick               | elapsed > listen period       | Listening    | re-arm, enable latch   |
//! | Transmitting | packet pending     |                               | as above     |                        |
//!
//! A pending packet is always handled first, whatever the state. While
//! transmitting the latch is normally disabled, so that last row only fires
//! if the integrator re-enables the latch mid-window; the packet then
//! preempts the response.
//!
//! ## Example
//!
//! ```rust,ignore
//! use satlink::config::NodeConfig;
//! use satlink::irq::InterruptLatch;
//! use satlink::node::Node;
//!
//! static LATCH: InterruptLatch = InterruptLatch::new();
//!
//! let mut node = Node::new(radio, || millis(), &LATCH, NodeConfig::default());
//! node.boot()?;
//! loop {
//!     node.poll_commands(&mut uart);
//!     node.tick();
//! }
//! ```
//!
//! ## Design Notes
//!
//! The received buffer lives on the stack for the duration of one tick and
//! is never retained. The latch is disarmed before the buffer is read and
//! re-enabled only after the state update is complete.

use embedded_io::{Read, ReadReady};

use crate::clock::{Clock, Millis, elapsed_ms};
use crate::command::{Command, CommandParser, PacketType};
use crate::config::{NodeConfig, RadioConfig};
use crate::consts::RX_PACKET_LEN;
use crate::decoder::{Classification, PacketDecoder};
use crate::encoder::encode_response;
use crate::error::Error;
use crate::irq::InterruptLatch;
use crate::radio::{RadioError, Transceiver};

/// Which half of the listen/transmit cycle the node is in.
#[derive(PartialEq, Eq, Clone, Copy, Default, Debug)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum ModuleState {
    /// Answering a listening sender until the listen period runs out.
    Transmitting,
    /// Receive armed, waiting for the packet-done signal.
    #[default]
    Listening,
}

/// What a call to [`Node::tick`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum TickOutcome {
    /// [`Node::boot`] has not succeeded; nothing was done.
    NotBooted,
    /// Listening, no packet pending.
    Idle,
    /// A pending packet was read and classified.
    Received(Classification),
    /// A response frame was handed to the transceiver.
    Responded,
    /// The listen period ran out and receive was re-armed.
    WindowExpired,
}

/// Running counters, for telemetry and tests.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct NodeStats {
    /// Beacon packets seen.
    pub beacons: u32,
    /// Data packets whose sender was listening.
    pub accepted: u32,
    /// Data packets whose sender was not listening.
    pub rejected: u32,
    /// Reads that failed, CRC mismatches included.
    pub rx_failures: u32,
    /// Of those, CRC mismatches.
    pub crc_errors: u32,
    /// Response frames sent.
    pub responses_sent: u32,
    /// Response frames the transceiver refused.
    pub tx_failures: u32,
    /// Transmit windows that ran out.
    pub window_expiries: u32,
    /// Command lines accepted.
    pub commands_accepted: u32,
    /// Command lines rejected.
    pub commands_rejected: u32,
}

/// The packet state machine of a LoRa ground/satellite node.
///
/// ## Type Parameters
///
/// - `R`: the [`Transceiver`]
/// - `C`: the millisecond [`Clock`]
///
/// The interrupt latch is borrowed, not owned, because the packet-done ISR
/// needs it too.
#[derive(Debug)]
pub struct Node<'l, R, C>
where
    R: Transceiver,
    C: Clock,
{
    radio: R,
    clock: C,
    latch: &'l InterruptLatch,
    config: NodeConfig,
    radio_config: RadioConfig,
    decoder: PacketDecoder,
    parser: CommandParser,
    state: ModuleState,
    packet_type: PacketType,
    downlink_period: u16,
    window_start: Millis,
    booted: bool,
    stats: NodeStats,
    last_error: Option<Error>,
}

impl<'l, R, C> Node<'l, R, C>
where
    R: Transceiver,
    C: Clock,
{
    /// Creates a node. Nothing touches the radio until [`Node::boot`].
    ///
    /// The radio is configured with [`RadioConfig::default`]; see
    /// [`Node::with_radio_config`].
    pub fn new(radio: R, clock: C, latch: &'l InterruptLatch, config: NodeConfig) -> Self {
        Self {
            radio,
            clock,
            latch,
            decoder: PacketDecoder::from_config(&config),
            parser: CommandParser::new(),
            state: ModuleState::Listening,
            packet_type: PacketType::NoOp,
            downlink_period: config.default_downlink_period,
            window_start: 0,
            booted: false,
            stats: NodeStats::default(),
            last_error: None,
            radio_config: RadioConfig::default(),
            config,
        }
    }

    /// Replaces the modem parameters passed to the transceiver at boot.
    pub fn with_radio_config(mut self, radio_config: RadioConfig) -> Self {
        self.radio_config = radio_config;
        self
    }

    /// Brings the radio up and starts listening.
    ///
    /// # Errors
    /// [`Error::Init`] if the transceiver cannot be configured or armed. The
    /// node cannot do anything useful without its radio: the caller should
    /// report the error and halt.
    pub fn boot(&mut self) -> Result<(), Error> {
        info!("[radio] initializing ...");
        if let Err(err) = self.radio.begin(&self.radio_config) {
            error!("[radio] initialization failed, code {}", err.code());
            return Err(Error::Init(err));
        }

        info!("[radio] starting to listen ...");
        if let Err(err) = self.radio.start_receive() {
            error!("[radio] could not start listening, code {}", err.code());
            return Err(Error::Init(err));
        }

        self.state = ModuleState::Listening;
        self.booted = true;
        self.latch.enable();
        info!("[radio] initialization ... success!");
        Ok(())
    }

    /// Runs one iteration of the state machine.
    ///
    /// A pending packet is handled first, regardless of state. Otherwise the
    /// node keeps answering while [`ModuleState::Transmitting`] and idles
    /// while [`ModuleState::Listening`].
    pub fn tick(&mut self) -> TickOutcome {
        if !self.booted {
            return TickOutcome::NotBooted;
        }
        if self.latch.is_pending() {
            return TickOutcome::Received(self.handle_receive());
        }
        match self.state {
            ModuleState::Transmitting => self.handle_transmit(),
            ModuleState::Listening => TickOutcome::Idle,
        }
    }

    /// Drains the command source, applying every complete line.
    pub fn poll_commands<S>(&mut self, serial: &mut S)
    where
        S: Read + ReadReady,
    {
        loop {
            match self.parser.poll(serial) {
                Ok(command) => self.apply_command(command),
                Err(nb::Error::Other(err)) => {
                    self.stats.commands_rejected = self.stats.commands_rejected.wrapping_add(1);
                    warn!("ERROR: {}, command ignored", err);
                    self.last_error = Some(err);
                }
                Err(nb::Error::WouldBlock) => break,
            }
        }
    }

    /// Selects the response sent to listening senders from now on.
    pub fn apply_command(&mut self, command: Command) {
        match command {
            Command::NoOp => info!("NO_OP selected"),
            Command::ChangeDownlinkPeriod(period) => {
                self.downlink_period = period;
                info!("new downlink period: {}", period);
            }
        }
        self.packet_type = command.packet_type();
        self.stats.commands_accepted = self.stats.commands_accepted.wrapping_add(1);
    }

    /// One main-loop iteration: read commands, then tick.
    pub fn step<S>(&mut self, serial: &mut S) -> TickOutcome
    where
        S: Read + ReadReady,
    {
        self.poll_commands(serial);
        self.tick()
    }

    fn handle_transmit(&mut self) -> TickOutcome {
        let elapsed = elapsed_ms(self.window_start, self.clock.now_ms());
        if elapsed > self.config.listen_period_ms {
            info!("[radio] no reply after {} ms, going back to listening", elapsed);
            self.stats.window_expiries = self.stats.window_expiries.wrapping_add(1);
            self.resume_listening();
            TickOutcome::WindowExpired
        } else {
            self.send_response();
            TickOutcome::Responded
        }
    }

    fn send_response(&mut self) {
        let frame = encode_response(self.packet_type, self.downlink_period);
        match self.radio.transmit(&frame) {
            Ok(()) => {
                self.stats.responses_sent = self.stats.responses_sent.wrapping_add(1);
                trace!("[radio] sent {:?}", frame);
            }
            Err(err) => {
                self.stats.tx_failures = self.stats.tx_failures.wrapping_add(1);
                self.report(err);
            }
        }
    }

    fn handle_receive(&mut self) -> Classification {
        let _ = self.latch.disarm();

        let mut buf = [0u8; RX_PACKET_LEN];
        let status = self.radio.read_data(&mut buf);
        debug!("downlinked report: {:?}", buf);

        let classification = self.decoder.classify(&buf, status);
        match classification {
            Classification::Beacon => {
                self.stats.beacons = self.stats.beacons.wrapping_add(1);
                debug!("[radio] beacon received");
                self.rearm_receive();
            }
            Classification::DataAccept => {
                self.stats.accepted = self.stats.accepted.wrapping_add(1);
                info!("[radio] received packet, sender is listening");
                self.state = ModuleState::Transmitting;
                self.window_start = self.clock.now_ms();
            }
            Classification::DataReject => {
                self.stats.rejected = self.stats.rejected.wrapping_add(1);
                info!("[radio] received packet!");
                self.rearm_receive();
            }
            Classification::Failure(err) => {
                self.stats.rx_failures = self.stats.rx_failures.wrapping_add(1);
                if err == RadioError::CrcMismatch {
                    self.stats.crc_errors = self.stats.crc_errors.wrapping_add(1);
                }
                self.report(err);
                self.rearm_receive();
            }
        }
        classification
    }

    /// Re-arms receive and the latch. The state is left alone.
    fn rearm_receive(&mut self) {
        self.restart_receive();
        self.latch.enable();
    }

    /// Closes the transmit window.
    fn resume_listening(&mut self) {
        debug!("[radio] going back to listening ...");
        self.restart_receive();
        self.state = ModuleState::Listening;
        self.latch.enable();
    }

    fn restart_receive(&mut self) {
        if let Err(err) = self.radio.start_receive() {
            self.report(err);
        }
    }

    fn report(&mut self, err: RadioError) {
        let err = Error::from(err);
        warn!("[radio] {}", err);
        self.last_error = Some(err);
    }

    /// Current half of the listen/transmit cycle.
    pub fn state(&self) -> ModuleState {
        self.state
    }

    /// Response currently selected.
    pub fn packet_type(&self) -> PacketType {
        self.packet_type
    }

    /// Downlink period carried by change-downlink-period responses.
    pub fn downlink_period(&self) -> u16 {
        self.downlink_period
    }

    /// When the current (or last) transmit window opened.
    pub fn window_start(&self) -> Millis {
        self.window_start
    }

    /// Whether [`Node::boot`] has succeeded.
    pub fn is_booted(&self) -> bool {
        self.booted
    }

    /// Running counters.
    pub fn stats(&self) -> &NodeStats {
        &self.stats
    }

    /// The most recent recoverable error, if any.
    ///
    /// Radio failures after boot and rejected command lines land here. They
    /// never stop the node.
    pub fn last_error(&self) -> Option<Error> {
        self.last_error
    }

    /// The node's settings.
    pub fn config(&self) -> &NodeConfig {
        &self.config
    }

    /// The transceiver.
    pub fn radio(&self) -> &R {
        &self.radio
    }

    /// The transceiver, mutably.
    pub fn radio_mut(&mut self) -> &mut R {
        &mut self.radio
    }

    /// Gives back the transceiver and the clock.
    pub fn release(self) -> (R, C) {
        (self.radio, self.clock)
    }
}
