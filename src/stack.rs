//! # Server and client sessions
//!
//! The adapter acts either as TCP server or as TCP client for its whole lifetime. The role gets
//! assigned once the session was confirmed by the modem.
//!
//! ## Example
//!
//! ````
//! # use esp8266_link::callbacks::Discard;
//! # use esp8266_link::config::Config;
//! # use esp8266_link::example::{ExampleSerial, ExampleTimer};
//! # use esp8266_link::session::Role;
//! # use esp8266_link::wifi::{Adapter, WifiAdapter};
//! #
//! let mut received = 0;
//! let sink = |payload: &[u8]| received += payload.len();
//!
//! let mut adapter: Adapter<_, _, _, _, 1_000> =
//!     Adapter::new(ExampleSerial::default(), ExampleTimer::default(), Config::default(), sink, Discard);
//! adapter.initialize_wifi().unwrap();
//! adapter.connect_wifi("test_wifi", "secret").unwrap();
//!
//! // Listening on port 8000 with an idle timeout of 300 seconds
//! adapter.start_server(8000, 300).unwrap();
//! assert_eq!(Role::Server, adapter.role());
//!
//! // Processing inbound messages, the remote side connects and sends "ping"
//! adapter.poll().unwrap();
//! assert!(adapter.is_linked());
//!
//! // Replying on the channel of the last inbound packet
//! adapter.send(b"pong").unwrap();
//!
//! drop(adapter);
//! assert_eq!(4, received);
//! ````
use crate::callbacks::{DataSink, LinkNotifier};
use crate::commands::{ConnectCommand, ServerCommand, ServerTimeoutCommand, TransmissionPrepareCommand};
use crate::config::{CLIENT_CHANNEL, SERVER_CHANNEL};
use crate::scanner::Fault;
use crate::session::Role;
use crate::wifi::Adapter;
use embedded_io::{ErrorKind, Read, ReadReady, Write};
use fugit_timer::Timer;

/// Network related errors
#[derive(Clone, Debug, PartialEq)]
pub enum Error {
    /// Starting the server was not confirmed (CIPSERVER command)
    ServerStartFailed,

    /// Setting the server idle timeout was not confirmed (CIPSTO command)
    ServerTimeoutFailed,

    /// TCP connect command was not confirmed
    ClientConnectFailed,

    /// Opening the UDP session was not confirmed
    UdpChannelFailed,

    /// A server or client session was already started. A new adapter is required for changing the role.
    RoleAlreadyAssigned,

    /// Beacon is only supported in server role
    NotServer,

    /// No local or broadcast address available yet
    AddressUnavailable,

    /// Given device label is longer then the max. size of 48 chars
    LabelTooLong,

    /// Remote host is longer then the max. size of 64 chars
    HostTooLong,

    /// Beacon payload does not fit in the scratch buffer
    PayloadTooLong,

    /// Received line exceeded the line buffer capacity and was dropped
    BufferOverrun,

    /// Serial transport error
    Transport(ErrorKind),

    /// Upstream timer error
    TimerError,
}

impl From<Fault> for Error {
    fn from(fault: Fault) -> Self {
        match fault {
            Fault::Transport(kind) => Error::Transport(kind),
            Fault::Timer => Error::TimerError,
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Error {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Error::ServerStartFailed => defmt::write!(f, "Error::ServerStartFailed"),
            Error::ServerTimeoutFailed => defmt::write!(f, "Error::ServerTimeoutFailed"),
            Error::ClientConnectFailed => defmt::write!(f, "Error::ClientConnectFailed"),
            Error::UdpChannelFailed => defmt::write!(f, "Error::UdpChannelFailed"),
            Error::RoleAlreadyAssigned => defmt::write!(f, "Error::RoleAlreadyAssigned"),
            Error::NotServer => defmt::write!(f, "Error::NotServer"),
            Error::AddressUnavailable => defmt::write!(f, "Error::AddressUnavailable"),
            Error::LabelTooLong => defmt::write!(f, "Error::LabelTooLong"),
            Error::HostTooLong => defmt::write!(f, "Error::HostTooLong"),
            Error::PayloadTooLong => defmt::write!(f, "Error::PayloadTooLong"),
            Error::BufferOverrun => defmt::write!(f, "Error::BufferOverrun"),
            Error::Transport(e) => defmt::write!(f, "Error::Transport({})", defmt::Debug2Format(e)),
            Error::TimerError => defmt::write!(f, "Error::TimerError"),
        }
    }
}

impl<S, T, D, L, const TIMER_HZ: u32> Adapter<S, T, D, L, TIMER_HZ>
where
    S: Read + Write + ReadReady,
    T: Timer<TIMER_HZ>,
    D: DataSink,
    L: LinkNotifier,
{
    /// Starts listening on the given port. Idle sessions get closed by the modem after `idle_timeout`
    /// seconds. The role changes to [Role::Server] once both commands were confirmed.
    ///
    /// The port is cached for beacon payloads even if the server could not be started.
    pub fn start_server(&mut self, port: u16, idle_timeout: u32) -> Result<(), Error> {
        self.session.assert_idle()?;
        self.session.listen_port = port;

        let timeout = self.config.timeouts.server_ms;
        self.execute(ServerCommand::new(SERVER_CHANNEL, port), 0, timeout)?;
        self.execute(ServerTimeoutCommand::new(idle_timeout), 0, timeout)?;

        self.session.assign_role(Role::Server)?;
        info!("Listening on port {}", port);
        Ok(())
    }

    /// Opens a TCP session to the given remote on the client channel. `timeout_ms` bounds the
    /// wait for the confirmation. The role changes to [Role::Client] once confirmed.
    pub fn start_client(&mut self, address: &str, port: u16, timeout_ms: u32) -> Result<(), Error> {
        self.session.assert_idle()?;

        self.execute(
            ConnectCommand::tcp(CLIENT_CHANNEL, address, port)?,
            self.config.timeouts.client_settle_ms,
            timeout_ms,
        )?;

        self.session.assign_role(Role::Client)?;
        info!("Connected to {}:{}", address, port);
        Ok(())
    }

    /// Opens a UDP session to the given remote on the given channel
    pub(crate) fn start_udp_channel(&mut self, channel: usize, address: &str, port: u16) -> Result<(), Error> {
        let command = ConnectCommand::udp(channel, address, port)?;
        self.execute(command, 0, self.config.timeouts.udp_ms)
    }

    /// Sends the payload. In server role the channel of the last inbound packet is used, otherwise
    /// the client channel.
    ///
    /// The transmission confirmation is scanned for diagnostic purposes only, a missing
    /// confirmation is not treated as error.
    pub fn send(&mut self, payload: &[u8]) -> Result<(), Error> {
        let channel = self.session.outbound_channel();
        self.send_data(channel, payload)
    }

    /// Sends the payload on the given channel
    pub(crate) fn send_data(&mut self, channel: usize, payload: &[u8]) -> Result<(), Error> {
        self.write_command(&TransmissionPrepareCommand::new(channel, payload.len()))?;
        self.write_line(payload)?;
        self.settle(self.config.timeouts.send_settle_ms)?;

        if !self.await_pattern(b"OK", self.config.timeouts.send_ms, self.config.debug_level)? {
            debug!("Transmission of {} bytes on channel {} not confirmed", payload.len(), channel);
        }

        Ok(())
    }
}
