//! # WIFI access point client
//!
//! Modem bring-up, joining a network and obtaining the local address are supported.
//!
//! ## Example
//!
//! ````
//! # use esp8266_link::callbacks::Discard;
//! # use esp8266_link::config::Config;
//! # use esp8266_link::example::{ExampleSerial, ExampleTimer};
//! # use esp8266_link::wifi::{Adapter, WifiAdapter};
//! #
//! let mut adapter: Adapter<_, _, _, _, 1_000> =
//!     Adapter::new(ExampleSerial::default(), ExampleTimer::default(), Config::default(), Discard, Discard);
//!
//! // Checks the presence of the modem and restarts it
//! adapter.initialize_wifi().unwrap();
//!
//! // Joining the WIFI access point
//! let state = adapter.connect_wifi("test_wifi", "secret").unwrap();
//! assert!(state.ip_assigned);
//!
//! assert_eq!(Some("10.0.0.181"), adapter.ip());
//! assert_eq!(Some("10.0.0.255"), adapter.broadcast());
//! ````
use crate::callbacks::{DataSink, LinkNotifier};
use crate::commands::{
    AccessPointConnectCommand, AttentionCommand, ListAccessPointsCommand, ObtainLocalAddressCommand,
    RestartCommand, SetMultipleConnectionsCommand, WifiModeCommand,
};
use crate::config::{Config, ADDRESS_SIZE, MAX_PASSWORD_LENGTH, MAX_SSID_LENGTH};
use crate::fmt::printable;
use crate::framer::LineBuffer;
use crate::scanner::Fault;
use crate::session::{Role, Session};
use core::fmt::Debug;
use core::net::Ipv4Addr;
use core::str::FromStr;
use embedded_io::{ErrorKind, Read, ReadReady, Write};
use fugit::TimerInstantU32;
use fugit_timer::Timer;
use heapless::{String, Vec};

/// Wifi network adapter trait
pub trait WifiAdapter {
    /// Error during modem bring-up
    type InitError: Debug;

    /// Error when joining a WIFI network
    type JoinError: Debug;

    /// Checks the presence of the modem, restarts it and sets the WIFI mode
    fn initialize_wifi(&mut self) -> Result<(), Self::InitError>;

    /// Joins the given access point and obtains the local address
    fn connect_wifi(&mut self, ssid: &str, password: &str) -> Result<JoinState, Self::JoinError>;

    /// Returns the local IPv4 address if assigned
    fn ip(&self) -> Option<&str>;
}

/// Central client for network communication
///
/// TIMER_HZ: Frequency of the timer used for timeout measurement and beacon scheduling
///
/// The timer is shared by both concerns. [Timer::now()] must therefore keep counting independently
/// of [Timer::start()] and [Timer::cancel()], as the beacon interval spans many command timeouts.
pub struct Adapter<S, T, D, L, const TIMER_HZ: u32>
where
    S: Read + Write + ReadReady,
    T: Timer<TIMER_HZ>,
    D: DataSink,
    L: LinkNotifier,
{
    /// Serial transport connected to the modem
    pub(crate) serial: S,

    /// Timer used for timeout measurement
    pub(crate) timer: T,

    pub(crate) config: Config,

    /// Receives inbound payloads and diagnostics
    pub(crate) sink: D,

    /// Gets notified on link establishment
    pub(crate) notifier: L,

    /// Network state
    pub(crate) session: Session,

    /// Accumulates the currently received line
    pub(crate) line: LineBuffer,

    /// Time of the last beacon, None until the first poll cycle
    pub(crate) last_beacon: Option<TimerInstantU32<TIMER_HZ>>,
}

/// Possible errors during modem bring-up
#[derive(Clone, Debug, PartialEq)]
pub enum InitError {
    /// Modem did not respond to `AT`
    ModemNotPresent,

    /// Modem did not signal readiness after reset
    ResetFailed,

    /// Serial transport error
    Transport(ErrorKind),

    /// Upstream timer error
    TimerError,
}

/// Possible errors when joining an access point
#[derive(Clone, Debug, PartialEq)]
pub enum JoinError {
    /// Given SSID is longer then the max. size of 32 chars
    InvalidSSIDLength,

    /// Given password is longer then the max. size of 63 chars
    InvalidPasswordLength,

    /// Joining was not confirmed in time
    AssociationFailed,

    /// Enabling multiple connections was not confirmed in time
    LinkModeFailed,

    /// Serial transport error
    Transport(ErrorKind),

    /// Upstream timer error
    TimerError,
}

/// Errors when obtaining the local address
#[derive(Clone, Debug, PartialEq)]
pub enum AddressError {
    /// No line containing a dotted IPv4 address was received
    NotFound,

    /// Serial transport error
    Transport(ErrorKind),

    /// Upstream timer error
    TimerError,
}

impl From<Fault> for InitError {
    fn from(fault: Fault) -> Self {
        match fault {
            Fault::Transport(kind) => InitError::Transport(kind),
            Fault::Timer => InitError::TimerError,
        }
    }
}

impl From<Fault> for JoinError {
    fn from(fault: Fault) -> Self {
        match fault {
            Fault::Transport(kind) => JoinError::Transport(kind),
            Fault::Timer => JoinError::TimerError,
        }
    }
}

impl From<Fault> for AddressError {
    fn from(fault: Fault) -> Self {
        match fault {
            Fault::Transport(kind) => AddressError::Transport(kind),
            Fault::Timer => AddressError::TimerError,
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for InitError {
    fn format(&self, f: defmt::Formatter) {
        match self {
            InitError::ModemNotPresent => defmt::write!(f, "InitError::ModemNotPresent"),
            InitError::ResetFailed => defmt::write!(f, "InitError::ResetFailed"),
            InitError::Transport(e) => defmt::write!(f, "InitError::Transport({})", defmt::Debug2Format(e)),
            InitError::TimerError => defmt::write!(f, "InitError::TimerError"),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for JoinError {
    fn format(&self, f: defmt::Formatter) {
        match self {
            JoinError::InvalidSSIDLength => defmt::write!(f, "JoinError::InvalidSSIDLength"),
            JoinError::InvalidPasswordLength => defmt::write!(f, "JoinError::InvalidPasswordLength"),
            JoinError::AssociationFailed => defmt::write!(f, "JoinError::AssociationFailed"),
            JoinError::LinkModeFailed => defmt::write!(f, "JoinError::LinkModeFailed"),
            JoinError::Transport(e) => defmt::write!(f, "JoinError::Transport({})", defmt::Debug2Format(e)),
            JoinError::TimerError => defmt::write!(f, "JoinError::TimerError"),
        }
    }
}

/// Current WIFI connection state
#[derive(Copy, Clone, Debug)]
pub struct JoinState {
    /// True if a local address was obtained
    pub ip_assigned: bool,
}

impl<S, T, D, L, const TIMER_HZ: u32> WifiAdapter for Adapter<S, T, D, L, TIMER_HZ>
where
    S: Read + Write + ReadReady,
    T: Timer<TIMER_HZ>,
    D: DataSink,
    L: LinkNotifier,
{
    type InitError = InitError;
    type JoinError = JoinError;

    /// Checks the presence of the modem, restarts it and sets the WIFI mode.
    ///
    /// Setting the WIFI mode is not confirmed, any response gets discarded.
    fn initialize_wifi(&mut self) -> Result<(), InitError> {
        let timeouts = self.config.timeouts;
        self.clear_results()?;

        self.execute(AttentionCommand, timeouts.presence_settle_ms, timeouts.presence_ms)?;
        self.execute(RestartCommand, timeouts.reset_settle_ms, timeouts.reset_ms)?;
        self.settle(timeouts.mode_settle_ms)?;

        self.write_command(&WifiModeCommand::new(self.config.mode))?;
        self.clear_results()?;

        info!("Modem ready, WIFI mode {}", self.config.mode.as_number());
        Ok(())
    }

    /// Joins the given access point. Afterwards multiple connections get enabled and the local
    /// address is obtained.
    ///
    /// Obtaining the address is best-effort: in case of failure `ip_assigned` of the returned
    /// state is false and neither [ip()](Adapter::ip) nor the broadcast address are updated.
    fn connect_wifi(&mut self, ssid: &str, password: &str) -> Result<JoinState, JoinError> {
        if ssid.len() > MAX_SSID_LENGTH {
            return Err(JoinError::InvalidSSIDLength);
        }

        if password.len() > MAX_PASSWORD_LENGTH {
            return Err(JoinError::InvalidPasswordLength);
        }

        let timeouts = self.config.timeouts;
        self.execute(
            AccessPointConnectCommand::new(ssid, password)?,
            timeouts.join_settle_ms,
            timeouts.join_ms,
        )?;
        self.execute(
            SetMultipleConnectionsCommand::multiple(),
            timeouts.link_mode_settle_ms,
            timeouts.link_mode_ms,
        )?;

        let ip_assigned = match self.discover_address() {
            Ok(()) => true,
            Err(AddressError::NotFound) => false,
            Err(AddressError::Transport(kind)) => return Err(JoinError::Transport(kind)),
            Err(AddressError::TimerError) => return Err(JoinError::TimerError),
        };

        if ip_assigned {
            self.update_broadcast();
        }

        Ok(JoinState { ip_assigned })
    }

    fn ip(&self) -> Option<&str> {
        Adapter::ip(self)
    }
}

impl<S, T, D, L, const TIMER_HZ: u32> Adapter<S, T, D, L, TIMER_HZ>
where
    S: Read + Write + ReadReady,
    T: Timer<TIMER_HZ>,
    D: DataSink,
    L: LinkNotifier,
{
    /// Creates a new adapter. No command is sent until [initialize_wifi()](WifiAdapter::initialize_wifi)
    /// gets called.
    pub fn new(serial: S, timer: T, config: Config, sink: D, notifier: L) -> Self {
        Self {
            serial,
            timer,
            session: Session::new(&config),
            config,
            sink,
            notifier,
            line: LineBuffer::new(),
            last_beacon: None,
        }
    }

    /// Queries the local address and stores the first line containing exactly three dots.
    /// All input available after the read window is consumed.
    pub fn discover_address(&mut self) -> Result<(), AddressError> {
        self.write_command(&ObtainLocalAddressCommand)?;
        self.settle(self.config.timeouts.address_settle_ms)?;

        let mut line: Vec<u8, 64> = Vec::new();
        let mut overflow = false;
        let mut found = None;

        while let Some(byte) = self.read_byte()? {
            match byte {
                b'\n' => {
                    if found.is_none() && !overflow {
                        found = parse_address_line(&line);

                        if found.is_none() {
                            debug!("Discarded address line {}", printable(&line));
                        }
                    }

                    line.clear();
                    overflow = false;
                }
                b'\r' => {}
                _ => overflow |= line.push(byte).is_err(),
            }
        }

        match found {
            Some(address) => {
                info!("Local address {}", address.as_str());
                self.session.address = address;
                Ok(())
            }
            None => {
                warn!("No local address received");
                Err(AddressError::NotFound)
            }
        }
    }

    /// Lists visible access points by copying the raw response to `out` until the configured read
    /// window expired. Returns the number of bytes copied, further bytes are discarded.
    pub fn scan_networks(&mut self, out: &mut [u8]) -> Result<usize, Fault> {
        debug!("Scanning access points, max. {} bytes", out.len());
        self.write_command(&ListAccessPointsCommand)?;
        self.start_timer(self.config.timeouts.scan_ms)?;

        let mut count = 0;
        loop {
            if let Some(byte) = self.read_byte()? {
                if count < out.len() {
                    out[count] = byte;
                    count += 1;
                }
            }

            match self.timer.wait() {
                Ok(_) => return Ok(count),
                Err(nb::Error::WouldBlock) => {}
                Err(nb::Error::Other(_)) => return Err(Fault::Timer),
            }
        }
    }

    /// Returns the local IPv4 address if assigned
    pub fn ip(&self) -> Option<&str> {
        non_empty(&self.session.address)
    }

    /// Returns the local IPv4 address if assigned and valid
    pub fn ipv4(&self) -> Option<Ipv4Addr> {
        Ipv4Addr::from_str(self.session.address.as_str()).ok()
    }

    /// Returns the broadcast address used by the beacon
    pub fn broadcast(&self) -> Option<&str> {
        non_empty(&self.session.broadcast)
    }

    /// Current operating role
    pub fn role(&self) -> Role {
        self.session.role
    }

    /// True once a `Link` message was received
    pub fn is_linked(&self) -> bool {
        self.session.linked
    }

    /// Channel of the last inbound data packet
    pub fn reply_channel(&self) -> usize {
        self.session.reply_channel
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn data_sink(&self) -> &D {
        &self.sink
    }

    pub fn link_notifier(&self) -> &L {
        &self.notifier
    }

    /// Releases the serial transport and the timer, e.g. for constructing a fresh adapter
    pub fn release(self) -> (S, T) {
        (self.serial, self.timer)
    }

    /// Derives the broadcast address from the local address
    fn update_broadcast(&mut self) {
        if let Some(broadcast) = broadcast_address(self.session.address.as_str()) {
            self.session.broadcast = broadcast;
        }
    }
}

fn non_empty(value: &str) -> Option<&str> {
    if value.is_empty() {
        return None;
    }

    Some(value)
}

/// Replaces the last octet of the given dotted address by 255.
/// Returns None if the address contains less then three dots.
pub fn broadcast_address(address: &str) -> Option<String<ADDRESS_SIZE>> {
    let third_dot = address.match_indices('.').nth(2)?.0;

    let mut broadcast = String::new();
    broadcast.push_str(&address[..=third_dot]).ok()?;
    broadcast.push_str("255").ok()?;
    Some(broadcast)
}

/// Extracts a dotted IPv4 address from a CIFSR response line.
///
/// Both bare addresses (`10.0.0.181`) and quoted responses (`+CIFSR:STAIP,"10.0.0.181"`) are
/// accepted. The address needs to contain exactly three dots.
pub(crate) fn parse_address_line(line: &[u8]) -> Option<String<ADDRESS_SIZE>> {
    let candidate = quoted(line).unwrap_or(line);

    if candidate.iter().filter(|byte| **byte == b'.').count() != 3 {
        return None;
    }

    let text = core::str::from_utf8(candidate).ok()?;
    String::try_from(text).ok()
}

/// Returns the content between the first pair of double quotes
fn quoted(line: &[u8]) -> Option<&[u8]> {
    let start = line.iter().position(|byte| *byte == b'"')? + 1;
    let length = line[start..].iter().position(|byte| *byte == b'"')?;
    Some(&line[start..start + length])
}
