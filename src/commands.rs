use crate::config::WifiMode;
use crate::scanner::Fault;
use crate::stack::Error as StackError;
use crate::wifi::{InitError, JoinError};
use atat::atat_derive::{AtatCmd, AtatResp};
use atat::heapless::String;

/// Capacity of the scratch buffer commands get encoded into
pub(crate) const COMMAND_SIZE: usize = 256;

/// Max. length of a remote host name or address
pub(crate) const HOST_SIZE: usize = 64;

/// Trait for mapping command errors
pub(crate) trait CommandErrorHandler {
    type Error: From<Fault>;

    /// Token confirming the command
    const CONFIRMATION: &'static [u8] = b"OK";

    /// Maps a confirmation token which was not received in time
    fn unconfirmed(&self) -> Self::Error;
}

/// Commands are confirmed by scanning for tokens, responses are never parsed
#[derive(Clone, AtatResp)]
pub(crate) struct NoResponse;

/// Checks the presence of the modem
#[derive(Clone, AtatCmd)]
#[at_cmd("", NoResponse)]
pub(crate) struct AttentionCommand;

impl CommandErrorHandler for AttentionCommand {
    type Error = InitError;

    fn unconfirmed(&self) -> Self::Error {
        InitError::ModemNotPresent
    }
}

/// Restarts the modem, confirmed by `ready` once the firmware booted
#[derive(Clone, AtatCmd)]
#[at_cmd("+RST", NoResponse)]
pub(crate) struct RestartCommand;

impl CommandErrorHandler for RestartCommand {
    type Error = InitError;
    const CONFIRMATION: &'static [u8] = b"ready";

    fn unconfirmed(&self) -> Self::Error {
        InitError::ResetFailed
    }
}

/// Sets the WIFI mode
#[derive(Clone, AtatCmd)]
#[at_cmd("+CWMODE", NoResponse)]
pub(crate) struct WifiModeCommand {
    /// WIFI mode:
    ///     1: Station mode.
    ///     2: SoftAP mode.
    ///     3: SoftAP+Station mode.
    #[at_arg(position = 0)]
    mode: u32,
}

impl WifiModeCommand {
    pub fn new(mode: WifiMode) -> Self {
        Self {
            mode: mode.as_number(),
        }
    }
}

/// Command for joining the target WIFI access point
#[derive(Clone, AtatCmd)]
#[at_cmd("+CWJAP", NoResponse)]
pub(crate) struct AccessPointConnectCommand {
    /// The SSID of the target access point
    #[at_arg(position = 0)]
    ssid: String<32>,

    /// The password/key of the target access point
    #[at_arg(position = 1)]
    password: String<64>,
}

impl AccessPointConnectCommand {
    pub fn new(ssid: &str, password: &str) -> Result<Self, JoinError> {
        Ok(Self {
            ssid: String::try_from(ssid).map_err(|_| JoinError::InvalidSSIDLength)?,
            password: String::try_from(password).map_err(|_| JoinError::InvalidPasswordLength)?,
        })
    }
}

impl CommandErrorHandler for AccessPointConnectCommand {
    type Error = JoinError;

    fn unconfirmed(&self) -> Self::Error {
        JoinError::AssociationFailed
    }
}

/// Lists the visible access points
#[derive(Clone, AtatCmd)]
#[at_cmd("+CWLAP", NoResponse)]
pub(crate) struct ListAccessPointsCommand;

/// Enables/Disables multiple connections
#[derive(Clone, AtatCmd)]
#[at_cmd("+CIPMUX", NoResponse)]
pub(crate) struct SetMultipleConnectionsCommand {
    /// 0: single connection, 1: multiple connections
    mode: usize,
}

impl SetMultipleConnectionsCommand {
    /// Enables multiple connections
    pub fn multiple() -> Self {
        Self { mode: 1 }
    }
}

impl CommandErrorHandler for SetMultipleConnectionsCommand {
    type Error = JoinError;

    fn unconfirmed(&self) -> Self::Error {
        JoinError::LinkModeFailed
    }
}

/// Queries the local addresses
#[derive(Clone, AtatCmd)]
#[at_cmd("+CIFSR", NoResponse)]
pub(crate) struct ObtainLocalAddressCommand;

/// Starts listening for inbound TCP sessions
#[derive(Clone, AtatCmd)]
#[at_cmd("+CIPSERVER", NoResponse)]
pub(crate) struct ServerCommand {
    #[at_arg(position = 0)]
    channel: usize,

    #[at_arg(position = 1)]
    port: u16,
}

impl ServerCommand {
    pub fn new(channel: usize, port: u16) -> Self {
        Self { channel, port }
    }
}

impl CommandErrorHandler for ServerCommand {
    type Error = StackError;

    fn unconfirmed(&self) -> Self::Error {
        StackError::ServerStartFailed
    }
}

/// Sets the idle timeout of server sessions
#[derive(Clone, AtatCmd)]
#[at_cmd("+CIPSTO", NoResponse)]
pub(crate) struct ServerTimeoutCommand {
    /// Timeout in seconds
    seconds: u32,
}

impl ServerTimeoutCommand {
    pub fn new(seconds: u32) -> Self {
        Self { seconds }
    }
}

impl CommandErrorHandler for ServerTimeoutCommand {
    type Error = StackError;

    fn unconfirmed(&self) -> Self::Error {
        StackError::ServerTimeoutFailed
    }
}

/// Establishes a TCP connection or a UDP transmission
#[derive(Clone, AtatCmd)]
#[at_cmd("+CIPSTART", NoResponse)]
pub(crate) struct ConnectCommand {
    /// Logical channel
    #[at_arg(position = 0)]
    channel: usize,

    /// Connection type, TCP or UDP
    #[at_arg(position = 1)]
    connection_type: String<3>,

    /// Remote host name or IPv4 address
    #[at_arg(position = 2)]
    remote_host: String<HOST_SIZE>,

    /// Remote port
    #[at_arg(position = 3)]
    port: u16,
}

impl ConnectCommand {
    /// Opens a TCP session, fails if the host exceeds 64 chars
    pub fn tcp(channel: usize, remote_host: &str, port: u16) -> Result<Self, StackError> {
        Self::new(channel, "TCP", remote_host, port)
    }

    /// Opens a UDP session, fails if the host exceeds 64 chars
    pub fn udp(channel: usize, remote_host: &str, port: u16) -> Result<Self, StackError> {
        Self::new(channel, "UDP", remote_host, port)
    }

    fn new(channel: usize, connection_type: &str, remote_host: &str, port: u16) -> Result<Self, StackError> {
        Ok(Self {
            channel,
            connection_type: String::try_from(connection_type).map_err(|_| StackError::HostTooLong)?,
            remote_host: String::try_from(remote_host).map_err(|_| StackError::HostTooLong)?,
            port,
        })
    }

    fn is_udp(&self) -> bool {
        self.connection_type.as_str() == "UDP"
    }
}

impl CommandErrorHandler for ConnectCommand {
    type Error = StackError;

    fn unconfirmed(&self) -> Self::Error {
        if self.is_udp() {
            return StackError::UdpChannelFailed;
        }

        StackError::ClientConnectFailed
    }
}

/// Announces the length of the following payload for the given channel
#[derive(Clone, AtatCmd)]
#[at_cmd("+CIPSEND", NoResponse)]
pub(crate) struct TransmissionPrepareCommand {
    #[at_arg(position = 0)]
    channel: usize,

    #[at_arg(position = 1)]
    length: usize,
}

impl TransmissionPrepareCommand {
    pub fn new(channel: usize, length: usize) -> Self {
        Self { channel, length }
    }
}
