//! # Driver configuration
//!
//! All values are fixed once the [Adapter](crate::wifi::Adapter) got constructed. Confirmation timeouts
//! and settle delays default to the values proven against ESP8266 firmware 0.9.x.
//!
//! ````
//! use esp8266_link::config::{Config, WifiMode};
//!
//! let config = Config::default()
//!     .mode(WifiMode::Station)
//!     .baud_rate(115_200)
//!     .debug_level(1)
//!     .join_timeout_ms(20_000);
//!
//! assert_eq!(20_000, config.timeouts.join_ms);
//! assert_eq!(1, config.mode.as_number());
//! ````

/// Logical channel used by the listening server
pub const SERVER_CHANNEL: usize = 1;

/// Logical channel used for the discovery beacon UDP session
pub const BEACON_CHANNEL: usize = 2;

/// Logical channel used by an outbound client session
pub const CLIENT_CHANNEL: usize = 3;

/// Default UDP port the discovery beacon is broadcasted to
pub const BEACON_PORT: u16 = 34807;

/// Capacity of the inbound line buffer in bytes
pub const LINE_SIZE: usize = 255;

/// Capacity of the diagnostic capture buffer of the pattern scanner
pub const CAPTURE_SIZE: usize = 255;

/// Max. length of a dotted IPv4 address
pub const ADDRESS_SIZE: usize = 15;

/// Max. length of the device label included in beacon payloads
pub const LABEL_SIZE: usize = 48;

/// Capacity of the beacon payload scratch buffer
pub const BEACON_SIZE: usize = 255;

/// Max. SSID length accepted by ESP-AT
pub const MAX_SSID_LENGTH: usize = 32;

/// Max. passphrase length accepted by ESP-AT
pub const MAX_PASSWORD_LENGTH: usize = 63;

/// Connectivity role of the modem radio
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum WifiMode {
    /// Joins an existing access point
    #[default]
    Station,
    /// Acts as access point
    SoftAp,
    /// Station + access point
    Both,
}

impl WifiMode {
    /// Numeric value used by the CWMODE command
    pub fn as_number(&self) -> u32 {
        match self {
            WifiMode::Station => 1,
            WifiMode::SoftAp => 2,
            WifiMode::Both => 3,
        }
    }
}

/// Confirmation timeouts and settle delays in milliseconds
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Timeouts {
    /// Waiting for OK after `AT`
    pub presence_ms: u32,

    /// Delay between `AT` and scanning for the confirmation
    pub presence_settle_ms: u32,

    /// Waiting for `ready` after `AT+RST`
    pub reset_ms: u32,

    /// Delay between `AT+RST` and scanning for the confirmation
    pub reset_settle_ms: u32,

    /// Delay before the WIFI mode gets set after reset
    pub mode_settle_ms: u32,

    /// Waiting for OK after `AT+CWJAP`
    pub join_ms: u32,

    /// Delay between `AT+CWJAP` and scanning for the confirmation
    pub join_settle_ms: u32,

    /// Waiting for OK after `AT+CIPMUX`
    pub link_mode_ms: u32,

    /// Delay between `AT+CIPMUX` and scanning for the confirmation
    pub link_mode_settle_ms: u32,

    /// Read window of address discovery after `AT+CIFSR`
    pub address_settle_ms: u32,

    /// Waiting for OK after `AT+CIPSERVER` and `AT+CIPSTO`
    pub server_ms: u32,

    /// Delay between opening a client session and scanning for the confirmation
    pub client_settle_ms: u32,

    /// Waiting for OK after opening a UDP session
    pub udp_ms: u32,

    /// Waiting for OK after data transmission. Missing confirmations are only logged.
    pub send_ms: u32,

    /// Delay between writing the payload and scanning for the confirmation
    pub send_settle_ms: u32,

    /// Read window of the access point scan
    pub scan_ms: u32,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            presence_ms: 1_000,
            presence_settle_ms: 500,
            reset_ms: 5_000,
            reset_settle_ms: 500,
            mode_settle_ms: 500,
            join_ms: 30_000,
            join_settle_ms: 100,
            link_mode_ms: 1_000,
            link_mode_settle_ms: 500,
            address_settle_ms: 500,
            server_ms: 500,
            client_settle_ms: 100,
            udp_ms: 500,
            send_ms: 500,
            send_settle_ms: 50,
            scan_ms: 10_000,
        }
    }
}

/// Driver configuration
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Radio role set during bring-up
    pub mode: WifiMode,

    /// Baud rate the serial transport is expected to run at.
    /// The transport is configured by the application, this value is informational.
    pub baud_rate: u32,

    /// Diagnostic verbosity. 0: off, 1: failed scans, 2: all scans
    pub debug_level: u8,

    /// Confirmation timeouts and settle delays
    pub timeouts: Timeouts,

    /// Beacon interval until a link got established
    pub beacon_interval_ms: u32,

    /// Beacon interval once a link got established
    pub linked_beacon_interval_ms: u32,

    /// UDP port the beacon is broadcasted to
    pub beacon_port: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mode: WifiMode::Station,
            baud_rate: 9_600,
            debug_level: 0,
            timeouts: Timeouts::default(),
            beacon_interval_ms: 10_000,
            linked_beacon_interval_ms: 30_000,
            beacon_port: BEACON_PORT,
        }
    }
}

impl Config {
    pub fn mode(mut self, mode: WifiMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn baud_rate(mut self, baud_rate: u32) -> Self {
        self.baud_rate = baud_rate;
        self
    }

    pub fn debug_level(mut self, level: u8) -> Self {
        self.debug_level = level;
        self
    }

    pub fn timeouts(mut self, timeouts: Timeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    /// Sets the timeout for joining an access point
    pub fn join_timeout_ms(mut self, timeout: u32) -> Self {
        self.timeouts.join_ms = timeout;
        self
    }

    /// Sets the timeout for confirming data transmission
    pub fn send_timeout_ms(mut self, timeout: u32) -> Self {
        self.timeouts.send_ms = timeout;
        self
    }

    /// Sets both beacon intervals. The linked interval is raised to `interval` if lower.
    pub fn beacon_intervals_ms(mut self, interval: u32, linked: u32) -> Self {
        self.beacon_interval_ms = interval;
        self.linked_beacon_interval_ms = linked.max(interval);
        self
    }

    pub fn beacon_port(mut self, port: u16) -> Self {
        self.beacon_port = port;
        self
    }
}
