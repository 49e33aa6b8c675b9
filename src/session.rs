//! # Connection state
//!
//! Tracks the operating role, link status and reply routing. The role is assigned exactly once:
//! `Idle -> Server` or `Idle -> Client`. Returning to `Idle` requires a new [Adapter](crate::wifi::Adapter).
use crate::config::{Config, ADDRESS_SIZE, CLIENT_CHANNEL, LABEL_SIZE};
use crate::stack::Error;
use heapless::String;

/// Operating role of the adapter
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum Role {
    /// No server or client session was started yet
    #[default]
    Idle,
    /// Listening for inbound TCP sessions
    Server,
    /// Connected to a remote TCP server
    Client,
}

/// Internal driver state, updated by command sequences and inbound messages
#[derive(Clone, Debug)]
pub(crate) struct Session {
    /// Current operating role
    pub(crate) role: Role,

    /// Local IPv4 address as reported by the modem
    pub(crate) address: String<ADDRESS_SIZE>,

    /// Broadcast address derived from the local address
    pub(crate) broadcast: String<ADDRESS_SIZE>,

    /// Port of the started server, included in beacon payloads
    pub(crate) listen_port: u16,

    /// Device label included in beacon payloads
    pub(crate) label: String<LABEL_SIZE>,

    /// True once a `Link` message was received
    pub(crate) linked: bool,

    /// True if periodic beacon broadcasts are enabled
    pub(crate) beacon_enabled: bool,

    /// Current beacon interval
    pub(crate) beacon_interval_ms: u32,

    /// Channel of the last inbound data packet, used for replies in server role
    pub(crate) reply_channel: usize,
}

impl Session {
    pub(crate) fn new(config: &Config) -> Self {
        Self {
            role: Role::Idle,
            address: String::new(),
            broadcast: String::new(),
            listen_port: 8000,
            label: String::new(),
            linked: false,
            beacon_enabled: false,
            beacon_interval_ms: config.beacon_interval_ms,
            reply_channel: 0,
        }
    }

    /// Fails if a role was already assigned
    pub(crate) fn assert_idle(&self) -> Result<(), Error> {
        if self.role != Role::Idle {
            return Err(Error::RoleAlreadyAssigned);
        }

        Ok(())
    }

    /// Assigns the role, which is only possible once
    pub(crate) fn assign_role(&mut self, role: Role) -> Result<(), Error> {
        self.assert_idle()?;
        self.role = role;
        Ok(())
    }

    /// Flags the link as established and widens the beacon interval. The interval never decreases.
    pub(crate) fn mark_linked(&mut self, linked_interval_ms: u32) {
        self.linked = true;
        self.beacon_interval_ms = self.beacon_interval_ms.max(linked_interval_ms);
    }

    /// Channel used for outbound data
    pub(crate) fn outbound_channel(&self) -> usize {
        match self.role {
            Role::Server => self.reply_channel,
            Role::Client | Role::Idle => CLIENT_CHANNEL,
        }
    }
}
