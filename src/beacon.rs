//! # Discovery beacon
//!
//! In server role the adapter may broadcast a UDP datagram advertising its address, listen port
//! and a device label:
//!
//! ````text
//! {"event": "beacon", "ip": "10.0.0.181", "port": 8000, "device": "sensor"}
//! ````
//!
//! The beacon is sent from within [poll()](crate::wifi::Adapter::poll) whenever the beacon
//! interval elapsed. Once a link got established the interval gets widened to reduce the
//! contention on the serial transport.
use crate::callbacks::{DataSink, LinkNotifier};
use crate::config::{BEACON_CHANNEL, BEACON_SIZE};
use crate::session::Role;
use crate::stack::Error;
use crate::wifi::Adapter;
use core::fmt::Write as _;
use embedded_io::{Read, ReadReady, Write};
use fugit_timer::Timer;
use heapless::String;

/// Renders the beacon payload including the line termination
pub fn beacon_payload(address: &str, port: u16, label: &str) -> Result<String<BEACON_SIZE>, Error> {
    let mut payload = String::new();
    write!(
        payload,
        "{{\"event\": \"beacon\", \"ip\": \"{}\", \"port\": {}, \"device\": \"{}\"}}\r\n",
        address, port, label
    )
    .map_err(|_| Error::PayloadTooLong)?;

    Ok(payload)
}

impl<S, T, D, L, const TIMER_HZ: u32> Adapter<S, T, D, L, TIMER_HZ>
where
    S: Read + Write + ReadReady,
    T: Timer<TIMER_HZ>,
    D: DataSink,
    L: LinkNotifier,
{
    /// Opens the beacon UDP session to the broadcast address and enables periodic beacons.
    ///
    /// Requires server role and a known broadcast address, otherwise the state remains unchanged.
    /// The same applies if the UDP session was not confirmed, so an already enabled beacon keeps
    /// running with its previous label.
    pub fn enable_beacon(&mut self, label: &str) -> Result<(), Error> {
        if self.session.role != Role::Server {
            return Err(Error::NotServer);
        }

        if self.session.broadcast.is_empty() {
            return Err(Error::AddressUnavailable);
        }

        let label = String::try_from(label).map_err(|_| Error::LabelTooLong)?;

        // Session state is left untouched if the UDP session could not be opened
        let broadcast = self.session.broadcast.clone();
        self.start_udp_channel(BEACON_CHANNEL, broadcast.as_str(), self.config.beacon_port)?;

        self.session.label = label;
        self.session.beacon_enabled = true;
        info!("Beacon enabled, broadcasting to {}", broadcast.as_str());
        Ok(())
    }

    /// Stops periodic beacons. The UDP session stays open.
    pub fn disable_beacon(&mut self) {
        self.session.beacon_enabled = false;
    }

    /// True if periodic beacons are enabled
    pub fn is_beacon_enabled(&self) -> bool {
        self.session.beacon_enabled
    }

    /// Current beacon interval, widened once a link got established
    pub fn beacon_interval_ms(&self) -> u32 {
        self.session.beacon_interval_ms
    }

    /// Port of the started server
    pub fn listen_port(&self) -> u16 {
        self.session.listen_port
    }

    /// Sends a single beacon on the beacon channel
    pub(crate) fn send_beacon(&mut self) -> Result<(), Error> {
        let payload = beacon_payload(
            self.session.address.as_str(),
            self.session.listen_port,
            self.session.label.as_str(),
        )?;

        trace!("Sending beacon");
        self.send_data(BEACON_CHANNEL, payload.as_bytes())
    }
}
