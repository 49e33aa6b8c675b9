//! # Message framer and dispatcher
//!
//! [poll()](Adapter::poll) needs to be called regularly from the application's main loop. Each call
//! either drains the bytes currently available on the serial transport or, once the beacon
//! interval elapsed, considers sending a beacon. So a single poll cycle never does both.
//!
//! Inbound lines get classified and dispatched:
//! * `Link` flags the link as established, widens the beacon interval and notifies the [LinkNotifier].
//! * `+IPD,<channel>,<length>:<payload>` stores the reply channel and passes the payload to the [DataSink].
//! * Socket state and error messages are logged, everything else is ignored.
use crate::callbacks::{DataSink, LinkNotifier};
use crate::config::LINE_SIZE;
use crate::fmt::printable;
use crate::stack::Error;
use crate::urc::URCMessages;
use crate::wifi::Adapter;
use embedded_io::{Read, ReadReady, Write};
use fugit_timer::Timer;
use heapless::Vec;

/// Bounded buffer for the currently received line
pub(crate) struct LineBuffer {
    data: Vec<u8, LINE_SIZE>,

    /// True if bytes of the current line were dropped
    overrun: bool,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self {
            data: Vec::new(),
            overrun: false,
        }
    }

    /// Appends the byte. If the capacity is exhausted the byte is dropped and the line marked as overrun.
    pub fn push(&mut self, byte: u8) {
        if self.data.push(byte).is_err() {
            self.overrun = true;
        }
    }

    pub fn as_slice(&self) -> &[u8] {
        self.data.as_slice()
    }

    /// True if bytes of the current line got dropped
    pub fn is_overrun(&self) -> bool {
        self.overrun
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn clear(&mut self) {
        self.data.clear();
        self.overrun = false;
    }
}

impl<S, T, D, L, const TIMER_HZ: u32> Adapter<S, T, D, L, TIMER_HZ>
where
    S: Read + Write + ReadReady,
    T: Timer<TIMER_HZ>,
    D: DataSink,
    L: LinkNotifier,
{
    /// Processes inbound messages or sends a beacon if the interval elapsed. Never blocks waiting
    /// for more input.
    ///
    /// Lines exceeding the buffer capacity are dropped and reported as [Error::BufferOverrun] after
    /// all available bytes were processed.
    ///
    /// The beacon interval is measured with [Timer::now()], so the timer's clock needs to be
    /// free-running. Calling [Timer::start()] for command timeouts must not reset it.
    pub fn poll(&mut self) -> Result<(), Error> {
        let now = self.timer.now();
        let last = *self.last_beacon.get_or_insert(now);

        let elapsed_ms = now.checked_duration_since(last).map_or(0, |elapsed| elapsed.to_millis());
        if elapsed_ms < self.session.beacon_interval_ms {
            return self.process_incoming();
        }

        self.last_beacon = Some(now);
        if !self.session.beacon_enabled {
            return Ok(());
        }

        self.send_beacon()
    }

    /// Drains all currently available bytes and dispatches completed lines
    fn process_incoming(&mut self) -> Result<(), Error> {
        let mut overrun = false;

        while let Some(byte) = self.read_byte()? {
            match byte {
                b'\n' => {
                    if self.line.is_overrun() {
                        warn!("Dropped line exceeding {} bytes", LINE_SIZE);
                        overrun = true;
                    } else {
                        self.dispatch_line();
                    }
                    self.line.clear();
                }
                b'\r' => {}
                _ => self.line.push(byte),
            }
        }

        if overrun {
            return Err(Error::BufferOverrun);
        }

        Ok(())
    }

    /// Handles the completed line
    fn dispatch_line(&mut self) {
        match URCMessages::parse(self.line.as_slice()) {
            URCMessages::Link => {
                debug!("Link established");
                self.session.mark_linked(self.config.linked_beacon_interval_ms);
                self.notifier.on_link();
            }
            URCMessages::Data {
                channel,
                length,
                payload,
            } => {
                trace!("Received {} bytes on channel {}", length, channel);
                self.session.reply_channel = channel;

                if let Some(range) = payload {
                    self.sink.on_data(&self.line.as_slice()[range]);
                }
            }
            URCMessages::Unlink => trace!("Link closed"),
            URCMessages::SocketConnected(channel) => trace!("Channel {} connected", channel),
            URCMessages::SocketClosed(channel) => trace!("Channel {} closed", channel),
            URCMessages::Error => trace!("Received error message"),
            URCMessages::Unknown => {
                if !self.line.is_empty() {
                    trace!("Ignored message {}", printable(self.line.as_slice()));
                }
            }
        }
    }
}
