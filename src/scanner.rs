//! # Transport scanner
//!
//! Blocking, timeout-bounded helpers for synchronous command exchanges. All bytes consumed while
//! scanning are discarded, so the scanner must never run while inbound messages are expected to
//! be processed by [poll()](crate::wifi::Adapter::poll).
use crate::callbacks::{DataSink, LinkNotifier};
use crate::commands::{CommandErrorHandler, COMMAND_SIZE};
use crate::config::CAPTURE_SIZE;
use crate::wifi::Adapter;
use atat::AtatCmd;
use embedded_io::{ErrorKind, Read, ReadReady, Write};
use fugit::TimerDurationU32;
use fugit_timer::Timer;
use heapless::Vec;

/// Low level failure of the serial transport or the timer
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Fault {
    /// Reading from or writing to the serial transport failed
    Transport(ErrorKind),

    /// Upstream timer error
    Timer,
}

impl Fault {
    pub(crate) fn transport<E: embedded_io::Error>(error: E) -> Self {
        Self::Transport(error.kind())
    }
}

impl<S, T, D, L, const TIMER_HZ: u32> Adapter<S, T, D, L, TIMER_HZ>
where
    S: Read + Write + ReadReady,
    T: Timer<TIMER_HZ>,
    D: DataSink,
    L: LinkNotifier,
{
    /// Blocks until the given target sequence was received or the timeout (in ms) expired.
    /// Returns true if the target was found.
    ///
    /// The partial match index is reset on any mismatching byte without falling back to a shorter
    /// prefix. So targets with repeated leading characters may be missed, e.g. `OOK` is not found
    /// in `OOOK`.
    ///
    /// If `verbosity` > 0 all read bytes are captured and emitted as diagnostics on failure,
    /// or also on success if `verbosity` > 1.
    pub fn await_pattern(&mut self, target: &[u8], timeout_ms: u32, verbosity: u8) -> Result<bool, Fault> {
        if target.is_empty() {
            return Ok(true);
        }

        let mut capture: Vec<u8, CAPTURE_SIZE> = Vec::new();
        let mut index = 0;

        self.start_timer(timeout_ms)?;

        loop {
            if let Some(byte) = self.read_byte()? {
                if verbosity > 0 {
                    if capture.is_full() {
                        self.diagnostic(&capture);
                        capture.clear();
                    }
                    let _ = capture.push(byte);
                }

                if byte != target[index] {
                    index = 0;
                }

                if byte == target[index] {
                    index += 1;

                    if index >= target.len() {
                        if verbosity > 1 {
                            self.diagnostic(&capture);
                        }
                        return Ok(true);
                    }
                }
            }

            match self.timer.wait() {
                Ok(_) => break,
                Err(nb::Error::WouldBlock) => {}
                Err(nb::Error::Other(_)) => return Err(Fault::Timer),
            }
        }

        if verbosity > 0 {
            if capture.is_empty() {
                self.diagnostic(b"Failed: No data");
            } else {
                self.diagnostic(b"Failed");
                self.diagnostic(&capture);
            }
        }

        Ok(false)
    }

    /// Discards all currently buffered input
    pub fn clear_results(&mut self) -> Result<(), Fault> {
        let mut discarded = 0;
        while self.read_byte()?.is_some() {
            discarded += 1;
        }

        if discarded > 0 {
            trace!("Discarded {} bytes of pending input", discarded);
        }
        Ok(())
    }

    /// Blocks for the given time in milliseconds
    pub(crate) fn settle(&mut self, duration_ms: u32) -> Result<(), Fault> {
        if duration_ms == 0 {
            return Ok(());
        }

        self.start_timer(duration_ms)?;
        nb::block!(self.timer.wait()).map_err(|_| Fault::Timer)
    }

    /// Sends a command, waits for the settle time and scans for the confirmation token
    pub(crate) fn execute<Cmd: AtatCmd + CommandErrorHandler>(
        &mut self,
        command: Cmd,
        settle_ms: u32,
        timeout_ms: u32,
    ) -> Result<(), Cmd::Error> {
        self.write_command(&command)?;
        self.settle(settle_ms)?;

        if !self.await_pattern(Cmd::CONFIRMATION, timeout_ms, self.config.debug_level)? {
            warn!("Command was not confirmed within {} ms", timeout_ms);
            return Err(command.unconfirmed());
        }

        Ok(())
    }

    /// Writes the given command, the encoding already carries the CRLF terminator
    pub(crate) fn write_command<Cmd: AtatCmd>(&mut self, command: &Cmd) -> Result<(), Fault> {
        let mut buffer = [0x0; COMMAND_SIZE];
        let length = command.write(&mut buffer);

        trace!("Sent command {}", crate::fmt::printable(buffer[..length].trim_ascii_end()));

        self.serial.write_all(&buffer[..length]).map_err(Fault::transport)?;
        self.serial.flush().map_err(Fault::transport)
    }

    /// Writes the given data terminated by CRLF
    pub(crate) fn write_line(&mut self, data: &[u8]) -> Result<(), Fault> {
        self.serial.write_all(data).map_err(Fault::transport)?;
        self.serial.write_all(b"\r\n").map_err(Fault::transport)?;
        self.serial.flush().map_err(Fault::transport)
    }

    /// Reads a single byte if available without blocking
    pub(crate) fn read_byte(&mut self) -> Result<Option<u8>, Fault> {
        if !self.serial.read_ready().map_err(Fault::transport)? {
            return Ok(None);
        }

        let mut byte = [0x0; 1];
        match self.serial.read(&mut byte).map_err(Fault::transport)? {
            0 => Ok(None),
            _ => Ok(Some(byte[0])),
        }
    }

    /// Emits diagnostic text to the data sink if debugging is enabled
    pub(crate) fn diagnostic(&mut self, text: &[u8]) {
        if self.config.debug_level > 0 {
            self.sink.on_diagnostic(text);
        }
    }

    pub(crate) fn start_timer(&mut self, duration_ms: u32) -> Result<(), Fault> {
        self.timer
            .start(TimerDurationU32::millis(duration_ms))
            .map_err(|_| Fault::Timer)
    }
}
