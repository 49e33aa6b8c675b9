//! Mocks for doc examples
use embedded_io::{ErrorKind, ErrorType, Read, ReadReady, Write};
use fugit::{TimerDurationU32, TimerInstantU32};
use fugit_timer::Timer;
use heapless::{Deque, Vec};

/// Serial transport mock, simulating a modem which joins the `test_wifi` network
#[derive(Default)]
pub struct ExampleSerial {
    /// Currently written command line
    command: Vec<u8, 128>,

    /// Pending response bytes
    responses: Deque<u8, 512>,
}

impl ExampleSerial {
    fn respond(&mut self, response: &[u8]) {
        for byte in response {
            let _ = self.responses.push_back(*byte);
        }
    }

    /// Enqueues the response matching the completed command line
    fn handle_command(&mut self) {
        let command = self.command.clone();

        match command.as_slice() {
            b"AT" | b"AT+CWMODE=1" | b"AT+CIPMUX=1" | b"AT+CIPSERVER=1,8000" => self.respond(b"\r\nOK\r\n"),
            b"AT+RST" => self.respond(b"\r\nOK\r\n ets Jan  8 2013,rst cause:2\r\n\r\nready\r\n"),
            b"AT+CWJAP=\"test_wifi\",\"secret\"" => self.respond(b"WIFI CONNECTED\r\nWIFI GOT IP\r\n\r\nOK\r\n"),
            b"AT+CIFSR" => self.respond(
                b"+CIFSR:STAIP,\"10.0.0.181\"\r\n+CIFSR:STAMAC,\"10:fe:ed:05:ba:50\"\r\n\r\nOK\r\n",
            ),
            b"AT+CIPSTO=300" => {
                self.respond(b"\r\nOK\r\n");
                self.respond(b"Link\r\n+IPD,0,4:ping\r\n");
            }
            b"AT+CIPSTART=2,\"UDP\",\"10.0.0.255\",34807" => self.respond(b"2,CONNECT\r\n\r\nOK\r\n"),
            b"AT+CIPSEND=0,4" => self.respond(b"\r\nOK\r\n> "),
            b"pong" => self.respond(b"\r\nRecv 4 bytes\r\n\r\nSEND OK\r\n"),
            _ => {}
        }
    }
}

impl ErrorType for ExampleSerial {
    type Error = ErrorKind;
}

impl Read for ExampleSerial {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        let mut count = 0;

        while count < buf.len() {
            match self.responses.pop_front() {
                Some(byte) => buf[count] = byte,
                None => break,
            }
            count += 1;
        }

        Ok(count)
    }
}

impl ReadReady for ExampleSerial {
    fn read_ready(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.responses.is_empty())
    }
}

impl Write for ExampleSerial {
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        for byte in buf {
            if *byte == b'\n' && self.command.last() == Some(&b'\r') {
                self.command.pop();
                self.handle_command();
                self.command.clear();
                continue;
            }

            self.command.push(*byte).map_err(|_| ErrorKind::Other)?;
        }

        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Timer mock, each [wait()](Timer::wait) call advances the time by one millisecond
#[derive(Default)]
pub struct ExampleTimer {
    /// Elapsed milliseconds
    now: u32,

    /// Remaining milliseconds of the current timeout
    remaining: u32,
}

impl Timer<1_000> for ExampleTimer {
    type Error = u32;

    fn now(&mut self) -> TimerInstantU32<1_000> {
        TimerInstantU32::from_ticks(self.now)
    }

    fn start(&mut self, duration: TimerDurationU32<1_000>) -> Result<(), Self::Error> {
        self.remaining = duration.to_millis();
        Ok(())
    }

    fn cancel(&mut self) -> Result<(), Self::Error> {
        self.remaining = 0;
        Ok(())
    }

    fn wait(&mut self) -> nb::Result<(), Self::Error> {
        if self.remaining == 0 {
            return Ok(());
        }

        self.remaining -= 1;
        self.now += 1;
        Err(nb::Error::WouldBlock)
    }
}
