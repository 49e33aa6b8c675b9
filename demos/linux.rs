//! Example that runs on Linux using a serial-USB-adapter.
//!
//! Joins the given access point, listens on port 8000 and broadcasts a discovery beacon.
//! Each received payload is echoed back to the sender.
use std::{cell::RefCell, collections::VecDeque, env, rc::Rc, thread, time::Duration};

use esp8266_link::{
    config::Config,
    wifi::{Adapter, WifiAdapter},
};
use serialport::{DataBits, FlowControl, Parity, StopBits};

// Timer frequency in Hz
const TIMER_HZ: u32 = 1000;

// Port of the TCP server
const LISTEN_PORT: u16 = 8000;

// Idle timeout of server sessions in seconds
const IDLE_TIMEOUT: u32 = 300;

fn main() {
    env_logger::init();

    // Parse args
    let args: Vec<String> = env::args().collect();
    if args.len() != 5 {
        println!("Usage: {} <path-to-serial> <baudrate> <ssid> <psk>", args[0]);
        println!("Example: {} /dev/ttyUSB0 115200 mywifi hellopasswd123", args[0]);
        println!("\nNote: To run the example with debug logging, run it like this:");
        println!("\n  RUST_LOG=trace cargo run --example linux --features log -- /dev/ttyUSB0 115200 mywifi hellopasswd123");
        std::process::exit(1);
    }
    let dev = &args[1];
    let baud_rate: u32 = args[2].parse().expect("Invalid baud rate");
    let ssid = &args[3];
    let psk = &args[4];

    println!("Starting (dev={}, baud={:?})...", dev, baud_rate);

    // Open serial port
    let port = serialport::new(dev, baud_rate)
        .data_bits(DataBits::Eight)
        .flow_control(FlowControl::None)
        .parity(Parity::None)
        .stop_bits(StopBits::One)
        .timeout(Duration::from_millis(10))
        .open()
        .expect("Could not open serial port");

    // Received payloads, echoed from the main loop
    let inbox: Rc<RefCell<VecDeque<Vec<u8>>>> = Rc::default();
    let sink_inbox = inbox.clone();
    let sink = move |payload: &[u8]| sink_inbox.borrow_mut().push_back(payload.to_vec());
    let notifier = || println!("Remote side connected");

    let config = Config::default().baud_rate(baud_rate);
    let mut adapter: Adapter<_, _, _, _, TIMER_HZ> =
        Adapter::new(serial::Port::new(port), timer::SysTimer::new(), config, sink, notifier);

    println!("Initializing modem...");
    adapter.initialize_wifi().expect("Modem bring-up failed");

    println!("Join WiFi \"{}\"...", ssid);
    let state = adapter.connect_wifi(ssid, psk).expect("Joining WiFi failed");
    assert!(state.ip_assigned, "No address assigned");
    println!("Got address {}", adapter.ip().unwrap_or_default());

    adapter
        .start_server(LISTEN_PORT, IDLE_TIMEOUT)
        .expect("Failed to start server");
    adapter.enable_beacon("linux-demo").expect("Failed to enable beacon");
    println!("Listening on port {}, beacon enabled", LISTEN_PORT);

    loop {
        if let Err(e) = adapter.poll() {
            log::warn!("Poll failed: {:?}", e);
        }

        let pending: Vec<Vec<u8>> = inbox.borrow_mut().drain(..).collect();
        for payload in pending {
            println!("Received {} bytes: {}", payload.len(), String::from_utf8_lossy(&payload).trim());
            if let Err(e) = adapter.send(&payload) {
                log::error!("Echo failed: {:?}", e);
            }
        }

        thread::sleep(Duration::from_millis(5));
    }
}

mod serial {
    use embedded_io::{ErrorKind, ErrorType, Read, ReadReady, Write};
    use serialport::SerialPort;
    use std::io;

    /// Adapts the serial port to the embedded-io traits
    pub struct Port {
        inner: Box<dyn SerialPort>,
    }

    impl Port {
        pub fn new(inner: Box<dyn SerialPort>) -> Self {
            Self { inner }
        }
    }

    fn kind(error: io::Error) -> ErrorKind {
        match error.kind() {
            io::ErrorKind::TimedOut => ErrorKind::TimedOut,
            io::ErrorKind::Interrupted => ErrorKind::Interrupted,
            io::ErrorKind::BrokenPipe => ErrorKind::BrokenPipe,
            _ => ErrorKind::Other,
        }
    }

    impl ErrorType for Port {
        type Error = ErrorKind;
    }

    impl Read for Port {
        fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
            match io::Read::read(&mut self.inner, buf) {
                Ok(count) => Ok(count),
                Err(e) if e.kind() == io::ErrorKind::TimedOut || e.kind() == io::ErrorKind::WouldBlock => Ok(0),
                Err(e) => Err(kind(e)),
            }
        }
    }

    impl ReadReady for Port {
        fn read_ready(&mut self) -> Result<bool, Self::Error> {
            self.inner
                .bytes_to_read()
                .map(|count| count > 0)
                .map_err(|_| ErrorKind::Other)
        }
    }

    impl Write for Port {
        fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
            io::Write::write(&mut self.inner, buf).map_err(kind)
        }

        fn flush(&mut self) -> Result<(), Self::Error> {
            io::Write::flush(&mut self.inner).map_err(kind)
        }
    }
}

mod timer {
    use std::{convert::TryInto, time::Instant as StdInstant};

    use fugit::Instant;
    use fugit_timer::Timer;

    /// A timer with millisecond precision.
    pub struct SysTimer {
        /// Reference point of now()
        epoch: StdInstant,
        start: StdInstant,
        duration_ms: u32,
        started: bool,
    }

    impl SysTimer {
        pub fn new() -> SysTimer {
            SysTimer {
                epoch: StdInstant::now(),
                start: StdInstant::now(),
                duration_ms: 0,
                started: false,
            }
        }
    }

    impl Timer<1000> for SysTimer {
        type Error = &'static str;

        /// Return current time `Instant`
        fn now(&mut self) -> fugit::TimerInstantU32<1000> {
            let milliseconds = (StdInstant::now() - self.epoch).as_millis();
            let ticks: u32 = milliseconds.try_into().unwrap_or(u32::MAX);
            Instant::<u32, 1, 1000>::from_ticks(ticks)
        }

        /// Start timer with a `duration`
        fn start(&mut self, duration: fugit::TimerDurationU32<1000>) -> Result<(), Self::Error> {
            self.start = StdInstant::now();
            self.duration_ms = duration.ticks();
            self.started = true;
            Ok(())
        }

        /// An error will be returned if the timer has already been canceled or was never started.
        fn cancel(&mut self) -> Result<(), Self::Error> {
            if !self.started {
                Err("cannot cancel stopped timer")
            } else {
                self.started = false;
                Ok(())
            }
        }

        /// Must return `OK(())` as soon as timer `duration` has expired.
        fn wait(&mut self) -> nb::Result<(), Self::Error> {
            let now = StdInstant::now();
            if (now - self.start).as_millis() >= self.duration_ms.into() {
                Ok(())
            } else {
                Err(nb::Error::WouldBlock)
            }
        }
    }
}
