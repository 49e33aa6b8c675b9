//! # Application callbacks
//!
//! The adapter notifies the application synchronously from within [poll()](crate::wifi::Adapter::poll).
//! Implementations must return quickly and must not retain the given slices, which point into the
//! inbound line buffer and are overwritten by the next poll cycle.
//!
//! Closures implement both traits, [Discard] may be used if no notification is needed:
//!
//! ````
//! use esp8266_link::callbacks::{DataSink, Discard, LinkNotifier};
//!
//! let mut total = 0;
//! let mut sink = |payload: &[u8]| total += payload.len();
//! sink.on_data(b"hello");
//!
//! let mut notifier = Discard;
//! notifier.on_link();
//! assert_eq!(5, total);
//! ````

/// Receives inbound payloads and diagnostic output
pub trait DataSink {
    /// Called once per inbound data packet with the payload
    fn on_data(&mut self, payload: &[u8]);

    /// Called with raw captured transport bytes if the debug level is > 0.
    ///
    /// Forwards to [on_data](DataSink::on_data) by default.
    fn on_diagnostic(&mut self, text: &[u8]) {
        self.on_data(text);
    }
}

/// Gets notified once per `Link` event
pub trait LinkNotifier {
    fn on_link(&mut self);
}

/// Ignores all notifications
#[derive(Copy, Clone, Debug, Default)]
pub struct Discard;

impl DataSink for Discard {
    fn on_data(&mut self, _payload: &[u8]) {}
}

impl LinkNotifier for Discard {
    fn on_link(&mut self) {}
}

impl<F: FnMut(&[u8])> DataSink for F {
    fn on_data(&mut self, payload: &[u8]) {
        self(payload)
    }
}

impl<F: FnMut()> LinkNotifier for F {
    fn on_link(&mut self) {
        self()
    }
}
