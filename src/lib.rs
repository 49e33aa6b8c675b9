//! # ESP8266 link driver
//!
//! Poll-driven driver for ESP8266 modems running the AT firmware. Supports joining a WIFI access
//! point, acting as TCP server or TCP client and broadcasting a discovery beacon via UDP.
//!
//! The driver is `no_std`, it only requires a serial transport implementing the
//! [embedded-io](embedded_io) traits and a [fugit timer](fugit_timer::Timer).
//!
//! * [wifi]: Modem bring-up and joining an access point
//! * [stack]: Server and client sessions, outbound data
//! * [beacon]: Discovery beacon
//! * [framer]: Processing of inbound messages via [poll()](wifi::Adapter::poll)
#![cfg_attr(not(test), no_std)]
#![cfg_attr(feature = "strict", deny(warnings))]

#[macro_use]
mod fmt;

pub mod beacon;
pub mod callbacks;
pub(crate) mod commands;
pub mod config;
pub mod framer;
pub mod scanner;
pub mod session;
pub mod stack;
pub mod urc;
pub mod wifi;

#[cfg(feature = "examples")]
pub mod example;

#[cfg(test)]
mod tests;
