//! Core logic for the homework status bot.
//!
//! The Practicum API and Telegram live behind ports (traits) implemented in
//! adapter crates, so everything here runs against in-memory fakes in tests.

pub mod config;
pub mod domain;
pub mod errors;
pub mod homework;
pub mod logging;
pub mod messaging;
pub mod poller;
pub mod ports;
pub mod response;

pub use errors::{Error, Result};
