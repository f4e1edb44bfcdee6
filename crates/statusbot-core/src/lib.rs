//! Core domain + application logic for the endpoint status bot.
//!
//! This crate is framework-agnostic. Telegram and the monitoring API live behind
//! ports (traits) implemented in adapter crates.

pub mod commands;
pub mod config;
pub mod dispatcher;
pub mod domain;
pub mod errors;
pub mod formatting;
pub mod logging;
pub mod messaging;
pub mod monitoring;
pub mod poller;
pub mod report;

pub use errors::{Error, Result};

#[cfg(test)]
pub(crate) mod testing;
