//! Core domain types and port definitions for the EWP client.
//!
//! This crate holds the pure domain vocabulary shared by every adapter:
//! connection profiles, the application settings passed to a core run, and
//! the port traits the runtime expects from infrastructure. It contains no
//! process, network or filesystem implementation details.

#![deny(unsafe_code)]

pub mod ports;
mod profile;
mod settings;

pub use profile::{AppProtocol, ConnectionProfile, ProfileError, TransportMode};
pub use settings::AppSettings;
