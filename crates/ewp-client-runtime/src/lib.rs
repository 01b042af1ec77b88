//! Core-process supervision for the EWP client.
//!
//! This crate owns the lifecycle of the external `ewp-core-client` process:
//! it materializes a per-run config file, spawns the executable, demuxes its
//! output streams into log events and the control-address announcement,
//! negotiates graceful shutdown over the control endpoint with bounded
//! escalation to forced termination, and re-establishes a crashed process
//! with exponential backoff.
//!
//! The entry point is [`CoreSupervisor`]: a cloneable handle to an actor
//! task that serializes every state transition. Callers submit
//! [`RunRequest`]s, subscribe to [`CoreEvent`]s, and query a
//! [`SupervisorStatus`] snapshot.

#![deny(unsafe_code)]

pub mod process;

pub use process::{
    CoreEvent, CoreSupervisor, Demuxed, LineBuffer, RetryPolicy, RunRequest, StreamSource,
    SupervisorConfig, SupervisorError, SupervisorState, SupervisorStatus,
};
