//! Core process lifecycle: spawn, output demuxing, graceful shutdown,
//! crash detection and reconnection.

mod artifact;
pub mod control;
mod error;
mod events;
mod locate;
mod retry;
mod shutdown;
mod stream;
mod supervisor;

pub use error::SupervisorError;
pub use events::CoreEvent;
pub use locate::{core_executable_name, resolve_core_executable};
pub use retry::RetryPolicy;
pub use stream::{CONTROL_ADDR_MARKER, Demuxed, LineBuffer, StreamSource, demux};
pub use supervisor::{
    CoreSupervisor, RunRequest, SupervisorConfig, SupervisorState, SupervisorStatus,
};
