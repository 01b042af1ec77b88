//! Port definitions (trait abstractions) for external systems.
//!
//! Ports define the interfaces the runtime expects from infrastructure.
//! They contain no implementation details and use only domain types.

pub mod config_builder;

pub use config_builder::{ConfigBuildError, ConfigBuilderPort};
