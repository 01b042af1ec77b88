//! Config builder port definition.
//!
//! The runtime consumes the builder as an opaque producer of core config
//! bytes; how the JSON document is assembled is an adapter concern.

use async_trait::async_trait;
use thiserror::Error;

use crate::{AppSettings, ConnectionProfile};

/// Errors from config materialization.
#[derive(Debug, Error)]
pub enum ConfigBuildError {
    /// The profile cannot be expressed as a core config.
    #[error("unsupported profile: {0}")]
    Unsupported(String),

    /// Document assembly or serialization failed.
    #[error("config serialization failed: {0}")]
    Serialization(String),
}

/// Port for turning a profile plus settings into core config bytes.
///
/// The runtime writes the returned bytes to a per-run temporary file and
/// passes its path to the core executable; it never inspects the content.
#[async_trait]
pub trait ConfigBuilderPort: Send + Sync {
    /// Build the client config document for one core run.
    async fn materialize_config(
        &self,
        profile: &ConnectionProfile,
        settings: &AppSettings,
        tun_mode: bool,
    ) -> Result<Vec<u8>, ConfigBuildError>;
}
