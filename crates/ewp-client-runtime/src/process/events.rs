//! Core lifecycle events for real-time state synchronization.
//!
//! These events are emitted by the supervisor and consumed by UI/logging
//! collaborators to maintain a synchronized view of the core process.
//! Delivery order matches the supervisor's serialized timeline.

use serde::{Deserialize, Serialize};

/// One notification from the supervisor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum CoreEvent {
    /// The core confirmed startup by announcing its control endpoint.
    Started { control_addr: String },

    /// The core process is gone, for any reason.
    Stopped,

    /// A categorized supervisor error.
    Error { kind: String, message: String },

    /// One line of core output (diagnostic lines carry an `[ERR] ` tag).
    Log { line: String },

    /// A crash was classified and a reconnection attempt scheduled.
    ReconnectScheduled {
        attempt: u32,
        max_attempts: u32,
        delay_ms: u64,
    },

    /// The backoff timer fired; the stored request is being re-issued.
    ReconnectAttempting { attempt: u32, max_attempts: u32 },

    /// The retry budget is spent; manual intervention required.
    ReconnectAbandoned,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn started_event_serialization() {
        let event = CoreEvent::Started {
            control_addr: "127.0.0.1:9090".to_string(),
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"started\""));
        assert!(json.contains("\"controlAddr\":\"127.0.0.1:9090\""));
    }

    #[test]
    fn reconnect_scheduled_serialization() {
        let event = CoreEvent::ReconnectScheduled {
            attempt: 2,
            max_attempts: 3,
            delay_ms: 4000,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"reconnectScheduled\""));
        assert!(json.contains("\"maxAttempts\":3"));
        assert!(json.contains("\"delayMs\":4000"));
    }

    #[test]
    fn events_round_trip() {
        let event = CoreEvent::Error {
            kind: "processCrashed".to_string(),
            message: "core process crashed".to_string(),
        };
        let json = serde_json::to_string(&event).unwrap();
        let back: CoreEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }
}
