//! Connection profile for a single proxy server endpoint.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Application-layer protocol spoken with the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppProtocol {
    /// EWP with UUID authentication.
    Ewp,
    /// Trojan with password authentication.
    Trojan,
}

/// Transport carrying the application protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportMode {
    Ws,
    Grpc,
    Xhttp,
    H3Grpc,
}

/// Why a profile failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ProfileError {
    #[error("server address is empty")]
    MissingServerAddress,
    #[error("uuid is empty")]
    MissingUuid,
    #[error("trojan password is empty")]
    MissingTrojanPassword,
}

/// A single server profile: endpoint, credentials and the transport/TLS
/// tuning the config builder consumes.
///
/// Immutable once handed to the runtime for a run; the runtime keeps the
/// last submitted profile so a reconnect reproduces the original request
/// exactly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConnectionProfile {
    pub id: i64,
    pub name: String,
    pub server_address: String,
    pub server_port: u16,
    /// Preferred IP override; empty means resolve `server_address`.
    pub server_ip: String,
    pub app_protocol: AppProtocol,
    pub uuid: String,
    pub trojan_password: String,
    pub transport: TransportMode,
    pub ws_path: String,
    pub grpc_service_name: String,
    /// Custom User-Agent (anti-DPI); empty means core default.
    pub user_agent: String,
    /// Custom Content-Type (anti-DPI); empty means core default.
    pub content_type: String,
    pub enable_ech: bool,
    pub ech_domain: String,
    pub dns_server: String,
    pub enable_flow: bool,
    pub enable_pqc: bool,
    pub xhttp_mode: String,
    pub xhttp_path: String,
}

impl Default for ConnectionProfile {
    fn default() -> Self {
        Self {
            id: -1,
            name: String::new(),
            server_address: String::new(),
            server_port: 443,
            server_ip: String::new(),
            app_protocol: AppProtocol::Ewp,
            uuid: String::new(),
            trojan_password: String::new(),
            transport: TransportMode::Ws,
            ws_path: "/".to_string(),
            grpc_service_name: "api".to_string(),
            user_agent: String::new(),
            content_type: String::new(),
            enable_ech: true,
            ech_domain: "cloudflare-ech.com".to_string(),
            dns_server: "dns.alidns.com/dns-query".to_string(),
            enable_flow: true,
            enable_pqc: false,
            xhttp_mode: "auto".to_string(),
            xhttp_path: "/xhttp".to_string(),
        }
    }
}

impl ConnectionProfile {
    /// Check that the profile carries enough to build a client config:
    /// a server address and a non-empty credential for the selected protocol.
    pub fn validate(&self) -> Result<(), ProfileError> {
        if self.server_address.is_empty() {
            return Err(ProfileError::MissingServerAddress);
        }
        match self.app_protocol {
            AppProtocol::Ewp if self.uuid.is_empty() => Err(ProfileError::MissingUuid),
            AppProtocol::Trojan if self.trojan_password.is_empty() => {
                Err(ProfileError::MissingTrojanPassword)
            }
            _ => Ok(()),
        }
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// `host:port` form for list views.
    #[must_use]
    pub fn display_address(&self) -> String {
        format!("{}:{}", self.server_address, self.server_port)
    }

    /// Short protocol label, e.g. `EWP-WS` or `Trojan-gRPC`.
    #[must_use]
    pub fn display_type(&self) -> String {
        let prefix = match self.app_protocol {
            AppProtocol::Ewp => "EWP",
            AppProtocol::Trojan => "Trojan",
        };
        let suffix = match self.transport {
            TransportMode::Ws => "WS",
            TransportMode::Grpc => "gRPC",
            TransportMode::Xhttp => "XHTTP",
            TransportMode::H3Grpc => "H3",
        };
        format!("{prefix}-{suffix}")
    }

    /// Masked credential for display; never reveals the full secret.
    #[must_use]
    pub fn display_auth(&self) -> String {
        match self.app_protocol {
            AppProtocol::Trojan => {
                let chars: Vec<char> = self.trojan_password.chars().collect();
                if chars.len() <= 4 {
                    "****".to_string()
                } else {
                    let head: String = chars[..2].iter().collect();
                    let tail: String = chars[chars.len() - 2..].iter().collect();
                    format!("{head}****{tail}")
                }
            }
            AppProtocol::Ewp => {
                let head: String = self.uuid.chars().take(8).collect();
                format!("{head}...")
            }
        }
    }
}
