//! Application settings handed to the runtime at start time.

use serde::{Deserialize, Serialize};

/// Settings the config builder consumes for a core run.
///
/// The caller passes these explicitly with every start request; the runtime
/// never reads them from any process-wide store, so two runs with the same
/// settings value are guaranteed to produce the same config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AppSettings {
    /// Local proxy listen address (`host:port`).
    pub listen_addr: String,
    /// DNS server used inside the tunnel (TUN mode).
    pub tunnel_dns: String,
    /// IPv6 DNS server used inside the tunnel (TUN mode).
    pub tunnel_dns_v6: String,
    /// TUN interface address in CIDR form.
    pub tun_ip: String,
    pub tun_mtu: u32,
    /// TUN network stack implementation ("system", "gvisor", ...).
    pub tun_stack: String,
    pub tun_auto_route: bool,
    pub tun_strict_route: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:30000".to_string(),
            tunnel_dns: "8.8.8.8".to_string(),
            tunnel_dns_v6: "2001:4860:4860::8888".to_string(),
            tun_ip: "10.0.85.2/24".to_string(),
            tun_mtu: 1380,
            tun_stack: "system".to_string(),
            tun_auto_route: true,
            tun_strict_route: false,
        }
    }
}
