use serde::{Deserialize, Serialize};

/// Immutable controller configuration (§3). Defaults are the literal
/// millisecond values named in the specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub unresponsive_after_ms: u64,
    pub ping_after_ms: u64,
    pub ping_timeout_ms: u64,
    pub forget_after_ms: u64,
    pub beacon_interval_ms: u64,
    pub ping_scan_interval_ms: u64,

    /// Opportunistic-handshake-ping self-rate-limit divisor (§4.5): a ping
    /// is skipped unless `(ping_count + 1) % opportunistic_ping_modulus != 0`.
    /// Kept configurable per the Open Questions note in §9, default 7.
    pub opportunistic_ping_modulus: u64,

    /// Down-peer ping throttle divisor (§4.7): a ping to an unresponsive
    /// peer is sent only every `down_peer_ping_modulus`th scan. Default 8.
    pub down_peer_ping_modulus: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            unresponsive_after_ms: 20480,
            ping_after_ms: 3072,
            ping_timeout_ms: 2048,
            forget_after_ms: 262144,
            beacon_interval_ms: 32768,
            ping_scan_interval_ms: 1024,
            opportunistic_ping_modulus: 7,
            down_peer_ping_modulus: 8,
        }
    }
}
