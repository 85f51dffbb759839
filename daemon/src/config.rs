//! TOML configuration shape for the daemon (§11.4 of the full
//! specification): the controller's timing knobs plus a list of
//! interfaces to register at startup.

use ifctl_core::Config as ControllerConfig;
use serde::Deserialize;
use std::net::SocketAddr;

#[derive(Debug, Clone, Deserialize)]
pub struct DaemonConfig {
    #[serde(default)]
    pub controller: ControllerConfig,
    #[serde(rename = "interface", default)]
    pub interfaces: Vec<InterfaceConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InterfaceConfig {
    pub name: String,
    pub bind: SocketAddr,
    #[serde(default)]
    pub broadcast: Option<SocketAddr>,
    #[serde(default)]
    pub beacon_state: BeaconStateConfig,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BeaconStateConfig {
    #[default]
    Off,
    Accept,
    Send,
}

impl From<BeaconStateConfig> for ifctl_core::BeaconState {
    fn from(value: BeaconStateConfig) -> Self {
        match value {
            BeaconStateConfig::Off => ifctl_core::BeaconState::Off,
            BeaconStateConfig::Accept => ifctl_core::BeaconState::Accept,
            BeaconStateConfig::Send => ifctl_core::BeaconState::Send,
        }
    }
}

impl DaemonConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, toml::de::Error> { toml::from_str(s) }
}
