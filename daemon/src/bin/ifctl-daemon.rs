use anyhow::{Context, Result};
use ifctl_daemon::config::DaemonConfig;
use ifctl_proto::PublicKey;
use rand::RngCore;
use tracing::{info, Level};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    let mut args = std::env::args().skip(1);
    let config_path = args.next().context("usage: ifctl-daemon <config.toml> [bind-address]")?;
    let bind_override = args.next();

    let raw = std::fs::read_to_string(&config_path).with_context(|| format!("reading {config_path}"))?;
    let mut config = DaemonConfig::from_toml_str(&raw).with_context(|| format!("parsing {config_path}"))?;

    if let Some(bind) = bind_override {
        let addr = bind.parse().with_context(|| format!("invalid bind address {bind}"))?;
        match config.interfaces.first_mut() {
            Some(iface) => iface.bind = addr,
            None => config.interfaces.push(ifctl_daemon::config::InterfaceConfig {
                name: "default".to_string(),
                bind: addr,
                broadcast: None,
                beacon_state: Default::default(),
            }),
        }
    }

    // A real deployment loads a persisted static keypair; this reference
    // binary generates a fresh one on every start, which is fine for
    // demonstrating the event loop but means peers must re-bootstrap after
    // a restart. Only a fraction of random keys derive a valid address, so
    // generation retries until one does.
    let own_pubkey = loop {
        let mut key_bytes = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut key_bytes);
        let candidate = PublicKey::from_bytes(key_bytes);
        if candidate.derive_ip().is_valid() {
            break candidate;
        }
    };
    info!(?own_pubkey, address = ?own_pubkey.derive_ip(), "generated identity");

    ifctl_daemon::run(config, own_pubkey).await
}
