//! Wires the interface controller to concrete UDP transports and drives
//! it from a single `tokio::select!` loop — the direct translation of
//! "one task drains all events" (§5, §9 of the full specification) into
//! an async runtime.

pub mod config;
pub mod stubs;

use config::DaemonConfig;
use ifctl_core::{Controller, SystemClock};
use ifctl_proto::PublicKey;
use ifctl_transport_udp::{InboundFrame, UdpTransport};
use std::time::Duration;
use stubs::{CountingSwitch, LoggingEventBus, NullPinger, PassthroughSessionFactory};
use tokio::sync::mpsc;
use tokio::time::interval;
use tracing::info;

/// Run the daemon until it receives a shutdown signal (ctrl-c). Binds a
/// UDP socket for every configured interface, installs the configured
/// beacon state on each, and loops `ping_scan`/`beacon_tick` timers and
/// inbound frames through a single [`Controller`].
pub async fn run(daemon_config: DaemonConfig, own_pubkey: PublicKey) -> anyhow::Result<()> {
    let mut controller = Controller::new(
        daemon_config.controller.clone(),
        own_pubkey,
        Box::new(CountingSwitch::default()),
        Box::new(NullPinger),
        Box::new(PassthroughSessionFactory),
        Box::new(LoggingEventBus),
        Box::new(SystemClock::new()),
    );

    let (frame_tx, mut frame_rx) = mpsc::unbounded_channel::<InboundFrame>();
    for iface_cfg in &daemon_config.interfaces {
        let broadcast = iface_cfg.broadcast.unwrap_or_else(|| default_broadcast(iface_cfg.bind));
        // Binding is async and interface registration is not, so the
        // socket is bound first and the real transport handed to
        // `new_iface` directly; there is no placeholder to swap out later.
        let next_if_num = controller.interface_count();
        let (transport, mut rx) = UdpTransport::bind(next_if_num, iface_cfg.bind, broadcast).await?;
        let if_handle = controller.new_iface(iface_cfg.name.clone(), Box::new(transport));
        controller.beacon_state(if_handle.0, iface_cfg.beacon_state.into())?;

        let tx = frame_tx.clone();
        tokio::spawn(async move {
            while let Some(frame) = rx.recv().await {
                if tx.send(frame).is_err() {
                    return;
                }
            }
        });
    }
    drop(frame_tx);

    let mut ping_scan = interval(Duration::from_millis(controller.config().ping_scan_interval_ms));
    let mut beacon_tick = interval(Duration::from_millis(controller.config().beacon_interval_ms));
    let mut status_tick = interval(Duration::from_secs(60));

    info!("interface controller daemon started");
    loop {
        tokio::select! {
            _ = ping_scan.tick() => controller.on_ping_scan_tick(),
            _ = beacon_tick.tick() => controller.on_beacon_tick(),
            _ = status_tick.tick() => log_status(&controller),
            Some(frame) = frame_rx.recv() => controller.on_frame(frame.if_num, &frame.frame),
            _ = tokio::signal::ctrl_c() => {
                info!("shutdown requested");
                return Ok(());
            }
        }
    }
}

fn log_status(controller: &Controller) {
    let stats = controller.peer_stats();
    info!(peer_count = stats.len(), "status");
}

fn default_broadcast(bind: std::net::SocketAddr) -> std::net::SocketAddr {
    std::net::SocketAddr::new(std::net::IpAddr::V4(std::net::Ipv4Addr::BROADCAST), bind.port())
}
