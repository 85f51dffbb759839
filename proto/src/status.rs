use thiserror::Error;

/// Status codes returned by [`Controller::bootstrap_peer`](../../ifctl_core/struct.Controller.html#method.bootstrap_peer), §4.10.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BootstrapStatus {
    #[error("no such interface")]
    BadIfnum,
    #[error("invalid public key")]
    BadKey,
    #[error("switch has no space for a new peer")]
    OutOfSpace,
    #[error("internal error")]
    Internal,
}

/// Status codes returned by `Controller::beacon_state`, §4.10.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BeaconStateStatus {
    #[error("no such interface")]
    NoSuchIface,
    #[error("invalid beacon state value")]
    InvalidState,
}

/// Status codes returned by `Controller::disconnect_peer`, §4.10.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DisconnectStatus {
    #[error("no peer with that public key")]
    NotFound,
}
