//! Link-level transports are external collaborators (§1, §9): an
//! interface is polymorphic over the capability set {send, receive}. The
//! interface controller does not know whether a given transport is a UDP
//! socket, a TUN device, or an Ethernet-like broadcast domain — it only
//! ever deals in opaque frames tagged with a [`ifctl_proto::LinkAddr`].

/// One registered link-level transport's send half. The receive half is
/// push-based: the transport hands inbound frames to
/// `Controller::on_frame` itself (there is no `recv` method here because
/// the controller never polls a transport — §5 "no suspension points").
pub trait LinkTransport {
    /// Send a fully-framed outbound datagram (`[link_sockaddr][payload]`,
    /// §6) to the wire. Errors are not propagated past this call; a
    /// transport that cannot send should log and drop, matching the
    /// "recovery is always local" rule (§7).
    fn send(&mut self, frame: &[u8]);
}
