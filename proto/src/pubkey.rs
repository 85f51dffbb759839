use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha512};
use std::fmt;

/// A peer's 32-byte static public key.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PublicKey(pub [u8; 32]);

impl PublicKey {
    pub fn from_bytes(bytes: [u8; 32]) -> Self { PublicKey(bytes) }

    pub fn as_bytes(&self) -> &[u8; 32] { &self.0 }

    /// Derive this key's routable address: the low 16 bytes of
    /// `sha512(sha512(pubkey))`, which must begin with `0xFC` to be a
    /// valid mesh address (see [`DerivedIp::is_valid`]).
    pub fn derive_ip(&self) -> DerivedIp {
        let first = Sha512::digest(self.0);
        let second = Sha512::digest(first);
        let mut ip = [0u8; 16];
        ip.copy_from_slice(&second[..16]);
        DerivedIp(ip)
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "PublicKey({})", URL_SAFE_NO_PAD.encode(self.0)) }
}

/// A 16-byte address derived from a [`PublicKey`]. Valid mesh addresses
/// begin with the prefix byte `0xFC` (invariant 5, §3).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DerivedIp(pub [u8; 16]);

impl DerivedIp {
    pub const PREFIX: u8 = 0xFC;

    pub fn is_valid(&self) -> bool { self.0[0] == Self::PREFIX }
}

impl fmt::Debug for DerivedIp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.chunks(2).map(|c| format!("{:02x}{:02x}", c[0], c[1])).collect();
        write!(f, "{}", parts.join(":"))
    }
}
