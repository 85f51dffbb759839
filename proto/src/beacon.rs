use crate::pubkey::PublicKey;

/// Length of the beacon authentication password, in bytes (§3, §6).
pub const PASSWORD_LEN: usize = 20;

/// Total encoded size of a [`BeaconRecord`]: 4 (version) + 20 (password) + 32 (pubkey).
pub const BEACON_SIZE: usize = 4 + PASSWORD_LEN + 32;

/// The fixed 56-byte beacon record broadcast by an interface in `SEND`
/// mode and consumed by interfaces in `ACCEPT`/`SEND` mode (§4.3, §6).
#[derive(Clone, PartialEq, Eq)]
pub struct BeaconRecord {
    pub version: u32,
    pub password: [u8; PASSWORD_LEN],
    pub pubkey: PublicKey,
}

impl std::fmt::Debug for BeaconRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BeaconRecord").field("version", &self.version).field("pubkey", &self.pubkey).finish()
    }
}

impl BeaconRecord {
    pub fn new(version: u32, password: [u8; PASSWORD_LEN], pubkey: PublicKey) -> Self { BeaconRecord { version, password, pubkey } }

    /// Encode in network byte order per the §6 layout table.
    pub fn encode(&self) -> [u8; BEACON_SIZE] {
        let mut out = [0u8; BEACON_SIZE];
        out[0..4].copy_from_slice(&self.version.to_be_bytes());
        out[4..24].copy_from_slice(&self.password);
        out[24..56].copy_from_slice(self.pubkey.as_bytes());
        out
    }

    /// Decode a beacon record, rejecting anything shorter than
    /// [`BEACON_SIZE`] (§4.3: "rejected if payload shorter than
    /// Headers_Beacon_SIZE").
    pub fn decode(buf: &[u8]) -> Option<Self> {
        if buf.len() < BEACON_SIZE {
            return None;
        }
        let version = u32::from_be_bytes(buf[0..4].try_into().ok()?);
        let mut password = [0u8; PASSWORD_LEN];
        password.copy_from_slice(&buf[4..24]);
        let mut pubkey_bytes = [0u8; 32];
        pubkey_bytes.copy_from_slice(&buf[24..56]);
        Some(BeaconRecord { version, password, pubkey: PublicKey::from_bytes(pubkey_bytes) })
    }
}
