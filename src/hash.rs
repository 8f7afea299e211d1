// ---------------------------------------------------------------------------
// Hash — a 32-byte SHA-256 digest.
//
// Used for PoH chain values, parent/last hashes on slots, and the
// recent_hash a transfer must reference. Wire form is 64 lowercase hex
// characters (see crate::wire).
//
// Reference: https://github.com/anza-xyz/solana-sdk/blob/master/hash/src/lib.rs
// ---------------------------------------------------------------------------

use serde::{de::Error as _, Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};
use std::fmt;

#[derive(Clone, Copy, Default, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct Hash(pub [u8; 32]);

impl Hash {
    pub fn new(bytes: [u8; 32]) -> Self {
        Hash(bytes)
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        let bytes: [u8; 32] = hex::decode(s)?
            .try_into()
            .map_err(|_| hex::FromHexError::InvalidStringLength)?;
        Ok(Hash(bytes))
    }
}

impl fmt::Debug for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hash({}..)", &self.to_hex()[..8])
    }
}

impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl Serialize for Hash {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Hash {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Hash::from_hex(&s).map_err(D::Error::custom)
    }
}

/// Plain SHA-256 over a byte string.
pub fn sha256(data: &[u8]) -> Hash {
    let mut hasher = Sha256::new();
    hasher.update(data);
    Hash(hasher.finalize().into())
}

/// The fixed genesis hash both leader and validator start from.
pub fn genesis_hash() -> Hash {
    sha256(b"genesis")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_round_trip() {
        let h = sha256(b"hello");
        let s = h.to_hex();
        assert_eq!(s.len(), 64);
        assert_eq!(Hash::from_hex(&s).unwrap(), h);
    }

    #[test]
    fn hex_is_case_insensitive_on_parse() {
        let h = sha256(b"hello");
        let upper = h.to_hex().to_uppercase();
        assert_eq!(Hash::from_hex(&upper).unwrap(), h);
    }

    #[test]
    fn genesis_is_deterministic() {
        assert_eq!(genesis_hash(), genesis_hash());
        assert_eq!(genesis_hash(), sha256(b"genesis"));
    }
}
