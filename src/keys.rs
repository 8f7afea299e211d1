// ---------------------------------------------------------------------------
// PublicKey / Signature — Ed25519 wire types.
//
// PublicKey wraps a 32-byte Ed25519 verifying key; Signature wraps a
// 64-byte Ed25519 signature. Wire form is 64 / 128 lowercase hex
// characters respectively (see crate::wire).
//
// Reference: https://github.com/anza-xyz/solana-sdk/blob/master/address/src/lib.rs
//            https://github.com/anza-xyz/solana-sdk/blob/master/signature/src/lib.rs
// ---------------------------------------------------------------------------

use serde::{de::Error as _, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

#[derive(Clone, Copy, Default, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct PublicKey(pub [u8; 32]);

impl PublicKey {
    pub fn new(bytes: [u8; 32]) -> Self {
        PublicKey(bytes)
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        let bytes: [u8; 32] = hex::decode(s)?
            .try_into()
            .map_err(|_| hex::FromHexError::InvalidStringLength)?;
        Ok(PublicKey(bytes))
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({}..)", &self.to_hex()[..8])
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl Serialize for PublicKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for PublicKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        PublicKey::from_hex(&s).map_err(D::Error::custom)
    }
}

#[derive(Clone, Copy, Eq, PartialEq, Hash)]
pub struct Signature(pub [u8; 64]);

impl Default for Signature {
    fn default() -> Self {
        Signature([0u8; 64])
    }
}

impl Signature {
    pub fn new(bytes: [u8; 64]) -> Self {
        Signature(bytes)
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        let bytes: [u8; 64] = hex::decode(s)?
            .try_into()
            .map_err(|_| hex::FromHexError::InvalidStringLength)?;
        Ok(Signature(bytes))
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({}..)", &self.to_hex()[..8])
    }
}

impl Serialize for Signature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Signature {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Signature::from_hex(&s).map_err(D::Error::custom)
    }
}

/// A deterministic keypair derived from a single seed byte, the way the
/// teacher's genesis accounts are derived (`SigningKey::from_bytes(&[b;32])`).
/// Handy for demos and tests; production key material does not come from
/// here.
pub fn keypair_from_seed_byte(b: u8) -> (PublicKey, ed25519_dalek::SigningKey) {
    let seed = [b; 32];
    let signing_key = ed25519_dalek::SigningKey::from_bytes(&seed);
    let pubkey = PublicKey(signing_key.verifying_key().to_bytes());
    (pubkey, signing_key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_round_trip() {
        let (pk, _) = keypair_from_seed_byte(1);
        let s = pk.to_hex();
        assert_eq!(s.len(), 64);
        assert_eq!(PublicKey::from_hex(&s).unwrap(), pk);
    }

    #[test]
    fn same_seed_same_key() {
        let (a, _) = keypair_from_seed_byte(7);
        let (b, _) = keypair_from_seed_byte(7);
        assert_eq!(a, b);
    }
}
