//! Compressed secp256k1 public keys.
//!
//! Devices are free to return a public key as a 33-byte compressed point, a
//! 65-byte uncompressed point (`0x04 || X || Y`) or a bare 64-byte `X || Y`.
//! Everything downstream (cache comparison, address derivation) assumes the
//! compressed form, so [`normalize_public_key`] is the only way in.

use std::fmt;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::address::AccountAddress;
use crate::error::PublicKeyError;

/// Length of a compressed secp256k1 point.
pub const COMPRESSED_PUBLIC_KEY_SIZE: usize = 33;

const UNCOMPRESSED_TAG: u8 = 0x04;

/// A validated secp256k1 public key in 33-byte compressed form.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct CompressedPublicKey([u8; COMPRESSED_PUBLIC_KEY_SIZE]);

impl CompressedPublicKey {
    /// Parse and validate a point in any supported encoding.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, PublicKeyError> {
        normalize_public_key(bytes)
    }

    /// Parse a hex-encoded point in any supported encoding.
    pub fn from_hex(encoded: &str) -> Result<Self, PublicKeyError> {
        let bytes = hex::decode(encoded).map_err(|e| PublicKeyError::InvalidHex(e.to_string()))?;
        normalize_public_key(&bytes)
    }

    pub fn as_bytes(&self) -> &[u8; COMPRESSED_PUBLIC_KEY_SIZE] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Account address committed to by this key.
    pub fn address(&self) -> AccountAddress {
        AccountAddress::from_public_key(self)
    }
}

impl AsRef<[u8]> for CompressedPublicKey {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<secp256k1::PublicKey> for CompressedPublicKey {
    fn from(key: secp256k1::PublicKey) -> Self {
        Self(key.serialize())
    }
}

impl fmt::Debug for CompressedPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CompressedPublicKey({})", self.to_hex())
    }
}

impl fmt::Display for CompressedPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for CompressedPublicKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for CompressedPublicKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        Self::from_hex(&encoded).map_err(de::Error::custom)
    }
}

/// Re-serialize a device public key in 33-byte compressed form.
pub fn normalize_public_key(public_key: &[u8]) -> Result<CompressedPublicKey, PublicKeyError> {
    let parsed = match public_key.len() {
        33 | 65 => secp256k1::PublicKey::from_slice(public_key),
        64 => {
            let mut tagged = [0u8; 65];
            tagged[0] = UNCOMPRESSED_TAG;
            tagged[1..].copy_from_slice(public_key);
            secp256k1::PublicKey::from_slice(&tagged)
        }
        len => return Err(PublicKeyError::InvalidLength(len)),
    };

    parsed
        .map(CompressedPublicKey::from)
        .map_err(|_| PublicKeyError::InvalidPoint)
}
