//! Account address derived from a compressed public key.

use std::fmt;

use crate::hash::Crypto;
use crate::public_key::CompressedPublicKey;

/// `RIPEMD160(SHA256(compressed_pubkey))`, the 20-byte account address.
///
/// Human-readable rendering (bech32 and friends) is left to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AccountAddress([u8; 20]);

impl AccountAddress {
    pub fn from_public_key(public_key: &CompressedPublicKey) -> Self {
        Self(Crypto::hash160(public_key.as_bytes()))
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl From<[u8; 20]> for AccountAddress {
    fn from(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for AccountAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}
