//! Hash functions used for message prehashing and address derivation.

use ripemd::Ripemd160;
use sha2::{Digest, Sha256};

/// Hash helpers.
pub struct Crypto;

impl Crypto {
    /// Computes SHA-256 hash of the input data.
    ///
    /// # Example
    /// ```
    /// use hwkey_crypto::Crypto;
    /// let hash = Crypto::sha256(b"hello");
    /// assert_eq!(hash.len(), 32);
    /// ```
    pub fn sha256(data: &[u8]) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(data);
        hasher.finalize().into()
    }

    /// Computes RIPEMD-160 hash of the input data.
    pub fn ripemd160(data: &[u8]) -> [u8; 20] {
        let mut hasher = Ripemd160::new();
        hasher.update(data);
        hasher.finalize().into()
    }

    /// RIPEMD160(SHA256(data))
    pub fn hash160(data: &[u8]) -> [u8; 20] {
        Self::ripemd160(&Self::sha256(data))
    }
}
