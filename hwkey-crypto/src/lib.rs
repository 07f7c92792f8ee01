//! # hwkey-crypto
//!
//! secp256k1 primitives shared by hardware-backed keys.
//!
//! Nothing in this crate performs I/O. It covers the byte-level work around a
//! signing device:
//!
//! - [`signature`]: DER signatures from a device to the 64-byte `r || s` form
//! - [`public_key`]: any device public key encoding to 33-byte compressed form
//! - [`address`]: account address (`RIPEMD160(SHA256(pubkey))`) for display
//! - [`hash`]: the hash functions the above rely on
//!
//! Curve arithmetic, point validation and scalar range checks are delegated to
//! the `secp256k1` crate.

pub mod address;
pub mod error;
pub mod hash;
pub mod public_key;
pub mod signature;

pub use address::AccountAddress;
pub use error::{PublicKeyError, SignatureError, SignatureComponent};
pub use hash::Crypto;
pub use public_key::{normalize_public_key, CompressedPublicKey, COMPRESSED_PUBLIC_KEY_SIZE};
pub use signature::{der_to_compact, verify_signature, COMPACT_SIGNATURE_SIZE};
