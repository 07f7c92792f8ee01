//! # hwkey-hsm
//!
//! Hardware-backed secp256k1 keys.
//!
//! A [`LedgerKey`] stands in for an in-memory private key while the secret
//! stays on a Ledger-style device. The crate owns the protocol around the
//! device, not the transport:
//!
//! - the public key for a derivation path is fetched once, compressed and
//!   cached, and can be re-validated against the device later
//! - signing on app versions from 1.1 on is gated behind an on-device address
//!   check confirmed by the operator
//! - DER signatures from the device come back as 64-byte `r || s`
//!
//! ## Features
//!
//! - `simulation` (default): Software device for testing without hardware
//!
//! ## Usage
//!
//! ```ignore
//! use hwkey_hsm::{DerivationPath, Discovery, HsmConfig, LedgerKey};
//!
//! // Registered once at startup by a build that ships a transport
//! let discovery = Discovery::new(|| Ok(Box::new(open_ledger()?)));
//!
//! let mut key = LedgerKey::new(DerivationPath::bip44(118, 0, 0, 0), &discovery, &HsmConfig::default())?;
//! key.validate()?;
//! let signature = key.sign_interactive(&sign_doc)?;
//! ```

pub mod config;
pub mod device;
pub mod discovery;
pub mod error;
pub mod path;
pub mod prompt;
pub mod signer;

#[cfg(feature = "simulation")]
pub mod simulation;

// Re-exports
pub use config::{HsmConfig, SimulationConfig};
pub use device::{DeviceVersion, HsmDeviceType, LedgerSecp256k1};
pub use discovery::Discovery;
pub use error::{HsmError, HsmResult};
pub use path::DerivationPath;
pub use prompt::{is_affirmative, Confirmer, IoConfirmer, StdioConfirmer};
pub use signer::{AddressFormat, HexAddressFormat, LedgerKey, LedgerKeyRecord};

#[cfg(feature = "simulation")]
pub use simulation::{DeviceCall, DeviceOp, SimulatedLedger};

pub use hwkey_crypto::{AccountAddress, CompressedPublicKey, COMPACT_SIGNATURE_SIZE};
