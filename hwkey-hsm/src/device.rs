//! Device capability consumed by [`LedgerKey`](crate::LedgerKey)

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{HsmError, HsmResult};
use crate::path::DerivationPath;

/// Operations a Ledger-style device must expose for secp256k1 keys.
///
/// Every call blocks the calling thread until the device answers. Timeouts,
/// if any, belong to the implementation.
pub trait LedgerSecp256k1: Send {
    /// Raw public key bytes for `path`, in whatever encoding the app emits.
    fn get_public_key(&mut self, path: &DerivationPath) -> HsmResult<Vec<u8>>;

    /// Render the address for `path` on the device screen.
    fn show_address(&mut self, path: &DerivationPath, address_prefix: &str) -> HsmResult<()>;

    /// DER encoded ECDSA signature over `message`.
    fn sign(&mut self, path: &DerivationPath, message: &[u8]) -> HsmResult<Vec<u8>>;

    /// Version of the app running on the device.
    fn get_version(&mut self) -> HsmResult<DeviceVersion>;
}

/// Supported device backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HsmDeviceType {
    /// Ledger hardware wallet, requires a registered transport
    #[default]
    Ledger,
    /// In-process software device
    Simulation,
}

impl fmt::Display for HsmDeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HsmDeviceType::Ledger => write!(f, "Ledger"),
            HsmDeviceType::Simulation => write!(f, "Simulation"),
        }
    }
}

/// Firmware/app version reported by the device.
///
/// Ordering is lexicographic on `(major, minor, patch)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DeviceVersion {
    pub major: u8,
    pub minor: u8,
    pub patch: u8,
}

impl DeviceVersion {
    /// First app version able to render the address for confirmation.
    pub const ADDRESS_CONFIRMATION: DeviceVersion = DeviceVersion::new(1, 1, 0);

    pub const fn new(major: u8, minor: u8, patch: u8) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Whether signing must be preceded by an on-device address check.
    ///
    /// Older apps cannot display the address reliably, so the check is
    /// skipped for them rather than enforced.
    pub fn requires_address_confirmation(&self) -> bool {
        *self >= Self::ADDRESS_CONFIRMATION
    }
}

impl fmt::Display for DeviceVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl FromStr for DeviceVersion {
    type Err = HsmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || HsmError::Config(format!("invalid device version '{s}'"));
        let mut parts = s.trim().split('.');
        let mut next = || -> Result<u8, HsmError> {
            parts.next().ok_or_else(invalid)?.parse().map_err(|_| invalid())
        };
        let version = DeviceVersion::new(next()?, next()?, next()?);
        if parts.next().is_some() {
            return Err(invalid());
        }
        Ok(version)
    }
}

impl TryFrom<String> for DeviceVersion {
    type Error = HsmError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DeviceVersion> for String {
    fn from(version: DeviceVersion) -> Self {
        version.to_string()
    }
}
