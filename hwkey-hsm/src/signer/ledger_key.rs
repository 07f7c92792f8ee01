//! secp256k1 private key that lives on a Ledger device

use std::any::Any;
use std::fmt;

use hwkey_crypto::{
    der_to_compact, normalize_public_key, AccountAddress, CompressedPublicKey,
    COMPACT_SIGNATURE_SIZE,
};
use serde::{Deserialize, Serialize};

use super::address_format::{AddressFormat, HexAddressFormat};
use crate::config::HsmConfig;
use crate::device::LedgerSecp256k1;
use crate::discovery::Discovery;
use crate::error::{HsmError, HsmResult};
use crate::path::DerivationPath;
use crate::prompt::{is_affirmative, Confirmer, StdioConfirmer};

/// Persistable part of a [`LedgerKey`].
///
/// Keeping the public key lets the address be shown without the device
/// attached; the device handle itself is never serialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerKeyRecord {
    pub cached_public_key: CompressedPublicKey,
    pub path: DerivationPath,
}

impl LedgerKeyRecord {
    pub fn to_bytes(&self) -> HsmResult<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> HsmResult<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

/// A private key held by a Ledger device, used as if it were in memory.
///
/// The public key for [`path`](Self::path) is fetched once at construction
/// and cached. The device is owned exclusively by the key; `&mut self` on
/// every device-touching method keeps one call in flight at a time.
pub struct LedgerKey {
    path: DerivationPath,
    cached_public_key: CompressedPublicKey,
    device: Box<dyn LedgerSecp256k1>,
    config: HsmConfig,
    address_format: Box<dyn AddressFormat>,
}

impl LedgerKey {
    /// Discover a device and cache the public key for `path`.
    pub fn new(path: DerivationPath, discovery: &Discovery, config: &HsmConfig) -> HsmResult<Self> {
        let device = discovery.discover()?;
        Self::with_device(path, device, config)
    }

    /// Wrap an already connected device and cache the public key for `path`.
    pub fn with_device(
        path: DerivationPath,
        mut device: Box<dyn LedgerSecp256k1>,
        config: &HsmConfig,
    ) -> HsmResult<Self> {
        let cached_public_key = derive_public_key(&mut *device, &path, &config.app_name)?;

        tracing::info!(
            target: "hwkey::hsm",
            path = %path,
            public_key = %cached_public_key,
            "Ledger key ready"
        );

        Ok(Self {
            path,
            cached_public_key,
            device,
            config: config.clone(),
            address_format: Box::new(HexAddressFormat),
        })
    }

    /// Reattach a device to a stored key and check it still derives the
    /// same public key.
    pub fn restore(
        record: LedgerKeyRecord,
        discovery: &Discovery,
        config: &HsmConfig,
    ) -> HsmResult<Self> {
        let device = discovery.discover()?;
        let mut key = Self {
            path: record.path,
            cached_public_key: record.cached_public_key,
            device,
            config: config.clone(),
            address_format: Box::new(HexAddressFormat),
        };
        key.validate()?;
        Ok(key)
    }

    /// Use `format` to render addresses in confirmation prompts.
    pub fn with_address_format(mut self, format: impl AddressFormat + 'static) -> Self {
        self.address_format = Box::new(format);
        self
    }

    pub fn path(&self) -> &DerivationPath {
        &self.path
    }

    /// Cached public key. No device access.
    pub fn public_key(&self) -> CompressedPublicKey {
        self.cached_public_key
    }

    pub fn address(&self) -> AccountAddress {
        self.cached_public_key.address()
    }

    /// Address as the operator should see it on the device.
    pub fn display_address(&self) -> String {
        self.address_format
            .format(&self.config.address_prefix, &self.address())
    }

    /// Re-derive the public key from the device and compare it with the
    /// cached one. A mismatch means the key must not be trusted.
    pub fn validate(&mut self) -> HsmResult<()> {
        let retrieved =
            derive_public_key(&mut *self.device, &self.path, &self.config.app_name)?;

        if retrieved != self.cached_public_key {
            tracing::warn!(
                target: "hwkey::hsm",
                path = %self.path,
                cached = %self.cached_public_key,
                retrieved = %retrieved,
                "cached key does not match device"
            );
            return Err(HsmError::KeyMismatch {
                cached: self.cached_public_key,
                retrieved,
            });
        }

        tracing::debug!(target: "hwkey::hsm", path = %self.path, "cached key validated");
        Ok(())
    }

    /// Sign `message` on the device.
    ///
    /// Apps from version 1.1 on first show the address on screen and the
    /// operator must confirm it through `confirmer`; anything but `y`/`yes`
    /// aborts before the device is asked to sign. The returned signature is
    /// the 64-byte `r || s` form.
    pub fn sign(
        &mut self,
        message: &[u8],
        confirmer: &mut dyn Confirmer,
    ) -> HsmResult<[u8; COMPACT_SIGNATURE_SIZE]> {
        let version = self.device.get_version()?;
        tracing::debug!(target: "hwkey::hsm", %version, "Ledger app version");

        if version.requires_address_confirmation() {
            self.confirm_address(confirmer)?;
        }

        confirmer.notify("Please verify the transaction data on ledger")?;

        let der = self.device.sign(&self.path, message)?;
        let signature = der_to_compact(&der)?;

        tracing::info!(target: "hwkey::hsm", path = %self.path, "message signed on Ledger");
        Ok(signature)
    }

    /// [`sign`](Self::sign) with the process terminal as confirmer.
    pub fn sign_interactive(&mut self, message: &[u8]) -> HsmResult<[u8; COMPACT_SIGNATURE_SIZE]> {
        self.sign(message, &mut StdioConfirmer)
    }

    fn confirm_address(&mut self, confirmer: &mut dyn Confirmer) -> HsmResult<()> {
        confirmer.prompt(&format!(
            "Please confirm if address displayed on ledger is identical to {} (yes/no)?",
            self.display_address()
        ))?;

        self.device
            .show_address(&self.path, &self.config.address_prefix)?;

        let answer = confirmer.read_line()?;
        if !is_affirmative(&answer) {
            tracing::warn!(target: "hwkey::hsm", path = %self.path, "operator rejected address");
            return Err(HsmError::UserRejected);
        }
        Ok(())
    }

    pub fn record(&self) -> LedgerKeyRecord {
        LedgerKeyRecord {
            cached_public_key: self.cached_public_key,
            path: self.path.clone(),
        }
    }

    /// Serialized [`LedgerKeyRecord`].
    pub fn to_bytes(&self) -> HsmResult<Vec<u8>> {
        self.record().to_bytes()
    }

    /// Equality against a value of unknown type. Only another `LedgerKey`
    /// with the same cached public key compares equal.
    pub fn equals_key(&self, other: &dyn Any) -> bool {
        other
            .downcast_ref::<LedgerKey>()
            .is_some_and(|other| other == self)
    }
}

impl PartialEq for LedgerKey {
    fn eq(&self, other: &Self) -> bool {
        self.cached_public_key == other.cached_public_key
    }
}

impl Eq for LedgerKey {}

impl fmt::Debug for LedgerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LedgerKey")
            .field("path", &self.path)
            .field("cached_public_key", &self.cached_public_key)
            .finish_non_exhaustive()
    }
}

/// Fetch the public key for `path` and re-serialize it compressed.
fn derive_public_key(
    device: &mut dyn LedgerSecp256k1,
    path: &DerivationPath,
    app_name: &str,
) -> HsmResult<CompressedPublicKey> {
    let raw = device
        .get_public_key(path)
        .map_err(|err| HsmError::PublicKeyUnavailable {
            app: app_name.to_string(),
            source: Box::new(err),
        })?;

    Ok(normalize_public_key(&raw)?)
}
