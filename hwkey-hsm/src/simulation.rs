//! Software device for testing without hardware
//!
//! Keys are derived from a 32-byte seed and the requested path, so the same
//! seed always yields the same public key for a path. Clones share state:
//! a test can keep one clone as a handle while a [`LedgerKey`](crate::LedgerKey)
//! owns another, then inspect the recorded calls or change the device's
//! behaviour underneath the key.

use std::collections::HashMap;
use std::sync::Arc;

use hwkey_crypto::{CompressedPublicKey, Crypto};
use parking_lot::Mutex;
use secp256k1::{Message, SecretKey, SECP256K1};

use crate::config::SimulationConfig;
use crate::device::{DeviceVersion, LedgerSecp256k1};
use crate::error::{HsmError, HsmResult};
use crate::path::DerivationPath;

/// Device operation, used to script failures and count calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceOp {
    GetPublicKey,
    ShowAddress,
    Sign,
    GetVersion,
}

/// A call received by the simulated device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceCall {
    GetPublicKey(DerivationPath),
    ShowAddress {
        path: DerivationPath,
        address_prefix: String,
    },
    Sign {
        path: DerivationPath,
        message: Vec<u8>,
    },
    GetVersion,
}

impl DeviceCall {
    pub fn op(&self) -> DeviceOp {
        match self {
            DeviceCall::GetPublicKey(_) => DeviceOp::GetPublicKey,
            DeviceCall::ShowAddress { .. } => DeviceOp::ShowAddress,
            DeviceCall::Sign { .. } => DeviceOp::Sign,
            DeviceCall::GetVersion => DeviceOp::GetVersion,
        }
    }
}

#[derive(Debug)]
struct SimulationState {
    seed: [u8; 32],
    version: DeviceVersion,
    uncompressed: bool,
    public_key_override: Option<Vec<u8>>,
    signature_override: Option<Vec<u8>>,
    failures: HashMap<DeviceOp, String>,
    calls: Vec<DeviceCall>,
}

/// In-process stand-in for a Ledger running a secp256k1 app.
#[derive(Debug, Clone)]
pub struct SimulatedLedger {
    state: Arc<Mutex<SimulationState>>,
}

impl SimulatedLedger {
    pub fn new(seed: [u8; 32], version: DeviceVersion) -> Self {
        Self {
            state: Arc::new(Mutex::new(SimulationState {
                seed,
                version,
                uncompressed: false,
                public_key_override: None,
                signature_override: None,
                failures: HashMap::new(),
                calls: Vec::new(),
            })),
        }
    }

    pub fn from_config(config: &SimulationConfig) -> HsmResult<Self> {
        let device = Self::new(config.seed_bytes()?, config.firmware_version);
        device.set_uncompressed_public_key(config.uncompressed_public_key);
        Ok(device)
    }

    /// Emit 65-byte uncompressed public keys.
    pub fn set_uncompressed_public_key(&self, uncompressed: bool) {
        self.state.lock().uncompressed = uncompressed;
    }

    pub fn set_version(&self, version: DeviceVersion) {
        self.state.lock().version = version;
    }

    /// Switch to another seed, as if a different device had been plugged in.
    pub fn set_seed(&self, seed: [u8; 32]) {
        self.state.lock().seed = seed;
    }

    /// Return these bytes from `get_public_key` instead of the derived key.
    pub fn set_public_key_override(&self, bytes: Option<Vec<u8>>) {
        self.state.lock().public_key_override = bytes;
    }

    /// Return these bytes from `sign` instead of a real signature.
    pub fn set_signature_override(&self, bytes: Option<Vec<u8>>) {
        self.state.lock().signature_override = bytes;
    }

    /// Make `op` fail with a Ledger status error until cleared.
    pub fn fail(&self, op: DeviceOp, message: impl Into<String>) {
        self.state.lock().failures.insert(op, message.into());
    }

    pub fn clear_failures(&self) {
        self.state.lock().failures.clear();
    }

    pub fn calls(&self) -> Vec<DeviceCall> {
        self.state.lock().calls.clone()
    }

    pub fn call_count(&self, op: DeviceOp) -> usize {
        self.state
            .lock()
            .calls
            .iter()
            .filter(|call| call.op() == op)
            .count()
    }

    /// The key this device derives for `path`, without recording a call.
    pub fn expected_public_key(&self, path: &DerivationPath) -> CompressedPublicKey {
        let seed = self.state.lock().seed;
        let secret = derive_secret(&seed, path);
        CompressedPublicKey::from(secp256k1::PublicKey::from_secret_key(SECP256K1, &secret))
    }

    fn record(&self, call: DeviceCall) -> HsmResult<()> {
        let op = call.op();
        tracing::debug!(target: "hwkey::hsm", ?op, "simulated device call");

        let mut state = self.state.lock();
        state.calls.push(call);
        match state.failures.get(&op) {
            Some(message) => Err(HsmError::LedgerError(message.clone())),
            None => Ok(()),
        }
    }
}

impl LedgerSecp256k1 for SimulatedLedger {
    fn get_public_key(&mut self, path: &DerivationPath) -> HsmResult<Vec<u8>> {
        self.record(DeviceCall::GetPublicKey(path.clone()))?;

        let state = self.state.lock();
        if let Some(bytes) = &state.public_key_override {
            return Ok(bytes.clone());
        }

        let secret = derive_secret(&state.seed, path);
        let public_key = secp256k1::PublicKey::from_secret_key(SECP256K1, &secret);
        Ok(if state.uncompressed {
            public_key.serialize_uncompressed().to_vec()
        } else {
            public_key.serialize().to_vec()
        })
    }

    fn show_address(&mut self, path: &DerivationPath, address_prefix: &str) -> HsmResult<()> {
        self.record(DeviceCall::ShowAddress {
            path: path.clone(),
            address_prefix: address_prefix.to_string(),
        })
    }

    fn sign(&mut self, path: &DerivationPath, message: &[u8]) -> HsmResult<Vec<u8>> {
        self.record(DeviceCall::Sign {
            path: path.clone(),
            message: message.to_vec(),
        })?;

        let state = self.state.lock();
        if let Some(bytes) = &state.signature_override {
            return Ok(bytes.clone());
        }

        let secret = derive_secret(&state.seed, path);
        let digest = Message::from_digest(Crypto::sha256(message));
        Ok(SECP256K1.sign_ecdsa(&digest, &secret).serialize_der().to_vec())
    }

    fn get_version(&mut self) -> HsmResult<DeviceVersion> {
        self.record(DeviceCall::GetVersion)?;
        Ok(self.state.lock().version)
    }
}

/// `SHA256(seed || path || counter)`, retried until it is a valid scalar.
fn derive_secret(seed: &[u8; 32], path: &DerivationPath) -> SecretKey {
    let mut counter = 0u32;
    loop {
        let mut data = Vec::with_capacity(32 + path.len() * 4 + 4);
        data.extend_from_slice(seed);
        for component in path.components() {
            data.extend_from_slice(&component.to_be_bytes());
        }
        data.extend_from_slice(&counter.to_be_bytes());

        if let Ok(secret) = SecretKey::from_slice(&Crypto::sha256(&data)) {
            return secret;
        }
        counter = counter.wrapping_add(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hwkey_crypto::{der_to_compact, normalize_public_key, verify_signature};

    fn device() -> SimulatedLedger {
        SimulatedLedger::new([3u8; 32], DeviceVersion::new(1, 1, 0))
    }

    #[test]
    fn keys_depend_on_seed_and_path() {
        let device = device();
        let a = device.expected_public_key(&DerivationPath::bip44(118, 0, 0, 0));
        let b = device.expected_public_key(&DerivationPath::bip44(118, 0, 0, 1));
        assert_ne!(a, b);

        device.set_seed([4u8; 32]);
        assert_ne!(a, device.expected_public_key(&DerivationPath::bip44(118, 0, 0, 0)));
    }

    #[test]
    fn uncompressed_output_describes_same_point() {
        let mut device = device();
        let path = DerivationPath::bip44(118, 0, 0, 0);
        let compressed = device.get_public_key(&path).unwrap();
        device.set_uncompressed_public_key(true);
        let uncompressed = device.get_public_key(&path).unwrap();

        assert_eq!(compressed.len(), 33);
        assert_eq!(uncompressed.len(), 65);
        assert_eq!(
            normalize_public_key(&uncompressed).unwrap().as_bytes().as_slice(),
            compressed.as_slice()
        );
    }

    #[test]
    fn signatures_verify_against_derived_key() {
        let mut device = device();
        let path = DerivationPath::bip44(118, 0, 0, 0);
        let der = device.sign(&path, b"payload").unwrap();
        let compact = der_to_compact(&der).unwrap();
        verify_signature(&device.expected_public_key(&path), b"payload", &compact).unwrap();
    }

    #[test]
    fn scripted_failures_and_call_log() {
        let mut device = device();
        let handle = device.clone();
        handle.fail(DeviceOp::GetVersion, "Cosmos app not open");

        let err = device.get_version().unwrap_err();
        assert_eq!(err.to_string(), "Ledger error: Cosmos app not open");
        handle.clear_failures();
        assert_eq!(device.get_version().unwrap(), DeviceVersion::new(1, 1, 0));

        assert_eq!(handle.call_count(DeviceOp::GetVersion), 2);
        assert_eq!(handle.calls(), vec![DeviceCall::GetVersion, DeviceCall::GetVersion]);
    }
}
