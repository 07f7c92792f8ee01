//! HSM Error types

use hwkey_crypto::{CompressedPublicKey, PublicKeyError, SignatureError};
use thiserror::Error;

/// Result type for HSM operations
pub type HsmResult<T> = std::result::Result<T, HsmError>;

/// HSM error types
#[derive(Error, Debug)]
pub enum HsmError {
    /// No discovery function was registered at startup
    #[error("no Ledger discovery function defined")]
    NotConfigured,

    /// Discovery ran but did not produce a device
    #[error("failed to create ledger key: {0}")]
    DiscoveryFailed(Box<HsmError>),

    /// Device not found
    #[error("Device not found: {0}")]
    DeviceNotFound(String),

    /// Ledger specific status error
    #[error("Ledger error: {0}")]
    LedgerError(String),

    /// Public key retrieval failed, usually because the wrong app is open
    #[error("please open the {app} app on the Ledger device - error: {source}")]
    PublicKeyUnavailable {
        app: String,
        #[source]
        source: Box<HsmError>,
    },

    /// Device returned bytes that are not a valid public key
    #[error("Invalid key format: {0}")]
    InvalidKeyFormat(#[from] PublicKeyError),

    /// Device returned a malformed signature
    #[error("Invalid signature: {0}")]
    InvalidSignature(#[from] SignatureError),

    /// Cached key differs from the one the device derives now
    #[error("cached key does not match retrieved key (cached {cached}, retrieved {retrieved})")]
    KeyMismatch {
        cached: CompressedPublicKey,
        retrieved: CompressedPublicKey,
    },

    /// Operator declined the address confirmation
    #[error("ledger account doesn't match")]
    UserRejected,

    /// Invalid derivation path
    #[error("Invalid derivation path: {0}")]
    InvalidDerivationPath(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Record (de)serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<toml::de::Error> for HsmError {
    fn from(err: toml::de::Error) -> Self {
        HsmError::Config(err.to_string())
    }
}
