//! Error types for signature and public key handling

use std::fmt;

/// Which integer of an ECDSA signature an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureComponent {
    R,
    S,
}

impl fmt::Display for SignatureComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignatureComponent::R => write!(f, "r"),
            SignatureComponent::S => write!(f, "s"),
        }
    }
}

/// Errors returned while decoding or verifying a signature.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SignatureError {
    #[error("signature truncated at offset {offset}")]
    Truncated { offset: usize },

    #[error("expected tag 0x{expected:02x} at offset {offset}, found 0x{found:02x}")]
    UnexpectedTag {
        expected: u8,
        found: u8,
        offset: usize,
    },

    #[error("unsupported long-form length at offset {offset}")]
    UnsupportedLength { offset: usize },

    #[error("sequence length {declared} does not match {actual} remaining bytes")]
    LengthMismatch { declared: usize, actual: usize },

    #[error("{0} trailing bytes after signature")]
    TrailingBytes(usize),

    #[error("empty integer for {0}")]
    EmptyInteger(SignatureComponent),

    #[error("negative integer for {0}")]
    NegativeInteger(SignatureComponent),

    #[error("zero integer for {0}")]
    ZeroInteger(SignatureComponent),

    #[error("integer {component} is {len} bytes, exceeds 32")]
    IntegerTooLarge {
        component: SignatureComponent,
        len: usize,
    },

    #[error("signature scalar out of range for secp256k1")]
    ScalarOutOfRange,

    #[error("invalid signature payload")]
    InvalidSignature,

    #[error("signature verification failed")]
    VerificationFailed,
}

/// Errors returned while parsing a public key.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PublicKeyError {
    #[error("unsupported public key length {0}")]
    InvalidLength(usize),

    #[error("bytes are not a valid secp256k1 point")]
    InvalidPoint,

    #[error("invalid hex encoding: {0}")]
    InvalidHex(String),
}
