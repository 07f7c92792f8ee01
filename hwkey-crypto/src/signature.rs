//! DER to compact ECDSA signature conversion.
//!
//! Signing devices return ECDSA signatures DER encoded:
//!
//! ```text
//! 0x30 <len> 0x02 <len_r> <r...> 0x02 <len_s> <s...>
//! ```
//!
//! Verification code downstream expects the fixed 64-byte `r || s` layout.
//! Each integer is read through its own length prefix and taken as an
//! unsigned big-endian value, so a `0x00` sign byte or a short integer lands
//! in the right place. The result is re-serialized through
//! [`secp256k1::ecdsa::Signature`] with S normalized to the lower half order.

use secp256k1::ecdsa::Signature;
use secp256k1::{Message, SECP256K1};

use crate::error::{SignatureComponent, SignatureError};
use crate::hash::Crypto;
use crate::public_key::CompressedPublicKey;

/// Length of the `r || s` encoding.
pub const COMPACT_SIGNATURE_SIZE: usize = 64;

const SEQUENCE_TAG: u8 = 0x30;
const INTEGER_TAG: u8 = 0x02;
const SCALAR_SIZE: usize = 32;

struct DerReader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> DerReader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    fn read_byte(&mut self) -> Result<u8, SignatureError> {
        let byte = *self
            .bytes
            .get(self.pos)
            .ok_or(SignatureError::Truncated { offset: self.pos })?;
        self.pos += 1;
        Ok(byte)
    }

    fn expect_tag(&mut self, expected: u8) -> Result<(), SignatureError> {
        let offset = self.pos;
        let found = self.read_byte()?;
        if found != expected {
            return Err(SignatureError::UnexpectedTag {
                expected,
                found,
                offset,
            });
        }
        Ok(())
    }

    /// Short-form lengths only; a signature never exceeds 72 bytes.
    fn read_length(&mut self) -> Result<usize, SignatureError> {
        let offset = self.pos;
        let len = self.read_byte()?;
        if len & 0x80 != 0 {
            return Err(SignatureError::UnsupportedLength { offset });
        }
        Ok(len as usize)
    }

    fn read_slice(&mut self, len: usize) -> Result<&'a [u8], SignatureError> {
        if len > self.remaining() {
            return Err(SignatureError::Truncated {
                offset: self.bytes.len(),
            });
        }
        let slice = &self.bytes[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }

    fn read_scalar(
        &mut self,
        component: SignatureComponent,
    ) -> Result<[u8; SCALAR_SIZE], SignatureError> {
        self.expect_tag(INTEGER_TAG)?;
        let len = self.read_length()?;
        let body = self.read_slice(len)?;

        let first = *body.first().ok_or(SignatureError::EmptyInteger(component))?;
        if first & 0x80 != 0 {
            return Err(SignatureError::NegativeInteger(component));
        }

        let start = body
            .iter()
            .position(|b| *b != 0)
            .ok_or(SignatureError::ZeroInteger(component))?;
        let magnitude = &body[start..];
        if magnitude.len() > SCALAR_SIZE {
            return Err(SignatureError::IntegerTooLarge {
                component,
                len: magnitude.len(),
            });
        }

        let mut scalar = [0u8; SCALAR_SIZE];
        scalar[SCALAR_SIZE - magnitude.len()..].copy_from_slice(magnitude);
        Ok(scalar)
    }
}

/// Convert a DER encoded ECDSA signature to the 64-byte `r || s` form.
///
/// Fails on malformed input: wrong tags, inconsistent lengths, truncation,
/// trailing bytes, negative or zero integers, or scalars outside the curve
/// order.
pub fn der_to_compact(der: &[u8]) -> Result<[u8; COMPACT_SIGNATURE_SIZE], SignatureError> {
    let mut reader = DerReader::new(der);

    reader.expect_tag(SEQUENCE_TAG)?;
    let declared = reader.read_length()?;
    let actual = reader.remaining();
    if declared > actual {
        return Err(SignatureError::Truncated { offset: der.len() });
    }
    if declared < actual {
        return Err(SignatureError::LengthMismatch { declared, actual });
    }

    let r = reader.read_scalar(SignatureComponent::R)?;
    let s = reader.read_scalar(SignatureComponent::S)?;
    if reader.remaining() != 0 {
        return Err(SignatureError::TrailingBytes(reader.remaining()));
    }

    let mut compact = [0u8; COMPACT_SIGNATURE_SIZE];
    compact[..SCALAR_SIZE].copy_from_slice(&r);
    compact[SCALAR_SIZE..].copy_from_slice(&s);

    let mut signature =
        Signature::from_compact(&compact).map_err(|_| SignatureError::ScalarOutOfRange)?;
    signature.normalize_s();
    Ok(signature.serialize_compact())
}

/// Verify a compact signature over `SHA256(message)`.
pub fn verify_signature(
    public_key: &CompressedPublicKey,
    message: &[u8],
    signature: &[u8; COMPACT_SIGNATURE_SIZE],
) -> Result<(), SignatureError> {
    let key = secp256k1::PublicKey::from_slice(public_key.as_bytes())
        .map_err(|_| SignatureError::InvalidSignature)?;
    let signature =
        Signature::from_compact(signature).map_err(|_| SignatureError::InvalidSignature)?;
    let digest = Message::from_digest_slice(&Crypto::sha256(message))
        .map_err(|_| SignatureError::InvalidSignature)?;

    SECP256K1
        .verify_ecdsa(&digest, &signature, &key)
        .map_err(|_| SignatureError::VerificationFailed)
}
