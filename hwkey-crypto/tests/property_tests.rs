//! Property-based tests for hwkey-crypto
//!
//! These tests use proptest to verify:
//! - DER conversion agrees with the library's own compact encoding
//! - Conversion is invariant to leading zero padding on either integer
//! - Malformed input is rejected without panicking
//! - Public key normalization always yields a compressed point

use hwkey_crypto::{der_to_compact, normalize_public_key, COMPRESSED_PUBLIC_KEY_SIZE};
use proptest::prelude::*;
use secp256k1::{Message, Secp256k1, SecretKey};

fn signature_for(secret: [u8; 32], digest: [u8; 32]) -> Option<secp256k1::ecdsa::Signature> {
    let secret = SecretKey::from_slice(&secret).ok()?;
    let message = Message::from_digest_slice(&digest).ok()?;
    Some(Secp256k1::new().sign_ecdsa(&message, &secret))
}

/// Minimal DER integer body with `extra` redundant leading zero bytes.
fn integer_body(scalar: &[u8], extra: usize) -> Vec<u8> {
    let start = scalar.iter().position(|b| *b != 0).unwrap_or(scalar.len() - 1);
    let mut body = vec![0u8; extra];
    if scalar[start] & 0x80 != 0 {
        body.push(0x00);
    }
    body.extend_from_slice(&scalar[start..]);
    body
}

fn encode_der(r: &[u8], s: &[u8]) -> Vec<u8> {
    let mut out = vec![0x30, (4 + r.len() + s.len()) as u8, 0x02, r.len() as u8];
    out.extend_from_slice(r);
    out.extend_from_slice(&[0x02, s.len() as u8]);
    out.extend_from_slice(s);
    out
}

proptest! {
    // =========================================================================
    // Conversion
    // =========================================================================

    /// Library DER output converts to exactly the library compact output
    #[test]
    fn test_der_matches_compact(secret in any::<[u8; 32]>(), digest in any::<[u8; 32]>()) {
        if let Some(signature) = signature_for(secret, digest) {
            let compact = der_to_compact(&signature.serialize_der()).unwrap();
            prop_assert_eq!(compact, signature.serialize_compact());
        }
    }

    /// Redundant zero bytes in front of r or s do not change the result
    #[test]
    fn test_padding_invariance(
        secret in any::<[u8; 32]>(),
        digest in any::<[u8; 32]>(),
        pad_r in 0usize..=1,
        pad_s in 0usize..=1,
    ) {
        if let Some(signature) = signature_for(secret, digest) {
            let compact = signature.serialize_compact();
            let encoded = encode_der(
                &integer_body(&compact[..32], pad_r),
                &integer_body(&compact[32..], pad_s),
            );
            prop_assert_eq!(der_to_compact(&encoded).unwrap(), compact);
        }
    }

    // =========================================================================
    // Robustness
    // =========================================================================

    /// Every strict prefix of a valid signature is rejected
    #[test]
    fn test_truncation_rejected(secret in any::<[u8; 32]>(), digest in any::<[u8; 32]>(), cut in 0usize..72) {
        if let Some(signature) = signature_for(secret, digest) {
            let der = signature.serialize_der();
            let cut = cut.min(der.len() - 1);
            prop_assert!(der_to_compact(&der[..cut]).is_err());
        }
    }

    /// Arbitrary bytes never panic
    #[test]
    fn test_arbitrary_input_never_panics(data in proptest::collection::vec(any::<u8>(), 0..96)) {
        let _ = der_to_compact(&data);
    }

    /// Replacing a tag byte is always rejected
    #[test]
    fn test_tag_mismatch_rejected(
        secret in any::<[u8; 32]>(),
        digest in any::<[u8; 32]>(),
        replacement in any::<u8>(),
    ) {
        prop_assume!(replacement != 0x30 && replacement != 0x02);
        if let Some(signature) = signature_for(secret, digest) {
            let der = signature.serialize_der().to_vec();

            let mut bad_sequence = der.clone();
            bad_sequence[0] = replacement;
            prop_assert!(der_to_compact(&bad_sequence).is_err());

            let mut bad_integer = der;
            bad_integer[2] = replacement;
            prop_assert!(der_to_compact(&bad_integer).is_err());
        }
    }

    // =========================================================================
    // Public keys
    // =========================================================================

    /// Both point encodings normalize to the same compressed key
    #[test]
    fn test_public_key_always_compressed(secret in any::<[u8; 32]>()) {
        if let Ok(secret) = SecretKey::from_slice(&secret) {
            let key = secp256k1::PublicKey::from_secret_key(&Secp256k1::new(), &secret);

            let from_compressed = normalize_public_key(&key.serialize()).unwrap();
            let from_uncompressed = normalize_public_key(&key.serialize_uncompressed()).unwrap();

            prop_assert_eq!(from_compressed, from_uncompressed);
            prop_assert_eq!(from_compressed.as_bytes().len(), COMPRESSED_PUBLIC_KEY_SIZE);
            prop_assert!(matches!(from_compressed.as_bytes()[0], 0x02 | 0x03));
        }
    }
}
