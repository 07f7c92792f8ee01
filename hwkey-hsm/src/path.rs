//! BIP-32 style derivation paths

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::HsmError;

/// Hardened index offset.
pub const HARDENED: u32 = 0x8000_0000;

/// Ordered list of derivation indices, passed to the device verbatim.
///
/// The device app decides which components it hardens; this type only
/// carries the numbers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DerivationPath(Vec<u32>);

impl DerivationPath {
    pub fn new(components: Vec<u32>) -> Self {
        Self(components)
    }

    /// `[44, coin_type, account, change, index]`
    pub fn bip44(coin_type: u32, account: u32, change: u32, index: u32) -> Self {
        Self(vec![44, coin_type, account, change, index])
    }

    pub fn components(&self) -> &[u32] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<u32>> for DerivationPath {
    fn from(components: Vec<u32>) -> Self {
        Self(components)
    }
}

impl From<&[u32]> for DerivationPath {
    fn from(components: &[u32]) -> Self {
        Self(components.to_vec())
    }
}

impl AsRef<[u32]> for DerivationPath {
    fn as_ref(&self) -> &[u32] {
        &self.0
    }
}

impl fmt::Display for DerivationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "m")?;
        for component in &self.0 {
            if component & HARDENED != 0 {
                write!(f, "/{}'", component & !HARDENED)?;
            } else {
                write!(f, "/{}", component)?;
            }
        }
        Ok(())
    }
}

/// Parses `m/44'/118'/0'/0/0`, `44/118/0/0/0` or `m/44h/118h/0h/0/0`.
impl FromStr for DerivationPath {
    type Err = HsmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let body = trimmed
            .strip_prefix("m/")
            .or_else(|| trimmed.strip_prefix("M/"))
            .unwrap_or(trimmed);

        if body.is_empty() || body == "m" {
            return Err(HsmError::InvalidDerivationPath(s.to_string()));
        }

        body.split('/')
            .map(|part| {
                parse_component(part).ok_or_else(|| HsmError::InvalidDerivationPath(s.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }
}

fn parse_component(part: &str) -> Option<u32> {
    let (digits, hardened) = match part.strip_suffix(['\'', 'h', 'H']) {
        Some(digits) => (digits, true),
        None => (part, false),
    };
    let index: u32 = digits.parse().ok()?;
    if index & HARDENED != 0 {
        return None;
    }
    Some(if hardened { index | HARDENED } else { index })
}
