//! Rendering of account addresses in operator prompts

use hwkey_crypto::AccountAddress;

/// Turns an account address into the string the device shows on screen.
///
/// The device renders addresses in its own format (bech32 for Cosmos apps);
/// the application supplies the matching encoder so the operator can compare
/// the two side by side. Any `Fn(&str, &AccountAddress) -> String` works.
pub trait AddressFormat: Send + Sync {
    fn format(&self, prefix: &str, address: &AccountAddress) -> String;
}

impl<F> AddressFormat for F
where
    F: Fn(&str, &AccountAddress) -> String + Send + Sync,
{
    fn format(&self, prefix: &str, address: &AccountAddress) -> String {
        self(prefix, address)
    }
}

/// `<prefix>:<hex address>`, used when no encoder is registered.
#[derive(Debug, Default, Clone, Copy)]
pub struct HexAddressFormat;

impl AddressFormat for HexAddressFormat {
    fn format(&self, prefix: &str, address: &AccountAddress) -> String {
        format!("{}:{}", prefix, address.to_hex())
    }
}
