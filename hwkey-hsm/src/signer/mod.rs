//! Hardware-backed key abstraction

mod address_format;
mod ledger_key;

pub use address_format::{AddressFormat, HexAddressFormat};
pub use ledger_key::{LedgerKey, LedgerKeyRecord};
