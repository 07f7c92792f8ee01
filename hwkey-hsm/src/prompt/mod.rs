//! Operator interaction during signing

mod confirm;

pub use confirm::{is_affirmative, Confirmer, IoConfirmer, StdioConfirmer};
