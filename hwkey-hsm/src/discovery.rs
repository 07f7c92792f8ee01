//! Device discovery
//!
//! Builds that ship a device transport register a discovery function once at
//! startup and hand the resulting [`Discovery`] to whoever creates keys.
//! Builds without one keep the default, unconfigured value and key creation
//! fails with [`HsmError::NotConfigured`] instead of reaching for hardware.

use std::fmt;
use std::sync::Arc;

use crate::config::HsmConfig;
use crate::device::{HsmDeviceType, LedgerSecp256k1};
use crate::error::{HsmError, HsmResult};

type DiscoverFn = dyn Fn() -> HsmResult<Box<dyn LedgerSecp256k1>> + Send + Sync;

/// Source of connected devices.
#[derive(Clone, Default)]
pub struct Discovery {
    discover: Option<Arc<DiscoverFn>>,
}

impl Discovery {
    /// Discovery with no backend registered.
    pub fn unconfigured() -> Self {
        Self::default()
    }

    /// Register `discover` as the device source.
    pub fn new<F>(discover: F) -> Self
    where
        F: Fn() -> HsmResult<Box<dyn LedgerSecp256k1>> + Send + Sync + 'static,
    {
        Self {
            discover: Some(Arc::new(discover)),
        }
    }

    /// Discovery for the backend named in `config`.
    ///
    /// Ledger hardware needs a transport registered by the embedding
    /// application through [`Discovery::new`]; on its own it stays
    /// unconfigured.
    pub fn from_config(config: &HsmConfig) -> HsmResult<Self> {
        match config.device_type {
            HsmDeviceType::Ledger => Ok(Self::unconfigured()),
            #[cfg(feature = "simulation")]
            HsmDeviceType::Simulation => {
                let device = crate::simulation::SimulatedLedger::from_config(&config.simulation)?;
                Ok(Self::new(move || Ok(Box::new(device.clone()))))
            }
            #[cfg(not(feature = "simulation"))]
            HsmDeviceType::Simulation => Err(HsmError::Config(
                "simulation backend not compiled in (enable the `simulation` feature)".to_string(),
            )),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.discover.is_some()
    }

    /// Run the registered discovery function once.
    pub fn discover(&self) -> HsmResult<Box<dyn LedgerSecp256k1>> {
        let discover = self.discover.as_ref().ok_or(HsmError::NotConfigured)?;
        discover().map_err(|err| HsmError::DiscoveryFailed(Box::new(err)))
    }
}

impl fmt::Debug for Discovery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Discovery")
            .field("configured", &self.is_configured())
            .finish()
    }
}
