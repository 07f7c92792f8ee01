//! HSM configuration

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::device::{DeviceVersion, HsmDeviceType};
use crate::error::{HsmError, HsmResult};

/// Settings shared by every key created from the same configuration.
///
/// ```toml
/// device_type = "simulation"
/// address_prefix = "cosmos"
/// app_name = "Cosmos"
///
/// [simulation]
/// seed = "0101010101010101010101010101010101010101010101010101010101010101"
/// firmware_version = "1.2.0"
/// uncompressed_public_key = true
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HsmConfig {
    /// Backend used by discovery
    pub device_type: HsmDeviceType,

    /// Address prefix handed to the device when it renders an address
    pub address_prefix: String,

    /// App that must be open on the device, used in guidance messages
    pub app_name: String,

    /// Software device settings, ignored for other backends
    pub simulation: SimulationConfig,
}

impl Default for HsmConfig {
    fn default() -> Self {
        Self {
            device_type: HsmDeviceType::default(),
            address_prefix: "cosmos".to_string(),
            app_name: "Cosmos".to_string(),
            simulation: SimulationConfig::default(),
        }
    }
}

impl HsmConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(contents: &str) -> HsmResult<Self> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> HsmResult<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&contents)
    }

    pub fn validate(&self) -> HsmResult<()> {
        if self.address_prefix.trim().is_empty() {
            return Err(HsmError::Config("address_prefix must not be empty".to_string()));
        }
        if self.app_name.trim().is_empty() {
            return Err(HsmError::Config("app_name must not be empty".to_string()));
        }
        if self.device_type == HsmDeviceType::Simulation {
            self.simulation.seed_bytes()?;
        }
        Ok(())
    }
}

/// Software device settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// 32-byte hex seed every simulated key is derived from
    pub seed: String,

    /// Version the simulated app reports
    pub firmware_version: DeviceVersion,

    /// Emit 65-byte uncompressed public keys like some real apps do
    pub uncompressed_public_key: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: "01".repeat(32),
            firmware_version: DeviceVersion::new(1, 1, 0),
            uncompressed_public_key: false,
        }
    }
}

impl SimulationConfig {
    pub fn seed_bytes(&self) -> HsmResult<[u8; 32]> {
        let bytes = hex::decode(self.seed.trim())
            .map_err(|e| HsmError::Config(format!("simulation seed is not hex: {e}")))?;
        bytes
            .try_into()
            .map_err(|_| HsmError::Config("simulation seed must be 32 bytes".to_string()))
    }
}
