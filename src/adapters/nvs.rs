//! NVS (Non-Volatile Storage) adapter.
//!
//! Implements [`ConfigPort`]: the [`SystemConfig`] is stored as one
//! `postcard` blob under key `syscfg` in namespace `awning`.  Motion state
//! is never written here; after a power cut the controller resynchronises
//! from the remote store.
//!
//! - Config validation: every field is range-checked before persistence.
//! - Atomic writes: ESP-IDF NVS commits are atomic per blob.

use core::cell::RefCell;

use log::{info, warn};

use crate::app::ports::{ConfigError, ConfigPort};
use crate::config::SystemConfig;

#[cfg(feature = "espidf")]
use esp_idf_svc::nvs::{EspDefaultNvsPartition, EspNvs, NvsDefault};

const CONFIG_NAMESPACE: &str = "awning";
const CONFIG_KEY: &str = "syscfg";

/// Upper bound on the encoded config blob.
const MAX_BLOB_SIZE: usize = 512;

pub struct NvsAdapter {
    #[cfg(feature = "espidf")]
    nvs: RefCell<EspNvs<NvsDefault>>,
    #[cfg(not(feature = "espidf"))]
    blob: RefCell<Option<std::vec::Vec<u8>>>,
}

impl NvsAdapter {
    /// Open the `awning` namespace on the default partition.
    #[cfg(feature = "espidf")]
    pub fn new(partition: EspDefaultNvsPartition) -> Result<Self, ConfigError> {
        let nvs = EspNvs::new(partition, CONFIG_NAMESPACE, true).map_err(|e| {
            warn!("NvsAdapter: open '{}' failed: {}", CONFIG_NAMESPACE, e);
            ConfigError::IoError
        })?;
        info!("NvsAdapter: ESP-IDF NVS namespace '{}' open", CONFIG_NAMESPACE);
        Ok(Self {
            nvs: RefCell::new(nvs),
        })
    }

    #[cfg(not(feature = "espidf"))]
    pub fn new() -> Result<Self, ConfigError> {
        info!("NvsAdapter: simulation backend");
        Ok(Self {
            blob: RefCell::new(None),
        })
    }

    #[cfg(feature = "espidf")]
    fn read_blob(&self, buf: &mut [u8]) -> Result<Option<usize>, ConfigError> {
        match self.nvs.borrow().get_blob(CONFIG_KEY, buf) {
            Ok(found) => Ok(found.map(<[u8]>::len)),
            Err(e) => {
                warn!("NvsAdapter: read error {}", e);
                Err(ConfigError::IoError)
            }
        }
    }

    #[cfg(not(feature = "espidf"))]
    fn read_blob(&self, buf: &mut [u8]) -> Result<Option<usize>, ConfigError> {
        match self.blob.borrow().as_deref() {
            Some(data) if data.len() > buf.len() => Err(ConfigError::Corrupted),
            Some(data) => {
                buf[..data.len()].copy_from_slice(data);
                Ok(Some(data.len()))
            }
            None => Ok(None),
        }
    }

    #[cfg(feature = "espidf")]
    fn write_blob(&self, data: &[u8]) -> Result<(), ConfigError> {
        self.nvs
            .borrow_mut()
            .set_blob(CONFIG_KEY, data)
            .map_err(|e| {
                warn!("NvsAdapter: write error {}", e);
                ConfigError::IoError
            })
    }

    #[cfg(not(feature = "espidf"))]
    fn write_blob(&self, data: &[u8]) -> Result<(), ConfigError> {
        *self.blob.borrow_mut() = Some(data.to_vec());
        Ok(())
    }
}

impl ConfigPort for NvsAdapter {
    fn load(&self) -> Result<SystemConfig, ConfigError> {
        let mut buf = [0u8; MAX_BLOB_SIZE];
        let Some(len) = self.read_blob(&mut buf)? else {
            info!("NvsAdapter: no stored config, using defaults");
            return Ok(SystemConfig::default());
        };
        let cfg: SystemConfig =
            postcard::from_bytes(&buf[..len]).map_err(|_| ConfigError::Corrupted)?;
        cfg.validate()?;
        info!("NvsAdapter: loaded config ({} bytes)", len);
        Ok(cfg)
    }

    fn save(&self, config: &SystemConfig) -> Result<(), ConfigError> {
        config.validate()?;
        let bytes = postcard::to_allocvec(config).map_err(|_| ConfigError::IoError)?;
        if bytes.len() > MAX_BLOB_SIZE {
            return Err(ConfigError::StorageFull);
        }
        self.write_blob(&bytes)?;
        info!("NvsAdapter: config saved ({} bytes)", bytes.len());
        Ok(())
    }
}
