//! # Harvest Configuration
//!
//! Configuration management for the field client.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     HARVEST_VERIFY_HOST=https://verify.example.org                     │
//! │     HARVEST_DEVICE_ID=abc-123                                          │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/tracker/harvest.toml (Linux)                             │
//! │     ~/Library/Application Support/com.harvest.tracker/harvest.toml     │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     blockchain-verify.com, qrserver.com, auto-generated device_id      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # harvest.toml
//! [device]
//! id = "550e8400-e29b-41d4-a716-446655440000"
//! name = "Field Tablet 3"
//!
//! [verify]
//! base_host = "https://blockchain-verify.com"
//! scan_service = "https://api.qrserver.com/v1/create-qr-code/"
//! scan_size = 200
//!
//! [batch]
//! prefix = "BATCH"
//!
//! [ledger]
//! simulated_latency_ms = 2000
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};
use uuid::Uuid;

use harvest_core::verify::{DEFAULT_SCAN_SERVICE, DEFAULT_SCAN_SIZE, DEFAULT_VERIFY_HOST};
use harvest_core::VerifyLinkBuilder;

use crate::error::{FlowError, FlowResult};

/// Smallest and largest scan image edge, in pixels.
const SCAN_SIZE_LIMITS: (u32, u32) = (50, 1000);

// =============================================================================
// Device Configuration
// =============================================================================

/// Configuration for this device.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceConfig {
    /// Unique device identifier (UUID v4).
    /// Auto-generated on first run if not provided.
    #[serde(default = "generate_device_id")]
    pub id: String,

    /// Human-readable device name.
    #[serde(default = "default_device_name")]
    pub name: String,
}

fn generate_device_id() -> String {
    Uuid::new_v4().to_string()
}

fn default_device_name() -> String {
    "Field Device".to_string()
}

impl Default for DeviceConfig {
    fn default() -> Self {
        DeviceConfig {
            id: generate_device_id(),
            name: default_device_name(),
        }
    }
}

// =============================================================================
// Verification Settings
// =============================================================================

/// Where verification links point and how scan images are rendered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifySettings {
    /// Host serving `/batch/{id}` pages.
    #[serde(default = "default_base_host")]
    pub base_host: String,

    /// Scannable-code rendering service.
    #[serde(default = "default_scan_service")]
    pub scan_service: String,

    /// Scan image edge length (pixels).
    #[serde(default = "default_scan_size")]
    pub scan_size: u32,
}

fn default_base_host() -> String {
    DEFAULT_VERIFY_HOST.to_string()
}

fn default_scan_service() -> String {
    DEFAULT_SCAN_SERVICE.to_string()
}

fn default_scan_size() -> u32 {
    DEFAULT_SCAN_SIZE
}

impl Default for VerifySettings {
    fn default() -> Self {
        VerifySettings {
            base_host: default_base_host(),
            scan_service: default_scan_service(),
            scan_size: default_scan_size(),
        }
    }
}

// =============================================================================
// Batch Settings
// =============================================================================

/// Batch identifier format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchSettings {
    /// Leading token of every batch identifier.
    #[serde(default = "default_batch_prefix")]
    pub prefix: String,
}

fn default_batch_prefix() -> String {
    "BATCH".to_string()
}

impl Default for BatchSettings {
    fn default() -> Self {
        BatchSettings {
            prefix: default_batch_prefix(),
        }
    }
}

// =============================================================================
// Ledger Settings
// =============================================================================

/// Settings for the built-in simulated ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerSettings {
    /// Artificial acknowledgment delay (milliseconds).
    #[serde(default = "default_simulated_latency")]
    pub simulated_latency_ms: u64,
}

fn default_simulated_latency() -> u64 {
    2000
}

impl Default for LedgerSettings {
    fn default() -> Self {
        LedgerSettings {
            simulated_latency_ms: default_simulated_latency(),
        }
    }
}

// =============================================================================
// Main Configuration
// =============================================================================

/// Complete field client configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HarvestConfig {
    #[serde(default)]
    pub device: DeviceConfig,

    #[serde(default)]
    pub verify: VerifySettings,

    #[serde(default)]
    pub batch: BatchSettings,

    #[serde(default)]
    pub ledger: LedgerSettings,
}

impl HarvestConfig {
    /// Creates a new config with defaults and a generated device ID.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (harvest.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> FlowResult<Self> {
        let mut config = Self::from_file(config_path)?;

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Defaults overlaid with the config file, if one exists. No environment.
    fn from_file(config_path: Option<PathBuf>) -> FlowResult<Self> {
        let Some(path) = config_path.or_else(Self::default_config_path) else {
            return Ok(Self::default());
        };

        if !path.exists() {
            debug!(?path, "Config file not found, using defaults");
            return Ok(Self::default());
        }

        info!(?path, "Loading harvest config from file");
        let contents = std::fs::read_to_string(&path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load harvest config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> FlowResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| FlowError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| FlowError::ConfigSaveFailed(e.to_string()))?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents).map_err(|e| FlowError::ConfigSaveFailed(e.to_string()))?;

        info!(?path, "Harvest config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> FlowResult<()> {
        if self.device.id.trim().is_empty() {
            return Err(FlowError::InvalidConfig("device.id must not be empty".into()));
        }

        let (min, max) = SCAN_SIZE_LIMITS;
        if !(min..=max).contains(&self.verify.scan_size) {
            return Err(FlowError::InvalidConfig(format!(
                "verify.scan_size must be between {} and {}, got {}",
                min, max, self.verify.scan_size
            )));
        }

        let prefix = &self.batch.prefix;
        if prefix.is_empty() || !prefix.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(FlowError::InvalidConfig(format!(
                "batch.prefix must be non-empty ASCII letters and digits, got '{}'",
                prefix
            )));
        }

        // Both verify URLs must parse as http(s)
        self.link_builder()?;

        Ok(())
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self) {
        if let Ok(id) = std::env::var("HARVEST_DEVICE_ID") {
            debug!(device_id = %id, "Overriding device ID from environment");
            self.device.id = id;
        }

        if let Ok(host) = std::env::var("HARVEST_VERIFY_HOST") {
            debug!(host = %host, "Overriding verify host from environment");
            self.verify.base_host = host;
        }

        if let Ok(service) = std::env::var("HARVEST_SCAN_SERVICE") {
            self.verify.scan_service = service;
        }

        if let Ok(prefix) = std::env::var("HARVEST_BATCH_PREFIX") {
            self.batch.prefix = prefix;
        }

        if let Ok(latency) = std::env::var("HARVEST_LEDGER_LATENCY_MS") {
            match latency.parse::<u64>() {
                Ok(ms) => self.ledger.simulated_latency_ms = ms,
                Err(_) => warn!(value = %latency, "Ignoring non-numeric HARVEST_LEDGER_LATENCY_MS"),
            }
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "harvest", "tracker")
            .map(|dirs| dirs.config_dir().join("harvest.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// Returns the device ID.
    pub fn device_id(&self) -> &str {
        &self.device.id
    }

    /// Builds the verification URL builder from `[verify]`.
    pub fn link_builder(&self) -> FlowResult<VerifyLinkBuilder> {
        VerifyLinkBuilder::new(
            &self.verify.base_host,
            &self.verify.scan_service,
            self.verify.scan_size,
        )
        .map_err(FlowError::from)
    }

    /// Simulated ledger acknowledgment delay.
    pub fn ledger_latency(&self) -> Duration {
        Duration::from_millis(self.ledger.simulated_latency_ms)
    }
}
