//! Registry configuration and validation
//!
//! # Example
//!
//! ```ignore
//! use registry_ledger::domain::RegistryConfigBuilder;
//!
//! let config = RegistryConfigBuilder::new()
//!     .buyin(Amount::from(1_000_000u64))
//!     .owner_fee_bps(500)
//!     .build()
//!     .expect("Valid config");
//! ```

use super::freshness::FreshnessWindow;
use super::settlement::FeeSchedule;
use crate::errors::{BalanceFault, RegistryError};
use registry_types::Amount;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Smallest asset precision the registry accepts.
pub const MIN_ASSET_DECIMALS: u8 = 6;

/// Registry configuration
///
/// Financial parameters are fixed for the lifetime of a registry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Stake each participant allocates, in asset base units
    pub buyin: Amount,
    /// Beneficiary fee in basis points
    pub owner_fee_bps: u16,
    /// Guardian fee in basis points
    pub guardian_fee_bps: u16,
    /// Minimum decimals the asset must report
    pub min_asset_decimals: u8,
    /// Accepted age and future skew of signed timestamps
    pub freshness: FreshnessWindow,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            buyin: Amount::from(1_000_000u64), // one unit at 6 decimals
            owner_fee_bps: 1_000,              // 10%
            guardian_fee_bps: 1_000,           // 10%
            min_asset_decimals: MIN_ASSET_DECIMALS,
            freshness: FreshnessWindow::default(),
        }
    }
}

/// Failure to load a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Input is not a valid configuration document.
    #[error("malformed config: {0}")]
    Malformed(#[from] serde_json::Error),

    /// Document parsed but holds invalid parameters.
    #[error("invalid config: {0}")]
    Invalid(#[from] RegistryError),
}

impl RegistryConfig {
    /// Validate financial parameters
    pub fn validate(&self) -> Result<(), RegistryError> {
        self.fee_schedule().validate()?;

        if self.min_asset_decimals < MIN_ASSET_DECIMALS {
            return Err(BalanceFault::InsufficientDecimals {
                decimals: self.min_asset_decimals,
                min: MIN_ASSET_DECIMALS,
            }
            .into());
        }

        Ok(())
    }

    /// Parse and validate a JSON document. Missing fields take defaults.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Buy-in and fee rates.
    pub fn fee_schedule(&self) -> FeeSchedule {
        FeeSchedule {
            buyin: self.buyin,
            owner_fee_bps: self.owner_fee_bps,
            guardian_fee_bps: self.guardian_fee_bps,
        }
    }

    /// Builder-style method to set the buy-in
    pub fn with_buyin(mut self, buyin: Amount) -> Self {
        self.buyin = buyin;
        self
    }
}

/// Builder for RegistryConfig with validation
#[derive(Default)]
pub struct RegistryConfigBuilder {
    buyin: Option<Amount>,
    owner_fee_bps: Option<u16>,
    guardian_fee_bps: Option<u16>,
    min_asset_decimals: Option<u8>,
    freshness: Option<FreshnessWindow>,
}

impl RegistryConfigBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the buy-in (must be non-zero)
    pub fn buyin(mut self, buyin: Amount) -> Self {
        self.buyin = Some(buyin);
        self
    }

    /// Set the beneficiary fee
    pub fn owner_fee_bps(mut self, bps: u16) -> Self {
        self.owner_fee_bps = Some(bps);
        self
    }

    /// Set the guardian fee
    pub fn guardian_fee_bps(mut self, bps: u16) -> Self {
        self.guardian_fee_bps = Some(bps);
        self
    }

    /// Set the minimum asset decimals (at least 6)
    pub fn min_asset_decimals(mut self, decimals: u8) -> Self {
        self.min_asset_decimals = Some(decimals);
        self
    }

    /// Set the freshness window
    pub fn freshness(mut self, window: FreshnessWindow) -> Self {
        self.freshness = Some(window);
        self
    }

    /// Build the RegistryConfig, validating all parameters
    pub fn build(self) -> Result<RegistryConfig, RegistryError> {
        let defaults = RegistryConfig::default();

        let config = RegistryConfig {
            buyin: self.buyin.unwrap_or(defaults.buyin),
            owner_fee_bps: self.owner_fee_bps.unwrap_or(defaults.owner_fee_bps),
            guardian_fee_bps: self.guardian_fee_bps.unwrap_or(defaults.guardian_fee_bps),
            min_asset_decimals: self
                .min_asset_decimals
                .unwrap_or(defaults.min_asset_decimals),
            freshness: self.freshness.unwrap_or(defaults.freshness),
        };

        config.validate()?;
        Ok(config)
    }
}
