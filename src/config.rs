//! Tracker configuration loaded from TOML

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::ledger::{LedgerWindow, DEFAULT_TRANSFER_AMOUNT};
use crate::types::*;

/// Seconds between overdue checks when none is configured
pub const DEFAULT_CHECK_INTERVAL_SECS: u64 = 60;

/// Settings for building a ledger and its overdue monitor
///
/// ```toml
/// default_amount = "50000"
/// check_interval_secs = 60
///
/// [window]
/// kind = "rolling"
/// months_back = 12
/// months_forward = 3
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Months the ledger covers
    pub window: LedgerWindow,
    /// Amount expected for every month
    pub default_amount: BigDecimal,
    /// How often the overdue monitor re-checks the ledger
    pub check_interval_secs: u64,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            window: LedgerWindow::default(),
            default_amount: BigDecimal::from(DEFAULT_TRANSFER_AMOUNT),
            check_interval_secs: DEFAULT_CHECK_INTERVAL_SECS,
        }
    }
}

impl TrackerConfig {
    /// Parse configuration from TOML text; missing keys take their defaults
    pub fn from_toml_str(s: &str) -> LedgerResult<Self> {
        let config: TrackerConfig =
            toml::from_str(s).map_err(|e| LedgerError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> LedgerResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| LedgerError::Config(format!("read {}: {}", path.display(), e)))?;
        Self::from_toml_str(&contents)
    }

    /// Interval between overdue checks
    pub fn check_interval(&self) -> Duration {
        Duration::from_secs(self.check_interval_secs)
    }

    fn validate(&self) -> LedgerResult<()> {
        self.window.validate()?;

        if self.default_amount < BigDecimal::from(0) {
            return Err(LedgerError::Config(
                "default_amount cannot be negative".to_string(),
            ));
        }

        if self.check_interval_secs == 0 {
            return Err(LedgerError::Config(
                "check_interval_secs must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}
