use chrono::FixedOffset;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use crate::error::{Error, Result};

pub mod exchanges;
pub mod loader;

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct FundingConfig {
    pub cycle_gap_hours: u64,
    pub lookback_days: u64,
    pub window_hours: u64,
    pub display_offset_hours: i32,
}

impl Default for FundingConfig {
    fn default() -> Self {
        FundingConfig {
            cycle_gap_hours: 9,
            lookback_days: 90,
            window_hours: 24,
            display_offset_hours: 8,  // Asia/Singapore
        }
    }
}

impl FundingConfig {
    pub fn cycle_gap(&self) -> Duration {
        Duration::from_secs(self.cycle_gap_hours.saturating_mul(3600))
    }

    pub fn lookback(&self) -> Duration {
        Duration::from_secs(self.lookback_days.saturating_mul(24 * 3600))
    }

    pub fn window(&self) -> Duration {
        Duration::from_secs(self.window_hours.saturating_mul(3600))
    }

    pub fn display_offset(&self) -> Result<FixedOffset> {
        self.display_offset_hours
            .checked_mul(3600)
            .and_then(FixedOffset::east_opt)
            .ok_or_else(|| {
                Error::ConfigError(format!(
                    "display_offset_hours out of range: {}",
                    self.display_offset_hours
                ))
            })
    }

    pub fn validate(&self) -> Result<()> {
        if self.cycle_gap_hours == 0 {
            return Err(Error::ConfigError("cycle_gap_hours must be positive".to_string()));
        }
        if self.lookback_days == 0 || self.window_hours == 0 {
            return Err(Error::ConfigError("lookback_days and window_hours must be positive".to_string()));
        }
        self.display_offset()?;
        Ok(())
    }
}
