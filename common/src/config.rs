use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{IndicatorError, Result};

/// RSI parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RsiParameters {
    /// Smoothing span of the gain/loss averages
    pub time_period: usize,
    /// RSI above this level is labelled Sell
    pub overbought_level: f64,
    /// RSI below this level is labelled Buy
    pub oversold_level: f64,
}

impl Default for RsiParameters {
    fn default() -> Self {
        Self {
            time_period: 14,
            overbought_level: 70.0,
            oversold_level: 30.0,
        }
    }
}

impl RsiParameters {
    pub fn with_time_period(mut self, time_period: usize) -> Self {
        self.time_period = time_period;
        self
    }

    pub fn with_levels(mut self, oversold: f64, overbought: f64) -> Self {
        self.oversold_level = oversold;
        self.overbought_level = overbought;
        self
    }

    /// Reject parameters the smoothing math is undefined for.
    ///
    /// Level ordering is not checked: with `oversold_level >= overbought_level`
    /// there is no Hold band, and values below the oversold level win as Buy.
    pub fn validate(&self) -> Result<()> {
        if self.time_period == 0 {
            return Err(IndicatorError::InvalidParameter(
                "RSI time_period must be positive".to_string(),
            ));
        }
        if !self.overbought_level.is_finite() || !self.oversold_level.is_finite() {
            return Err(IndicatorError::InvalidParameter(format!(
                "RSI levels must be finite (oversold {}, overbought {})",
                self.oversold_level, self.overbought_level
            )));
        }
        Ok(())
    }

    /// Whether a value can be labelled Hold at all
    pub fn has_hold_band(&self) -> bool {
        self.oversold_level < self.overbought_level
    }
}

/// SMA crossover parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmaCrossoverParameters {
    /// Window of the short trend mean, in trading days
    pub short_trend_period: usize,
    /// Window of the long trend mean, in trading days
    pub long_trend_period: usize,
    /// Spread between the two means that separates buy from sell
    pub threshold: f64,
}

impl Default for SmaCrossoverParameters {
    fn default() -> Self {
        Self {
            short_trend_period: 42,
            long_trend_period: 252,
            threshold: 5.0,
        }
    }
}

impl SmaCrossoverParameters {
    pub fn with_periods(mut self, short_trend_period: usize, long_trend_period: usize) -> Self {
        self.short_trend_period = short_trend_period;
        self.long_trend_period = long_trend_period;
        self
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.short_trend_period == 0 || self.long_trend_period == 0 {
            return Err(IndicatorError::InvalidParameter(format!(
                "trend periods must be positive (short {}, long {})",
                self.short_trend_period, self.long_trend_period
            )));
        }
        if !self.threshold.is_finite() {
            return Err(IndicatorError::InvalidParameter(format!(
                "crossover threshold must be finite, got {}",
                self.threshold
            )));
        }
        Ok(())
    }
}

/// Parameters for both indicators, as read from a JSON config file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorConfig {
    pub rsi: RsiParameters,
    pub sma_crossover: SmaCrossoverParameters,
}

impl IndicatorConfig {
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        let config: IndicatorConfig = serde_json::from_reader(BufReader::new(file))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.rsi.validate()?;
        self.sma_crossover.validate()
    }
}
