use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{IndicatorError, Result};

/// Daily close observation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: f64,
}

impl PricePoint {
    pub fn new(date: NaiveDate, close: f64) -> Self {
        Self { date, close }
    }
}

/// Close prices ordered by strictly increasing date.
///
/// Construction validates the ordering, so every indicator can index the
/// series without re-checking it. NaN closes are accepted and propagate as
/// undefined values through the indicators.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PriceSeries {
    points: Vec<PricePoint>,
}

impl PriceSeries {
    pub fn new(points: Vec<PricePoint>) -> Result<Self> {
        if points.is_empty() {
            return Err(IndicatorError::InvalidInput(
                "price series is empty".to_string(),
            ));
        }

        if let Some(w) = points.windows(2).find(|w| w[1].date <= w[0].date) {
            return Err(IndicatorError::InvalidInput(format!(
                "dates must be strictly increasing: {} is followed by {}",
                w[0].date, w[1].date
            )));
        }

        Ok(Self { points })
    }

    /// Build a series from separate date and close columns
    pub fn from_columns(dates: &[NaiveDate], closes: &[f64]) -> Result<Self> {
        if dates.len() != closes.len() {
            return Err(IndicatorError::InvalidInput(format!(
                "column length mismatch: {} dates, {} closes",
                dates.len(),
                closes.len()
            )));
        }

        let points = dates
            .iter()
            .zip(closes)
            .map(|(&date, &close)| PricePoint { date, close })
            .collect();

        Self::new(points)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn iter(&self) -> impl Iterator<Item = &PricePoint> {
        self.points.iter()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.points.iter().map(|p| p.date).collect()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.close).collect()
    }

    pub fn first_date(&self) -> NaiveDate {
        self.points[0].date
    }

    pub fn last_date(&self) -> NaiveDate {
        self.points[self.points.len() - 1].date
    }
}

impl<'de> Deserialize<'de> for PriceSeries {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let points = Vec::<PricePoint>::deserialize(deserializer)?;
        PriceSeries::new(points).map_err(serde::de::Error::custom)
    }
}

/// Trading position label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignalPosition {
    Buy,
    Sell,
    Hold,
}

impl SignalPosition {
    pub fn label(&self, case: LabelCase) -> &'static str {
        match (self, case) {
            (SignalPosition::Buy, LabelCase::Capitalized) => "Buy",
            (SignalPosition::Sell, LabelCase::Capitalized) => "Sell",
            (SignalPosition::Hold, LabelCase::Capitalized) => "Hold",
            (SignalPosition::Buy, LabelCase::Lowercase) => "buy",
            (SignalPosition::Sell, LabelCase::Lowercase) => "sell",
            (SignalPosition::Hold, LabelCase::Lowercase) => "hold",
        }
    }
}

impl fmt::Display for SignalPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label(LabelCase::Capitalized))
    }
}

/// Casing used when rendering position labels.
///
/// RSI output has always used "Buy"/"Sell"/"Hold" while the crossover
/// output uses "buy"/"sell"/"hold"; downstream consumers match on both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelCase {
    Capitalized,
    Lowercase,
}

/// One row of an indicator output table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorRow {
    #[serde(rename = "Date")]
    pub date: NaiveDate,
    #[serde(rename = "Close")]
    pub close: f64,
    #[serde(rename = "SignalValue")]
    pub signal_value: Option<f64>,
    #[serde(rename = "SignalPosition", skip_serializing_if = "Option::is_none", default)]
    pub signal_position: Option<String>,
}

/// Indicator output table: `Date, Close, SignalValue[, SignalPosition]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorResult {
    pub indicator: String,
    pub rows: Vec<IndicatorRow>,
}

impl IndicatorResult {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn signal_values(&self) -> Vec<Option<f64>> {
        self.rows.iter().map(|r| r.signal_value).collect()
    }

    pub fn signal_positions(&self) -> Vec<Option<&str>> {
        self.rows
            .iter()
            .map(|r| r.signal_position.as_deref())
            .collect()
    }
}
