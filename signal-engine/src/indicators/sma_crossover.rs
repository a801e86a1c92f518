use common::{
    IndicatorResult, IndicatorRow, LabelCase, PriceSeries, Result, SignalPosition,
    SmaCrossoverParameters,
};
use tracing::{debug, warn};

use super::math::round_to;
use super::sma::calculate_sma;

/// Trend means are reported with four decimals
const TREND_DECIMALS: u32 = 4;

/// Short and long trend means, each rounded to four decimals
pub fn calculate_trend_means(
    prices: &[f64],
    short_period: usize,
    long_period: usize,
) -> (Vec<Option<f64>>, Vec<Option<f64>>) {
    let round = |sma: Vec<Option<f64>>| -> Vec<Option<f64>> {
        sma.into_iter()
            .map(|v| v.map(|mean| round_to(mean, TREND_DECIMALS)))
            .collect()
    };

    (
        round(calculate_sma(prices, short_period)),
        round(calculate_sma(prices, long_period)),
    )
}

/// Short trend minus long trend, `None` where either is undefined
pub fn calculate_crossover_signal(
    short_trend: &[Option<f64>],
    long_trend: &[Option<f64>],
) -> Vec<Option<f64>> {
    short_trend
        .iter()
        .zip(long_trend)
        .map(|(short, long)| match (short, long) {
            (Some(s), Some(l)) => Some(s - l),
            _ => None,
        })
        .collect()
}

/// Label each spread against `threshold`
///
/// A provisional "buy" is set where the spread exceeds the threshold (else
/// "hold"), then overwritten with "sell" where it falls below. A spread equal
/// to the threshold, or undefined, stays hold.
pub fn classify_crossover(signal: &[Option<f64>], threshold: f64) -> Vec<SignalPosition> {
    signal
        .iter()
        .map(|value| {
            let Some(v) = *value else {
                return SignalPosition::Hold;
            };

            let provisional = if v > threshold {
                SignalPosition::Buy
            } else {
                SignalPosition::Hold
            };

            if v < threshold {
                SignalPosition::Sell
            } else {
                provisional
            }
        })
        .collect()
}

/// Trend means, spread and labels for one price series
#[derive(Debug, Clone, PartialEq)]
pub struct SmaCrossoverOutput {
    pub short_trend: Vec<Option<f64>>,
    pub long_trend: Vec<Option<f64>>,
    pub values: Vec<Option<f64>>,
    pub positions: Vec<SignalPosition>,
}

/// Moving-average crossover trend indicator with validated parameters
#[derive(Debug, Clone)]
pub struct SmaCrossoverIndicator {
    params: SmaCrossoverParameters,
}

impl SmaCrossoverIndicator {
    pub fn new(params: SmaCrossoverParameters) -> Result<Self> {
        params.validate()?;
        if params.long_trend_period <= params.short_trend_period {
            warn!(
                short = params.short_trend_period,
                long = params.long_trend_period,
                "long trend period does not exceed short trend period"
            );
        }
        Ok(Self { params })
    }

    pub fn params(&self) -> &SmaCrossoverParameters {
        &self.params
    }

    /// Window pair, e.g. "42d-252d"
    pub fn description(&self) -> String {
        format!(
            "{}d-{}d",
            self.params.short_trend_period, self.params.long_trend_period
        )
    }

    pub fn compute(&self, series: &PriceSeries) -> SmaCrossoverOutput {
        let closes = series.closes();
        debug!(
            bars = closes.len(),
            short = self.params.short_trend_period,
            long = self.params.long_trend_period,
            "computing SMA crossover"
        );

        if closes.len() < self.params.long_trend_period {
            debug!(
                bars = closes.len(),
                long = self.params.long_trend_period,
                "series shorter than long trend window, spread is undefined throughout"
            );
        }

        let (short_trend, long_trend) = calculate_trend_means(
            &closes,
            self.params.short_trend_period,
            self.params.long_trend_period,
        );
        let values = calculate_crossover_signal(&short_trend, &long_trend);
        let positions = classify_crossover(&values, self.params.threshold);

        SmaCrossoverOutput {
            short_trend,
            long_trend,
            values,
            positions,
        }
    }

    /// `Date, Close, SignalValue` table
    pub fn numeric_table(&self, series: &PriceSeries) -> IndicatorResult {
        let output = self.compute(series);
        let rows = series
            .iter()
            .zip(output.values)
            .map(|(point, value)| IndicatorRow {
                date: point.date,
                close: point.close,
                signal_value: value,
                signal_position: None,
            })
            .collect();

        IndicatorResult {
            indicator: self.description(),
            rows,
        }
    }

    /// `Date, Close, SignalValue, SignalPosition` table with "buy"/"sell"/"hold"
    pub fn signal_table(&self, series: &PriceSeries) -> IndicatorResult {
        let output = self.compute(series);
        let rows = series
            .iter()
            .zip(output.values)
            .zip(output.positions)
            .map(|((point, value), position)| IndicatorRow {
                date: point.date,
                close: point.close,
                signal_value: value,
                signal_position: Some(position.label(LabelCase::Lowercase).to_string()),
            })
            .collect();

        IndicatorResult {
            indicator: self.description(),
            rows,
        }
    }
}
