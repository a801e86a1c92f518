use common::{
    IndicatorResult, IndicatorRow, LabelCase, PriceSeries, Result, RsiParameters, SignalPosition,
};
use tracing::{debug, warn};

use super::ema::calculate_ewm;
use super::math::price_diff;

/// Calculate RSI with exponentially smoothed gains and losses
///
/// # Arguments
/// * `prices` - Slice of closing prices
/// * `period` - Smoothing span of the gain/loss averages (typically 14)
///
/// # Returns
/// Vector of RSI values, same length as input. `None` until `period - 1`
/// price changes have been observed, and wherever both averages are zero.
pub fn calculate_rsi(prices: &[f64], period: usize) -> Vec<Option<f64>> {
    let delta = price_diff(prices);

    // NaN deltas stay NaN on both sides
    let gains: Vec<f64> = delta
        .iter()
        .map(|&d| if d.is_nan() { d } else { d.max(0.0) })
        .collect();
    let losses: Vec<f64> = delta
        .iter()
        .map(|&d| if d.is_nan() { d } else { d.min(0.0).abs() })
        .collect();

    let min_periods = period.saturating_sub(1);
    let avg_gain = calculate_ewm(&gains, period, min_periods);
    let avg_loss = calculate_ewm(&losses, period, min_periods);

    avg_gain
        .into_iter()
        .zip(avg_loss)
        .map(|(gain, loss)| match (gain, loss) {
            (Some(gain), Some(loss)) => rsi_from_averages(gain, loss),
            _ => None,
        })
        .collect()
}

/// RSI from average gain and loss
///
/// Zero average loss makes RS infinite and RSI 100. With no movement at all
/// (both averages zero) the ratio is 0/0 and RSI is undefined: this case
/// deliberately departs from "zero loss gives 100" and reports no value,
/// which `classify_rsi` labels Hold.
pub fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> Option<f64> {
    if avg_loss == 0.0 {
        if avg_gain == 0.0 {
            return None;
        }
        return Some(100.0);
    }

    let rs = avg_gain / avg_loss;
    Some(100.0 - (100.0 / (1.0 + rs)))
}

/// Label each RSI value: Buy below `oversold`, Sell above `overbought`
///
/// Buy is checked first, so with inverted levels a value below `oversold`
/// is Buy even if it is also above `overbought`. Undefined values are Hold.
pub fn classify_rsi(rsi: &[Option<f64>], oversold: f64, overbought: f64) -> Vec<SignalPosition> {
    rsi.iter()
        .map(|value| match value {
            Some(v) if *v < oversold => SignalPosition::Buy,
            Some(v) if *v > overbought => SignalPosition::Sell,
            _ => SignalPosition::Hold,
        })
        .collect()
}

/// RSI values and labels for one price series
#[derive(Debug, Clone, PartialEq)]
pub struct RsiOutput {
    pub values: Vec<Option<f64>>,
    pub positions: Vec<SignalPosition>,
}

/// RSI momentum indicator with validated parameters
#[derive(Debug, Clone)]
pub struct RsiIndicator {
    params: RsiParameters,
}

impl RsiIndicator {
    pub fn new(params: RsiParameters) -> Result<Self> {
        params.validate()?;
        if !params.has_hold_band() {
            warn!(
                oversold = params.oversold_level,
                overbought = params.overbought_level,
                "RSI levels leave no Hold band"
            );
        }
        Ok(Self { params })
    }

    pub fn params(&self) -> &RsiParameters {
        &self.params
    }

    pub fn description(&self) -> String {
        format!("RSI({})", self.params.time_period)
    }

    pub fn compute(&self, series: &PriceSeries) -> RsiOutput {
        let closes = series.closes();
        debug!(
            bars = closes.len(),
            period = self.params.time_period,
            "computing RSI"
        );

        let values = calculate_rsi(&closes, self.params.time_period);
        let positions = classify_rsi(
            &values,
            self.params.oversold_level,
            self.params.overbought_level,
        );

        RsiOutput { values, positions }
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

    /// `Date, Close, SignalValue, SignalPosition` table with "Buy"/"Sell"/"Hold"
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
                signal_position: Some(position.label(LabelCase::Capitalized).to_string()),
            })
            .collect();

        IndicatorResult {
            indicator: self.description(),
            rows,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::trending_series;
    use approx::assert_relative_eq;

    const SAMPLE: [f64; 14] = [
        44.0, 44.5, 43.5, 44.5, 45.0, 45.5, 46.0, 46.5, 46.0, 46.5, 47.0, 46.5, 46.0, 45.5,
    ];

    #[test]
    fn test_rsi_warmup() {
        let rsi = calculate_rsi(&SAMPLE, 9);

        assert_eq!(rsi.len(), SAMPLE.len());
        // 8 price changes are needed, the 8th arrives at index 8
        assert!(rsi[..8].iter().all(|v| v.is_none()));
        assert!(rsi[8..].iter().all(|v| v.is_some()));
    }

    #[test]
    fn test_rsi_known_values() {
        let rsi = calculate_rsi(&SAMPLE, 9);

        assert_relative_eq!(rsi[8].unwrap(), 72.7310197959721, epsilon = 1e-9);
        assert_relative_eq!(rsi[10].unwrap(), 81.85873336948207, epsilon = 1e-9);
        assert_relative_eq!(rsi[13].unwrap(), 43.39834642234014, epsilon = 1e-9);
    }

    #[test]
    fn test_rsi_follows_price_direction() {
        let rsi = calculate_rsi(&SAMPLE, 9);

        for i in 9..SAMPLE.len() {
            let (prev, cur) = (rsi[i - 1].unwrap(), rsi[i].unwrap());
            assert!(cur > 0.0 && cur < 100.0);
            if SAMPLE[i] > SAMPLE[i - 1] {
                assert!(cur > prev, "RSI should rise at {}", i);
            } else {
                assert!(cur < prev, "RSI should fall at {}", i);
            }
        }
    }

    #[test]
    fn test_rsi_all_gains() {
        let prices = vec![10.0, 11.0, 12.0, 13.0, 14.0, 15.0];
        let rsi = calculate_rsi(&prices, 3);

        assert!(rsi[1].is_none());
        // No losses: RS is infinite
        assert_eq!(rsi[5], Some(100.0));
    }

    #[test]
    fn test_rsi_all_losses() {
        let prices = vec![15.0, 14.0, 13.0, 12.0, 11.0, 10.0];
        let rsi = calculate_rsi(&prices, 3);

        assert_eq!(rsi[5], Some(0.0));
    }

    #[test]
    fn test_rsi_flat_prices_undefined() {
        let prices = vec![50.0; 20];
        let rsi = calculate_rsi(&prices, 5);

        assert!(rsi.iter().all(|v| v.is_none()));
        let labels = classify_rsi(&rsi, 30.0, 70.0);
        assert!(labels.iter().all(|l| *l == SignalPosition::Hold));
        assert_eq!(rsi_from_averages(0.0, 0.0), None);
        assert_eq!(rsi_from_averages(0.5, 0.0), Some(100.0));
    }

    #[test]
    fn test_rsi_bounded() {
        let prices: Vec<f64> = (0..200)
            .map(|i| 100.0 + (i as f64 * 0.7).sin() * 10.0 + (i as f64 * 0.13).cos() * 4.0)
            .collect();
        let rsi = calculate_rsi(&prices, 14);

        assert_eq!(rsi.len(), prices.len());
        for value in rsi.iter().flatten() {
            assert!((0.0..=100.0).contains(value));
        }
    }

    #[test]
    fn test_rsi_nan_close_keeps_alignment() {
        let mut prices = SAMPLE.to_vec();
        prices[11] = f64::NAN;
        let rsi = calculate_rsi(&prices, 9);

        assert_eq!(rsi.len(), prices.len());
        // Averages are carried through the gap
        assert_eq!(rsi[11], rsi[10]);
        assert!(rsi[13].is_some());
    }

    #[test]
    fn test_classify_rsi() {
        let rsi = vec![Some(25.0), Some(30.0), Some(50.0), Some(70.0), Some(75.0), None];
        let labels = classify_rsi(&rsi, 30.0, 70.0);

        assert_eq!(
            labels,
            vec![
                SignalPosition::Buy,
                SignalPosition::Hold,
                SignalPosition::Hold,
                SignalPosition::Hold,
                SignalPosition::Sell,
                SignalPosition::Hold,
            ]
        );
    }

    #[test]
    fn test_classify_rsi_inverted_levels() {
        // Oversold above overbought: no Hold band, Buy wins
        let rsi = vec![Some(10.0), Some(50.0), Some(90.0)];
        let labels = classify_rsi(&rsi, 60.0, 40.0);

        assert_eq!(
            labels,
            vec![SignalPosition::Buy, SignalPosition::Buy, SignalPosition::Sell]
        );
    }

    #[test]
    fn test_indicator_signal_table() {
        let series = trending_series(30, 100.0, 1.0);
        let indicator = RsiIndicator::new(RsiParameters::default()).unwrap();
        let table = indicator.signal_table(&series);

        assert_eq!(indicator.params().time_period, 14);
        assert_eq!(table.indicator, "RSI(14)");
        assert_eq!(table.len(), series.len());
        assert_eq!(table.rows[0].signal_position.as_deref(), Some("Hold"));
        // Steady rise: RSI pinned at 100
        assert_eq!(table.rows[29].signal_value, Some(100.0));
        assert_eq!(table.rows[29].signal_position.as_deref(), Some("Sell"));
    }

    #[test]
    fn test_indicator_numeric_table_has_no_positions() {
        let series = trending_series(20, 50.0, -0.5);
        let indicator = RsiIndicator::new(RsiParameters::default().with_time_period(5)).unwrap();
        let table = indicator.numeric_table(&series);

        assert_eq!(table.len(), 20);
        assert!(table.rows.iter().all(|r| r.signal_position.is_none()));
        assert_eq!(table.rows[19].signal_value, Some(0.0));
    }

    #[test]
    fn test_indicator_rejects_zero_period() {
        let result = RsiIndicator::new(RsiParameters::default().with_time_period(0));
        assert!(result.is_err());
    }

    #[test]
    fn test_compute_is_idempotent() {
        let series = trending_series(40, 20.0, 0.25);
        let indicator = RsiIndicator::new(RsiParameters::default()).unwrap();

        let first = indicator.compute(&series);
        let second = indicator.compute(&series);
        assert_eq!(first, second);
        assert_eq!(
            first.values.iter().map(|v| v.map(f64::to_bits)).collect::<Vec<_>>(),
            second.values.iter().map(|v| v.map(f64::to_bits)).collect::<Vec<_>>()
        );
    }
}
