use common::{PriceSeries, Result, RsiParameters, SmaCrossoverParameters};
use rayon::prelude::*;
use tracing::debug;

use crate::indicators::{RsiIndicator, RsiOutput, SmaCrossoverIndicator, SmaCrossoverOutput};

/// Evaluate RSI for several parameter sets in parallel.
///
/// All parameter sets are validated before any work starts; results come
/// back in the order of `params`.
pub fn sweep_rsi(series: &PriceSeries, params: &[RsiParameters]) -> Result<Vec<RsiOutput>> {
    let indicators = params
        .iter()
        .cloned()
        .map(RsiIndicator::new)
        .collect::<Result<Vec<_>>>()?;

    debug!(sets = indicators.len(), bars = series.len(), "RSI sweep");

    Ok(indicators
        .par_iter()
        .map(|indicator| indicator.compute(series))
        .collect())
}

/// Evaluate the SMA crossover for several parameter sets in parallel
pub fn sweep_sma_crossover(
    series: &PriceSeries,
    params: &[SmaCrossoverParameters],
) -> Result<Vec<SmaCrossoverOutput>> {
    let indicators = params
        .iter()
        .cloned()
        .map(SmaCrossoverIndicator::new)
        .collect::<Result<Vec<_>>>()?;

    debug!(sets = indicators.len(), bars = series.len(), "SMA crossover sweep");

    Ok(indicators
        .par_iter()
        .map(|indicator| indicator.compute(series))
        .collect())
}
