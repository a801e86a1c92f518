pub mod batch;
pub mod data;
pub mod indicators;
pub mod output;

pub use batch::{sweep_rsi, sweep_sma_crossover};
pub use data::{generate_synthetic_series, load_file, trending_series};
pub use indicators::{RsiIndicator, RsiOutput, SmaCrossoverIndicator, SmaCrossoverOutput};
pub use output::{write_csv, write_json};

// Re-export common types
pub use common::{
    IndicatorConfig, IndicatorError, IndicatorResult, IndicatorRow, LabelCase, PricePoint,
    PriceSeries, Result, RsiParameters, SignalPosition, SmaCrossoverParameters,
};
