pub mod ema;
pub mod math;
pub mod rsi;
pub mod sma;
pub mod sma_crossover;

pub use ema::calculate_ewm;
pub use math::{price_diff, round_to};
pub use rsi::{calculate_rsi, classify_rsi, rsi_from_averages, RsiIndicator, RsiOutput};
pub use sma::calculate_sma;
pub use sma_crossover::{
    calculate_crossover_signal, calculate_trend_means, classify_crossover,
    SmaCrossoverIndicator, SmaCrossoverOutput,
};
