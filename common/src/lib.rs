pub mod config;
pub mod error;
pub mod types;

pub use config::{IndicatorConfig, RsiParameters, SmaCrossoverParameters};
pub use error::{IndicatorError, Result};
pub use types::*;
