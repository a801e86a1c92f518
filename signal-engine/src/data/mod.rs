pub mod loader;
pub mod synthetic;

pub use loader::{load_csv, load_json, read_csv};
pub use synthetic::{generate_synthetic_series, trending_series};

use std::path::Path;

use common::{IndicatorError, PriceSeries, Result};

/// Load a price series from file, detecting format from extension
pub fn load_file(path: &Path) -> Result<PriceSeries> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match ext.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        _ => Err(IndicatorError::DataLoadError(format!(
            "Unsupported file format: {}",
            ext
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_file_unsupported_extension() {
        let err = load_file(Path::new("prices.parquet")).unwrap_err();
        assert!(matches!(err, IndicatorError::DataLoadError(_)));
        assert!(err.to_string().contains("parquet"));
    }
}
