use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use common::{IndicatorError, PricePoint, PriceSeries, Result};
use tracing::{debug, warn};

/// Accepted names of the date column, in order of preference
const DATE_HEADERS: [&str; 5] = ["Date", "Dates", "date", "dates", "timestamp"];
/// Accepted names of the close column, in order of preference
const CLOSE_HEADERS: [&str; 4] = ["Close", "close", "Adj Close", "adj_close"];

/// Load a price series from a CSV file
pub fn load_csv(path: &Path) -> Result<PriceSeries> {
    let file = File::open(path).map_err(|e| IndicatorError::DataLoadError(e.to_string()))?;
    read_csv(BufReader::new(file))
}

/// Read a price series from CSV with a header row.
///
/// Only the date and close columns are used; anything else (volume,
/// week-day names, ...) is ignored. An empty close cell is a missing price.
pub fn read_csv<R: Read>(reader: R) -> Result<PriceSeries> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader
        .headers()
        .map_err(|e| IndicatorError::CsvError(e.to_string()))?
        .clone();
    let date_idx = find_column(&headers, &DATE_HEADERS)?;
    let close_idx = find_column(&headers, &CLOSE_HEADERS)?;

    let mut points = Vec::new();

    for (line, result) in csv_reader.records().enumerate() {
        let record = result.map_err(|e| IndicatorError::CsvError(e.to_string()))?;

        let (Some(date), Some(close)) = (record.get(date_idx), record.get(close_idx)) else {
            warn!(line = line + 2, "skipping short CSV record");
            continue;
        };

        points.push(PricePoint {
            date: parse_date(date)?,
            close: parse_close(close)?,
        });
    }

    let missing = points.iter().filter(|p| p.close.is_nan()).count();
    if missing > 0 {
        warn!(missing, "CSV has missing close prices");
    }

    debug!(rows = points.len(), "loaded CSV price data");
    PriceSeries::new(points)
}

/// Load a price series from a JSON array of `{"date", "close"}` objects
pub fn load_json(path: &Path) -> Result<PriceSeries> {
    let file = File::open(path).map_err(|e| IndicatorError::DataLoadError(e.to_string()))?;
    let reader = BufReader::new(file);
    let series: PriceSeries = serde_json::from_reader(reader)?;
    Ok(series)
}

fn find_column(headers: &csv::StringRecord, names: &[&str]) -> Result<usize> {
    names
        .iter()
        .find_map(|name| headers.iter().position(|h| h == *name))
        .ok_or_else(|| {
            IndicatorError::CsvError(format!(
                "missing column, expected one of {:?}",
                names
            ))
        })
}

fn parse_close(s: &str) -> Result<f64> {
    if s.is_empty() {
        return Ok(f64::NAN);
    }
    s.parse()
        .map_err(|_| IndicatorError::CsvError(format!("Invalid close price: {}", s)))
}

/// Parse a calendar date from various formats
fn parse_date(s: &str) -> Result<NaiveDate> {
    for fmt in ["%Y-%m-%d", "%Y/%m/%d", "%d.%m.%Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(date);
        }
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.date_naive());
    }

    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(dt.date());
        }
    }

    Err(IndicatorError::CsvError(format!(
        "Unable to parse date: {}",
        s
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    #[test]
    fn test_parse_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();

        assert_eq!(parse_date("2024-01-15").unwrap(), expected);
        assert_eq!(parse_date("2024/01/15").unwrap(), expected);
        assert_eq!(parse_date("15.01.2024").unwrap(), expected);
        assert_eq!(parse_date("2024-01-15T09:30:00Z").unwrap(), expected);
        assert_eq!(parse_date("2024-01-15 16:00:00").unwrap(), expected);
    }

    #[test]
    fn test_parse_date_invalid() {
        assert!(matches!(
            parse_date("yesterday"),
            Err(IndicatorError::CsvError(_))
        ));
    }

    #[test]
    fn test_read_csv_ignores_extra_columns() {
        let data = "Dates,WeekDays,Close\n\
                    2024-01-02,Tuesday,101.5\n\
                    2024-01-03,Wednesday,102.25\n\
                    2024-01-04,Thursday,\n";
        let series = read_csv(data.as_bytes()).unwrap();

        assert_eq!(series.len(), 3);
        assert_eq!(series.first_date().day(), 2);
        let closes = series.closes();
        assert_eq!(closes[0], 101.5);
        assert_eq!(closes[1], 102.25);
        assert!(closes[2].is_nan());
    }

    #[test]
    fn test_read_csv_prefers_close_over_adjusted() {
        let data = "date,Adj Close,close\n2024-01-02,9.0,10.0\n";
        let series = read_csv(data.as_bytes()).unwrap();
        assert_eq!(series.closes(), vec![10.0]);
    }

    #[test]
    fn test_read_csv_missing_close_column() {
        let data = "Date,Open\n2024-01-02,1.0\n";
        assert!(matches!(
            read_csv(data.as_bytes()),
            Err(IndicatorError::CsvError(_))
        ));
    }

    #[test]
    fn test_read_csv_bad_price() {
        let data = "Date,Close\n2024-01-02,abc\n";
        let err = read_csv(data.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("Invalid close price"));
    }

    #[test]
    fn test_read_csv_empty_is_invalid_input() {
        let data = "Date,Close\n";
        assert!(matches!(
            read_csv(data.as_bytes()),
            Err(IndicatorError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_read_csv_unordered_dates() {
        let data = "Date,Close\n2024-01-03,1.0\n2024-01-02,2.0\n";
        assert!(matches!(
            read_csv(data.as_bytes()),
            Err(IndicatorError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_load_json() {
        let path = std::env::temp_dir().join(format!("prices-{}.json", std::process::id()));
        std::fs::write(
            &path,
            r#"[{"date":"2024-01-02","close":10.0},{"date":"2024-01-03","close":10.5}]"#,
        )
        .unwrap();

        let series = load_json(&path);
        std::fs::remove_file(&path).ok();

        let series = series.unwrap();
        assert_eq!(series.closes(), vec![10.0, 10.5]);
    }

    #[test]
    fn test_load_csv_missing_file() {
        assert!(matches!(
            load_csv(Path::new("/nonexistent/prices.csv")),
            Err(IndicatorError::DataLoadError(_))
        ));
    }
}
