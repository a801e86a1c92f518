use std::io::Write;

use common::{IndicatorError, IndicatorResult, Result};

/// Write the table as CSV, undefined values as empty cells
pub fn write_csv<W: Write>(result: &IndicatorResult, writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for row in &result.rows {
        csv_writer
            .serialize(row)
            .map_err(|e| IndicatorError::CsvError(e.to_string()))?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Write the table as JSON, undefined values as `null`
pub fn write_json<W: Write>(result: &IndicatorResult, writer: W, pretty: bool) -> Result<()> {
    if pretty {
        serde_json::to_writer_pretty(writer, result)?;
    } else {
        serde_json::to_writer(writer, result)?;
    }
    Ok(())
}
