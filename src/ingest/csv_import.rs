//! CSV Import
//!
//! Reads raw EDA recordings stored as `timestamp,value` rows, where the
//! timestamp is in microseconds since the Unix epoch.

use super::IngestError;
use crate::signal::Sample;
use std::path::Path;

/// Maximum number of row errors kept in a result
const MAX_REPORTED_ERRORS: usize = 100;

/// CSV reader for raw sample files with configurable column mapping
#[derive(Debug, Clone)]
pub struct RawCsvReader {
    /// Column index for timestamps (0-indexed)
    timestamp_column: usize,
    /// Column index for EDA values
    value_column: usize,
    /// Whether the CSV has a header row
    has_header: bool,
}

/// Result of reading one CSV file
#[derive(Debug)]
pub struct CsvReadResult {
    pub samples: Vec<Sample>,
    pub rows_failed: usize,
    pub errors: Vec<String>,
}

impl Default for RawCsvReader {
    fn default() -> Self {
        Self::new()
    }
}

impl RawCsvReader {
    /// Create a reader for `timestamp,value` files with a header row
    pub fn new() -> Self {
        Self {
            timestamp_column: 0,
            value_column: 1,
            has_header: true,
        }
    }

    /// Set the timestamp column index
    pub fn with_timestamp_column(mut self, column: usize) -> Self {
        self.timestamp_column = column;
        self
    }

    /// Set the value column index
    pub fn with_value_column(mut self, column: usize) -> Self {
        self.value_column = column;
        self
    }

    /// Set whether the CSV has a header row
    pub fn with_header(mut self, has_header: bool) -> Self {
        self.has_header = has_header;
        self
    }

    /// Read samples from a CSV file
    pub fn read(&self, path: &Path) -> Result<CsvReadResult, IngestError> {
        let reader = csv::ReaderBuilder::new()
            .has_headers(self.has_header)
            .flexible(true)
            .from_path(path)?;

        let result = self.read_records(reader)?;
        if result.rows_failed > 0 {
            tracing::warn!(
                path = %path.display(),
                rows_failed = result.rows_failed,
                "Skipped unreadable rows"
            );
        }
        Ok(result)
    }

    /// Read samples from a CSV string (useful for testing)
    pub fn read_str(&self, csv_data: &str) -> Result<CsvReadResult, IngestError> {
        let reader = csv::ReaderBuilder::new()
            .has_headers(self.has_header)
            .flexible(true)
            .from_reader(csv_data.as_bytes());

        self.read_records(reader)
    }

    fn read_records<R: std::io::Read>(
        &self,
        mut reader: csv::Reader<R>,
    ) -> Result<CsvReadResult, IngestError> {
        let mut samples: Vec<Sample> = Vec::new();
        let mut rows_failed = 0;
        let mut errors = Vec::new();

        for (line_num, result) in reader.records().enumerate() {
            let actual_line = if self.has_header {
                line_num + 2
            } else {
                line_num + 1
            };

            let record = match result {
                Ok(r) => r,
                Err(e) => {
                    errors.push(format!("Line {}: {}", actual_line, e));
                    rows_failed += 1;
                    continue;
                }
            };

            let sample = match self.parse_record(&record) {
                Ok(sample) => sample,
                Err(e) => {
                    errors.push(format!("Line {}: {}", actual_line, e));
                    rows_failed += 1;
                    continue;
                }
            };

            if let Some(previous) = samples.last() {
                if sample.timestamp < previous.timestamp {
                    return Err(IngestError::Unordered {
                        line: actual_line,
                        timestamp: sample.timestamp,
                        previous: previous.timestamp,
                    });
                }
            }

            samples.push(sample);
        }

        // Truncate errors if too many
        if errors.len() > MAX_REPORTED_ERRORS {
            let total = errors.len();
            errors.truncate(MAX_REPORTED_ERRORS);
            errors.push(format!("... and {} more errors", total - MAX_REPORTED_ERRORS));
        }

        Ok(CsvReadResult {
            samples,
            rows_failed,
            errors,
        })
    }

    fn parse_record(&self, record: &csv::StringRecord) -> Result<Sample, IngestError> {
        let ts_str = record
            .get(self.timestamp_column)
            .map(str::trim)
            .ok_or_else(|| IngestError::ParseError("missing timestamp column".to_string()))?;
        let value_str = record
            .get(self.value_column)
            .map(str::trim)
            .ok_or_else(|| IngestError::ParseError("missing value column".to_string()))?;

        let timestamp = parse_timestamp_micros(ts_str)?;
        let value = value_str
            .parse::<f64>()
            .map_err(|_| IngestError::ParseError(format!("Could not parse value: {}", value_str)))?;

        Ok(Sample::new(timestamp, value))
    }
}

/// Parse an integer microsecond timestamp, accepting float notation
fn parse_timestamp_micros(ts_str: &str) -> Result<i64, IngestError> {
    if let Ok(ts) = ts_str.parse::<i64>() {
        return Ok(ts);
    }

    match ts_str.parse::<f64>() {
        Ok(ts) if ts.is_finite() => Ok(ts.round() as i64),
        _ => Err(IngestError::ParseError(format!(
            "Could not parse timestamp: {}",
            ts_str
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_simple_csv_read() {
        let csv_data = "timestamp,eda
1695394800000000,0.412
1695394800015625,0.415
1695394800031250,0.419";

        let result = RawCsvReader::new().read_str(csv_data).unwrap();

        assert_eq!(result.rows_failed, 0);
        assert_eq!(
            result.samples,
            vec![
                Sample::new(1_695_394_800_000_000, 0.412),
                Sample::new(1_695_394_800_015_625, 0.415),
                Sample::new(1_695_394_800_031_250, 0.419),
            ]
        );
    }

    #[test]
    fn test_float_timestamps_are_rounded() {
        let csv_data = "1000.4,1.0\n2000.6,1.1\n";
        let result = RawCsvReader::new().with_header(false).read_str(csv_data).unwrap();

        let timestamps: Vec<i64> = result.samples.iter().map(|s| s.timestamp).collect();
        assert_eq!(timestamps, vec![1000, 2001]);
    }

    #[test]
    fn test_bad_rows_are_reported() {
        let csv_data = "timestamp,eda
1000,0.5
oops,0.6
3000,
4000,0.8";

        let result = RawCsvReader::new().read_str(csv_data).unwrap();

        assert_eq!(result.samples.len(), 2);
        assert_eq!(result.rows_failed, 2);
        assert!(result.errors[0].starts_with("Line 3:"));
        assert!(result.errors[1].starts_with("Line 4:"));
    }

    #[test]
    fn test_custom_columns() {
        let csv_data = "eda,label,timestamp
0.5,a,1000
0.6,b,2000";

        let result = RawCsvReader::new()
            .with_timestamp_column(2)
            .with_value_column(0)
            .read_str(csv_data)
            .unwrap();

        assert_eq!(result.samples[1], Sample::new(2000, 0.6));
    }

    #[test]
    fn test_out_of_order_rejected() {
        let csv_data = "timestamp,eda\n2000,0.1\n1000,0.2\n";
        let err = RawCsvReader::new().read_str(csv_data).unwrap_err();

        assert!(matches!(
            err,
            IngestError::Unordered {
                line: 3,
                timestamp: 1000,
                previous: 2000
            }
        ));
    }

    #[test]
    fn test_read_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "timestamp,eda").unwrap();
        writeln!(file, "0,1.0").unwrap();
        writeln!(file, "250000,1.5").unwrap();

        let result = RawCsvReader::new().read(file.path()).unwrap();
        assert_eq!(result.samples.len(), 2);
    }
}
