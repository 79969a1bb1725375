//! Alerts table: one CSV row per scored observation
//!
//! Schema `t,value,score,is_anomaly` in timestamp order; `is_anomaly` is
//! written as 0/1. The same table is read back for offline drift analysis
//! and plotting, so a missing file is reported as a precondition failure
//! rather than an empty history.

use crate::anomaly::AnomalyResult;
use crate::observation::{parse_value, InvalidObservation, Observation};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fs::{self, File};
use std::io::{self, BufReader, Read, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Column names of the alerts table, in order
pub const ALERTS_COLUMNS: [&str; 4] = ["t", "value", "score", "is_anomaly"];

/// Errors reading or writing the alerts table
#[derive(Error, Debug)]
pub enum AlertsError {
    #[error("Missing {0}. Run `streamguard stream` first")]
    MissingInput(PathBuf),

    #[error("Malformed alerts table at line {line}: {reason}")]
    Parse { line: u64, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl From<csv::Error> for AlertsError {
    fn from(err: csv::Error) -> Self {
        let line = err.position().map_or(0, csv::Position::line);
        let reason = match err.kind() {
            csv::ErrorKind::Deserialize { err, .. } => err.to_string(),
            _ => err.to_string(),
        };
        match err.into_kind() {
            csv::ErrorKind::Io(e) => AlertsError::Io(e),
            _ => AlertsError::Parse { line, reason },
        }
    }
}

/// A persisted scoring result
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlertRow {
    pub t: i64,
    #[serde(deserialize_with = "finite_field")]
    pub value: f64,
    #[serde(deserialize_with = "finite_field")]
    pub score: f64,
    #[serde(serialize_with = "flag_as_int", deserialize_with = "flag_field")]
    pub is_anomaly: bool,
}

impl AlertRow {
    pub fn new(observation: &Observation, result: &AnomalyResult) -> Self {
        Self {
            t: observation.timestamp(),
            value: observation.value(),
            score: result.score,
            is_anomaly: result.is_anomaly,
        }
    }

    pub fn observation(&self) -> Result<Observation, InvalidObservation> {
        Observation::new(self.t, self.value)
    }
}

fn finite_field<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    let raw = String::deserialize(deserializer)?;
    parse_value(&raw).map_err(de::Error::custom)
}

/// Accepts 0/1 as written here plus the boolean spellings of other tools
fn flag_field<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    let raw = String::deserialize(deserializer)?;
    match raw.as_str() {
        "1" | "true" | "True" | "TRUE" => Ok(true),
        "0" | "false" | "False" | "FALSE" => Ok(false),
        other => Err(de::Error::custom(format!(
            "is_anomaly: expected 0/1, got {:?}",
            other
        ))),
    }
}

fn flag_as_int<S: Serializer>(flag: &bool, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u8(u8::from(*flag))
}

/// Destination for scoring results, one row at a time
pub trait AlertSink {
    fn append(&mut self, row: &AlertRow) -> Result<(), AlertsError>;

    /// Push anything still buffered to the underlying storage
    fn finish(&mut self) -> Result<(), AlertsError> {
        Ok(())
    }
}

/// Streaming CSV writer; every appended row is flushed before `append` returns
pub struct AlertsWriter<W: Write> {
    writer: csv::Writer<W>,
    rows: usize,
}

impl AlertsWriter<File> {
    /// Create (or truncate) the table at `path`, creating the parent directory
    pub fn create(path: &Path) -> Result<Self, AlertsError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        Self::new(File::create(path)?)
    }
}

impl<W: Write> AlertsWriter<W> {
    /// Wrap `inner` and write the header row
    pub fn new(inner: W) -> Result<Self, AlertsError> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(inner);
        writer.write_record(ALERTS_COLUMNS)?;
        writer.flush()?;
        Ok(Self { writer, rows: 0 })
    }

    /// Rows written so far (header excluded)
    pub fn rows_written(&self) -> usize {
        self.rows
    }

    /// Flush and return the underlying writer
    pub fn into_inner(self) -> Result<W, AlertsError> {
        self.writer
            .into_inner()
            .map_err(|e| AlertsError::Io(e.into_error()))
    }
}

impl<W: Write> AlertSink for AlertsWriter<W> {
    fn append(&mut self, row: &AlertRow) -> Result<(), AlertsError> {
        self.writer.serialize(row)?;
        self.writer.flush()?;
        self.rows += 1;
        Ok(())
    }

    fn finish(&mut self) -> Result<(), AlertsError> {
        self.writer.flush()?;
        tracing::debug!(rows = self.rows, "alerts table flushed");
        Ok(())
    }
}

/// In-memory alerts table
#[derive(Debug, Clone, Default)]
pub struct AlertsTable {
    rows: Vec<AlertRow>,
}

impl AlertSink for AlertsTable {
    fn append(&mut self, row: &AlertRow) -> Result<(), AlertsError> {
        self.push(*row);
        Ok(())
    }
}

impl AlertsTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_rows(rows: Vec<AlertRow>) -> Self {
        Self { rows }
    }

    /// Append a row
    pub fn push(&mut self, row: AlertRow) {
        self.rows.push(row);
    }

    pub fn rows(&self) -> &[AlertRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// History as observations, for drift comparison
    ///
    /// Rows with a non-finite value are logged and left out.
    pub fn observations(&self) -> Vec<Observation> {
        self.rows
            .iter()
            .filter_map(|row| match row.observation() {
                Ok(obs) => Some(obs),
                Err(e) => {
                    tracing::warn!(t = row.t, "skipping alerts row: {}", e);
                    None
                }
            })
            .collect()
    }

    /// Render the table as CSV text
    pub fn to_csv(&self) -> Result<String, AlertsError> {
        let mut writer = AlertsWriter::new(Vec::new())?;
        for row in &self.rows {
            writer.append(row)?;
        }
        let bytes = writer.into_inner()?;
        String::from_utf8(bytes)
            .map_err(|e| AlertsError::Io(io::Error::new(io::ErrorKind::InvalidData, e)))
    }

    /// Parse an alerts table
    ///
    /// Columns are matched by header name; quoting, surrounding whitespace
    /// and a leading UTF-8 BOM are accepted.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, AlertsError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = csv_reader.headers()?.clone();
        let missing: Vec<&str> = ALERTS_COLUMNS
            .iter()
            .copied()
            .filter(|column| !headers.iter().any(|h| h == *column))
            .collect();
        if !missing.is_empty() {
            return Err(AlertsError::Parse {
                line: 1,
                reason: format!("header lacks column(s) {}", missing.join(", ")),
            });
        }

        let rows = csv_reader
            .deserialize::<AlertRow>()
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { rows })
    }

    /// Parse CSV text
    pub fn from_csv(text: &str) -> Result<Self, AlertsError> {
        Self::from_reader(text.as_bytes())
    }

    /// Write the table, creating the parent directory if needed
    pub fn write_to(&self, path: &Path) -> Result<(), AlertsError> {
        let mut writer = AlertsWriter::create(path)?;
        for row in &self.rows {
            writer.append(row)?;
        }
        writer.finish()?;
        tracing::debug!(rows = self.rows.len(), path = %path.display(), "wrote alerts table");
        Ok(())
    }
}

/// Read a persisted alerts table
pub fn read_alerts(path: &Path) -> Result<AlertsTable, AlertsError> {
    if !path.exists() {
        return Err(AlertsError::MissingInput(path.to_path_buf()));
    }

    AlertsTable::from_reader(BufReader::new(File::open(path)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(t: i64, value: f64, score: f64, is_anomaly: bool) -> AlertRow {
        AlertRow {
            t,
            value,
            score,
            is_anomaly,
        }
    }

    #[test]
    fn test_csv_header() {
        let table = AlertsTable::new();
        assert_eq!(table.to_csv().unwrap(), "t,value,score,is_anomaly\n");
    }

    #[test]
    fn test_csv_row_format() {
        let mut table = AlertsTable::new();
        table.push(row(0, 0.5, 0.0, false));
        table.push(row(1, 10.0, 4.25, true));

        let csv = table.to_csv().unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("0,0.5,"));
        assert!(lines[1].ends_with(",0"));
        assert!(lines[2].contains(",4.25,"));
        assert!(lines[2].ends_with(",1"));
    }

    #[test]
    fn test_parse_back_preserves_values() {
        let mut table = AlertsTable::new();
        table.push(row(0, -0.123456789012345, 0.0, false));
        table.push(row(1, 1e-300, 7.5, true));

        let parsed = AlertsTable::from_csv(&table.to_csv().unwrap()).unwrap();
        assert_eq!(parsed.rows(), table.rows());
    }

    #[test]
    fn test_parse_accepts_boolean_spelling() {
        let csv = "t,value,score,is_anomaly\n0,1.0,0.0,False\n1,2.0,5.0,True\n";
        let table = AlertsTable::from_csv(csv).unwrap();
        assert!(!table.rows()[0].is_anomaly);
        assert!(table.rows()[1].is_anomaly);
    }

    #[test]
    fn test_parse_accepts_quoted_fields() {
        let csv = "\"t\",\"value\",\"score\",\"is_anomaly\"\n\"0\",\"1.0\",\"0.0\",\"0\"\n";
        let table = AlertsTable::from_csv(csv).unwrap();
        assert_eq!(table.rows(), &[row(0, 1.0, 0.0, false)]);
    }

    #[test]
    fn test_parse_accepts_bom_and_padding() {
        let csv = "\u{feff}t, value, score, is_anomaly\n 3 , 2.5 , 0 , 1 \n";
        let table = AlertsTable::from_csv(csv).unwrap();
        assert_eq!(table.rows(), &[row(3, 2.5, 0.0, true)]);
    }

    #[test]
    fn test_parse_matches_columns_by_name() {
        let csv = "is_anomaly,score,t,value\n1,6.5,4,9.0\n";
        let table = AlertsTable::from_csv(csv).unwrap();
        assert_eq!(table.rows(), &[row(4, 9.0, 6.5, true)]);
    }

    #[test]
    fn test_parse_rejects_bad_header() {
        let err = AlertsTable::from_csv("time,v\n").unwrap_err();
        assert!(matches!(err, AlertsError::Parse { line: 1, .. }));
        assert!(err.to_string().contains("value"));
    }

    #[test]
    fn test_parse_rejects_empty_input() {
        assert!(matches!(
            AlertsTable::from_csv("").unwrap_err(),
            AlertsError::Parse { line: 1, .. }
        ));
    }

    #[test]
    fn test_parse_rejects_non_finite_value() {
        let csv = "t,value,score,is_anomaly\n0,1.0,0.0,0\n1,NaN,0.0,0\n";
        let err = AlertsTable::from_csv(csv).unwrap_err();
        assert!(matches!(err, AlertsError::Parse { line: 3, .. }));
        assert!(err.to_string().contains("not finite"));
    }

    #[test]
    fn test_parse_rejects_bad_flag() {
        let csv = "t,value,score,is_anomaly\n0,1.0,0.0,maybe\n";
        let err = AlertsTable::from_csv(csv).unwrap_err();
        assert!(err.to_string().contains("is_anomaly"));
    }

    #[test]
    fn test_parse_rejects_wrong_field_count() {
        let csv = "t,value,score,is_anomaly\n0,1.0\n";
        assert!(matches!(
            AlertsTable::from_csv(csv).unwrap_err(),
            AlertsError::Parse { .. }
        ));
    }

    #[test]
    fn test_observations_view() {
        let table = AlertsTable::from_rows(vec![row(3, 2.0, 0.0, false)]);
        let observations = table.observations();
        assert_eq!(observations[0].timestamp(), 3);
        assert_eq!(observations[0].value(), 2.0);
    }

    #[test]
    fn test_observations_view_skips_non_finite_rows() {
        let table = AlertsTable::from_rows(vec![
            row(0, 1.0, 0.0, false),
            row(1, f64::NAN, 0.0, false),
            row(2, 3.0, 0.0, false),
        ]);
        let ts: Vec<i64> = table.observations().iter().map(Observation::timestamp).collect();
        assert_eq!(ts, vec![0, 2]);
    }

    #[test]
    fn test_writer_counts_rows() {
        let mut writer = AlertsWriter::new(Vec::new()).unwrap();
        for t in 0..5 {
            writer.append(&row(t, t as f64, 0.0, false)).unwrap();
        }
        writer.finish().unwrap();
        assert_eq!(writer.rows_written(), 5);

        let text = String::from_utf8(writer.into_inner().unwrap()).unwrap();
        assert_eq!(AlertsTable::from_csv(&text).unwrap().len(), 5);
    }

    #[test]
    fn test_writer_rows_visible_before_finish() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("alerts.csv");

        let mut writer = AlertsWriter::create(&path).unwrap();
        writer.append(&row(0, 1.0, 0.0, false)).unwrap();
        writer.append(&row(1, 2.0, 0.0, false)).unwrap();

        // Still open, both rows already on disk
        assert_eq!(read_alerts(&path).unwrap().len(), 2);
    }

    #[test]
    fn test_read_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("alerts.csv");
        let err = read_alerts(&path).unwrap_err();
        assert!(matches!(err, AlertsError::MissingInput(_)));
        assert!(err.to_string().contains("alerts.csv"));
    }

    #[test]
    fn test_write_and_read_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("alerts.csv");

        let table = AlertsTable::from_rows(vec![row(0, 1.5, 0.0, false)]);
        table.write_to(&path).unwrap();

        let read = read_alerts(&path).unwrap();
        assert_eq!(read.rows(), table.rows());
    }
}
