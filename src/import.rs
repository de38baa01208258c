//! Session history import from CSV and JSON files
//!
//! CSV files need a header row. Column names are matched case-insensitively
//! against a set of common aliases, so exports from most lifting logs work
//! without editing:
//!
//! ```text
//! date,volume,rpe,minutes
//! 2024-09-23,4200,7.5,65
//! 2024-09-25T18:30:00Z,3900,,
//! ```
//!
//! JSON files hold an array of session objects with RFC 3339 dates.
//!
//! Sessions are returned in file order.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use csv::{ReaderBuilder, StringRecord, Trim};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::{debug, info};

use crate::error::{ImportError, LoadRsError, Result};
use crate::models::WorkoutSession;

/// Supported session file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionFormat {
    Csv,
    Json,
}

impl SessionFormat {
    /// Detect format from the file extension
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();
        extension.parse()
    }
}

impl std::str::FromStr for SessionFormat {
    type Err = LoadRsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(SessionFormat::Csv),
            "json" => Ok(SessionFormat::Json),
            other => Err(ImportError::UnsupportedFormat {
                format: other.to_string(),
            }
            .into()),
        }
    }
}

/// Session importer with flexible CSV column mapping
pub struct SessionImporter {
    column_mapping: HashMap<String, String>,
}

impl SessionImporter {
    pub fn new() -> Self {
        let mut column_mapping = HashMap::new();

        Self::add_mapping(
            &mut column_mapping,
            "date",
            &["date", "timestamp", "time", "datetime", "started_at", "day"],
        );
        Self::add_mapping(
            &mut column_mapping,
            "volume",
            &["volume", "load", "tonnage", "total_volume", "training_load"],
        );
        Self::add_mapping(
            &mut column_mapping,
            "intensity",
            &["intensity", "rpe", "avg_rpe", "average_rpe", "exertion"],
        );
        Self::add_mapping(
            &mut column_mapping,
            "duration",
            &["duration", "minutes", "duration_minutes", "duration_min"],
        );

        Self { column_mapping }
    }

    fn add_mapping(mapping: &mut HashMap<String, String>, standard: &str, variations: &[&str]) {
        for variation in variations {
            mapping.insert(variation.to_lowercase(), standard.to_string());
        }
    }

    fn normalize_column_name(&self, name: &str) -> String {
        let normalized = name.trim().to_lowercase().replace([' ', '-'], "_");

        self.column_mapping
            .get(&normalized)
            .cloned()
            .unwrap_or(normalized)
    }

    /// Import sessions from a file, detecting the format from its extension
    /// unless one is given
    pub fn import_file(
        &self,
        path: &Path,
        format: Option<SessionFormat>,
    ) -> Result<Vec<WorkoutSession>> {
        if !path.exists() {
            return Err(ImportError::FileNotFound {
                path: path.to_path_buf(),
            }
            .into());
        }

        let format = match format {
            Some(format) => format,
            None => SessionFormat::from_path(path)?,
        };
        let reader = BufReader::new(File::open(path)?);

        let sessions = match format {
            SessionFormat::Csv => self.parse_csv(reader)?,
            SessionFormat::Json => self.parse_json(reader)?,
        };

        info!(
            path = %path.display(),
            format = ?format,
            sessions = sessions.len(),
            "imported session history"
        );

        Ok(sessions)
    }

    /// Parse sessions from CSV with a header row
    pub fn parse_csv<R: Read>(&self, reader: R) -> Result<Vec<WorkoutSession>> {
        let mut csv_reader = ReaderBuilder::new()
            .has_headers(true)
            .trim(Trim::All)
            .flexible(true)
            .from_reader(reader);

        let headers = csv_reader
            .headers()
            .map_err(|e| csv_error(0, e))?
            .clone();
        let columns: HashMap<String, usize> = headers
            .iter()
            .enumerate()
            .map(|(i, name)| (self.normalize_column_name(name), i))
            .collect();

        let date_column = required_column(&columns, "date")?;
        let volume_column = required_column(&columns, "volume")?;
        let intensity_column = columns.get("intensity").copied();
        let duration_column = columns.get("duration").copied();

        let mut sessions = Vec::new();
        for (index, result) in csv_reader.records().enumerate() {
            let record_number = index + 1;
            let record = result.map_err(|e| csv_error(record_number, e))?;

            let date_value = field(&record, Some(date_column)).ok_or_else(|| {
                ImportError::MissingField {
                    field: "date".to_string(),
                }
            })?;
            let date = parse_datetime(date_value).ok_or_else(|| ImportError::InvalidValue {
                field: "date".to_string(),
                record: record_number,
                value: date_value.to_string(),
            })?;

            let volume_value = field(&record, Some(volume_column)).ok_or_else(|| {
                ImportError::MissingField {
                    field: "volume".to_string(),
                }
            })?;
            let volume = parse_volume(volume_value, record_number)?;

            let intensity = field(&record, intensity_column)
                .map(|value| {
                    value.parse::<f64>().map_err(|_| ImportError::InvalidValue {
                        field: "intensity".to_string(),
                        record: record_number,
                        value: value.to_string(),
                    })
                })
                .transpose()?;

            let duration = field(&record, duration_column)
                .map(|value| {
                    value.parse::<u32>().map_err(|_| ImportError::InvalidValue {
                        field: "duration".to_string(),
                        record: record_number,
                        value: value.to_string(),
                    })
                })
                .transpose()?;

            sessions.push(WorkoutSession {
                volume,
                date,
                intensity,
                duration,
            });
        }

        debug!(sessions = sessions.len(), "parsed CSV sessions");
        Ok(sessions)
    }

    /// Parse sessions from a JSON array
    pub fn parse_json<R: Read>(&self, reader: R) -> Result<Vec<WorkoutSession>> {
        let sessions: Vec<WorkoutSession> =
            serde_json::from_reader(reader).map_err(|e| ImportError::ParseError {
                format: "json".to_string(),
                record: e.line(),
                reason: e.to_string(),
            })?;

        for (index, session) in sessions.iter().enumerate() {
            if !session.volume.is_finite() || session.volume < 0.0 {
                return Err(ImportError::InvalidValue {
                    field: "volume".to_string(),
                    record: index + 1,
                    value: session.volume.to_string(),
                }
                .into());
            }
        }

        debug!(sessions = sessions.len(), "parsed JSON sessions");
        Ok(sessions)
    }
}

impl Default for SessionImporter {
    fn default() -> Self {
        Self::new()
    }
}

fn required_column(columns: &HashMap<String, usize>, name: &str) -> Result<usize> {
    columns.get(name).copied().ok_or_else(|| {
        ImportError::MissingField {
            field: name.to_string(),
        }
        .into()
    })
}

/// Non-empty field value at `column`
fn field(record: &StringRecord, column: Option<usize>) -> Option<&str> {
    column
        .and_then(|i| record.get(i))
        .filter(|value| !value.is_empty())
}

fn csv_error(record: usize, err: csv::Error) -> LoadRsError {
    ImportError::ParseError {
        format: "csv".to_string(),
        record,
        reason: err.to_string(),
    }
    .into()
}

fn parse_volume(value: &str, record: usize) -> Result<f64> {
    match value.parse::<f64>() {
        Ok(volume) if volume.is_finite() && volume >= 0.0 => Ok(volume),
        _ => Err(ImportError::InvalidValue {
            field: "volume".to_string(),
            record,
            value: value.to_string(),
        }
        .into()),
    }
}

/// Parse the date formats commonly found in training log exports
fn parse_datetime(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }

    let formats = [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%d/%m/%Y %H:%M:%S",
    ];
    for format in &formats {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Some(naive.and_utc());
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
    }

    // Seconds since epoch
    value
        .parse::<i64>()
        .ok()
        .and_then(|timestamp| DateTime::from_timestamp(timestamp, 0))
}
