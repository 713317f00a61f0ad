//! CSV trip-table loading.
//!
//! Reads a city's trip CSV into [`Trip`] records, deriving the month,
//! weekday and hour fields from the start timestamp and applying the
//! month/day filters as rows stream in. A missing or structurally broken
//! file is a fatal error; absent optional columns are not.

use std::fs::File;
use std::io::BufReader;

use chrono::NaiveDateTime;
use explorer_core::error::{ExplorerError, Result};
use explorer_core::models::{FilterSelection, Trip, TripTable};
use serde::Deserialize;
use tracing::debug;

/// Start-timestamp formats tried in order; the first match wins.
const TIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

// ── Raw record ────────────────────────────────────────────────────────────────

/// One CSV row as serialised in the source files.
///
/// The files carry an unnamed leading index column and an `End Time` column;
/// both are ignored. `Gender` and `Birth Year` are missing entirely from
/// some cities, hence the defaults. Numeric fields stay strings here so that
/// parse failures can be reported with their row and column.
#[derive(Debug, Deserialize)]
struct RawTrip {
    #[serde(rename = "Start Time")]
    start_time: String,
    #[serde(rename = "Start Station")]
    start_station: String,
    #[serde(rename = "End Station")]
    end_station: String,
    #[serde(rename = "Trip Duration")]
    trip_duration: String,
    #[serde(rename = "User Type")]
    user_type: String,
    #[serde(rename = "Gender", default)]
    gender: Option<String>,
    #[serde(rename = "Birth Year", default)]
    birth_year: Option<String>,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load the selected city's trips, filtered by the selection's month and day.
///
/// Both filters apply independently (logical AND); an `All` filter is a
/// no-op for its axis. Row order from the file is preserved.
pub fn load_trip_table(selection: &FilterSelection) -> Result<TripTable> {
    let path = &selection.city.path;
    if !path.exists() {
        return Err(ExplorerError::DatasetNotFound {
            city: selection.city.name.clone(),
            path: path.clone(),
        });
    }

    let file = File::open(path).map_err(|source| ExplorerError::FileRead {
        path: path.clone(),
        source,
    })?;
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(BufReader::new(file));

    let mut trips: Vec<Trip> = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in rdr.deserialize::<RawTrip>().enumerate() {
        // 1-based row number for error messages; the header is row 1.
        let row = idx + 2;
        let raw = result?;
        rows_read += 1;

        let trip = convert(row, raw)?;
        if selection.month.matches(trip.month) && selection.day.matches(trip.weekday) {
            trips.push(trip);
        }
    }

    debug!(
        "Loaded {} of {} rows from {} (month={}, day={})",
        trips.len(),
        rows_read,
        path.display(),
        selection.month,
        selection.day,
    );

    Ok(TripTable::new(trips))
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Convert a raw CSV record into a typed [`Trip`], computing derived fields.
fn convert(row: usize, raw: RawTrip) -> Result<Trip> {
    let start_time = parse_start_time(&raw.start_time).ok_or_else(|| {
        ExplorerError::TimestampParse {
            row,
            value: raw.start_time.clone(),
        }
    })?;

    let duration_secs = parse_duration(row, &raw.trip_duration)?;

    let birth_year = match raw.birth_year.as_deref() {
        None => None,
        Some(s) if s.trim().is_empty() => None,
        Some(s) => Some(parse_birth_year(row, s)?),
    };

    // Treat whitespace-only gender values the same as an absent column.
    let gender = raw.gender.filter(|g| !g.trim().is_empty());

    Ok(Trip::new(
        start_time,
        raw.start_station,
        raw.end_station,
        duration_secs,
        raw.user_type,
        gender,
        birth_year,
    ))
}

/// Try each recognised timestamp format in order.
fn parse_start_time(s: &str) -> Option<NaiveDateTime> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }
    TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
}

/// Durations are whole seconds, but some exports serialise them in float
/// form (`"671.0"`); accept both.
fn parse_duration(row: usize, s: &str) -> Result<u64> {
    let trimmed = s.trim();
    if let Ok(secs) = trimmed.parse::<u64>() {
        return Ok(secs);
    }
    match trimmed.parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 => Ok(v as u64),
        _ => Err(ExplorerError::FieldParse {
            row,
            column: "Trip Duration".to_string(),
            value: s.to_string(),
            message: "expected a non-negative number of seconds".to_string(),
        }),
    }
}

/// Birth years arrive in pandas float form (`"1992.0"`) or as plain
/// integers; accept both.
fn parse_birth_year(row: usize, s: &str) -> Result<i32> {
    let trimmed = s.trim();
    if let Ok(year) = trimmed.parse::<i32>() {
        return Ok(year);
    }
    match trimmed.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v as i32),
        _ => Err(ExplorerError::FieldParse {
            row,
            column: "Birth Year".to_string(),
            value: s.to_string(),
            message: "expected a year".to_string(),
        }),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
