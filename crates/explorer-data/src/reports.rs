//! The four statistics reports.
//!
//! Each report is computed by a stateless constructor over the filtered
//! [`TripTable`] and rendered through `Display`, so the session loop can
//! write it to any output. An empty table renders an explicit no-data line
//! instead of statistics.

use std::fmt;

use explorer_core::filters::{day_name, month_name};
use explorer_core::formatting::format_count;
use explorer_core::models::TripTable;
use explorer_core::stats::{frequency_counts, mode};

/// Line rendered by every report when the filtered table has no rows.
pub const NO_DATA: &str = "No trips match the selected filters.";

// ── TimeStats ─────────────────────────────────────────────────────────────────

/// Most frequent travel times: month, weekday and start hour.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeStats {
    /// Most common derived month (1-12).
    pub common_month: Option<u32>,
    /// Most common derived weekday (0 = Monday .. 6 = Sunday).
    pub common_weekday: Option<u32>,
    /// Most common start hour (0-23).
    pub common_hour: Option<u32>,
}

impl TimeStats {
    pub fn compute(table: &TripTable) -> Self {
        Self {
            common_month: mode(table.trips().iter().map(|t| t.month)).map(|(v, _)| v),
            common_weekday: mode(table.trips().iter().map(|t| t.weekday)).map(|(v, _)| v),
            common_hour: mode(table.trips().iter().map(|t| t.hour)).map(|(v, _)| v),
        }
    }
}

impl fmt::Display for TimeStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (Some(month), Some(weekday), Some(hour)) =
            (self.common_month, self.common_weekday, self.common_hour)
        else {
            return writeln!(f, "{}", NO_DATA);
        };
        writeln!(f, "The most common month: {}", month_name(month))?;
        writeln!(f, "The most common day: {}", day_name(weekday))?;
        writeln!(f, "The most common hour: {}", hour)
    }
}

// ── StationStats ──────────────────────────────────────────────────────────────

/// Most popular start station, end station, and start/end combination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StationStats {
    pub common_start: Option<String>,
    pub common_end: Option<String>,
    /// The most frequent (start, end) pair and how often it occurred.
    pub common_trip: Option<(String, String, u64)>,
}

impl StationStats {
    pub fn compute(table: &TripTable) -> Self {
        let common_start =
            mode(table.trips().iter().map(|t| t.start_station.clone())).map(|(v, _)| v);
        let common_end =
            mode(table.trips().iter().map(|t| t.end_station.clone())).map(|(v, _)| v);
        let common_trip = mode(
            table
                .trips()
                .iter()
                .map(|t| (t.start_station.clone(), t.end_station.clone())),
        )
        .map(|((start, end), count)| (start, end, count));

        Self {
            common_start,
            common_end,
            common_trip,
        }
    }
}

impl fmt::Display for StationStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (Some(start), Some(end), Some((trip_start, trip_end, count))) =
            (&self.common_start, &self.common_end, &self.common_trip)
        else {
            return writeln!(f, "{}", NO_DATA);
        };
        writeln!(f, "The most common start station: {}", start)?;
        writeln!(f, "The most common end station: {}", end)?;
        writeln!(
            f,
            "The most common trip: {} -> {} ({} trips)",
            trip_start,
            trip_end,
            format_count(*count)
        )
    }
}

// ── DurationStats ─────────────────────────────────────────────────────────────

/// Total and mean trip duration over the filtered table.
#[derive(Debug, Clone, PartialEq)]
pub struct DurationStats {
    /// Sum of all trip durations in seconds (0 for an empty table).
    pub total_secs: u64,
    /// Arithmetic mean duration in seconds; `None` for an empty table.
    pub mean_secs: Option<f64>,
}

impl DurationStats {
    pub fn compute(table: &TripTable) -> Self {
        let total_secs: u64 = table.trips().iter().map(|t| t.duration_secs).sum();
        let mean_secs = if table.is_empty() {
            None
        } else {
            Some(total_secs as f64 / table.len() as f64)
        };
        Self {
            total_secs,
            mean_secs,
        }
    }
}

impl fmt::Display for DurationStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(mean) = self.mean_secs else {
            return writeln!(f, "{}", NO_DATA);
        };
        // The minute and hour figures are plain divisions, no rounding.
        writeln!(
            f,
            "Total travel time: {} seconds = {} minutes = {} hours",
            format_count(self.total_secs),
            self.total_secs as f64 / 60.0,
            self.total_secs as f64 / 3600.0
        )?;
        writeln!(f, "Average travel time: {} seconds", mean)
    }
}

// ── UserStats ─────────────────────────────────────────────────────────────────

/// Earliest, most recent and most common rider birth year.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BirthYearStats {
    pub earliest: i32,
    pub most_recent: i32,
    pub most_common: i32,
}

/// Rider demographics: user types, gender breakdown, birth years.
///
/// Gender and birth year are optional columns; when a city's dataset lacks
/// them the report says so instead of failing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserStats {
    /// User-type counts, descending by count (ties keep first-seen order).
    pub user_types: Vec<(String, u64)>,
    /// Gender counts, descending; empty when the column is absent.
    pub genders: Vec<(String, u64)>,
    /// Birth-year summary; `None` when the column is absent.
    pub birth_years: Option<BirthYearStats>,
}

impl UserStats {
    pub fn compute(table: &TripTable) -> Self {
        // Blank user types (present in some exports) are not a category.
        let user_types = frequency_counts(
            table
                .trips()
                .iter()
                .map(|t| t.user_type.trim())
                .filter(|ut| !ut.is_empty())
                .map(str::to_string),
        );

        let genders = frequency_counts(table.trips().iter().filter_map(|t| t.gender.clone()));

        let years: Vec<i32> = table.trips().iter().filter_map(|t| t.birth_year).collect();
        let birth_years = if years.is_empty() {
            None
        } else {
            // `years` is non-empty here, so min/max/mode all exist.
            let earliest = *years.iter().min().unwrap_or(&0);
            let most_recent = *years.iter().max().unwrap_or(&0);
            let most_common = mode(years).map(|(v, _)| v).unwrap_or(0);
            Some(BirthYearStats {
                earliest,
                most_recent,
                most_common,
            })
        };

        Self {
            user_types,
            genders,
            birth_years,
        }
    }
}

impl fmt::Display for UserStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.user_types.is_empty() {
            return writeln!(f, "{}", NO_DATA);
        }

        writeln!(f, "Counts of each user type:")?;
        for (user_type, count) in &self.user_types {
            writeln!(f, "  {}: {}", user_type, format_count(*count))?;
        }

        if self.genders.is_empty() {
            writeln!(f, "Gender data is not available for this city.")?;
        } else {
            writeln!(f, "Counts of each gender:")?;
            for (gender, count) in &self.genders {
                writeln!(f, "  {}: {}", gender, format_count(*count))?;
            }
        }

        match &self.birth_years {
            None => writeln!(f, "Birth year data is not available for this city."),
            Some(by) => {
                writeln!(f, "Earliest birth year: {}", by.earliest)?;
                writeln!(f, "Most recent birth year: {}", by.most_recent)?;
                writeln!(f, "Most common birth year: {}", by.most_common)
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
