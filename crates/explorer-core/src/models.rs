use chrono::{Datelike, NaiveDateTime, Timelike};

use crate::cities::City;
use crate::filters::{DayFilter, MonthFilter};

/// A single trip record with its derived calendar fields.
///
/// The derived fields are always recomputed from `start_time` at
/// construction; they are never read from the source file.
#[derive(Debug, Clone, PartialEq)]
pub struct Trip {
    /// Local start timestamp as recorded in the dataset.
    pub start_time: NaiveDateTime,
    /// Name of the station where the trip began.
    pub start_station: String,
    /// Name of the station where the trip ended.
    pub end_station: String,
    /// Trip length in seconds.
    pub duration_secs: u64,
    /// Rider category, e.g. `"Subscriber"` or `"Customer"`.
    pub user_type: String,
    /// Rider gender; absent in some datasets.
    pub gender: Option<String>,
    /// Rider birth year; absent in some datasets.
    pub birth_year: Option<i32>,
    /// Derived: calendar month of `start_time`, 1-12.
    pub month: u32,
    /// Derived: weekday of `start_time`, 0 = Monday .. 6 = Sunday.
    pub weekday: u32,
    /// Derived: hour of `start_time`, 0-23.
    pub hour: u32,
}

impl Trip {
    /// Build a trip, computing the derived calendar fields from `start_time`.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        start_time: NaiveDateTime,
        start_station: String,
        end_station: String,
        duration_secs: u64,
        user_type: String,
        gender: Option<String>,
        birth_year: Option<i32>,
    ) -> Self {
        Self {
            month: start_time.month(),
            weekday: start_time.weekday().num_days_from_monday(),
            hour: start_time.hour(),
            start_time,
            start_station,
            end_station,
            duration_secs,
            user_type,
            gender,
            birth_year,
        }
    }
}

/// An ordered sequence of trips in source-file order.
///
/// Created fresh for every session-loop iteration and dropped once the
/// reports have run; nothing is cached across iterations.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TripTable {
    trips: Vec<Trip>,
}

impl TripTable {
    pub fn new(trips: Vec<Trip>) -> Self {
        Self { trips }
    }

    /// Rows in original file order.
    pub fn trips(&self) -> &[Trip] {
        &self.trips
    }

    pub fn len(&self) -> usize {
        self.trips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trips.is_empty()
    }
}

/// A validated (city, month, day) selection, produced by the prompt loop
/// and consumed by the dataset loader.
#[derive(Debug, Clone)]
pub struct FilterSelection {
    pub city: City,
    pub month: MonthFilter,
    pub day: DayFilter,
}
