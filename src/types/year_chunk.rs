//! Splits a date range into calendar-year pieces so a single archive request never
//! spans more than one year.

use chrono::{Datelike, NaiveDate};
use std::fmt;

/// An inclusive `start..=end` date range that lies within a single calendar year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct YearChunk {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl YearChunk {
    pub fn year(&self) -> i32 {
        self.start.year()
    }

    /// Number of days covered, both ends included.
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

/// Formats as `2015-01-01..2015-12-31`.
impl fmt::Display for YearChunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// Lazily yields the [`YearChunk`]s of a range, ascending by year.
///
/// Created by [`year_chunks`].
#[derive(Debug, Clone)]
pub struct YearChunks {
    next_year: i32,
    start: NaiveDate,
    end: NaiveDate,
}

impl Iterator for YearChunks {
    type Item = YearChunk;

    fn next(&mut self) -> Option<Self::Item> {
        if self.start > self.end || self.next_year > self.end.year() {
            return None;
        }
        let year = self.next_year;
        self.next_year += 1;

        let chunk_start = if year == self.start.year() {
            self.start
        } else {
            NaiveDate::from_ymd_opt(year, 1, 1)?
        };
        let chunk_end = if year == self.end.year() {
            self.end
        } else {
            NaiveDate::from_ymd_opt(year, 12, 31)?
        };
        Some(YearChunk {
            start: chunk_start,
            end: chunk_end,
        })
    }
}

/// Splits `start..=end` into calendar years. The first and last chunk are clipped to
/// `start` and `end`; an inverted range yields nothing.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use weather_etl::year_chunks;
///
/// let start = NaiveDate::from_ymd_opt(2015, 6, 15).unwrap();
/// let end = NaiveDate::from_ymd_opt(2016, 2, 1).unwrap();
/// let chunks: Vec<String> = year_chunks(start, end).map(|c| c.to_string()).collect();
/// assert_eq!(chunks, ["2015-06-15..2015-12-31", "2016-01-01..2016-02-01"]);
/// ```
pub fn year_chunks(start: NaiveDate, end: NaiveDate) -> YearChunks {
    YearChunks {
        next_year: start.year(),
        start,
        end,
    }
}
