use chrono::{DateTime, TimeDelta, Utc};

const DEFAULT_INTERVAL_SECONDS: i64 = 3600;

/// The time axis of an hourly block: `[start, end)` stepped by `interval`, in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HourlyAxis {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub interval: TimeDelta,
}

impl HourlyAxis {
    /// Derives the axis from the unix timestamps reported by the service.
    ///
    /// The start is the first stamp, the interval the distance between the first two
    /// stamps (one hour for a single stamp) and the end lies one interval past the last
    /// stamp. Returns `None` for an empty or non-increasing series.
    pub fn from_unix_times(times: &[i64]) -> Option<Self> {
        let first = *times.first()?;
        let last = *times.last()?;
        let step = match times.get(1) {
            Some(second) => second - first,
            None => DEFAULT_INTERVAL_SECONDS,
        };
        if step <= 0 {
            return None;
        }
        Some(Self {
            start: DateTime::from_timestamp(first, 0)?,
            end: DateTime::from_timestamp(last.checked_add(step)?, 0)?,
            interval: TimeDelta::try_seconds(step)?,
        })
    }

    pub fn timestamps(&self) -> impl Iterator<Item = DateTime<Utc>> {
        let end = self.end;
        let interval = self.interval;
        std::iter::successors(Some(self.start), move |t| t.checked_add_signed(interval))
            .take_while(move |t| *t < end)
    }
}

/// Second-precision ISO-8601 with a literal `Z`, e.g. `2020-01-01T13:00:00Z`.
pub fn format_timestamp(instant: DateTime<Utc>) -> String {
    instant.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const JAN_1_2020: i64 = 1_577_836_800;

    #[test]
    fn test_day_of_hours() {
        let times: Vec<i64> = (0..24).map(|h| JAN_1_2020 + h * 3600).collect();
        let axis = HourlyAxis::from_unix_times(&times).unwrap();

        assert_eq!(axis.timestamps().count(), 24);
        assert_eq!(axis.interval, TimeDelta::hours(1));
        let stamps: Vec<String> = axis.timestamps().map(format_timestamp).collect();
        assert_eq!(stamps[0], "2020-01-01T00:00:00Z");
        assert_eq!(stamps[23], "2020-01-01T23:00:00Z");
        assert_eq!(format_timestamp(axis.end), "2020-01-02T00:00:00Z");
    }

    #[test]
    fn test_single_stamp_uses_one_hour() {
        let axis = HourlyAxis::from_unix_times(&[JAN_1_2020]).unwrap();
        assert_eq!(axis.timestamps().count(), 1);
        assert_eq!(axis.end - axis.start, TimeDelta::hours(1));
    }

    #[test]
    fn test_invalid_series() {
        assert!(HourlyAxis::from_unix_times(&[]).is_none());
        assert!(HourlyAxis::from_unix_times(&[JAN_1_2020, JAN_1_2020]).is_none());
        assert!(HourlyAxis::from_unix_times(&[JAN_1_2020, JAN_1_2020 - 60]).is_none());
    }

    #[test]
    fn test_axis_ignores_gaps_in_reported_times() {
        // The axis is rebuilt from start, end and interval, so a hole in the reported
        // stamps shows up as a length difference against the value series.
        let times = [JAN_1_2020, JAN_1_2020 + 3600, JAN_1_2020 + 4 * 3600];
        let axis = HourlyAxis::from_unix_times(&times).unwrap();
        assert_eq!(axis.timestamps().count(), 5);
    }
}
