use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::{
    errors::{TurnoError, TurnoResult},
    models::time_format,
};

/// Half-open range `[start, end)` of local time on a single date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Interval {
    pub date: NaiveDate,
    #[serde(with = "time_format")]
    pub start: NaiveTime,
    #[serde(with = "time_format")]
    pub end: NaiveTime,
}

impl Interval {
    /// Builds an interval, rejecting empty and inverted ranges.
    pub fn new(date: NaiveDate, start: NaiveTime, end: NaiveTime) -> TurnoResult<Self> {
        if end <= start {
            return Err(TurnoError::InvalidRange(format!(
                "end {} must be after start {}",
                time_format::format(end),
                time_format::format(start)
            )));
        }
        Ok(Self { date, start, end })
    }

    /// Builds an interval of `length` starting at `start`. Fails when the
    /// range would run past midnight.
    pub fn starting_at(date: NaiveDate, start: NaiveTime, length: Duration) -> TurnoResult<Self> {
        let (end, wrapped) = start.overflowing_add_signed(length);
        if wrapped != 0 {
            return Err(TurnoError::InvalidRange(format!(
                "an interval of {} minutes starting at {} crosses midnight",
                length.num_minutes(),
                time_format::format(start)
            )));
        }
        Self::new(date, start, end)
    }

    /// For rows that were validated when they were written.
    pub(crate) fn unchecked(date: NaiveDate, start: NaiveTime, end: NaiveTime) -> Self {
        Self { date, start, end }
    }

    /// Standard half-open intersection. Touching intervals do not overlap and
    /// intervals on different dates never do.
    pub fn overlaps(&self, other: &Interval) -> bool {
        self.date == other.date && self.start < other.end && other.start < self.end
    }

    pub fn starts_at(&self) -> NaiveDateTime {
        self.date.and_time(self.start)
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Whether the interval lies inside `[opening, closing]`; an interval may
    /// end exactly at closing time.
    pub fn within(&self, opening: NaiveTime, closing: NaiveTime) -> bool {
        self.start >= opening && self.end <= closing
    }
}
