use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use super::time_format;
use crate::schedule::Interval;

/// Administrative closure of a whole day or part of one ("bloqueo de agenda").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleBlock {
    pub id: i64,
    pub date: NaiveDate,
    pub is_full_day: bool,
    #[serde(default, with = "time_format::option")]
    pub start: Option<NaiveTime>,
    #[serde(default, with = "time_format::option")]
    pub end: Option<NaiveTime>,
    pub reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl ScheduleBlock {
    /// The blocked interval of a partial block. Full-day blocks have none.
    pub fn interval(&self) -> Option<Interval> {
        if self.is_full_day {
            return None;
        }
        match (self.start, self.end) {
            (Some(start), Some(end)) => Some(Interval::unchecked(self.date, start, end)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateBlockRequest {
    pub date: NaiveDate,
    #[serde(default)]
    pub is_full_day: bool,
    #[serde(default, with = "time_format::option")]
    pub start: Option<NaiveTime>,
    #[serde(default, with = "time_format::option")]
    pub end: Option<NaiveTime>,
    pub reason: Option<String>,
}

impl CreateBlockRequest {
    pub fn full_day(date: NaiveDate, reason: Option<&str>) -> Self {
        Self {
            date,
            is_full_day: true,
            start: None,
            end: None,
            reason: reason.map(str::to_string),
        }
    }

    pub fn partial(
        date: NaiveDate,
        start: NaiveTime,
        end: NaiveTime,
        reason: Option<&str>,
    ) -> Self {
        Self {
            date,
            is_full_day: false,
            start: Some(start),
            end: Some(end),
            reason: reason.map(str::to_string),
        }
    }
}

/// A block that passed admission, ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NewScheduleBlock {
    FullDay {
        date: NaiveDate,
        reason: Option<String>,
    },
    Partial {
        interval: Interval,
        reason: Option<String>,
    },
}

impl NewScheduleBlock {
    pub fn date(&self) -> NaiveDate {
        match self {
            NewScheduleBlock::FullDay { date, .. } => *date,
            NewScheduleBlock::Partial { interval, .. } => interval.date,
        }
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            NewScheduleBlock::FullDay { reason, .. } | NewScheduleBlock::Partial { reason, .. } => {
                reason.as_deref()
            }
        }
    }

    pub fn is_full_day(&self) -> bool {
        matches!(self, NewScheduleBlock::FullDay { .. })
    }

    pub fn times(&self) -> (Option<NaiveTime>, Option<NaiveTime>) {
        match self {
            NewScheduleBlock::FullDay { .. } => (None, None),
            NewScheduleBlock::Partial { interval, .. } => {
                (Some(interval.start), Some(interval.end))
            }
        }
    }
}

/// Available slots for a day together with the blocks that explain missing ones.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotsResponse {
    pub date: NaiveDate,
    pub slots: Vec<String>,
    pub blocks: Vec<ScheduleBlock>,
}
