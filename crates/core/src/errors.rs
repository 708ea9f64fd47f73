use chrono::{NaiveDate, NaiveTime};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TurnoError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid range: {0}")]
    InvalidRange(String),

    #[error("Booking rejected: {0}")]
    Admission(#[from] AdmissionError),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Authorization error: {0}")]
    Authorization(String),

    #[error("Database error: {0}")]
    Database(#[from] eyre::Report),

    #[error("Internal server error: {0}")]
    Internal(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl TurnoError {
    /// Stable machine-readable code for API clients.
    pub fn code(&self) -> &'static str {
        match self {
            TurnoError::NotFound(_) => "not_found",
            TurnoError::Validation(_) => "validation",
            TurnoError::InvalidRange(_) => "invalid_range",
            TurnoError::Admission(err) => err.code(),
            TurnoError::Authentication(_) => "authentication",
            TurnoError::Authorization(_) => "authorization",
            TurnoError::Database(_) => "database",
            TurnoError::Internal(_) => "internal",
        }
    }
}

/// A calendar rule refused the request. Every variant names the rule that failed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AdmissionError {
    #[error("{0} is in the past")]
    PastDate(NaiveDate),

    #[error("bookings need {lead_minutes} minutes notice, earliest start is {earliest}")]
    LeadTime { lead_minutes: u32, earliest: NaiveTime },

    #[error("{start}-{end} is outside business hours {opening}-{closing}")]
    OutsideBusinessHours {
        start: NaiveTime,
        end: NaiveTime,
        opening: NaiveTime,
        closing: NaiveTime,
    },

    #[error("the schedule is blocked on {date}{}", reason_suffix(.reason))]
    Blocked {
        date: NaiveDate,
        reason: Option<String>,
    },

    #[error("the requested time overlaps an existing appointment")]
    Overlap { appointment_id: Option<i64> },

    #[error("customer {customer_id} already has an active appointment in the week of {week_start}")]
    WeeklyLimit {
        customer_id: i64,
        week_start: NaiveDate,
    },

    #[error("a full-day block already exists for {0}")]
    DuplicateFullDayBlock(NaiveDate),

    #[error("the requested time overlaps an existing block")]
    OverlappingBlock { block_id: Option<i64> },
}

impl AdmissionError {
    pub fn code(&self) -> &'static str {
        match self {
            AdmissionError::PastDate(_) => "past_date",
            AdmissionError::LeadTime { .. } => "lead_time",
            AdmissionError::OutsideBusinessHours { .. } => "outside_business_hours",
            AdmissionError::Blocked { .. } => "blocked",
            AdmissionError::Overlap { .. } => "overlap",
            AdmissionError::WeeklyLimit { .. } => "weekly_limit",
            AdmissionError::DuplicateFullDayBlock(_) => "duplicate_full_day_block",
            AdmissionError::OverlappingBlock { .. } => "overlapping_block",
        }
    }
}

fn reason_suffix(reason: &Option<String>) -> String {
    reason
        .as_deref()
        .map(|r| format!(" ({r})"))
        .unwrap_or_default()
}

pub type TurnoResult<T> = Result<T, TurnoError>;
