use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use super::time_format;
use crate::{errors::TurnoError, schedule::Interval};

/// Lifecycle of a turno.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
    InProgress,
}

impl AppointmentStatus {
    pub const ALL: [AppointmentStatus; 5] = [
        AppointmentStatus::Pending,
        AppointmentStatus::Confirmed,
        AppointmentStatus::Cancelled,
        AppointmentStatus::Completed,
        AppointmentStatus::InProgress,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Pending => "pending",
            AppointmentStatus::Confirmed => "confirmed",
            AppointmentStatus::Cancelled => "cancelled",
            AppointmentStatus::Completed => "completed",
            AppointmentStatus::InProgress => "in_progress",
        }
    }

    /// Whether the appointment still holds its time on the calendar.
    pub fn occupies_calendar(&self) -> bool {
        !matches!(self, AppointmentStatus::Cancelled)
    }

    /// Pending and confirmed appointments count towards the weekly limit.
    pub fn is_active(&self) -> bool {
        matches!(self, AppointmentStatus::Pending | AppointmentStatus::Confirmed)
    }

    /// The nominal state chart. `set_status` does not enforce it; callers use
    /// this to flag unusual transitions.
    pub fn can_transition_to(&self, next: AppointmentStatus) -> bool {
        use AppointmentStatus::*;
        matches!(
            (self, next),
            (Pending, Confirmed | Cancelled | InProgress)
                | (Confirmed, InProgress | Cancelled | Completed)
                | (InProgress, Completed | Cancelled)
                | (Cancelled, Pending)
        )
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppointmentStatus {
    type Err = TurnoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AppointmentStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| TurnoError::Validation(format!("Unknown appointment status `{s}`")))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: i64,
    pub customer_id: i64,
    pub service_id: i64,
    pub date: NaiveDate,
    #[serde(with = "time_format")]
    pub start: NaiveTime,
    #[serde(with = "time_format")]
    pub end: NaiveTime,
    pub status: AppointmentStatus,
    pub notified: bool,
    pub created_at: DateTime<Utc>,
}

impl Appointment {
    pub fn interval(&self) -> Interval {
        Interval::unchecked(self.date, self.start, self.end)
    }
}

/// Row to be inserted by a store. Always starts out pending and unnotified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAppointment {
    pub customer_id: i64,
    pub service_id: i64,
    pub interval: Interval,
}

/// Who the booking is for: an existing customer, or contact details to look
/// up (by phone) or register.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CustomerRef {
    Id { customer_id: i64 },
    Contact { name: String, phone: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ServiceRef {
    Id { service_id: i64 },
    Name { service: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingRequest {
    #[serde(flatten)]
    pub customer: CustomerRef,
    #[serde(flatten)]
    pub service: ServiceRef,
    pub date: NaiveDate,
    #[serde(with = "time_format")]
    pub start: NaiveTime,
    #[serde(default, with = "time_format::option")]
    pub end: Option<NaiveTime>,
}

/// Partial update of an appointment; absent fields keep their value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateAppointmentRequest {
    pub customer_id: Option<i64>,
    pub service_id: Option<i64>,
    pub date: Option<NaiveDate>,
    #[serde(default, with = "time_format::option")]
    pub start: Option<NaiveTime>,
    #[serde(default, with = "time_format::option")]
    pub end: Option<NaiveTime>,
    pub status: Option<AppointmentStatus>,
}

impl UpdateAppointmentRequest {
    pub fn moves_slot(&self) -> bool {
        self.date.is_some() || self.start.is_some() || self.end.is_some()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusChangeRequest {
    pub status: AppointmentStatus,
}

/// Filters for appointment listings. Dates are inclusive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppointmentQuery {
    pub customer_id: Option<i64>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub status: Option<AppointmentStatus>,
    pub skip: i64,
    pub limit: i64,
}

impl AppointmentQuery {
    pub const DEFAULT_LIMIT: i64 = 100;

    pub fn between(from: NaiveDate, to: NaiveDate) -> Self {
        Self {
            from: Some(from),
            to: Some(to),
            limit: i64::MAX,
            ..Default::default()
        }
    }

    pub fn matches(&self, appointment: &Appointment) -> bool {
        self.customer_id.is_none_or(|id| appointment.customer_id == id)
            && self.from.is_none_or(|from| appointment.date >= from)
            && self.to.is_none_or(|to| appointment.date <= to)
            && self.status.is_none_or(|status| appointment.status == status)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppointmentStats {
    pub total: usize,
    pub pending: usize,
    pub confirmed: usize,
    pub cancelled: usize,
    pub completed: usize,
    pub in_progress: usize,
}

impl AppointmentStats {
    pub fn tally<'a>(appointments: impl IntoIterator<Item = &'a Appointment>) -> Self {
        appointments
            .into_iter()
            .fold(Self::default(), |mut stats, appointment| {
                stats.total += 1;
                match appointment.status {
                    AppointmentStatus::Pending => stats.pending += 1,
                    AppointmentStatus::Confirmed => stats.confirmed += 1,
                    AppointmentStatus::Cancelled => stats.cancelled += 1,
                    AppointmentStatus::Completed => stats.completed += 1,
                    AppointmentStatus::InProgress => stats.in_progress += 1,
                }
                stats
            })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsResponse {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub stats: AppointmentStats,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityResponse {
    pub date: NaiveDate,
    #[serde(with = "time_format")]
    pub start: NaiveTime,
    #[serde(with = "time_format")]
    pub end: NaiveTime,
    pub available: bool,
    /// Machine code of the rule that failed, when unavailable.
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeeklyCheckResponse {
    pub customer_id: i64,
    pub date: NaiveDate,
    pub has_appointment: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeeklyCancelResponse {
    pub customer_id: i64,
    pub date: NaiveDate,
    pub cancelled: u64,
}
