//! # Calendar Configuration
//!
//! Business hours and booking rules for the single shared calendar. The
//! configuration is built once at startup and handed to the [`Calendar`]
//! by value; nothing reads it from global state afterwards.
//!
//! ## Environment Variables
//!
//! - `BUSINESS_OPENING`: first bookable instant, `HH:MM` (default: "09:00")
//! - `BUSINESS_CLOSING`: end of the business day, `HH:MM` (default: "22:00")
//! - `SLOT_MINUTES`: size of the slot grid (default: 30)
//! - `LEAD_TIME_MINUTES`: minimum notice for same-day bookings (default: 30)
//! - `ENFORCE_WEEKLY_LIMIT`: one active appointment per customer per ISO week (default: false)
//! - `USE_SERVICE_DURATION`: size bookings by the service duration instead of
//!   one slot (default: false)
//!
//! [`Calendar`]: crate::calendar::Calendar

use chrono::{Duration, NaiveTime};
use eyre::{Result, WrapErr, eyre};
use std::env;

use crate::models::time_format;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarConfig {
    /// Opening time; the first slot starts here.
    pub opening: NaiveTime,

    /// Closing time; intervals may end at, but not start at, this instant.
    pub closing: NaiveTime,

    pub slot_minutes: u32,

    pub lead_minutes: u32,

    pub enforce_weekly_limit: bool,

    pub use_service_duration: bool,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            opening: NaiveTime::from_hms_opt(9, 0, 0).unwrap_or_default(),
            closing: NaiveTime::from_hms_opt(22, 0, 0).unwrap_or_default(),
            slot_minutes: 30,
            lead_minutes: 30,
            enforce_weekly_limit: false,
            use_service_duration: false,
        }
    }
}

impl CalendarConfig {
    /// Loads the calendar settings from the environment, falling back to the
    /// defaults for anything unset.
    ///
    /// # Errors
    ///
    /// Fails when a variable is present but cannot be parsed, or when the
    /// resulting configuration does not pass [`CalendarConfig::validate`].
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let opening = match env::var("BUSINESS_OPENING") {
            Ok(value) => time_format::parse(&value)
                .ok_or_else(|| eyre!("Invalid BUSINESS_OPENING value `{}`", value))?,
            Err(_) => defaults.opening,
        };
        let closing = match env::var("BUSINESS_CLOSING") {
            Ok(value) => time_format::parse(&value)
                .ok_or_else(|| eyre!("Invalid BUSINESS_CLOSING value `{}`", value))?,
            Err(_) => defaults.closing,
        };

        let slot_minutes = env::var("SLOT_MINUTES")
            .unwrap_or_else(|_| defaults.slot_minutes.to_string())
            .parse()
            .wrap_err("Invalid SLOT_MINUTES value")?;
        let lead_minutes = env::var("LEAD_TIME_MINUTES")
            .unwrap_or_else(|_| defaults.lead_minutes.to_string())
            .parse()
            .wrap_err("Invalid LEAD_TIME_MINUTES value")?;

        let enforce_weekly_limit = env_flag("ENFORCE_WEEKLY_LIMIT")?;
        let use_service_duration = env_flag("USE_SERVICE_DURATION")?;

        let config = Self {
            opening,
            closing,
            slot_minutes,
            lead_minutes,
            enforce_weekly_limit,
            use_service_duration,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.opening >= self.closing {
            return Err(eyre!(
                "Opening time {} must be before closing time {}",
                self.opening,
                self.closing
            ));
        }
        if self.slot_minutes == 0 {
            return Err(eyre!("Slot size must be at least one minute"));
        }
        let day_minutes = (self.closing - self.opening).num_minutes();
        if day_minutes % i64::from(self.slot_minutes) != 0 {
            return Err(eyre!(
                "Slot size of {} minutes does not divide the {} minute business day",
                self.slot_minutes,
                day_minutes
            ));
        }
        Ok(())
    }

    pub fn slot_size(&self) -> Duration {
        Duration::minutes(i64::from(self.slot_minutes))
    }

    pub fn lead_time(&self) -> Duration {
        Duration::minutes(i64::from(self.lead_minutes))
    }
}

fn env_flag(name: &str) -> Result<bool> {
    match env::var(name) {
        Ok(value) => match value.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" | "" => Ok(false),
            other => Err(eyre!("Invalid {} value `{}`", name, other)),
        },
        Err(_) => Ok(false),
    }
}
