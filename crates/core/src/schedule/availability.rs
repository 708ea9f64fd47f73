//! Admission rules for a candidate interval, applied in a fixed order:
//! past date, lead time, business hours, schedule blocks, appointment overlap.
//! The first rule that fails is reported.

use chrono::NaiveDateTime;

use super::Interval;
use crate::{
    config::CalendarConfig,
    errors::AdmissionError,
    models::{appointment::Appointment, block::ScheduleBlock},
};

/// Rejects intervals that start too early: on a past date, or on the current
/// day at or before `now + lead_time`.
pub fn check_timing(
    config: &CalendarConfig,
    now: NaiveDateTime,
    interval: &Interval,
) -> Result<(), AdmissionError> {
    if interval.date < now.date() {
        return Err(AdmissionError::PastDate(interval.date));
    }

    let earliest = now + config.lead_time();
    if interval.starts_at() <= earliest {
        return Err(AdmissionError::LeadTime {
            lead_minutes: config.lead_minutes,
            earliest: earliest.time(),
        });
    }

    Ok(())
}

pub fn check_business_hours(
    config: &CalendarConfig,
    interval: &Interval,
) -> Result<(), AdmissionError> {
    if interval.within(config.opening, config.closing) {
        Ok(())
    } else {
        Err(AdmissionError::OutsideBusinessHours {
            start: interval.start,
            end: interval.end,
            opening: config.opening,
            closing: config.closing,
        })
    }
}

/// A full-day block on the date refuses everything; a partial block refuses
/// intervals that overlap it.
pub fn check_blocks(interval: &Interval, blocks: &[ScheduleBlock]) -> Result<(), AdmissionError> {
    let hit = blocks
        .iter()
        .filter(|block| block.date == interval.date)
        .find(|block| {
            block.is_full_day
                || block
                    .interval()
                    .is_some_and(|blocked| blocked.overlaps(interval))
        });

    match hit {
        Some(block) => Err(AdmissionError::Blocked {
            date: interval.date,
            reason: block.reason.clone(),
        }),
        None => Ok(()),
    }
}

/// Cancelled appointments never conflict. `exclude` skips the appointment
/// being moved so it cannot collide with its own old slot.
pub fn check_overlap(
    interval: &Interval,
    appointments: &[Appointment],
    exclude: Option<i64>,
) -> Result<(), AdmissionError> {
    let conflict = appointments
        .iter()
        .filter(|appointment| Some(appointment.id) != exclude)
        .filter(|appointment| appointment.status.occupies_calendar())
        .find(|appointment| appointment.interval().overlaps(interval));

    match conflict {
        Some(appointment) => Err(AdmissionError::Overlap {
            appointment_id: Some(appointment.id),
        }),
        None => Ok(()),
    }
}

/// Runs every rule against one day's snapshot.
pub fn check(
    config: &CalendarConfig,
    now: NaiveDateTime,
    interval: &Interval,
    blocks: &[ScheduleBlock],
    appointments: &[Appointment],
    exclude: Option<i64>,
) -> Result<(), AdmissionError> {
    check_timing(config, now, interval)?;
    check_business_hours(config, interval)?;
    check_blocks(interval, blocks)?;
    check_overlap(interval, appointments, exclude)
}

pub fn is_available(
    config: &CalendarConfig,
    now: NaiveDateTime,
    interval: &Interval,
    blocks: &[ScheduleBlock],
    appointments: &[Appointment],
) -> bool {
    check(config, now, interval, blocks, appointments, None).is_ok()
}
