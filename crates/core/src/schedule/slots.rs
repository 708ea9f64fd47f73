use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use super::{Interval, availability};
use crate::{
    config::CalendarConfig,
    models::{appointment::Appointment, block::ScheduleBlock},
};

/// Every slot start in `[opening, closing)`, stepped by the slot size.
pub fn grid(config: &CalendarConfig) -> Vec<NaiveTime> {
    let step = config.slot_size();
    let mut slots = Vec::new();
    let mut current = config.opening;

    while current < config.closing {
        slots.push(current);
        let (next, wrapped) = current.overflowing_add_signed(step);
        if wrapped != 0 {
            break;
        }
        current = next;
    }

    slots
}

/// Bookable slot starts for `date`, in chronological order.
///
/// A slot is free when its `[start, start + slot)` interval clears every
/// block and non-cancelled appointment, so an appointment off the grid hides
/// each slot it touches. The lead-time cut keeps a slot starting exactly at
/// `now + lead_time`, which booking itself refuses.
pub fn available_slots(
    config: &CalendarConfig,
    now: NaiveDateTime,
    date: NaiveDate,
    blocks: &[ScheduleBlock],
    appointments: &[Appointment],
) -> Vec<NaiveTime> {
    if date < now.date() {
        return Vec::new();
    }
    if blocks
        .iter()
        .any(|block| block.date == date && block.is_full_day)
    {
        return Vec::new();
    }

    let earliest = now + config.lead_time();
    let occupied: Vec<Interval> = appointments
        .iter()
        .filter(|appointment| appointment.date == date && appointment.status.occupies_calendar())
        .map(Appointment::interval)
        .chain(
            blocks
                .iter()
                .filter(|block| block.date == date)
                .filter_map(ScheduleBlock::interval),
        )
        .collect();

    grid(config)
        .into_iter()
        .filter(|start| date.and_time(*start) >= earliest)
        .filter_map(|start| Interval::starting_at(date, start, config.slot_size()).ok())
        .filter(|slot| availability::check_business_hours(config, slot).is_ok())
        .filter(|slot| !occupied.iter().any(|taken| taken.overlaps(slot)))
        .map(|slot| slot.start)
        .collect()
}
