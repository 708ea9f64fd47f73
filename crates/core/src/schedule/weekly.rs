use chrono::{Datelike, Duration, NaiveDate};

use crate::models::appointment::Appointment;

/// Monday and Sunday of the ISO week containing `date`.
pub fn week_bounds(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let monday = date - Duration::days(i64::from(date.weekday().num_days_from_monday()));
    (monday, monday + Duration::days(6))
}

/// Whether `customer_id` holds a pending or confirmed appointment in the ISO
/// week of `date`.
pub fn has_active_in_week(appointments: &[Appointment], customer_id: i64, date: NaiveDate) -> bool {
    let (monday, sunday) = week_bounds(date);
    appointments.iter().any(|appointment| {
        appointment.customer_id == customer_id
            && appointment.status.is_active()
            && appointment.date >= monday
            && appointment.date <= sunday
    })
}
