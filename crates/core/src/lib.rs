//! Booking engine for a single-chair barbershop calendar: domain models, the
//! admission rules every appointment and block must pass, and the storage
//! seam implemented in memory here and on Postgres in `turnero-db`.

pub mod calendar;
pub mod clock;
pub mod config;
pub mod errors;
pub mod models;
pub mod schedule;
pub mod store;

pub use calendar::Calendar;
pub use config::CalendarConfig;
pub use errors::{AdmissionError, TurnoError, TurnoResult};
