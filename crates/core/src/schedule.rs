//! # Availability Engine
//!
//! Pure functions over a snapshot of one day's calendar: the appointments and
//! schedule blocks stored for a date, the calendar configuration, and the
//! current local time. Nothing in here touches storage; the [`Calendar`]
//! service loads the snapshot and calls into these modules.
//!
//! Every rule that compares two time ranges goes through
//! [`Interval::overlaps`], so blocks, appointments and the slot grid share
//! the same half-open semantics: an appointment ending at 10:30 does not
//! collide with one starting at 10:30.
//!
//! [`Calendar`]: crate::calendar::Calendar

pub mod availability;
pub mod blocks;
pub mod interval;
pub mod slots;
pub mod weekly;

pub use interval::Interval;
