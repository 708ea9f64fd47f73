pub mod appointment;
pub mod block;
pub mod customer;
pub mod service;
pub mod staff;
pub mod time_format;
