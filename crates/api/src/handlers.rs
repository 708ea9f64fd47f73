pub mod appointments;
pub mod auth;
pub mod blocks;
pub mod customers;
pub mod params;
pub mod services;
pub mod staff;
