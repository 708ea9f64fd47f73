pub mod appointments;
pub mod auth;
pub mod blocks;
pub mod customers;
pub mod health;
pub mod services;
pub mod staff;
