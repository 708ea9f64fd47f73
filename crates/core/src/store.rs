//! # Storage Collaborators
//!
//! The calendar engine reads and writes through two traits. `CalendarStore`
//! covers appointments and schedule blocks; `DirectoryStore` covers the
//! customers, services and staff the appointments refer to. The PostgreSQL
//! implementation lives in the `turnero-db` crate; [`memory::MemoryStore`] is
//! an in-process implementation of both.
//!
//! ## Conditional inserts
//!
//! `insert_appointment` and `insert_block` must refuse rows that would break
//! the calendar invariants even when the engine's own check passed against an
//! older snapshot: no two active appointments may overlap, at most one
//! full-day block may exist per date, and partial blocks on a date may not
//! overlap. Implementations report those refusals as
//! [`AdmissionError`](crate::errors::AdmissionError) values, which closes the
//! window between checking availability and writing the appointment.

pub mod memory;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::{
    errors::TurnoResult,
    models::{
        appointment::{Appointment, AppointmentQuery, AppointmentStatus, NewAppointment},
        block::{NewScheduleBlock, ScheduleBlock},
        customer::{CreateCustomerRequest, Customer, UpdateCustomerRequest},
        service::{CreateServiceRequest, Service, UpdateServiceRequest},
        staff::{NewStaffUser, StaffUser, UpdateStaffRequest},
    },
};

#[async_trait]
pub trait CalendarStore: Send + Sync {
    /// Non-cancelled appointments on `date`, ordered by start time.
    async fn find_appointments(&self, date: NaiveDate) -> TurnoResult<Vec<Appointment>>;

    /// Appointments of one customer between `from` and `to` inclusive, in any status.
    async fn find_customer_appointments(
        &self,
        customer_id: i64,
        from: NaiveDate,
        to: NaiveDate,
    ) -> TurnoResult<Vec<Appointment>>;

    /// Filtered listing ordered by date and start time.
    async fn list_appointments(&self, query: &AppointmentQuery) -> TurnoResult<Vec<Appointment>>;

    async fn get_appointment(&self, id: i64) -> TurnoResult<Option<Appointment>>;

    /// Conditional insert; fails with `AdmissionError::Overlap` when an active
    /// appointment already occupies part of the interval.
    async fn insert_appointment(&self, appointment: NewAppointment) -> TurnoResult<Appointment>;

    /// Writes every field of `appointment`, under the same overlap guarantee as
    /// `insert_appointment`. Returns `None` when the id does not exist.
    async fn update_appointment(
        &self,
        appointment: &Appointment,
    ) -> TurnoResult<Option<Appointment>>;

    async fn set_status(
        &self,
        id: i64,
        status: AppointmentStatus,
    ) -> TurnoResult<Option<Appointment>>;

    async fn delete_appointment(&self, id: i64) -> TurnoResult<bool>;

    /// Cancels the pending and confirmed appointments of a customer between
    /// `from` and `to` inclusive; returns how many changed.
    async fn cancel_customer_appointments(
        &self,
        customer_id: i64,
        from: NaiveDate,
        to: NaiveDate,
    ) -> TurnoResult<u64>;

    /// Appointments staff have not yet been told about, newest first.
    async fn unnotified_appointments(&self) -> TurnoResult<Vec<Appointment>>;

    async fn mark_all_notified(&self) -> TurnoResult<u64>;

    async fn find_blocks(&self, date: NaiveDate) -> TurnoResult<Vec<ScheduleBlock>>;

    async fn list_blocks(
        &self,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> TurnoResult<Vec<ScheduleBlock>>;

    /// Conditional insert; fails with `DuplicateFullDayBlock` or
    /// `OverlappingBlock` when the date's blocks changed since admission.
    async fn insert_block(&self, block: NewScheduleBlock) -> TurnoResult<ScheduleBlock>;

    async fn delete_block(&self, id: i64) -> TurnoResult<bool>;
}

#[async_trait]
pub trait DirectoryStore: Send + Sync {
    async fn list_customers(&self, skip: i64, limit: i64) -> TurnoResult<Vec<Customer>>;
    async fn get_customer(&self, id: i64) -> TurnoResult<Option<Customer>>;
    async fn find_customer_by_phone(&self, phone: &str) -> TurnoResult<Option<Customer>>;
    async fn create_customer(&self, customer: &CreateCustomerRequest) -> TurnoResult<Customer>;
    async fn update_customer(
        &self,
        id: i64,
        update: &UpdateCustomerRequest,
    ) -> TurnoResult<Option<Customer>>;
    async fn delete_customer(&self, id: i64) -> TurnoResult<bool>;

    async fn list_services(&self, skip: i64, limit: i64) -> TurnoResult<Vec<Service>>;
    async fn get_service(&self, id: i64) -> TurnoResult<Option<Service>>;
    async fn find_service_by_name(&self, name: &str) -> TurnoResult<Option<Service>>;
    async fn create_service(&self, service: &CreateServiceRequest) -> TurnoResult<Service>;
    async fn update_service(
        &self,
        id: i64,
        update: &UpdateServiceRequest,
    ) -> TurnoResult<Option<Service>>;
    async fn delete_service(&self, id: i64) -> TurnoResult<bool>;

    async fn list_staff(&self, skip: i64, limit: i64) -> TurnoResult<Vec<StaffUser>>;
    async fn get_staff(&self, id: i64) -> TurnoResult<Option<StaffUser>>;
    async fn find_staff_by_username(&self, username: &str) -> TurnoResult<Option<StaffUser>>;
    async fn create_staff(&self, staff: &NewStaffUser) -> TurnoResult<StaffUser>;
    async fn update_staff(
        &self,
        id: i64,
        update: &UpdateStaffRequest,
    ) -> TurnoResult<Option<StaffUser>>;
    async fn delete_staff(&self, id: i64) -> TurnoResult<bool>;
}
