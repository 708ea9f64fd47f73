//! PostgreSQL implementation of the calendar storage traits.
//!
//! Overlap between active appointments and between partial blocks is refused
//! by exclusion constraints, and the one full-day block per date by a partial
//! unique index, so a conditional insert is a plain `INSERT`. Constraint
//! violations come back as SQLSTATE codes and are turned into the matching
//! [`AdmissionError`] here.

use async_trait::async_trait;
use chrono::NaiveDate;
use tracing::warn;
use turnero_core::{
    errors::{AdmissionError, TurnoError, TurnoResult},
    models::{
        appointment::{Appointment, AppointmentQuery, AppointmentStatus, NewAppointment},
        block::{NewScheduleBlock, ScheduleBlock},
        customer::{CreateCustomerRequest, Customer, UpdateCustomerRequest},
        service::{CreateServiceRequest, Service, UpdateServiceRequest},
        staff::{NewStaffUser, StaffUser, UpdateStaffRequest},
    },
    store::{CalendarStore, DirectoryStore},
};

use crate::{
    DbPool,
    repositories::{appointment, block, customer, service, staff},
    schema::{APPOINTMENTS_NO_OVERLAP, BLOCKS_NO_OVERLAP, BLOCKS_ONE_FULL_DAY},
};

#[derive(Debug, Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

/// Integrity violations reported by PostgreSQL, keyed by constraint name.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Violation {
    Exclusion(String),
    Unique(String),
    ForeignKey(String),
    Check(String),
}

fn violation(report: &eyre::Report) -> Option<Violation> {
    let Some(sqlx::Error::Database(db)) = report.downcast_ref::<sqlx::Error>() else {
        return None;
    };
    let constraint = db.constraint().unwrap_or_default().to_string();
    match db.code().as_deref() {
        Some("23P01") => Some(Violation::Exclusion(constraint)),
        Some("23505") => Some(Violation::Unique(constraint)),
        Some("23503") => Some(Violation::ForeignKey(constraint)),
        Some("23514") => Some(Violation::Check(constraint)),
        _ => None,
    }
}

impl Violation {
    /// Domain error for a known constraint. Unknown exclusion constraints
    /// yield `None` and stay database errors.
    fn into_error(self) -> Option<TurnoError> {
        match self {
            Violation::Exclusion(constraint) if constraint == APPOINTMENTS_NO_OVERLAP => Some(
                AdmissionError::Overlap {
                    appointment_id: None,
                }
                .into(),
            ),
            Violation::Exclusion(constraint) if constraint == BLOCKS_NO_OVERLAP => {
                Some(AdmissionError::OverlappingBlock { block_id: None }.into())
            }
            Violation::Exclusion(_) => None,
            Violation::Unique(constraint) => Some(TurnoError::Validation(match constraint.as_str() {
                "customers_phone_key" => "Phone number is already registered".to_string(),
                "services_name_key" => "A service with that name already exists".to_string(),
                "staff_users_username_key" => "Username is already taken".to_string(),
                other => format!("Duplicate value violates `{other}`"),
            })),
            Violation::ForeignKey(constraint) => Some(TurnoError::Validation(format!(
                "Record is referenced elsewhere or refers to a missing record (`{constraint}`)"
            ))),
            Violation::Check(constraint) => Some(TurnoError::Validation(format!(
                "Value rejected by `{constraint}`"
            ))),
        }
    }
}

fn map_db_error(report: eyre::Report) -> TurnoError {
    match violation(&report).and_then(Violation::into_error) {
        Some(error) => error,
        None => TurnoError::Database(report),
    }
}

fn appointments(rows: Vec<crate::models::DbAppointment>) -> TurnoResult<Vec<Appointment>> {
    rows.into_iter().map(Appointment::try_from).collect()
}

#[async_trait]
impl CalendarStore for PgStore {
    async fn find_appointments(&self, date: NaiveDate) -> TurnoResult<Vec<Appointment>> {
        let rows = appointment::get_active_appointments_by_date(&self.pool, date)
            .await
            .map_err(map_db_error)?;
        appointments(rows)
    }

    async fn find_customer_appointments(
        &self,
        customer_id: i64,
        from: NaiveDate,
        to: NaiveDate,
    ) -> TurnoResult<Vec<Appointment>> {
        let rows = appointment::get_appointments_by_customer(&self.pool, customer_id, from, to)
            .await
            .map_err(map_db_error)?;
        appointments(rows)
    }

    async fn list_appointments(&self, query: &AppointmentQuery) -> TurnoResult<Vec<Appointment>> {
        let rows = appointment::list_appointments(&self.pool, query)
            .await
            .map_err(map_db_error)?;
        appointments(rows)
    }

    async fn get_appointment(&self, id: i64) -> TurnoResult<Option<Appointment>> {
        appointment::get_appointment_by_id(&self.pool, id)
            .await
            .map_err(map_db_error)?
            .map(Appointment::try_from)
            .transpose()
    }

    async fn insert_appointment(&self, new: NewAppointment) -> TurnoResult<Appointment> {
        let row = appointment::create_appointment(
            &self.pool,
            new.customer_id,
            new.service_id,
            new.interval.date,
            new.interval.start,
            new.interval.end,
        )
        .await
        .map_err(|e| {
            let error = map_db_error(e);
            if matches!(error, TurnoError::Admission(_)) {
                warn!(
                    "Lost the race for {} {}-{}",
                    new.interval.date, new.interval.start, new.interval.end
                );
            }
            error
        })?;
        row.try_into()
    }

    async fn update_appointment(&self, updated: &Appointment) -> TurnoResult<Option<Appointment>> {
        appointment::update_appointment(&self.pool, updated)
            .await
            .map_err(map_db_error)?
            .map(Appointment::try_from)
            .transpose()
    }

    async fn set_status(
        &self,
        id: i64,
        status: AppointmentStatus,
    ) -> TurnoResult<Option<Appointment>> {
        appointment::set_appointment_status(&self.pool, id, status.as_str())
            .await
            .map_err(map_db_error)?
            .map(Appointment::try_from)
            .transpose()
    }

    async fn delete_appointment(&self, id: i64) -> TurnoResult<bool> {
        appointment::delete_appointment(&self.pool, id)
            .await
            .map_err(map_db_error)
    }

    async fn cancel_customer_appointments(
        &self,
        customer_id: i64,
        from: NaiveDate,
        to: NaiveDate,
    ) -> TurnoResult<u64> {
        appointment::cancel_customer_appointments(&self.pool, customer_id, from, to)
            .await
            .map_err(map_db_error)
    }

    async fn unnotified_appointments(&self) -> TurnoResult<Vec<Appointment>> {
        let rows = appointment::get_unnotified_appointments(&self.pool)
            .await
            .map_err(map_db_error)?;
        appointments(rows)
    }

    async fn mark_all_notified(&self) -> TurnoResult<u64> {
        appointment::mark_all_notified(&self.pool)
            .await
            .map_err(map_db_error)
    }

    async fn find_blocks(&self, date: NaiveDate) -> TurnoResult<Vec<ScheduleBlock>> {
        let rows = block::get_blocks_by_date(&self.pool, date)
            .await
            .map_err(map_db_error)?;
        Ok(rows.into_iter().map(ScheduleBlock::from).collect())
    }

    async fn list_blocks(
        &self,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> TurnoResult<Vec<ScheduleBlock>> {
        let rows = block::list_blocks(&self.pool, from, to)
            .await
            .map_err(map_db_error)?;
        Ok(rows.into_iter().map(ScheduleBlock::from).collect())
    }

    async fn insert_block(&self, new: NewScheduleBlock) -> TurnoResult<ScheduleBlock> {
        let date = new.date();
        let full_day_taken = |e: eyre::Report| match violation(&e) {
            Some(Violation::Unique(constraint)) if constraint == BLOCKS_ONE_FULL_DAY => {
                TurnoError::from(AdmissionError::DuplicateFullDayBlock(date))
            }
            _ => map_db_error(e),
        };

        let row = match &new {
            NewScheduleBlock::FullDay { date, reason } => {
                block::create_full_day_block(&self.pool, *date, reason.as_deref())
                    .await
                    .map_err(full_day_taken)?
            }
            NewScheduleBlock::Partial { interval, reason } => block::create_partial_block(
                &self.pool,
                interval.date,
                interval.start,
                interval.end,
                reason.as_deref(),
            )
            .await
            .map_err(full_day_taken)?
            .ok_or(AdmissionError::DuplicateFullDayBlock(date))?,
        };

        Ok(row.into())
    }

    async fn delete_block(&self, id: i64) -> TurnoResult<bool> {
        block::delete_block(&self.pool, id)
            .await
            .map_err(map_db_error)
    }
}

#[async_trait]
impl DirectoryStore for PgStore {
    async fn list_customers(&self, skip: i64, limit: i64) -> TurnoResult<Vec<Customer>> {
        let rows = customer::list_customers(&self.pool, skip, limit)
            .await
            .map_err(map_db_error)?;
        Ok(rows.into_iter().map(Customer::from).collect())
    }

    async fn get_customer(&self, id: i64) -> TurnoResult<Option<Customer>> {
        Ok(customer::get_customer_by_id(&self.pool, id)
            .await
            .map_err(map_db_error)?
            .map(Customer::from))
    }

    async fn find_customer_by_phone(&self, phone: &str) -> TurnoResult<Option<Customer>> {
        Ok(customer::get_customer_by_phone(&self.pool, phone)
            .await
            .map_err(map_db_error)?
            .map(Customer::from))
    }

    async fn create_customer(&self, request: &CreateCustomerRequest) -> TurnoResult<Customer> {
        customer::create_customer(&self.pool, &request.name, &request.phone)
            .await
            .map(Customer::from)
            .map_err(map_db_error)
    }

    async fn update_customer(
        &self,
        id: i64,
        update: &UpdateCustomerRequest,
    ) -> TurnoResult<Option<Customer>> {
        Ok(customer::update_customer(
            &self.pool,
            id,
            update.name.as_deref(),
            update.phone.as_deref(),
        )
        .await
        .map_err(map_db_error)?
        .map(Customer::from))
    }

    async fn delete_customer(&self, id: i64) -> TurnoResult<bool> {
        customer::delete_customer(&self.pool, id)
            .await
            .map_err(map_db_error)
    }

    async fn list_services(&self, skip: i64, limit: i64) -> TurnoResult<Vec<Service>> {
        let rows = service::list_services(&self.pool, skip, limit)
            .await
            .map_err(map_db_error)?;
        Ok(rows.into_iter().map(Service::from).collect())
    }

    async fn get_service(&self, id: i64) -> TurnoResult<Option<Service>> {
        Ok(service::get_service_by_id(&self.pool, id)
            .await
            .map_err(map_db_error)?
            .map(Service::from))
    }

    async fn find_service_by_name(&self, name: &str) -> TurnoResult<Option<Service>> {
        Ok(service::get_service_by_name(&self.pool, name)
            .await
            .map_err(map_db_error)?
            .map(Service::from))
    }

    async fn create_service(&self, request: &CreateServiceRequest) -> TurnoResult<Service> {
        service::create_service(
            &self.pool,
            &request.name,
            request.duration_minutes,
            request.price,
        )
        .await
        .map(Service::from)
        .map_err(map_db_error)
    }

    async fn update_service(
        &self,
        id: i64,
        update: &UpdateServiceRequest,
    ) -> TurnoResult<Option<Service>> {
        Ok(service::update_service(
            &self.pool,
            id,
            update.name.as_deref(),
            update.duration_minutes,
            update.price,
        )
        .await
        .map_err(map_db_error)?
        .map(Service::from))
    }

    async fn delete_service(&self, id: i64) -> TurnoResult<bool> {
        service::delete_service(&self.pool, id)
            .await
            .map_err(map_db_error)
    }

    async fn list_staff(&self, skip: i64, limit: i64) -> TurnoResult<Vec<StaffUser>> {
        staff::list_staff_users(&self.pool, skip, limit)
            .await
            .map_err(map_db_error)?
            .into_iter()
            .map(StaffUser::try_from)
            .collect()
    }

    async fn get_staff(&self, id: i64) -> TurnoResult<Option<StaffUser>> {
        staff::get_staff_user_by_id(&self.pool, id)
            .await
            .map_err(map_db_error)?
            .map(StaffUser::try_from)
            .transpose()
    }

    async fn find_staff_by_username(&self, username: &str) -> TurnoResult<Option<StaffUser>> {
        staff::get_staff_user_by_username(&self.pool, username)
            .await
            .map_err(map_db_error)?
            .map(StaffUser::try_from)
            .transpose()
    }

    async fn create_staff(&self, user: &NewStaffUser) -> TurnoResult<StaffUser> {
        staff::create_staff_user(
            &self.pool,
            &user.name,
            &user.username,
            &user.password_hash,
            user.role.as_str(),
        )
        .await
        .map_err(map_db_error)?
        .try_into()
    }

    async fn update_staff(
        &self,
        id: i64,
        update: &UpdateStaffRequest,
    ) -> TurnoResult<Option<StaffUser>> {
        staff::update_staff_user(
            &self.pool,
            id,
            update.name.as_deref(),
            update.username.as_deref(),
            update.role.map(|role| role.as_str()),
        )
        .await
        .map_err(map_db_error)?
        .map(StaffUser::try_from)
        .transpose()
    }

    async fn delete_staff(&self, id: i64) -> TurnoResult<bool> {
        staff::delete_staff_user(&self.pool, id)
            .await
            .map_err(map_db_error)
    }
}
