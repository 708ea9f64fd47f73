//! # Calendar Service
//!
//! [`Calendar`] is the booking engine's public surface. It loads one day's
//! snapshot from the [`CalendarStore`], runs the pure rules in
//! [`crate::schedule`], and writes through the store's conditional inserts.
//!
//! ## Booking flow
//!
//! 1. Resolve the service (by id or by name) and the customer (by id, or by
//!    phone number without creating anything yet).
//! 2. Size the interval: an explicit end time wins, otherwise the service
//!    duration when `use_service_duration` is on, otherwise one slot.
//! 3. Check past date, lead time, business hours, blocks and overlap.
//! 4. When `enforce_weekly_limit` is on, check the customer's ISO week.
//! 5. Register the customer if they were unknown, then insert the appointment.
//!
//! Every rejection happens before the first write.

use std::sync::Arc;

use chrono::{Duration, NaiveDate, NaiveTime};
use tracing::{debug, info, warn};

use crate::{
    clock::{Clock, LocalClock},
    config::CalendarConfig,
    errors::{AdmissionError, TurnoError, TurnoResult},
    models::{
        appointment::{
            Appointment, AppointmentQuery, AppointmentStats, AppointmentStatus, BookingRequest,
            CustomerRef, NewAppointment, ServiceRef, UpdateAppointmentRequest,
        },
        block::{CreateBlockRequest, ScheduleBlock},
        customer::{CreateCustomerRequest, Customer},
        service::Service,
    },
    schedule::{Interval, availability, blocks, slots, weekly},
    store::{CalendarStore, DirectoryStore},
};

#[derive(Clone)]
pub struct Calendar {
    config: CalendarConfig,
    store: Arc<dyn CalendarStore>,
    directory: Arc<dyn DirectoryStore>,
    clock: Arc<dyn Clock>,
}

impl Calendar {
    pub fn new(
        config: CalendarConfig,
        store: Arc<dyn CalendarStore>,
        directory: Arc<dyn DirectoryStore>,
    ) -> Self {
        Self {
            config,
            store,
            directory,
            clock: Arc::new(LocalClock),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn config(&self) -> &CalendarConfig {
        &self.config
    }

    pub fn directory(&self) -> &Arc<dyn DirectoryStore> {
        &self.directory
    }

    /// Checks a candidate interval against every admission rule and reports
    /// the first one that fails. Performs no writes.
    pub async fn ensure_available(&self, interval: &Interval) -> TurnoResult<()> {
        let blocks = self.store.find_blocks(interval.date).await?;
        let appointments = self.store.find_appointments(interval.date).await?;
        availability::check(
            &self.config,
            self.clock.now(),
            interval,
            &blocks,
            &appointments,
            None,
        )?;
        Ok(())
    }

    /// `Ok(false)` for any rule rejection; storage failures still surface as errors.
    pub async fn check_availability(
        &self,
        date: NaiveDate,
        start: NaiveTime,
        end: NaiveTime,
    ) -> TurnoResult<bool> {
        let interval = Interval::new(date, start, end)?;
        match self.ensure_available(&interval).await {
            Ok(()) => Ok(true),
            Err(TurnoError::Admission(reason)) => {
                debug!("{} {}-{} unavailable: {}", date, start, end, reason);
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    pub async fn list_available_slots(&self, date: NaiveDate) -> TurnoResult<Vec<NaiveTime>> {
        let blocks = self.store.find_blocks(date).await?;
        let appointments = self.store.find_appointments(date).await?;
        Ok(slots::available_slots(
            &self.config,
            self.clock.now(),
            date,
            &blocks,
            &appointments,
        ))
    }

    pub async fn book(&self, request: &BookingRequest) -> TurnoResult<Appointment> {
        let service = self.resolve_service(&request.service).await?;
        let customer = self.resolve_customer(&request.customer).await?;

        let interval = match request.end {
            Some(end) => Interval::new(request.date, request.start, end)?,
            None => {
                Interval::starting_at(request.date, request.start, self.booking_length(&service))?
            }
        };

        if let Err(e) = self.ensure_available(&interval).await {
            if let TurnoError::Admission(reason) = &e {
                warn!(
                    "Booking for {} {}-{} rejected: {}",
                    interval.date, interval.start, interval.end, reason
                );
            }
            return Err(e);
        }

        if self.config.enforce_weekly_limit {
            if let Some(customer) = &customer {
                if self.has_weekly_appointment(customer.id, interval.date).await? {
                    let (week_start, _) = weekly::week_bounds(interval.date);
                    warn!("Customer {} already booked in the week of {}", customer.id, week_start);
                    return Err(AdmissionError::WeeklyLimit {
                        customer_id: customer.id,
                        week_start,
                    }
                    .into());
                }
            }
        }

        let customer = match customer {
            Some(customer) => customer,
            None => self.register_customer(&request.customer).await?,
        };

        let appointment = self
            .store
            .insert_appointment(NewAppointment {
                customer_id: customer.id,
                service_id: service.id,
                interval,
            })
            .await?;

        info!(
            "Booked appointment {} for customer {} on {} at {}",
            appointment.id, customer.id, appointment.date, appointment.start
        );
        Ok(appointment)
    }

    fn booking_length(&self, service: &Service) -> Duration {
        if self.config.use_service_duration && service.duration_minutes > 0 {
            Duration::minutes(i64::from(service.duration_minutes))
        } else {
            self.config.slot_size()
        }
    }

    async fn resolve_service(&self, service: &ServiceRef) -> TurnoResult<Service> {
        match service {
            ServiceRef::Id { service_id } => self
                .directory
                .get_service(*service_id)
                .await?
                .ok_or_else(|| service_not_found(*service_id)),
            ServiceRef::Name { service } => self
                .directory
                .find_service_by_name(service)
                .await?
                .ok_or_else(|| TurnoError::NotFound(format!("Service `{}` not found", service))),
        }
    }

    /// Known customers only; an unknown phone number resolves to `None`.
    async fn resolve_customer(&self, customer: &CustomerRef) -> TurnoResult<Option<Customer>> {
        match customer {
            CustomerRef::Id { customer_id } => self
                .directory
                .get_customer(*customer_id)
                .await?
                .map(Some)
                .ok_or_else(|| customer_not_found(*customer_id)),
            CustomerRef::Contact { name, phone } => {
                if name.trim().is_empty() || phone.trim().is_empty() {
                    return Err(TurnoError::Validation(
                        "Customer name and phone are required".to_string(),
                    ));
                }
                self.directory.find_customer_by_phone(phone.trim()).await
            }
        }
    }

    async fn register_customer(&self, customer: &CustomerRef) -> TurnoResult<Customer> {
        match customer {
            CustomerRef::Contact { name, phone } => {
                let customer = self
                    .directory
                    .create_customer(&CreateCustomerRequest {
                        name: name.trim().to_string(),
                        phone: phone.trim().to_string(),
                    })
                    .await?;
                info!("Registered customer {} ({})", customer.id, customer.phone);
                Ok(customer)
            }
            CustomerRef::Id { customer_id } => Err(TurnoError::NotFound(format!(
                "Customer with ID {} not found",
                customer_id
            ))),
        }
    }

    pub async fn get_appointment(&self, id: i64) -> TurnoResult<Appointment> {
        self.store
            .get_appointment(id)
            .await?
            .ok_or_else(|| appointment_not_found(id))
    }

    /// Applies a partial update. Moving the appointment re-runs the timing,
    /// hours and block rules; the overlap rule runs whenever the result holds
    /// calendar time, ignoring the appointment's own current slot.
    pub async fn update_appointment(
        &self,
        id: i64,
        update: &UpdateAppointmentRequest,
    ) -> TurnoResult<Appointment> {
        let current = self.get_appointment(id).await?;

        if let Some(customer_id) = update.customer_id {
            self.directory
                .get_customer(customer_id)
                .await?
                .ok_or_else(|| customer_not_found(customer_id))?;
        }
        if let Some(service_id) = update.service_id {
            self.directory
                .get_service(service_id)
                .await?
                .ok_or_else(|| service_not_found(service_id))?;
        }

        let interval = Interval::new(
            update.date.unwrap_or(current.date),
            update.start.unwrap_or(current.start),
            update.end.unwrap_or(current.end),
        )?;
        let status = update.status.unwrap_or(current.status);
        if !current.status.can_transition_to(status) && status != current.status {
            warn!(
                "Appointment {} moved off-chart from {} to {}",
                id, current.status, status
            );
        }

        if update.moves_slot() {
            let blocks = self.store.find_blocks(interval.date).await?;
            availability::check_timing(&self.config, self.clock.now(), &interval)?;
            availability::check_business_hours(&self.config, &interval)?;
            availability::check_blocks(&interval, &blocks)?;
        }
        // Only an occupying result can collide with another appointment
        if status.occupies_calendar()
            && (update.moves_slot() || !current.status.occupies_calendar())
        {
            let appointments = self.store.find_appointments(interval.date).await?;
            availability::check_overlap(&interval, &appointments, Some(id))?;
        }

        let updated = Appointment {
            customer_id: update.customer_id.unwrap_or(current.customer_id),
            service_id: update.service_id.unwrap_or(current.service_id),
            date: interval.date,
            start: interval.start,
            end: interval.end,
            status,
            ..current
        };

        self.store
            .update_appointment(&updated)
            .await?
            .ok_or_else(|| appointment_not_found(id))
    }

    /// Sets the status unconditionally. Transitions outside the nominal chart
    /// are applied and logged. Reviving a cancelled appointment fails with
    /// `Overlap` if its slot has since been taken.
    pub async fn transition_status(
        &self,
        id: i64,
        status: AppointmentStatus,
    ) -> TurnoResult<Appointment> {
        let current = self.get_appointment(id).await?;
        if current.status != status && !current.status.can_transition_to(status) {
            warn!("Appointment {} moved off-chart from {} to {}", id, current.status, status);
        }

        if !current.status.occupies_calendar() && status.occupies_calendar() {
            let appointments = self.store.find_appointments(current.date).await?;
            availability::check_overlap(&current.interval(), &appointments, Some(id))?;
        }

        let updated = self
            .store
            .set_status(id, status)
            .await?
            .ok_or_else(|| appointment_not_found(id))?;
        info!("Appointment {} is now {}", id, updated.status);
        Ok(updated)
    }

    pub async fn delete_appointment(&self, id: i64) -> TurnoResult<()> {
        if self.store.delete_appointment(id).await? {
            info!("Deleted appointment {}", id);
            Ok(())
        } else {
            Err(appointment_not_found(id))
        }
    }

    pub async fn list_appointments(
        &self,
        query: &AppointmentQuery,
    ) -> TurnoResult<Vec<Appointment>> {
        if let (Some(from), Some(to)) = (query.from, query.to) {
            if from > to {
                return Err(TurnoError::Validation(format!(
                    "Start date {} must not be after end date {}",
                    from, to
                )));
            }
        }
        self.store.list_appointments(query).await
    }

    /// Every appointment on `date`, whatever its status.
    pub async fn day_agenda(&self, date: NaiveDate) -> TurnoResult<Vec<Appointment>> {
        self.store
            .list_appointments(&AppointmentQuery::between(date, date))
            .await
    }

    /// Every appointment in the ISO week containing `date`.
    pub async fn week_agenda(&self, date: NaiveDate) -> TurnoResult<Vec<Appointment>> {
        let (monday, sunday) = weekly::week_bounds(date);
        self.store
            .list_appointments(&AppointmentQuery::between(monday, sunday))
            .await
    }

    pub async fn statistics(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> TurnoResult<AppointmentStats> {
        if from > to {
            return Err(TurnoError::Validation(format!(
                "Start date {} must not be after end date {}",
                from, to
            )));
        }
        let appointments = self
            .store
            .list_appointments(&AppointmentQuery::between(from, to))
            .await?;
        Ok(AppointmentStats::tally(&appointments))
    }

    pub async fn has_weekly_appointment(
        &self,
        customer_id: i64,
        date: NaiveDate,
    ) -> TurnoResult<bool> {
        let (monday, sunday) = weekly::week_bounds(date);
        let appointments = self
            .store
            .find_customer_appointments(customer_id, monday, sunday)
            .await?;
        Ok(weekly::has_active_in_week(&appointments, customer_id, date))
    }

    /// Cancels the customer's pending and confirmed appointments in the ISO
    /// week of `date`, freeing them to book again under the weekly limit.
    pub async fn cancel_customer_week(
        &self,
        customer_id: i64,
        date: NaiveDate,
    ) -> TurnoResult<u64> {
        self.directory
            .get_customer(customer_id)
            .await?
            .ok_or_else(|| customer_not_found(customer_id))?;

        let (monday, sunday) = weekly::week_bounds(date);
        let cancelled = self
            .store
            .cancel_customer_appointments(customer_id, monday, sunday)
            .await?;
        info!(
            "Cancelled {} appointments of customer {} in the week of {}",
            cancelled, customer_id, monday
        );
        Ok(cancelled)
    }

    pub async fn unnotified(&self) -> TurnoResult<Vec<Appointment>> {
        self.store.unnotified_appointments().await
    }

    pub async fn mark_all_notified(&self) -> TurnoResult<u64> {
        self.store.mark_all_notified().await
    }

    pub async fn create_block(&self, request: &CreateBlockRequest) -> TurnoResult<ScheduleBlock> {
        let existing = self.store.find_blocks(request.date).await?;
        let admitted = blocks::admit(request, &existing).inspect_err(|e| {
            warn!("Block for {} rejected: {}", request.date, e);
        })?;

        let block = self.store.insert_block(admitted).await?;
        info!("Created schedule block {} on {}", block.id, block.date);
        Ok(block)
    }

    pub async fn blocks_on(&self, date: NaiveDate) -> TurnoResult<Vec<ScheduleBlock>> {
        self.store.find_blocks(date).await
    }

    pub async fn list_blocks(
        &self,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> TurnoResult<Vec<ScheduleBlock>> {
        self.store.list_blocks(from, to).await
    }

    pub async fn delete_block(&self, id: i64) -> TurnoResult<()> {
        if self.store.delete_block(id).await? {
            info!("Deleted schedule block {}", id);
            Ok(())
        } else {
            Err(TurnoError::NotFound(format!("Block with ID {} not found", id)))
        }
    }
}

fn appointment_not_found(id: i64) -> TurnoError {
    TurnoError::NotFound(format!("Appointment with ID {} not found", id))
}

fn customer_not_found(id: i64) -> TurnoError {
    TurnoError::NotFound(format!("Customer with ID {} not found", id))
}

fn service_not_found(id: i64) -> TurnoError {
    TurnoError::NotFound(format!("Service with ID {} not found", id))
}
