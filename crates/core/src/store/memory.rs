use std::{
    collections::BTreeMap,
    sync::{Mutex, MutexGuard},
};

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};

use super::{CalendarStore, DirectoryStore};
use crate::{
    errors::{AdmissionError, TurnoError, TurnoResult},
    models::{
        appointment::{Appointment, AppointmentQuery, AppointmentStatus, NewAppointment},
        block::{NewScheduleBlock, ScheduleBlock},
        customer::{CreateCustomerRequest, Customer, UpdateCustomerRequest},
        service::{CreateServiceRequest, Service, UpdateServiceRequest},
        staff::{NewStaffUser, StaffUser, UpdateStaffRequest},
    },
};

#[derive(Debug, Default)]
struct Tables {
    next_id: i64,
    customers: BTreeMap<i64, Customer>,
    services: BTreeMap<i64, Service>,
    staff: BTreeMap<i64, StaffUser>,
    appointments: BTreeMap<i64, Appointment>,
    blocks: BTreeMap<i64, ScheduleBlock>,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn overlapping_appointment(&self, candidate: &Appointment) -> Option<i64> {
        if !candidate.status.occupies_calendar() {
            return None;
        }
        let interval = candidate.interval();
        self.appointments
            .values()
            .filter(|existing| existing.id != candidate.id)
            .filter(|existing| existing.status.occupies_calendar())
            .find(|existing| existing.interval().overlaps(&interval))
            .map(|existing| existing.id)
    }

    fn ensure_overlap_free(&self, candidate: &Appointment) -> TurnoResult<()> {
        match self.overlapping_appointment(candidate) {
            Some(id) => Err(AdmissionError::Overlap {
                appointment_id: Some(id),
            }
            .into()),
            None => Ok(()),
        }
    }
}

fn page<T: Clone>(rows: impl Iterator<Item = T>, skip: i64, limit: i64) -> Vec<T> {
    rows.skip(usize::try_from(skip).unwrap_or(0))
        .take(usize::try_from(limit).unwrap_or(usize::MAX))
        .collect()
}

fn by_schedule(a: &Appointment, b: &Appointment) -> std::cmp::Ordering {
    (a.date, a.start, a.id).cmp(&(b.date, b.start, b.id))
}

/// In-process store holding every table behind one mutex. Each operation runs
/// under the lock, so check-and-insert is atomic.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> TurnoResult<MutexGuard<'_, Tables>> {
        self.tables
            .lock()
            .map_err(|e| TurnoError::Internal(format!("memory store poisoned: {e}").into()))
    }
}

#[async_trait]
impl CalendarStore for MemoryStore {
    async fn find_appointments(&self, date: NaiveDate) -> TurnoResult<Vec<Appointment>> {
        let tables = self.tables()?;
        let mut rows: Vec<Appointment> = tables
            .appointments
            .values()
            .filter(|a| a.date == date && a.status.occupies_calendar())
            .cloned()
            .collect();
        rows.sort_by(by_schedule);
        Ok(rows)
    }

    async fn find_customer_appointments(
        &self,
        customer_id: i64,
        from: NaiveDate,
        to: NaiveDate,
    ) -> TurnoResult<Vec<Appointment>> {
        let tables = self.tables()?;
        let mut rows: Vec<Appointment> = tables
            .appointments
            .values()
            .filter(|a| a.customer_id == customer_id && a.date >= from && a.date <= to)
            .cloned()
            .collect();
        rows.sort_by(by_schedule);
        Ok(rows)
    }

    async fn list_appointments(&self, query: &AppointmentQuery) -> TurnoResult<Vec<Appointment>> {
        let tables = self.tables()?;
        let mut rows: Vec<Appointment> = tables
            .appointments
            .values()
            .filter(|a| query.matches(a))
            .cloned()
            .collect();
        rows.sort_by(by_schedule);
        Ok(page(rows.into_iter(), query.skip, query.limit))
    }

    async fn get_appointment(&self, id: i64) -> TurnoResult<Option<Appointment>> {
        Ok(self.tables()?.appointments.get(&id).cloned())
    }

    async fn insert_appointment(&self, appointment: NewAppointment) -> TurnoResult<Appointment> {
        let mut tables = self.tables()?;
        let row = Appointment {
            id: 0,
            customer_id: appointment.customer_id,
            service_id: appointment.service_id,
            date: appointment.interval.date,
            start: appointment.interval.start,
            end: appointment.interval.end,
            status: AppointmentStatus::Pending,
            notified: false,
            created_at: Utc::now(),
        };
        tables.ensure_overlap_free(&row)?;

        let row = Appointment {
            id: tables.next_id(),
            ..row
        };
        tables.appointments.insert(row.id, row.clone());
        Ok(row)
    }

    async fn update_appointment(
        &self,
        appointment: &Appointment,
    ) -> TurnoResult<Option<Appointment>> {
        let mut tables = self.tables()?;
        if !tables.appointments.contains_key(&appointment.id) {
            return Ok(None);
        }
        tables.ensure_overlap_free(appointment)?;
        tables
            .appointments
            .insert(appointment.id, appointment.clone());
        Ok(Some(appointment.clone()))
    }

    async fn set_status(
        &self,
        id: i64,
        status: AppointmentStatus,
    ) -> TurnoResult<Option<Appointment>> {
        let mut tables = self.tables()?;
        let Some(current) = tables.appointments.get(&id).cloned() else {
            return Ok(None);
        };
        let updated = Appointment { status, ..current };
        tables.ensure_overlap_free(&updated)?;
        tables.appointments.insert(id, updated.clone());
        Ok(Some(updated))
    }

    async fn delete_appointment(&self, id: i64) -> TurnoResult<bool> {
        Ok(self.tables()?.appointments.remove(&id).is_some())
    }

    async fn cancel_customer_appointments(
        &self,
        customer_id: i64,
        from: NaiveDate,
        to: NaiveDate,
    ) -> TurnoResult<u64> {
        let mut tables = self.tables()?;
        let mut cancelled = 0;
        for appointment in tables.appointments.values_mut().filter(|a| {
            a.customer_id == customer_id && a.date >= from && a.date <= to && a.status.is_active()
        }) {
            appointment.status = AppointmentStatus::Cancelled;
            cancelled += 1;
        }
        Ok(cancelled)
    }

    async fn unnotified_appointments(&self) -> TurnoResult<Vec<Appointment>> {
        let tables = self.tables()?;
        let mut rows: Vec<Appointment> = tables
            .appointments
            .values()
            .filter(|a| !a.notified)
            .cloned()
            .collect();
        rows.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(rows)
    }

    async fn mark_all_notified(&self) -> TurnoResult<u64> {
        let mut tables = self.tables()?;
        let mut marked = 0;
        for appointment in tables.appointments.values_mut().filter(|a| !a.notified) {
            appointment.notified = true;
            marked += 1;
        }
        Ok(marked)
    }

    async fn find_blocks(&self, date: NaiveDate) -> TurnoResult<Vec<ScheduleBlock>> {
        self.list_blocks(Some(date), Some(date)).await
    }

    async fn list_blocks(
        &self,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> TurnoResult<Vec<ScheduleBlock>> {
        let tables = self.tables()?;
        let mut rows: Vec<ScheduleBlock> = tables
            .blocks
            .values()
            .filter(|b| from.is_none_or(|from| b.date >= from))
            .filter(|b| to.is_none_or(|to| b.date <= to))
            .cloned()
            .collect();
        rows.sort_by_key(|b| (b.date, b.start, b.id));
        Ok(rows)
    }

    async fn insert_block(&self, block: NewScheduleBlock) -> TurnoResult<ScheduleBlock> {
        let mut tables = self.tables()?;
        let date = block.date();
        let same_day: Vec<&ScheduleBlock> =
            tables.blocks.values().filter(|b| b.date == date).collect();

        if same_day.iter().any(|b| b.is_full_day) {
            return Err(AdmissionError::DuplicateFullDayBlock(date).into());
        }
        if let NewScheduleBlock::Partial { interval, .. } = &block {
            if let Some(clash) = same_day
                .iter()
                .find(|b| b.interval().is_some_and(|other| other.overlaps(interval)))
            {
                return Err(AdmissionError::OverlappingBlock {
                    block_id: Some(clash.id),
                }
                .into());
            }
        }

        let (start, end) = block.times();
        let row = ScheduleBlock {
            id: tables.next_id(),
            date,
            is_full_day: block.is_full_day(),
            start,
            end,
            reason: block.reason().map(str::to_string),
            created_at: Utc::now(),
        };
        tables.blocks.insert(row.id, row.clone());
        Ok(row)
    }

    async fn delete_block(&self, id: i64) -> TurnoResult<bool> {
        Ok(self.tables()?.blocks.remove(&id).is_some())
    }
}

#[async_trait]
impl DirectoryStore for MemoryStore {
    async fn list_customers(&self, skip: i64, limit: i64) -> TurnoResult<Vec<Customer>> {
        Ok(page(self.tables()?.customers.values().cloned(), skip, limit))
    }

    async fn get_customer(&self, id: i64) -> TurnoResult<Option<Customer>> {
        Ok(self.tables()?.customers.get(&id).cloned())
    }

    async fn find_customer_by_phone(&self, phone: &str) -> TurnoResult<Option<Customer>> {
        Ok(self
            .tables()?
            .customers
            .values()
            .find(|c| c.phone == phone)
            .cloned())
    }

    async fn create_customer(&self, customer: &CreateCustomerRequest) -> TurnoResult<Customer> {
        let mut tables = self.tables()?;
        if tables.customers.values().any(|c| c.phone == customer.phone) {
            return Err(TurnoError::Validation(
                "Phone number is already registered".to_string(),
            ));
        }
        let row = Customer {
            id: tables.next_id(),
            name: customer.name.clone(),
            phone: customer.phone.clone(),
            created_at: Utc::now(),
        };
        tables.customers.insert(row.id, row.clone());
        Ok(row)
    }

    async fn update_customer(
        &self,
        id: i64,
        update: &UpdateCustomerRequest,
    ) -> TurnoResult<Option<Customer>> {
        let mut tables = self.tables()?;
        if let Some(phone) = &update.phone {
            if tables
                .customers
                .values()
                .any(|c| c.id != id && &c.phone == phone)
            {
                return Err(TurnoError::Validation(
                    "Phone number is already registered".to_string(),
                ));
            }
        }
        Ok(tables.customers.get_mut(&id).map(|customer| {
            if let Some(name) = &update.name {
                customer.name = name.clone();
            }
            if let Some(phone) = &update.phone {
                customer.phone = phone.clone();
            }
            customer.clone()
        }))
    }

    async fn delete_customer(&self, id: i64) -> TurnoResult<bool> {
        let mut tables = self.tables()?;
        if tables.appointments.values().any(|a| a.customer_id == id) {
            return Err(TurnoError::Validation(format!(
                "Customer {id} still has appointments"
            )));
        }
        Ok(tables.customers.remove(&id).is_some())
    }

    async fn list_services(&self, skip: i64, limit: i64) -> TurnoResult<Vec<Service>> {
        Ok(page(self.tables()?.services.values().cloned(), skip, limit))
    }

    async fn get_service(&self, id: i64) -> TurnoResult<Option<Service>> {
        Ok(self.tables()?.services.get(&id).cloned())
    }

    async fn find_service_by_name(&self, name: &str) -> TurnoResult<Option<Service>> {
        Ok(self
            .tables()?
            .services
            .values()
            .find(|s| s.name.to_lowercase() == name.to_lowercase())
            .cloned())
    }

    async fn create_service(&self, service: &CreateServiceRequest) -> TurnoResult<Service> {
        let mut tables = self.tables()?;
        if tables.services.values().any(|s| s.name == service.name) {
            return Err(TurnoError::Validation(
                "A service with that name already exists".to_string(),
            ));
        }
        let row = Service {
            id: tables.next_id(),
            name: service.name.clone(),
            duration_minutes: service.duration_minutes,
            price: service.price,
        };
        tables.services.insert(row.id, row.clone());
        Ok(row)
    }

    async fn update_service(
        &self,
        id: i64,
        update: &UpdateServiceRequest,
    ) -> TurnoResult<Option<Service>> {
        let mut tables = self.tables()?;
        if let Some(name) = &update.name {
            if tables
                .services
                .values()
                .any(|s| s.id != id && &s.name == name)
            {
                return Err(TurnoError::Validation(
                    "A service with that name already exists".to_string(),
                ));
            }
        }
        Ok(tables.services.get_mut(&id).map(|service| {
            if let Some(name) = &update.name {
                service.name = name.clone();
            }
            if let Some(duration) = update.duration_minutes {
                service.duration_minutes = duration;
            }
            if let Some(price) = update.price {
                service.price = price;
            }
            service.clone()
        }))
    }

    async fn delete_service(&self, id: i64) -> TurnoResult<bool> {
        let mut tables = self.tables()?;
        if tables.appointments.values().any(|a| a.service_id == id) {
            return Err(TurnoError::Validation(format!(
                "Service {id} still has appointments"
            )));
        }
        Ok(tables.services.remove(&id).is_some())
    }

    async fn list_staff(&self, skip: i64, limit: i64) -> TurnoResult<Vec<StaffUser>> {
        Ok(page(self.tables()?.staff.values().cloned(), skip, limit))
    }

    async fn get_staff(&self, id: i64) -> TurnoResult<Option<StaffUser>> {
        Ok(self.tables()?.staff.get(&id).cloned())
    }

    async fn find_staff_by_username(&self, username: &str) -> TurnoResult<Option<StaffUser>> {
        Ok(self
            .tables()?
            .staff
            .values()
            .find(|s| s.username == username)
            .cloned())
    }

    async fn create_staff(&self, staff: &NewStaffUser) -> TurnoResult<StaffUser> {
        let mut tables = self.tables()?;
        if tables.staff.values().any(|s| s.username == staff.username) {
            return Err(TurnoError::Validation(format!(
                "Username `{}` is already registered",
                staff.username
            )));
        }
        let row = StaffUser {
            id: tables.next_id(),
            name: staff.name.clone(),
            username: staff.username.clone(),
            password_hash: staff.password_hash.clone(),
            role: staff.role,
            created_at: Utc::now(),
        };
        tables.staff.insert(row.id, row.clone());
        Ok(row)
    }

    async fn update_staff(
        &self,
        id: i64,
        update: &UpdateStaffRequest,
    ) -> TurnoResult<Option<StaffUser>> {
        let mut tables = self.tables()?;
        if let Some(username) = &update.username {
            if tables
                .staff
                .values()
                .any(|s| s.id != id && &s.username == username)
            {
                return Err(TurnoError::Validation(format!(
                    "Username `{username}` is already registered"
                )));
            }
        }
        Ok(tables.staff.get_mut(&id).map(|staff| {
            if let Some(name) = &update.name {
                staff.name = name.clone();
            }
            if let Some(username) = &update.username {
                staff.username = username.clone();
            }
            if let Some(role) = update.role {
                staff.role = role;
            }
            staff.clone()
        }))
    }

    async fn delete_staff(&self, id: i64) -> TurnoResult<bool> {
        Ok(self.tables()?.staff.remove(&id).is_some())
    }
}
