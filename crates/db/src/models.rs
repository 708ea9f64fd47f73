//! Row types as stored in PostgreSQL and their conversions into the domain
//! models. Status and role columns are text; parsing them is the only
//! conversion that can fail.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use turnero_core::{
    errors::TurnoError,
    models::{
        appointment::Appointment, block::ScheduleBlock, customer::Customer, service::Service,
        staff::StaffUser,
    },
};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbCustomer {
    pub id: i64,
    pub name: String,
    pub phone: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbService {
    pub id: i64,
    pub name: String,
    pub duration_minutes: i32,
    pub price: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbStaffUser {
    pub id: i64,
    pub name: String,
    pub username: String,
    pub password_hash: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbAppointment {
    pub id: i64,
    pub customer_id: i64,
    pub service_id: i64,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub status: String,
    pub notified: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbScheduleBlock {
    pub id: i64,
    pub date: NaiveDate,
    pub is_full_day: bool,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<DbCustomer> for Customer {
    fn from(row: DbCustomer) -> Self {
        Customer {
            id: row.id,
            name: row.name,
            phone: row.phone,
            created_at: row.created_at,
        }
    }
}

impl From<DbService> for Service {
    fn from(row: DbService) -> Self {
        Service {
            id: row.id,
            name: row.name,
            duration_minutes: row.duration_minutes,
            price: row.price,
        }
    }
}

impl TryFrom<DbStaffUser> for StaffUser {
    type Error = TurnoError;

    fn try_from(row: DbStaffUser) -> Result<Self, Self::Error> {
        Ok(StaffUser {
            id: row.id,
            name: row.name,
            username: row.username,
            password_hash: row.password_hash,
            role: row.role.parse()?,
            created_at: row.created_at,
        })
    }
}

impl TryFrom<DbAppointment> for Appointment {
    type Error = TurnoError;

    fn try_from(row: DbAppointment) -> Result<Self, Self::Error> {
        Ok(Appointment {
            id: row.id,
            customer_id: row.customer_id,
            service_id: row.service_id,
            date: row.date,
            start: row.start_time,
            end: row.end_time,
            status: row.status.parse()?,
            notified: row.notified,
            created_at: row.created_at,
        })
    }
}

impl From<DbScheduleBlock> for ScheduleBlock {
    fn from(row: DbScheduleBlock) -> Self {
        ScheduleBlock {
            id: row.id,
            date: row.date,
            is_full_day: row.is_full_day,
            start: row.start_time,
            end: row.end_time,
            reason: row.reason,
            created_at: row.created_at,
        }
    }
}
