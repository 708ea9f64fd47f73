//! Query-string extractors shared by the handlers.

use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;
use turnero_core::models::{
    appointment::{AppointmentQuery, AppointmentStatus},
    time_format,
};

#[derive(Debug, Deserialize)]
pub struct DateParams {
    pub date: NaiveDate,
}

#[derive(Debug, Deserialize)]
pub struct AvailabilityParams {
    pub date: NaiveDate,
    #[serde(with = "time_format")]
    pub start: NaiveTime,
    #[serde(with = "time_format")]
    pub end: NaiveTime,
}

#[derive(Debug, Deserialize)]
pub struct RangeParams {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

#[derive(Debug, Default, Deserialize)]
pub struct OptionalRangeParams {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub skip: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    AppointmentQuery::DEFAULT_LIMIT
}

#[derive(Debug, Deserialize)]
pub struct AppointmentFilter {
    pub customer_id: Option<i64>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub status: Option<AppointmentStatus>,
    #[serde(default)]
    pub skip: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

impl From<AppointmentFilter> for AppointmentQuery {
    fn from(filter: AppointmentFilter) -> Self {
        AppointmentQuery {
            customer_id: filter.customer_id,
            from: filter.from,
            to: filter.to,
            status: filter.status,
            skip: filter.skip,
            limit: filter.limit,
        }
    }
}
