use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;

use crate::models::config::DriverRateConfig;
use crate::models::log::AppLog;

/// Denormalized ride option as the dashboard tables expect it. Field names
/// are part of the existing JSON contract with the frontend.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RideOptionRow {
    pub r#type: Option<String>,
    pub name: Option<String>,
    pub price: Option<String>,
    pub value: Option<f64>,
    pub estimated_time: Option<String>,
    pub driver_value_per_km: Option<f64>,
    pub driver_value_per_hour: Option<f64>,
    pub pickup_km: Option<f64>,
    pub trip_km: Option<f64>,
    pub total_km: Option<f64>,
    pub pickup_min: Option<i64>,
    pub trip_duration_min: Option<i64>,
    pub total_min: Option<i64>,
    pub meets_min_per_km: Option<bool>,
    pub meets_min_per_hour: Option<bool>,
}

/// One row of the trips table: trip + user + valuation, assembled per
/// request and never persisted.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TripRow {
    pub id: i64,
    pub name: String,
    pub phone: Option<String>,
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub app: Option<String>,
    pub valor_app: f64,
    pub valor_com_desconto: f64,
    /// Recorded percent (e.g. 9-11). None for legacy trips, where the
    /// frontend labels the 20% fallback as estimated.
    pub discount_percent: Option<i32>,
    pub created_at: Option<DateTime<Utc>>,
    pub rides: Vec<RideOptionRow>,
}

#[derive(Debug, Serialize)]
pub struct TripData {
    pub rows: Vec<TripRow>,
    pub total: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TripDetailResponse {
    pub trip: TripRow,
    pub driver_rate_config: DriverRateConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsSummary {
    pub total_trips: i64,
    pub total_users: i64,
    pub last_trip_at: Option<DateTime<Utc>>,
    /// True when the count comes from the deduplicating aggregation
    /// (distinct origin+destination+day) rather than a plain count.
    pub is_unique_trips: bool,
}

/// Users with at least one logged-in trip.
#[derive(Debug, Serialize)]
pub struct ClientRow {
    pub id_user: String,
    pub name_user: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub trip_count: i64,
}

/// Opt-out joined with the client name and the linked trip.
#[derive(Debug, Serialize)]
pub struct OptOutRow {
    pub id: i64,
    pub user_id: Option<String>,
    pub device_model: Option<String>,
    pub app_version: Option<String>,
    pub app_name: Option<String>,
    pub occurred_at: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
    pub trip_id: Option<i64>,
    pub client_name: Option<String>,
    pub trip_origin: Option<String>,
    pub trip_destination: Option<String>,
    pub trip_app: Option<String>,
    pub trip_created_at: Option<DateTime<Utc>>,
}

/// Logs page payload: the rows plus per-user lookup maps so the frontend
/// can show names, phones and trip counts without extra requests.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogData {
    pub logs: Vec<AppLog>,
    pub user_name_by_user_id: HashMap<String, String>,
    pub user_phone_by_user_id: HashMap<String, String>,
    pub trip_count_by_user_id: HashMap<String, i64>,
}
