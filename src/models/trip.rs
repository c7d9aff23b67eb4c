use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One ride request recorded by the mobile client. `id` is assigned by the
/// client and unique across the collection; `discount_percent` is absent on
/// trips recorded before the attribute existed.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Trip {
    pub id: i64,
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub app: Option<String>,
    pub user_id: Option<String>,
    pub discount_percent: Option<f64>,
    pub timestamp: Option<i64>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// One priced offer (Pop, Moto, ...) attached to a trip. `value` is the
/// structured numeric price; `price` is the raw locale-formatted string the
/// client scraped, kept as a fallback for records where `value` is missing.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RideOption {
    pub trip_id: i64,
    pub r#type: Option<String>,
    pub name: Option<String>,
    pub price: Option<String>,
    pub value: Option<f64>,
    pub estimated_time: Option<String>,
    // Driver economics reported by newer client versions.
    pub driver_value_per_km: Option<f64>,
    pub driver_value_per_hour: Option<f64>,
    pub pickup_km: Option<f64>,
    pub trip_km: Option<f64>,
    pub total_km: Option<f64>,
    pub pickup_min: Option<i64>,
    pub trip_duration_min: Option<i64>,
    pub total_min: Option<i64>,
    pub created_at: Option<DateTime<Utc>>,
}
