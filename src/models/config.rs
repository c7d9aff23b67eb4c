use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One key/value pair from the app settings collection. Values are stored as
/// free text; numeric settings may use either comma or dot decimals.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ConfigEntry {
    pub key: String,
    pub value: String,
    pub description: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Minimum driver rates (R$/km and R$/h, car and moto) shown next to each
/// ride option in the trip detail modal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverRateConfig {
    pub min_per_km_car: f64,
    pub min_per_km_moto: f64,
    pub min_per_hour_car: f64,
    pub min_per_hour_moto: f64,
}
