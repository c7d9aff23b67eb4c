use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Recorded when a user abandons a ride before requesting it. `trip_id`
/// links back to the trip the user gave up on, when one was recorded.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OptOut {
    pub id: i64,
    pub user_id: Option<String>,
    pub device_model: Option<String>,
    pub app_version: Option<String>,
    pub app_name: Option<String>,
    pub occurred_at: Option<DateTime<Utc>>,
    pub trip_id: Option<i64>,
    pub created_at: Option<DateTime<Utc>>,
}
