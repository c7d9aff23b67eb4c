use chrono::{DateTime, Utc};
use mongodb::bson::Document;
use serde::{Deserialize, Serialize};

/// One telemetry event reported by the mobile client. `log_code` is a
/// technical event code (AUTH_001, NET_002, ...); `metadata` carries
/// whatever extra context the client attached.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppLog {
    pub id: i64,
    pub log_code: String,
    pub count: i64,
    pub user_id: Option<String>,
    pub metadata: Option<Document>,
    pub created_at: Option<DateTime<Utc>>,
}
