use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// App user as registered by the mobile client.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppUser {
    pub id_user: String,
    pub id_customer: Option<String>,
    pub name_user: Option<String>,
    pub nickname: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub document: Option<String>,
    pub customer_register_status_id: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}
