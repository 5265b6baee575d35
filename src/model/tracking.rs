use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Visit-count record captured after cookie consent, keyed by the
/// advertising id.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct TrackingRecord {
    pub id: i64,
    pub advertising_id: String,
    pub client_id: Option<String>,
    pub session_id: Option<String>,
    pub first_seen: DateTime<Utc>,
    pub last_seen: DateTime<Utc>,
    pub visit_count: i64,
}
