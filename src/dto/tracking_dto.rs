use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingRequest {
    #[serde(default)]
    pub advertising_id: String,
    #[serde(default)]
    pub client_id: Option<String>,
    #[serde(default)]
    pub session_id: Option<String>,
    /// Sent by some clients, accepted and ignored; the server clock is
    /// authoritative for `last_seen`.
    #[serde(default)]
    pub timestamp: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackingResponse {
    pub success: bool,
    pub message: String,
}
