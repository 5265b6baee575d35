use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle of a quote request. Two states only; either can be set at
/// any time from the admin surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum QuoteStatus {
    Pending,
    Completed,
}

impl QuoteStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuoteStatus::Pending => "pending",
            QuoteStatus::Completed => "completed",
        }
    }

    /// Strict parse; unknown values are rejected rather than defaulted.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(QuoteStatus::Pending),
            "completed" => Some(QuoteStatus::Completed),
            _ => None,
        }
    }
}

impl std::fmt::Display for QuoteStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A submitted customer inquiry awaiting human follow-up.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequest {
    pub id: i64,
    pub company_name: String,
    pub email: String,
    pub phone: String,
    pub description: String,
    pub service_type: Option<String>,
    pub project_type: Option<String>,
    pub timeline: Option<String>,
    pub budget_range: Option<String>,
    pub status: QuoteStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert payload for a new quote request; id and timestamps are
/// assigned by the repository.
#[derive(Debug, Clone)]
pub struct NewQuoteRequest {
    pub company_name: String,
    pub email: String,
    pub phone: String,
    pub description: String,
    pub service_type: Option<String>,
    pub project_type: Option<String>,
    pub timeline: Option<String>,
    pub budget_range: Option<String>,
}
