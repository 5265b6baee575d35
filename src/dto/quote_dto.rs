use serde::{Deserialize, Serialize};

use crate::model::quote::QuoteRequest;

/// Wire payload of the public submission endpoint. All fields default
/// so that presence checks happen in the service, not the JSON decoder;
/// the failure mode for a missing field is a 400 with a message rather
/// than a deserialization error.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitQuoteRequest {
    #[serde(default)]
    pub company_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub budget: String,
    /// Raw step-id -> option-id mapping as sent by the wizard. Kept as
    /// a plain JSON value so a non-object payload is classified by the
    /// service as a 400, not an extractor rejection; keys are strings
    /// on the wire and non-numeric ones are dropped during
    /// normalization.
    #[serde(default)]
    pub selections: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitQuoteResponse {
    pub success: bool,
    pub message: String,
    pub quote_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateQuoteStatusRequest {
    pub status: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteListResponse {
    pub quotes: Vec<QuoteRequest>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteResponse {
    pub quote: QuoteRequest,
}
