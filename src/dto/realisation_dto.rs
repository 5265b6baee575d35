use serde::{Deserialize, Serialize};

use crate::model::realisation::Realisation;

/// Front matter travels as an arbitrary JSON object; the store is
/// schema-light and the admin editor round-trips unknown keys.
pub type Frontmatter = serde_json::Map<String, serde_json::Value>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRealisationRequest {
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub frontmatter: Option<Frontmatter>,
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRealisationRequest {
    #[serde(default)]
    pub frontmatter: Option<Frontmatter>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub new_slug: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealisationDocumentResponse {
    pub slug: String,
    pub frontmatter: Frontmatter,
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealisationListResponse {
    pub realisations: Vec<Realisation>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealisationMutationResponse {
    pub success: bool,
    pub slug: String,
}
