use serde::{Deserialize, Serialize};

/// Semantic role of a wizard step. Replaces the fragile positional
/// convention (step 1 = service, ... step 4 = budget): the catalog tags
/// each step explicitly and the submission pipeline resolves the four
/// categorical fields by role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepRole {
    #[serde(rename = "serviceType")]
    ServiceType,
    #[serde(rename = "projectType")]
    ProjectType,
    #[serde(rename = "timeline")]
    Timeline,
    #[serde(rename = "budgetRange")]
    BudgetRange,
}

/// One selectable option inside a wizard step. Immutable, sourced from
/// the static catalog asset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteOption {
    pub id: String,
    pub icon: String,
    pub title: String,
    pub subtitle: String,
    pub details: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteStep {
    /// 1-based, dense. Keys the user's selections.
    pub id: u32,
    pub title: String,
    pub description: String,
    #[serde(rename = "allowMultiple", default)]
    pub allow_multiple: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<StepRole>,
    pub options: Vec<QuoteOption>,
}

/// The full options catalog rendered by the wizard. Read-only at runtime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteCatalog {
    pub steps: Vec<QuoteStep>,
}

/// The catalog asset compiled into the binary, used as the serving copy
/// and as the loader fallback.
pub const BUNDLED_CATALOG_JSON: &str = include_str!("../../data/quote-options.json");

impl QuoteCatalog {
    /// Parse and validate the bundled asset.
    pub fn bundled() -> Result<Self, serde_json::Error> {
        serde_json::from_str(BUNDLED_CATALOG_JSON)
    }

    pub fn step_by_id(&self, id: u32) -> Option<&QuoteStep> {
        self.steps.iter().find(|step| step.id == id)
    }

    pub fn step_by_role(&self, role: StepRole) -> Option<&QuoteStep> {
        self.steps.iter().find(|step| step.role == Some(role))
    }

    /// Title used in notification summaries; falls back to a generic
    /// label for step ids outside the catalog.
    pub fn title_for_step(&self, id: u32) -> String {
        match self.step_by_id(id) {
            Some(step) => step.title.clone(),
            None => format!("Step {}", id),
        }
    }
}
