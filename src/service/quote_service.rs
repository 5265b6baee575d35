use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tokio::time::timeout;
use tracing::{error, info, instrument, warn};

use crate::dto::quote_dto::SubmitQuoteRequest;
use crate::model::catalog::{QuoteCatalog, StepRole};
use crate::model::quote::{NewQuoteRequest, QuoteRequest, QuoteStatus};
use crate::repository::quote_repo::QuoteRequestRepository;
use crate::util::email::{QuoteEmailContext, SmtpEmailService};
use crate::util::error::ServiceError;

/// Bound on each outbound notification send. A hung SMTP connection is
/// treated like any other best-effort miss.
pub const NOTIFICATION_SEND_TIMEOUT: Duration = Duration::from_secs(5);

/// Reduce the raw wire selections to an integer-keyed mapping. Keys
/// that do not parse as integers and entries with empty values are
/// dropped silently; the result is key-order independent.
pub fn normalize_selections(
    raw: &serde_json::Map<String, serde_json::Value>,
) -> BTreeMap<u32, String> {
    raw.iter()
        .filter_map(|(key, value)| {
            let step: u32 = key.trim().parse().ok()?;
            let option = value.as_str()?.trim();
            if option.is_empty() {
                return None;
            }
            Some((step, option.to_string()))
        })
        .collect()
}

/// Human-readable summary for the notification emails, one line per
/// retained selection.
pub fn selection_summary(catalog: &QuoteCatalog, selections: &BTreeMap<u32, String>) -> String {
    selections
        .iter()
        .map(|(step, option)| format!("{}: {}", catalog.title_for_step(*step), option))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Best-effort dual-notification dispatcher. Sends run on a detached
/// task; their outcome is consumed only for logging and never reaches
/// the response path.
pub struct QuoteNotifier {
    email: Arc<SmtpEmailService>,
    admin_email: String,
}

impl QuoteNotifier {
    pub fn new(email: Arc<SmtpEmailService>, admin_email: String) -> Self {
        Self { email, admin_email }
    }

    pub fn dispatch(&self, ctx: QuoteEmailContext) {
        let email = self.email.clone();
        let admin_email = self.admin_email.clone();
        tokio::spawn(async move {
            // Client confirmation first, admin alert second. A failure
            // of the first send must not prevent the second.
            match timeout(NOTIFICATION_SEND_TIMEOUT, email.send_quote_confirmation(&ctx)).await {
                Ok(Ok(())) => info!(quote_id = ctx.quote_id, "Client confirmation email sent"),
                Ok(Err(e)) => warn!(quote_id = ctx.quote_id, "Client confirmation email failed: {}", e),
                Err(_) => warn!(quote_id = ctx.quote_id, "Client confirmation email timed out"),
            }
            match timeout(
                NOTIFICATION_SEND_TIMEOUT,
                email.send_quote_admin_alert(&admin_email, &ctx),
            )
            .await
            {
                Ok(Ok(())) => info!(quote_id = ctx.quote_id, "Admin alert email sent"),
                Ok(Err(e)) => warn!(quote_id = ctx.quote_id, "Admin alert email failed: {}", e),
                Err(_) => warn!(quote_id = ctx.quote_id, "Admin alert email timed out"),
            }
        });
    }
}

#[async_trait]
pub trait QuoteService: Send + Sync {
    /// Validate, normalize, persist, then fire the best-effort
    /// notifications. Exactly one row per successful call.
    async fn submit(&self, request: SubmitQuoteRequest) -> Result<QuoteRequest, ServiceError>;

    async fn get_quote(&self, id: i64) -> Result<Option<QuoteRequest>, ServiceError>;
    async fn list_quotes(&self) -> Result<Vec<QuoteRequest>, ServiceError>;
    async fn update_quote_status(
        &self,
        id: i64,
        status: QuoteStatus,
    ) -> Result<QuoteRequest, ServiceError>;
    async fn delete_quote(&self, id: i64) -> Result<(), ServiceError>;
}

pub struct QuoteServiceImpl {
    pub repo: Arc<dyn QuoteRequestRepository>,
    pub catalog: Arc<QuoteCatalog>,
    /// Absent when no SMTP credentials are configured; submissions then
    /// persist without notifications.
    pub notifier: Option<Arc<QuoteNotifier>>,
}

impl QuoteServiceImpl {
    pub fn new(
        repo: Arc<dyn QuoteRequestRepository>,
        catalog: Arc<QuoteCatalog>,
        notifier: Option<Arc<QuoteNotifier>>,
    ) -> Self {
        Self { repo, catalog, notifier }
    }

    fn selection_for_role(
        &self,
        normalized: &BTreeMap<u32, String>,
        role: StepRole,
    ) -> Option<String> {
        self.catalog
            .step_by_role(role)
            .and_then(|step| normalized.get(&step.id))
            .cloned()
    }
}

#[async_trait]
impl QuoteService for QuoteServiceImpl {
    #[instrument(skip(self, request), fields(company = %request.company_name))]
    async fn submit(&self, request: SubmitQuoteRequest) -> Result<QuoteRequest, ServiceError> {
        info!("Processing quote submission");

        // Fail-fast presence checks, in a fixed order.
        for (value, field) in [
            (&request.company_name, "companyName"),
            (&request.email, "email"),
            (&request.phone, "phone"),
            (&request.description, "description"),
            (&request.budget, "budget"),
        ] {
            if value.is_empty() {
                return Err(ServiceError::InvalidInput(format!(
                    "Missing required field: {}",
                    field
                )));
            }
        }

        let raw_selections = match request.selections.as_ref().and_then(|v| v.as_object()) {
            Some(map) if !map.is_empty() => map,
            _ => {
                return Err(ServiceError::InvalidInput(
                    "Missing or empty selections".to_string(),
                ));
            }
        };

        let normalized = normalize_selections(raw_selections);

        let new_quote = NewQuoteRequest {
            company_name: request.company_name.clone(),
            email: request.email.clone(),
            phone: request.phone.clone(),
            description: request.description.clone(),
            service_type: self.selection_for_role(&normalized, StepRole::ServiceType),
            project_type: self.selection_for_role(&normalized, StepRole::ProjectType),
            timeline: self.selection_for_role(&normalized, StepRole::Timeline),
            budget_range: self.selection_for_role(&normalized, StepRole::BudgetRange),
        };

        // The write must succeed before any notification is attempted.
        let created = match self.repo.create(new_quote).await {
            Ok(quote) => quote,
            Err(e) => {
                error!("Failed to persist quote request: {}", e);
                return Err(ServiceError::from(e));
            }
        };
        info!(id = created.id, "Quote request persisted");

        if let Some(notifier) = &self.notifier {
            notifier.dispatch(QuoteEmailContext {
                quote_id: created.id,
                company_name: created.company_name.clone(),
                email: created.email.clone(),
                phone: created.phone.clone(),
                description: created.description.clone(),
                selection_summary: selection_summary(&self.catalog, &normalized),
                submitted_at: Utc::now(),
            });
        }

        Ok(created)
    }

    #[instrument(skip(self), fields(id = id))]
    async fn get_quote(&self, id: i64) -> Result<Option<QuoteRequest>, ServiceError> {
        Ok(self.repo.get_by_id(id).await?)
    }

    #[instrument(skip(self))]
    async fn list_quotes(&self) -> Result<Vec<QuoteRequest>, ServiceError> {
        Ok(self.repo.list_all().await?)
    }

    #[instrument(skip(self), fields(id = id, status = %status))]
    async fn update_quote_status(
        &self,
        id: i64,
        status: QuoteStatus,
    ) -> Result<QuoteRequest, ServiceError> {
        let res = self.repo.update_status(id, status).await;
        match &res {
            Ok(_) => info!("Quote status updated successfully"),
            Err(e) => error!("Failed to update quote status: {}", e),
        }
        res.map_err(ServiceError::from)
    }

    #[instrument(skip(self), fields(id = id))]
    async fn delete_quote(&self, id: i64) -> Result<(), ServiceError> {
        let res = self.repo.delete(id).await;
        match &res {
            Ok(_) => info!("Quote deleted successfully"),
            Err(e) => error!("Failed to delete quote: {}", e),
        }
        res.map_err(ServiceError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(entries: &[(&str, serde_json::Value)]) -> serde_json::Map<String, serde_json::Value> {
        entries.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
    }

    #[test]
    fn test_normalization_is_order_independent() {
        let a = normalize_selections(&raw(&[("2", json!("x")), ("1", json!("y"))]));
        let b = normalize_selections(&raw(&[("1", json!("y")), ("2", json!("x"))]));
        assert_eq!(a, b);
        assert_eq!(a.get(&1), Some(&"y".to_string()));
        assert_eq!(a.get(&2), Some(&"x".to_string()));
    }

    #[test]
    fn test_normalization_drops_non_numeric_keys() {
        let normalized = normalize_selections(&raw(&[("abc", json!("x")), ("1", json!("y"))]));
        assert_eq!(normalized.len(), 1);
        assert_eq!(normalized.get(&1), Some(&"y".to_string()));
    }

    #[test]
    fn test_normalization_drops_empty_and_non_string_values() {
        let normalized = normalize_selections(&raw(&[
            ("1", json!("")),
            ("2", json!(null)),
            ("3", json!(42)),
            ("4", json!("kept")),
        ]));
        assert_eq!(normalized.len(), 1);
        assert_eq!(normalized.get(&4), Some(&"kept".to_string()));
    }

    #[test]
    fn test_summary_uses_catalog_titles_with_fallback() {
        let catalog = QuoteCatalog::bundled().unwrap();
        let mut selections = BTreeMap::new();
        selections.insert(1, "construction".to_string());
        selections.insert(9, "mystery".to_string());
        let summary = selection_summary(&catalog, &selections);
        assert_eq!(summary, "Type de Service: construction\nStep 9: mystery");
    }
}
