use std::sync::Arc;

use async_trait::async_trait;
use tokio::time::timeout;
use tracing::{info, instrument, warn};
use validator::ValidateEmail;

use crate::model::newsletter::{NewsletterSubscription, SubscriptionStatus};
use crate::repository::newsletter_repo::NewsletterRepository;
use crate::service::quote_service::NOTIFICATION_SEND_TIMEOUT;
use crate::util::email::SmtpEmailService;
use crate::util::error::ServiceError;

/// How a subscribe call resolved. Active duplicates are a conflict at
/// the HTTP layer; reactivations look like fresh subscriptions.
#[derive(Debug, Clone)]
pub enum SubscribeOutcome {
    Subscribed(NewsletterSubscription),
    Resubscribed(NewsletterSubscription),
    AlreadySubscribed,
}

#[async_trait]
pub trait NewsletterService: Send + Sync {
    async fn subscribe(&self, email: &str, source: &str) -> Result<SubscribeOutcome, ServiceError>;
}

pub struct NewsletterServiceImpl {
    pub repo: Arc<dyn NewsletterRepository>,
    pub email: Option<Arc<SmtpEmailService>>,
}

impl NewsletterServiceImpl {
    pub fn new(repo: Arc<dyn NewsletterRepository>, email: Option<Arc<SmtpEmailService>>) -> Self {
        Self { repo, email }
    }

    fn dispatch_confirmation(&self, to: &str) {
        let Some(email) = self.email.clone() else { return };
        let to = to.to_string();
        tokio::spawn(async move {
            match timeout(NOTIFICATION_SEND_TIMEOUT, email.send_newsletter_confirmation(&to)).await
            {
                Ok(Ok(())) => info!(to = %to, "Newsletter confirmation email sent"),
                Ok(Err(e)) => warn!(to = %to, "Newsletter confirmation email failed: {}", e),
                Err(_) => warn!(to = %to, "Newsletter confirmation email timed out"),
            }
        });
    }
}

#[async_trait]
impl NewsletterService for NewsletterServiceImpl {
    #[instrument(skip(self), fields(email = %email))]
    async fn subscribe(&self, email: &str, source: &str) -> Result<SubscribeOutcome, ServiceError> {
        let email = email.trim().to_lowercase();
        if !email.validate_email() {
            return Err(ServiceError::InvalidInput("Invalid email format".to_string()));
        }

        let outcome = match self.repo.find_by_email(&email).await? {
            Some(existing) if existing.status == SubscriptionStatus::Active => {
                info!("Email already subscribed");
                SubscribeOutcome::AlreadySubscribed
            }
            Some(_) => {
                let subscription = self.repo.reactivate(&email, source).await?;
                info!("Subscription reactivated");
                self.dispatch_confirmation(&email);
                SubscribeOutcome::Resubscribed(subscription)
            }
            None => {
                let subscription = self.repo.insert(&email, source).await?;
                info!("New subscription created");
                self.dispatch_confirmation(&email);
                SubscribeOutcome::Subscribed(subscription)
            }
        };
        Ok(outcome)
    }
}
