use crate::config::{ConfigError, EmailConfig};
use chrono::{DateTime, Utc};
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{header::ContentType, Mailbox},
    transport::smtp::{
        authentication::Credentials,
        client::{Tls, TlsParameters},
    },
};
use tracing::{error, info, instrument};

/// Email service errors
#[derive(Debug, thiserror::Error)]
pub enum EmailError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("SMTP error: {0}")]
    SmtpError(String),

    #[error("Message building error: {0}")]
    MessageError(String),

    #[error("Address error: {0}")]
    AddressError(String),
}

impl From<ConfigError> for EmailError {
    fn from(err: ConfigError) -> Self {
        EmailError::ConfigError(err.to_string())
    }
}

/// Email message builder
#[derive(Debug, Clone)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub text_body: Option<String>,
    pub html_body: Option<String>,
}

impl EmailMessage {
    pub fn new(to: String, subject: String) -> Self {
        Self { to, subject, text_body: None, html_body: None }
    }

    pub fn with_text_body(mut self, body: String) -> Self {
        self.text_body = Some(body);
        self
    }

    pub fn with_html_body(mut self, body: String) -> Self {
        self.html_body = Some(body);
        self
    }
}

/// Everything the two quote notification emails need.
#[derive(Debug, Clone)]
pub struct QuoteEmailContext {
    pub quote_id: i64,
    pub company_name: String,
    pub email: String,
    pub phone: String,
    pub description: String,
    /// One line per retained selection, newline separated.
    pub selection_summary: String,
    pub submitted_at: DateTime<Utc>,
}

/// SMTP email service implementation
pub struct SmtpEmailService {
    pub config: EmailConfig,
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpEmailService {
    /// Create a new SMTP email service
    #[instrument(skip(config), fields(host = %config.smtp_host, port = config.smtp_port))]
    pub fn new(config: EmailConfig) -> Result<Self, EmailError> {
        info!("Initializing SMTP email service");

        config.validate().map_err(EmailError::from)?;

        let mut transport_builder =
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.smtp_host)
                .port(config.smtp_port)
                .timeout(Some(std::time::Duration::from_secs(config.connection_timeout_secs)));

        // Configure TLS settings
        if config.use_tls {
            let tls_parameters = TlsParameters::new(config.smtp_host.clone())
                .map_err(|e| EmailError::ConfigError(format!("TLS configuration error: {}", e)))?;

            if config.use_starttls {
                transport_builder = transport_builder.tls(Tls::Required(tls_parameters));
            } else {
                transport_builder = transport_builder.tls(Tls::Wrapper(tls_parameters));
            }
        } else {
            transport_builder = transport_builder.tls(Tls::None);
        }

        if !config.smtp_username.is_empty() && !config.smtp_password.is_empty() {
            let credentials =
                Credentials::new(config.smtp_username.clone(), config.smtp_password.clone());
            transport_builder = transport_builder.credentials(credentials);
        }

        let transport = transport_builder.build();

        info!("SMTP email service initialized successfully");
        Ok(Self { config, transport })
    }

    /// Send an email message
    #[instrument(skip(self, message), fields(to = %message.to, subject = %message.subject))]
    pub async fn send_email(&self, message: EmailMessage) -> Result<(), EmailError> {
        info!("Sending email to: {}", message.to);

        self.validate_email_address(&message.to)?;

        let email_message = self.build_message(message)?;

        self.transport.send(email_message).await.map_err(|e| {
            error!("Failed to send email: {}", e);
            EmailError::SmtpError(format!("Failed to send email: {}", e))
        })?;

        info!("Email sent successfully");
        Ok(())
    }

    /// Confirmation sent to the submitter, with the record id as a
    /// tracking number.
    #[instrument(skip(self, ctx), fields(to = %ctx.email, quote_id = ctx.quote_id))]
    pub async fn send_quote_confirmation(&self, ctx: &QuoteEmailContext) -> Result<(), EmailError> {
        let message = EmailMessage::new(
            ctx.email.clone(),
            "Confirmation de votre demande de devis - Atelier".to_string(),
        )
        .with_text_body(self.quote_confirmation_text(ctx))
        .with_html_body(self.quote_confirmation_html(ctx));

        self.send_email(message).await
    }

    /// Alert sent to the back-office address for a new submission.
    #[instrument(skip(self, ctx), fields(to = %admin_email, quote_id = ctx.quote_id))]
    pub async fn send_quote_admin_alert(
        &self,
        admin_email: &str,
        ctx: &QuoteEmailContext,
    ) -> Result<(), EmailError> {
        let message = EmailMessage::new(
            admin_email.to_string(),
            format!("Nouvelle demande de devis - {}", ctx.company_name),
        )
        .with_text_body(self.quote_admin_alert_text(ctx))
        .with_html_body(self.quote_admin_alert_html(ctx));

        self.send_email(message).await
    }

    /// Newsletter subscription confirmation.
    #[instrument(skip(self), fields(to = %to))]
    pub async fn send_newsletter_confirmation(&self, to: &str) -> Result<(), EmailError> {
        let message = EmailMessage::new(
            to.to_string(),
            "Confirmation d'abonnement - Atelier".to_string(),
        )
        .with_text_body(self.newsletter_confirmation_text())
        .with_html_body(self.newsletter_confirmation_html());

        self.send_email(message).await
    }

    fn quote_confirmation_text(&self, ctx: &QuoteEmailContext) -> String {
        format!(
            "Bonjour {company},\n\n\
             Merci de votre intérêt pour nos services. Nous avons bien reçu votre \
             demande de devis et nous l'examinons actuellement.\n\n\
             Résumé de votre demande:\n\
             Entreprise: {company}\n\
             Email: {email}\n\
             Téléphone: {phone}\n\
             Description: {description}\n\
             Sélections:\n{selections}\n\n\
             Notre équipe vous contactera très bientôt avec un devis détaillé.\n\n\
             Cordialement,\nL'équipe Atelier\n\n\
             Numéro de suivi: {id}",
            company = ctx.company_name,
            email = ctx.email,
            phone = ctx.phone,
            description = ctx.description,
            selections = ctx.selection_summary,
            id = ctx.quote_id,
        )
    }

    fn quote_confirmation_html(&self, ctx: &QuoteEmailContext) -> String {
        format!(
            r#"<!DOCTYPE html>
<html>
  <head>
    <style>
      body {{ font-family: Arial, sans-serif; line-height: 1.6; color: #333; }}
      .container {{ max-width: 600px; margin: 0 auto; padding: 20px; }}
      .header {{ background: linear-gradient(135deg, #2563eb 0%, #1e40af 100%); color: white; padding: 30px; border-radius: 8px; text-align: center; }}
      .content {{ background: #f9fafb; padding: 20px; margin: 20px 0; border-radius: 8px; }}
      .detail {{ margin: 12px 0; }}
      .detail-label {{ font-weight: bold; color: #1e40af; }}
      .footer {{ text-align: center; color: #666; font-size: 12px; margin-top: 20px; padding-top: 20px; border-top: 1px solid #ddd; }}
    </style>
  </head>
  <body>
    <div class="container">
      <div class="header"><h1 style="margin: 0;">&#10003; Demande Re&ccedil;ue</h1></div>
      <p>Bonjour {company},</p>
      <p>Merci de votre int&eacute;r&ecirc;t pour nos services. Nous avons bien re&ccedil;u votre demande de devis et nous l'examinons actuellement.</p>
      <div class="content">
        <h3 style="margin-top: 0;">R&eacute;sum&eacute; de votre demande:</h3>
        <div class="detail"><span class="detail-label">Entreprise:</span> {company}</div>
        <div class="detail"><span class="detail-label">Email:</span> {email}</div>
        <div class="detail"><span class="detail-label">T&eacute;l&eacute;phone:</span> {phone}</div>
        <div class="detail"><span class="detail-label">Description:</span> {description}</div>
        <div class="detail"><span class="detail-label">S&eacute;lections:</span><br>{selections}</div>
      </div>
      <p>Notre &eacute;quipe sp&eacute;cialis&eacute;e examinera votre demande et vous contactera tr&egrave;s bient&ocirc;t avec un devis d&eacute;taill&eacute; et personnalis&eacute;.</p>
      <p>Cordialement,<br><strong>L'&eacute;quipe Atelier</strong></p>
      <div class="footer"><p>Num&eacute;ro de suivi: {id}</p></div>
    </div>
  </body>
</html>"#,
            company = html_escape::encode_text(&ctx.company_name),
            email = html_escape::encode_text(&ctx.email),
            phone = html_escape::encode_text(&ctx.phone),
            description = html_escape::encode_text(&ctx.description),
            selections = html_escape::encode_text(&ctx.selection_summary).replace('\n', "<br>"),
            id = ctx.quote_id,
        )
    }

    fn quote_admin_alert_text(&self, ctx: &QuoteEmailContext) -> String {
        format!(
            "Nouvelle demande de devis\n\n\
             Entreprise: {company}\n\
             Email: {email}\n\
             Téléphone: {phone}\n\
             Description: {description}\n\
             Sélections:\n{selections}\n\
             Date: {date}\n\
             ID Suivi: {id}",
            company = ctx.company_name,
            email = ctx.email,
            phone = ctx.phone,
            description = ctx.description,
            selections = ctx.selection_summary,
            date = ctx.submitted_at.format("%d/%m/%Y %H:%M:%S"),
            id = ctx.quote_id,
        )
    }

    fn quote_admin_alert_html(&self, ctx: &QuoteEmailContext) -> String {
        format!(
            r#"<!DOCTYPE html>
<html>
  <head>
    <style>
      body {{ font-family: Arial, sans-serif; line-height: 1.6; color: #333; }}
      .container {{ max-width: 600px; margin: 0 auto; padding: 20px; }}
      .header {{ background: linear-gradient(135deg, #2563eb 0%, #1e40af 100%); color: white; padding: 30px; border-radius: 8px; text-align: center; }}
      .content {{ background: #f9fafb; padding: 20px; margin: 20px 0; border-radius: 8px; }}
      .detail {{ margin: 12px 0; }}
      .detail-label {{ font-weight: bold; color: #1e40af; }}
    </style>
  </head>
  <body>
    <div class="container">
      <div class="header"><h1 style="margin: 0;">Nouvelle Demande de Devis</h1></div>
      <div class="content">
        <h3 style="margin-top: 0;">D&eacute;tails du Client:</h3>
        <div class="detail"><span class="detail-label">Entreprise:</span> {company}</div>
        <div class="detail"><span class="detail-label">Email:</span> {email}</div>
        <div class="detail"><span class="detail-label">T&eacute;l&eacute;phone:</span> {phone}</div>
        <div class="detail"><span class="detail-label">Description:</span> {description}</div>
        <div class="detail"><span class="detail-label">S&eacute;lections:</span><br>{selections}</div>
        <div class="detail"><span class="detail-label">Date:</span> {date}</div>
        <div class="detail"><span class="detail-label">ID Suivi:</span> {id}</div>
      </div>
    </div>
  </body>
</html>"#,
            company = html_escape::encode_text(&ctx.company_name),
            email = html_escape::encode_text(&ctx.email),
            phone = html_escape::encode_text(&ctx.phone),
            description = html_escape::encode_text(&ctx.description),
            selections = html_escape::encode_text(&ctx.selection_summary).replace('\n', "<br>"),
            date = ctx.submitted_at.format("%d/%m/%Y %H:%M:%S"),
            id = ctx.quote_id,
        )
    }

    fn newsletter_confirmation_text(&self) -> String {
        "Bonjour,\n\n\
         Merci de vous être abonné à notre newsletter ! Vous recevrez désormais \
         nos dernières actualités, annonces et offres spéciales.\n\n\
         Cordialement,\nL'équipe Atelier"
            .to_string()
    }

    fn newsletter_confirmation_html(&self) -> String {
        r#"<!DOCTYPE html>
<html>
  <head>
    <style>
      body { font-family: Arial, sans-serif; line-height: 1.6; color: #333; }
      .container { max-width: 600px; margin: 0 auto; padding: 20px; }
      .header { background: linear-gradient(135deg, #2563eb 0%, #1e40af 100%); color: white; padding: 30px; border-radius: 8px; text-align: center; }
      .content { background: #f9fafb; padding: 20px; margin: 20px 0; border-radius: 8px; }
    </style>
  </head>
  <body>
    <div class="container">
      <div class="header"><h1 style="margin: 0;">&#10003; Abonnement confirm&eacute;</h1></div>
      <div class="content">
        <p>Bonjour,</p>
        <p>Merci de vous &ecirc;tre abonn&eacute; &agrave; notre newsletter ! Vous recevrez d&eacute;sormais nos derni&egrave;res actualit&eacute;s, annonces et offres sp&eacute;ciales.</p>
      </div>
      <p>Cordialement,<br><strong>L'&eacute;quipe Atelier</strong></p>
    </div>
  </body>
</html>"#
            .to_string()
    }

    /// Build a lettre Message from EmailMessage
    fn build_message(&self, email_message: EmailMessage) -> Result<Message, EmailError> {
        let from_mailbox: Mailbox =
            format!("{} <{}>", self.config.from_name, self.config.from_email)
                .parse()
                .map_err(|e| EmailError::AddressError(format!("Invalid from address: {}", e)))?;

        let to_mailbox: Mailbox = email_message
            .to
            .parse()
            .map_err(|e| EmailError::AddressError(format!("Invalid to address: {}", e)))?;

        let message_builder =
            Message::builder().from(from_mailbox).to(to_mailbox).subject(&email_message.subject);

        match (email_message.text_body, email_message.html_body) {
            (Some(text), Some(html)) => {
                let message = message_builder
                    .multipart(
                        lettre::message::MultiPart::alternative()
                            .singlepart(
                                lettre::message::SinglePart::builder()
                                    .header(ContentType::TEXT_PLAIN)
                                    .body(text),
                            )
                            .singlepart(
                                lettre::message::SinglePart::builder()
                                    .header(ContentType::TEXT_HTML)
                                    .body(html),
                            ),
                    )
                    .map_err(|e| {
                        EmailError::MessageError(format!("Failed to build multipart message: {}", e))
                    })?;
                Ok(message)
            }
            (Some(text), None) => message_builder
                .body(text)
                .map_err(|e| EmailError::MessageError(format!("Failed to build text message: {}", e))),
            (None, Some(html)) => message_builder
                .singlepart(
                    lettre::message::SinglePart::builder()
                        .header(ContentType::TEXT_HTML)
                        .body(html),
                )
                .map_err(|e| EmailError::MessageError(format!("Failed to build HTML message: {}", e))),
            (None, None) => Err(EmailError::MessageError("No message body provided".to_string())),
        }
    }

    /// Validate email address format
    fn validate_email_address(&self, email: &str) -> Result<(), EmailError> {
        if email.is_empty() {
            return Err(EmailError::AddressError("Email address cannot be empty".to_string()));
        }

        let parts: Vec<&str> = email.split('@').collect();
        if parts.len() != 2 || parts[0].is_empty() || parts[1].is_empty() {
            return Err(EmailError::AddressError("Invalid email format".to_string()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EmailConfig;

    // The pooled transport registers with the runtime on construction,
    // so even the template-only tests need a tokio context.
    fn service() -> SmtpEmailService {
        SmtpEmailService::new(EmailConfig::from_test_env()).unwrap()
    }

    fn context() -> QuoteEmailContext {
        QuoteEmailContext {
            quote_id: 42,
            company_name: "Acme <Metal>".to_string(),
            email: "a@b.com".to_string(),
            phone: "+212".to_string(),
            description: "Hangar".to_string(),
            selection_summary: "Type de Service: construction\nType de Projet: new".to_string(),
            submitted_at: chrono::Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_validate_email_address() {
        let svc = service();
        assert!(svc.validate_email_address("user@example.com").is_ok());
        assert!(svc.validate_email_address("").is_err());
        assert!(svc.validate_email_address("no-at-sign").is_err());
        assert!(svc.validate_email_address("@missing-local").is_err());
    }

    #[tokio::test]
    async fn test_confirmation_html_escapes_and_includes_tracking_number() {
        let svc = service();
        let html = svc.quote_confirmation_html(&context());
        assert!(html.contains("Acme &lt;Metal&gt;"));
        assert!(html.contains("Num&eacute;ro de suivi: 42"));
        assert!(html.contains("Type de Service: construction<br>Type de Projet: new"));
    }

    #[tokio::test]
    async fn test_admin_alert_includes_submission_date() {
        let svc = service();
        let ctx = context();
        let text = svc.quote_admin_alert_text(&ctx);
        assert!(text.contains("ID Suivi: 42"));
        assert!(text.contains("Date:"));
    }

    #[tokio::test]
    async fn test_build_multipart_message() {
        let svc = service();
        let msg = EmailMessage::new("user@example.com".to_string(), "Test".to_string())
            .with_text_body("text".to_string())
            .with_html_body("<p>html</p>".to_string());
        assert!(svc.build_message(msg).is_ok());
    }

    #[tokio::test]
    async fn test_build_message_requires_body() {
        let svc = service();
        let msg = EmailMessage::new("user@example.com".to_string(), "Test".to_string());
        assert!(svc.build_message(msg).is_err());
    }
}
