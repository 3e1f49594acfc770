use unajmi_db::repositories::notification_repo::NotificationRepo;
use unajmi_db::repositories::profile_repo::ProfileRepo;
use unajmi_db::DbPool;

use crate::delivery::email::{EmailConfig, EmailDelivery};

/// Fans a domain event out to the recipient: always an in-app
/// notification row, plus an email copy when SMTP is configured and the
/// profile has an address. Infallible by design of the call sites, not
/// of the network: every failure is logged and swallowed so a dead SMTP
/// relay can never fail a booking.
#[derive(Clone)]
pub struct Notifier {
    pool: DbPool,
    email: Option<EmailDelivery>,
}

impl Notifier {
    pub fn new(pool: DbPool, email: Option<EmailDelivery>) -> Self {
        Notifier { pool, email }
    }

    /// Builds a notifier from `SMTP_*` environment variables. Missing
    /// `SMTP_HOST` disables email; a present-but-broken configuration
    /// is downgraded to disabled with a warning.
    pub fn from_env(pool: DbPool) -> Self {
        let email = match EmailConfig::from_env() {
            Ok(Some(config)) => match EmailDelivery::new(&config) {
                Ok(delivery) => {
                    tracing::info!(host = %config.smtp_host, "email delivery enabled");
                    Some(delivery)
                }
                Err(err) => {
                    tracing::warn!(error = %err, "email delivery disabled: transport setup failed");
                    None
                }
            },
            Ok(None) => {
                tracing::info!("SMTP_HOST not set, email delivery disabled");
                None
            }
            Err(err) => {
                tracing::warn!(error = %err, "email delivery disabled: incomplete configuration");
                None
            }
        };
        Notifier::new(pool, email)
    }

    pub async fn notify(
        &self,
        user_id: &str,
        kind: &'static str,
        message: String,
        link: Option<String>,
    ) {
        if let Err(err) =
            NotificationRepo::create(&self.pool, user_id, kind, &message, link.as_deref()).await
        {
            tracing::error!(error = %err, user_id, kind, "failed to record notification");
            return;
        }
        self.send_email_copy(user_id, kind, message, link).await;
    }

    async fn send_email_copy(
        &self,
        user_id: &str,
        kind: &str,
        message: String,
        link: Option<String>,
    ) {
        let Some(delivery) = &self.email else {
            return;
        };
        let address = match ProfileRepo::find(&self.pool, user_id).await {
            Ok(Some(profile)) => profile.email,
            Ok(None) => None,
            Err(err) => {
                tracing::error!(error = %err, user_id, "profile lookup for email copy failed");
                None
            }
        };
        let Some(address) = address else {
            return;
        };

        let subject = format!("Unajmi: {}", kind.replace('_', " "));
        let body = match link {
            Some(link) => format!("{message}\n\n{link}"),
            None => message,
        };

        // Sent off-request; SMTP latency must not hold the response.
        let delivery = delivery.clone();
        let user_id = user_id.to_string();
        tokio::spawn(async move {
            if let Err(err) = delivery.send(&address, &subject, &body).await {
                tracing::warn!(error = %err, user_id, "email delivery failed");
            }
        });
    }
}
