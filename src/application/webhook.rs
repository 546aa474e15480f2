use super::directory::ProfileDirectory;
use crate::domain::UNKNOWN_PROFESSIONAL;
use crate::domain::checkout::{CHECKOUT_COMPLETED, CheckoutResource, WebhookEvent};
use crate::domain::notification::Notification;
use crate::domain::ports::{EventVerifierRef, NotificationSinkRef, SessionInsert, SessionStoreRef};
use crate::domain::session::Session;
use crate::error::{MarketError, Result};
use tracing::{debug, info};

/// What a delivery did to local state. Every variant is acknowledged.
#[derive(Debug, Clone, PartialEq)]
pub enum WebhookOutcome {
    SessionCreated(Session),
    /// The payment intent already had a session; nothing changed.
    Duplicate(Session),
    /// An event type the lifecycle does not act on.
    Ignored(String),
}

/// Materializes paid sessions from signed provider events.
#[derive(Clone)]
pub struct PaymentWebhookHandler {
    verifier: Option<EventVerifierRef>,
    sessions: SessionStoreRef,
    directory: ProfileDirectory,
    notifier: NotificationSinkRef,
    base_url: String,
}

impl PaymentWebhookHandler {
    pub fn new(
        verifier: Option<EventVerifierRef>,
        sessions: SessionStoreRef,
        directory: ProfileDirectory,
        notifier: NotificationSinkRef,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            verifier,
            sessions,
            directory,
            notifier,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Verifies, parses and applies one delivery.
    ///
    /// An error means the delivery was not acknowledged; the provider will
    /// retry it, which the payment-intent uniqueness makes safe.
    pub async fn handle(&self, payload: &[u8], signature: Option<&str>) -> Result<WebhookOutcome> {
        let signature = signature.ok_or_else(|| {
            MarketError::Signature("Missing stripe-signature header".to_string())
        })?;
        let verifier = self.verifier.as_ref().ok_or_else(|| {
            MarketError::Configuration("webhook signing secret is not set".to_string())
        })?;
        verifier.verify(payload, signature)?;

        let event: WebhookEvent = serde_json::from_slice(payload)
            .map_err(|e| MarketError::MalformedEvent(format!("Invalid event payload: {e}")))?;
        if event.event_type != CHECKOUT_COMPLETED {
            debug!(event_id = %event.id, event_type = %event.event_type, "Ignoring webhook event");
            return Ok(WebhookOutcome::Ignored(event.event_type));
        }

        let checkout: CheckoutResource = serde_json::from_value(event.data.object)
            .map_err(|e| MarketError::MalformedEvent(format!("Invalid checkout object: {e}")))?;
        self.complete_checkout(checkout).await
    }

    async fn complete_checkout(&self, checkout: CheckoutResource) -> Result<WebhookOutcome> {
        let metadata = checkout
            .metadata
            .ok_or_else(|| MarketError::MalformedEvent("Missing metadata".to_string()))?;
        let (Some(professional_id), Some(student_name), Some(student_email)) = (
            metadata.professional_id,
            metadata.student_name,
            metadata.student_email,
        ) else {
            return Err(MarketError::MalformedEvent("Incomplete metadata".to_string()));
        };
        let payment_intent = checkout
            .payment_intent
            .ok_or_else(|| MarketError::MalformedEvent("Missing payment intent".to_string()))?;

        let professional = self.directory.find(&professional_id).await;

        let session = Session::paid(
            professional_id,
            student_name,
            student_email,
            payment_intent,
            checkout.amount_total.unwrap_or(0),
        );
        let session = match self.sessions.insert_unique(session).await? {
            SessionInsert::Created(session) => session,
            SessionInsert::Existing(existing) => {
                info!(
                    session_id = %existing.id,
                    payment_intent = %existing.stripe_payment_intent_id,
                    "Duplicate checkout completion, session already exists"
                );
                return Ok(WebhookOutcome::Duplicate(existing));
            }
        };
        info!(
            session_id = %session.id,
            payment_intent = %session.stripe_payment_intent_id,
            amount_cents = session.amount_cents,
            "Session created from completed checkout"
        );

        let professional_name = professional
            .as_ref()
            .map(|p| p.name.clone())
            .or(metadata.professional_name)
            .unwrap_or_else(|| UNKNOWN_PROFESSIONAL.to_string());
        let professional_company = professional
            .as_ref()
            .map(|p| p.company.clone())
            .or(metadata.professional_company)
            .unwrap_or_else(|| UNKNOWN_PROFESSIONAL.to_string());
        let scheduling_link = professional.and_then(|p| p.calendly_link);

        self.notifier
            .notify(Notification::PaymentConfirmed {
                session: session.clone(),
                professional_name: professional_name.clone(),
                professional_company,
                scheduling_link: scheduling_link.clone(),
                landing_url: format!(
                    "{}/booking/success?session_id={}",
                    self.base_url, checkout.id
                ),
            })
            .await;
        self.notifier
            .notify(Notification::SessionBooked {
                session: session.clone(),
                professional_name,
                scheduling_link,
            })
            .await;

        Ok(WebhookOutcome::SessionCreated(session))
    }
}
