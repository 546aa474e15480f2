use super::directory::ProfileDirectory;
use crate::domain::checkout::{
    CHECKOUT_SESSION_PLACEHOLDER, CheckoutMetadata, CheckoutRedirect, CheckoutRequest,
    CheckoutSubmission, DEFAULT_CURRENCY,
};
use crate::domain::ports::PaymentProviderRef;
use crate::domain::profile::ProfessionalProfile;
use crate::domain::validation::{required_trimmed, student_email};
use crate::error::{MarketError, Result};
use tracing::info;

/// Turns a student's intent to pay into a hosted checkout URL.
///
/// Nothing is written locally; the session only materializes once the
/// provider reports the payment through the webhook.
#[derive(Clone)]
pub struct CheckoutOrchestrator {
    directory: ProfileDirectory,
    provider: Option<PaymentProviderRef>,
    base_url: String,
}

impl CheckoutOrchestrator {
    /// `provider` is `None` when no API key is configured; checkouts then
    /// fail with a configuration error.
    pub fn new(
        directory: ProfileDirectory,
        provider: Option<PaymentProviderRef>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            directory,
            provider,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub async fn initiate(&self, submission: CheckoutSubmission) -> Result<CheckoutRedirect> {
        let professional_id = submission
            .professional_id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| MarketError::Validation("Professional ID is required".to_string()))?;
        let student_name =
            required_trimmed(submission.student_name.as_deref(), "Student name is required")?;
        let student_email = student_email(submission.student_email.as_deref())?;

        let professional = self.directory.get_bookable(&professional_id).await?;

        let provider = self.provider.as_ref().ok_or_else(|| {
            MarketError::Configuration("payment provider API key is not set".to_string())
        })?;

        let request = self.checkout_request(&professional, student_name, student_email);
        let checkout = provider.create_checkout(request).await?;
        let url = checkout.url.ok_or_else(|| {
            MarketError::Provider(format!("checkout {} has no redirect URL", checkout.id))
        })?;

        info!(checkout_id = %checkout.id, professional_id = %professional.id, "Checkout created");
        Ok(CheckoutRedirect { url })
    }

    /// The one-item order for a 30-minute session, priced as of now.
    fn checkout_request(
        &self,
        professional: &ProfessionalProfile,
        student_name: String,
        student_email: String,
    ) -> CheckoutRequest {
        CheckoutRequest {
            product_name: format!("30-Minute Session with {}", professional.name),
            product_description: format!("{} at {}", professional.role_title, professional.company),
            unit_amount_cents: professional.price_cents,
            currency: DEFAULT_CURRENCY.to_string(),
            quantity: 1,
            customer_email: student_email.clone(),
            success_url: format!(
                "{}/booking/success?session_id={CHECKOUT_SESSION_PLACEHOLDER}",
                self.base_url
            ),
            cancel_url: format!("{}/professionals/{}", self.base_url, professional.id),
            metadata: CheckoutMetadata {
                professional_id: Some(professional.id.clone()),
                professional_name: Some(professional.name.clone()),
                professional_company: Some(professional.company.clone()),
                student_name: Some(student_name),
                student_email: Some(student_email),
            },
        }
    }
}
