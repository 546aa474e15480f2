//! Types describing the hosted-checkout contract with the payment provider.
//!
//! The provider is opaque: we send a [`CheckoutRequest`], get back a
//! [`CheckoutResource`] holding a redirect URL, and later receive a signed
//! [`WebhookEvent`] whose payload is the same resource, now completed. The
//! [`CheckoutMetadata`] attached at creation is the only channel through which
//! the webhook recovers who paid for whom.

use super::validation::lenient_string;
use serde::{Deserialize, Serialize};

/// Placeholder the provider substitutes with its checkout id in redirects.
pub const CHECKOUT_SESSION_PLACEHOLDER: &str = "{CHECKOUT_SESSION_ID}";

/// The only event type the lifecycle acts on.
pub const CHECKOUT_COMPLETED: &str = "checkout.session.completed";

pub const DEFAULT_CURRENCY: &str = "usd";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CheckoutMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub professional_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub professional_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub professional_company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub student_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub student_email: Option<String>,
}

impl CheckoutMetadata {
    /// Pairs of `(key, value)` for the fields that are set.
    pub fn entries(&self) -> Vec<(&'static str, &str)> {
        [
            ("professional_id", &self.professional_id),
            ("professional_name", &self.professional_name),
            ("professional_company", &self.professional_company),
            ("student_name", &self.student_name),
            ("student_email", &self.student_email),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.as_deref().map(|v| (key, v)))
        .collect()
    }
}

/// Everything the provider needs to host a one-item checkout.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutRequest {
    pub product_name: String,
    pub product_description: String,
    pub unit_amount_cents: i64,
    pub currency: String,
    pub quantity: u32,
    pub customer_email: String,
    pub success_url: String,
    pub cancel_url: String,
    pub metadata: CheckoutMetadata,
}

/// The provider's view of a checkout, at creation or completion.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CheckoutResource {
    pub id: String,
    #[serde(default)]
    pub url: Option<String>,
    /// Only a plain id is understood; an expanded object reads as absent.
    #[serde(default, deserialize_with = "lenient_string")]
    pub payment_intent: Option<String>,
    #[serde(default)]
    pub amount_total: Option<i64>,
    #[serde(default)]
    pub metadata: Option<CheckoutMetadata>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventData {
    pub object: serde_json::Value,
}

/// A provider webhook envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookEvent {
    pub id: String,
    #[serde(rename = "type")]
    pub event_type: String,
    pub data: EventData,
}

/// Raw checkout form as posted by a student.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CheckoutSubmission {
    #[serde(default, deserialize_with = "lenient_string")]
    pub professional_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub student_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub student_email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckoutRedirect {
    pub url: String,
}
