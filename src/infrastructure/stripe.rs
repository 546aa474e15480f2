use crate::domain::checkout::{CheckoutRequest, CheckoutResource};
use crate::domain::ports::PaymentProvider;
use crate::error::{MarketError, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_API_BASE: &str = "https://api.stripe.com";

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiError,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default)]
    message: Option<String>,
    #[serde(default, rename = "type")]
    kind: Option<String>,
}

/// Stripe Checkout Sessions over the REST API.
#[derive(Clone)]
pub struct StripeClient {
    http: Client,
    api_base: String,
    secret_key: String,
}

impl StripeClient {
    pub fn new(secret_key: impl Into<String>, api_base: impl Into<String>) -> Result<Self> {
        let http = Client::builder().timeout(Duration::from_secs(30)).build()?;
        Ok(Self {
            http,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            secret_key: secret_key.into(),
        })
    }

    fn sessions_url(&self) -> String {
        format!("{}/v1/checkout/sessions", self.api_base)
    }

    async fn error_from(response: reqwest::Response) -> MarketError {
        let status = response.status();
        match response.json::<ApiErrorBody>().await {
            Ok(body) => MarketError::Provider(format!(
                "{status}: {} ({})",
                body.error.message.unwrap_or_default(),
                body.error.kind.unwrap_or_default()
            )),
            Err(_) => MarketError::Provider(format!("{status}: unreadable error body")),
        }
    }
}

/// Flattens a checkout request into Stripe's bracketed form encoding.
pub fn form_params(request: &CheckoutRequest) -> Vec<(String, String)> {
    let mut params: Vec<(String, String)> = vec![
        ("mode".into(), "payment".into()),
        ("payment_method_types[0]".into(), "card".into()),
        (
            "line_items[0][price_data][currency]".into(),
            request.currency.clone(),
        ),
        (
            "line_items[0][price_data][product_data][name]".into(),
            request.product_name.clone(),
        ),
        (
            "line_items[0][price_data][product_data][description]".into(),
            request.product_description.clone(),
        ),
        (
            "line_items[0][price_data][unit_amount]".into(),
            request.unit_amount_cents.to_string(),
        ),
        ("line_items[0][quantity]".into(), request.quantity.to_string()),
        ("customer_email".into(), request.customer_email.clone()),
        ("success_url".into(), request.success_url.clone()),
        ("cancel_url".into(), request.cancel_url.clone()),
    ];
    params.extend(
        request
            .metadata
            .entries()
            .into_iter()
            .map(|(key, value)| (format!("metadata[{key}]"), value.to_string())),
    );
    params
}

#[async_trait]
impl PaymentProvider for StripeClient {
    async fn create_checkout(&self, request: CheckoutRequest) -> Result<CheckoutResource> {
        let response = self
            .http
            .post(self.sessions_url())
            .bearer_auth(&self.secret_key)
            .form(&form_params(&request))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }

        let resource: CheckoutResource = response.json().await?;
        debug!(checkout_id = %resource.id, "Created checkout session");
        Ok(resource)
    }

    async fn retrieve_checkout(&self, checkout_id: &str) -> Result<Option<CheckoutResource>> {
        let response = self
            .http
            .get(format!("{}/{checkout_id}", self.sessions_url()))
            .bearer_auth(&self.secret_key)
            .send()
            .await?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => Ok(Some(response.json().await?)),
            _ => Err(Self::error_from(response).await),
        }
    }
}
