#![allow(dead_code)]

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{HeaderName, Request, Response};
use booking_lifecycle::application::AdminPolicy;
use booking_lifecycle::domain::checkout::{CheckoutRequest, CheckoutResource};
use booking_lifecycle::domain::notification::Notification;
use booking_lifecycle::domain::ports::{NotificationSink, PaymentProvider};
use booking_lifecycle::domain::profile::{NewProfile, ProfessionalProfile};
use booking_lifecycle::error::Result;
use booking_lifecycle::infrastructure::Stores;
use booking_lifecycle::infrastructure::signature::StripeSignatureVerifier;
use booking_lifecycle::interfaces::http::{self, AppState, Settings};
use chrono::Utc;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

pub const ADMIN_EMAIL: &str = "admin@example.com";
pub const IDENTITY_HEADER: &str = "x-authenticated-email";
pub const WEBHOOK_SECRET: &str = "whsec_test_secret";
pub const BASE_URL: &str = "https://advice.example";

/// Payment provider double: records checkout requests and serves
/// registered checkouts back on lookup.
#[derive(Default)]
pub struct FakePaymentProvider {
    pub created: Mutex<Vec<CheckoutRequest>>,
    checkouts: Mutex<HashMap<String, CheckoutResource>>,
}

impl FakePaymentProvider {
    pub fn register(&self, checkout: CheckoutResource) {
        self.checkouts
            .lock()
            .unwrap()
            .insert(checkout.id.clone(), checkout);
    }

    pub fn created_count(&self) -> usize {
        self.created.lock().unwrap().len()
    }
}

#[async_trait]
impl PaymentProvider for FakePaymentProvider {
    async fn create_checkout(&self, request: CheckoutRequest) -> Result<CheckoutResource> {
        let mut created = self.created.lock().unwrap();
        created.push(request);
        let id = format!("cs_test_{}", created.len());
        Ok(CheckoutResource {
            url: Some(format!("https://checkout.example/{id}")),
            id,
            ..Default::default()
        })
    }

    async fn retrieve_checkout(&self, checkout_id: &str) -> Result<Option<CheckoutResource>> {
        Ok(self.checkouts.lock().unwrap().get(checkout_id).cloned())
    }
}

#[derive(Default)]
pub struct RecordingSink {
    pub sent: Mutex<Vec<Notification>>,
}

impl RecordingSink {
    pub fn count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl NotificationSink for RecordingSink {
    async fn notify(&self, notification: Notification) {
        self.sent.lock().unwrap().push(notification);
    }
}

pub struct TestApp {
    pub state: Arc<AppState>,
    pub provider: Arc<FakePaymentProvider>,
    pub sink: Arc<RecordingSink>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_beta(true)
    }

    pub fn with_beta(public_beta: bool) -> Self {
        let provider = Arc::new(FakePaymentProvider::default());
        let sink = Arc::new(RecordingSink::default());
        let state = AppState::new(
            Stores::in_memory(),
            Some(provider.clone()),
            Some(Arc::new(StripeSignatureVerifier::new(WEBHOOK_SECRET))),
            sink.clone(),
            AdminPolicy::new([ADMIN_EMAIL]),
            Settings {
                base_url: BASE_URL.to_string(),
                public_beta,
                identity_header: HeaderName::from_static(IDENTITY_HEADER),
                eligible_university: "Brown University".to_string(),
            },
        );
        Self {
            state,
            provider,
            sink,
        }
    }

    pub fn router(&self) -> Router {
        http::router(self.state.clone())
    }

    pub async fn add_profile(&self, name: &str, approved: bool) -> ProfessionalProfile {
        self.state
            .directory
            .create(NewProfile {
                name: Some(name.to_string()),
                company: Some("Acme".to_string()),
                role_title: Some("Product Manager".to_string()),
                industry: Some("Tech".to_string()),
                bio: Some("Ten years shipping products".to_string()),
                price_cents: Some(20000),
                calendly_link: Some(format!("https://calendly.com/{}", name.to_lowercase())),
                is_approved: approved,
            })
            .await
            .unwrap()
    }

    /// Sends one request through the router and decodes the JSON body
    /// (`Value::Null` when the body is empty or not JSON).
    pub async fn send(&self, request: Request<Body>) -> (u16, Value) {
        let response: Response<Body> = self.router().oneshot(request).await.unwrap();
        let status = response.status().as_u16();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }
}

pub fn json_request(method: &str, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn admin_request(method: &str, uri: &str, body: Option<&Value>) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(IDENTITY_HEADER, ADMIN_EMAIL)
        .header("content-type", "application/json")
        .body(body.map_or_else(Body::empty, |b| Body::from(b.to_string())))
        .unwrap()
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

/// A `checkout.session.completed` event as the provider would send it.
pub fn completed_checkout_event(
    checkout_id: &str,
    payment_intent: &str,
    professional: &ProfessionalProfile,
    amount_total: i64,
) -> Vec<u8> {
    serde_json::to_vec(&json!({
        "id": format!("evt_{checkout_id}"),
        "type": "checkout.session.completed",
        "data": {"object": {
            "id": checkout_id,
            "object": "checkout.session",
            "payment_intent": payment_intent,
            "amount_total": amount_total,
            "metadata": {
                "professional_id": professional.id,
                "professional_name": professional.name,
                "professional_company": professional.company,
                "student_name": "Jane Doe",
                "student_email": "jane@brown.edu"
            }
        }}
    }))
    .unwrap()
}

pub fn sign(payload: &[u8]) -> String {
    StripeSignatureVerifier::new(WEBHOOK_SECRET)
        .sign(Utc::now().timestamp(), payload)
        .unwrap()
}

pub fn webhook_request(payload: Vec<u8>, signature: Option<String>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/api/webhooks/stripe")
        .header("content-type", "application/json");
    if let Some(signature) = signature {
        builder = builder.header("stripe-signature", signature);
    }
    builder.body(Body::from(payload)).unwrap()
}
