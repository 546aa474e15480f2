use super::booking::BookingRequest;
use super::checkout::{CheckoutRequest, CheckoutResource};
use super::notification::Notification;
use super::profile::ProfessionalProfile;
use super::session::Session;
use super::waitlist::WaitlistSignup;
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Inserts or replaces a profile by id.
    async fn store(&self, profile: ProfessionalProfile) -> Result<()>;
    async fn get(&self, id: &str) -> Result<Option<ProfessionalProfile>>;
    async fn get_all(&self) -> Result<Vec<ProfessionalProfile>>;
    /// Returns whether a profile was removed.
    async fn delete(&self, id: &str) -> Result<bool>;
}

#[async_trait]
pub trait BookingRequestStore: Send + Sync {
    async fn store(&self, request: BookingRequest) -> Result<()>;
    async fn get(&self, id: &str) -> Result<Option<BookingRequest>>;
    async fn get_all(&self) -> Result<Vec<BookingRequest>>;
}

/// An in-place change to a stored session, run under the store's write lock.
pub type SessionEdit = Box<dyn FnOnce(&mut Session) -> Result<()> + Send>;

/// Outcome of inserting a session keyed by its payment intent.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionInsert {
    Created(Session),
    /// A session for this payment intent already existed; nothing was written.
    Existing(Session),
}

#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Inserts a session unless one already exists for the same
    /// `stripe_payment_intent_id`. The check and the write are atomic.
    async fn insert_unique(&self, session: Session) -> Result<SessionInsert>;
    /// Applies `edit` to the session with `id` and persists the result as a
    /// single step, so concurrent edits each see the previous one's outcome.
    /// Returns `None` when no such session exists; an error from `edit`
    /// leaves the stored session untouched.
    async fn update(&self, id: &str, edit: SessionEdit) -> Result<Option<Session>>;
    async fn get(&self, id: &str) -> Result<Option<Session>>;
    async fn get_by_payment_intent(&self, payment_intent_id: &str) -> Result<Option<Session>>;
    async fn get_all(&self) -> Result<Vec<Session>>;
}

#[async_trait]
pub trait WaitlistStore: Send + Sync {
    async fn store(&self, signup: WaitlistSignup) -> Result<()>;
    async fn get_all(&self) -> Result<Vec<WaitlistSignup>>;
}

/// The hosted checkout provider.
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    async fn create_checkout(&self, request: CheckoutRequest) -> Result<CheckoutResource>;
    /// Looks up a checkout by the provider's id; `None` when it is unknown.
    async fn retrieve_checkout(&self, checkout_id: &str) -> Result<Option<CheckoutResource>>;
}

/// Checks that a webhook payload was produced by the payment provider.
pub trait EventVerifier: Send + Sync {
    fn verify(&self, payload: &[u8], signature_header: &str) -> Result<()>;
}

/// Fire-and-forget delivery of lifecycle notifications.
///
/// Implementations swallow their own failures; a notification never fails
/// the request that produced it.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn notify(&self, notification: Notification);
}

pub type ProfileStoreRef = Arc<dyn ProfileStore>;
pub type BookingRequestStoreRef = Arc<dyn BookingRequestStore>;
pub type SessionStoreRef = Arc<dyn SessionStore>;
pub type WaitlistStoreRef = Arc<dyn WaitlistStore>;
pub type PaymentProviderRef = Arc<dyn PaymentProvider>;
pub type EventVerifierRef = Arc<dyn EventVerifier>;
pub type NotificationSinkRef = Arc<dyn NotificationSink>;
