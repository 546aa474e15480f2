use crate::domain::booking::BookingRequest;
use crate::domain::ports::{
    BookingRequestStore, ProfileStore, SessionEdit, SessionInsert, SessionStore, WaitlistStore,
};
use crate::domain::profile::ProfessionalProfile;
use crate::domain::session::Session;
use crate::domain::waitlist::WaitlistSignup;
use crate::error::{MarketError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A thread-safe in-memory store for professional profiles.
///
/// Uses `Arc<RwLock<HashMap<String, ProfessionalProfile>>>` so clones share
/// the same map. Suited to tests and local development.
#[derive(Default, Clone)]
pub struct InMemoryProfileStore {
    profiles: Arc<RwLock<HashMap<String, ProfessionalProfile>>>,
}

impl InMemoryProfileStore {
    /// Creates a new, empty in-memory profile store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProfileStore for InMemoryProfileStore {
    async fn store(&self, profile: ProfessionalProfile) -> Result<()> {
        let mut profiles = self.profiles.write().await;
        profiles.insert(profile.id.clone(), profile);
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<ProfessionalProfile>> {
        let profiles = self.profiles.read().await;
        Ok(profiles.get(id).cloned())
    }

    async fn get_all(&self) -> Result<Vec<ProfessionalProfile>> {
        let profiles = self.profiles.read().await;
        Ok(profiles.values().cloned().collect())
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let mut profiles = self.profiles.write().await;
        Ok(profiles.remove(id).is_some())
    }
}

/// A thread-safe in-memory store for booking requests.
#[derive(Default, Clone)]
pub struct InMemoryBookingRequestStore {
    requests: Arc<RwLock<HashMap<String, BookingRequest>>>,
}

impl InMemoryBookingRequestStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BookingRequestStore for InMemoryBookingRequestStore {
    async fn store(&self, request: BookingRequest) -> Result<()> {
        let mut requests = self.requests.write().await;
        requests.insert(request.id.clone(), request);
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<BookingRequest>> {
        let requests = self.requests.read().await;
        Ok(requests.get(id).cloned())
    }

    async fn get_all(&self) -> Result<Vec<BookingRequest>> {
        let requests = self.requests.read().await;
        Ok(requests.values().cloned().collect())
    }
}

#[derive(Default)]
struct SessionTables {
    by_id: HashMap<String, Session>,
    /// payment intent id -> session id
    by_payment_intent: HashMap<String, String>,
}

/// A thread-safe in-memory store for paid sessions.
///
/// Both tables sit behind one lock so the payment-intent uniqueness check and
/// the insert happen atomically.
#[derive(Default, Clone)]
pub struct InMemorySessionStore {
    tables: Arc<RwLock<SessionTables>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn insert_unique(&self, session: Session) -> Result<SessionInsert> {
        let mut tables = self.tables.write().await;
        if let Some(existing) = tables
            .by_payment_intent
            .get(&session.stripe_payment_intent_id)
            .and_then(|id| tables.by_id.get(id))
        {
            return Ok(SessionInsert::Existing(existing.clone()));
        }
        tables
            .by_payment_intent
            .insert(session.stripe_payment_intent_id.clone(), session.id.clone());
        tables.by_id.insert(session.id.clone(), session.clone());
        Ok(SessionInsert::Created(session))
    }

    async fn update(&self, id: &str, edit: SessionEdit) -> Result<Option<Session>> {
        let mut tables = self.tables.write().await;
        let Some(current) = tables.by_id.get(id) else {
            return Ok(None);
        };
        let mut next = current.clone();
        edit(&mut next)?;
        if next.id != current.id
            || next.stripe_payment_intent_id != current.stripe_payment_intent_id
        {
            return Err(MarketError::Storage(
                "Identity of a session cannot change".to_string(),
            ));
        }
        tables.by_id.insert(next.id.clone(), next.clone());
        Ok(Some(next))
    }

    async fn get(&self, id: &str) -> Result<Option<Session>> {
        let tables = self.tables.read().await;
        Ok(tables.by_id.get(id).cloned())
    }

    async fn get_by_payment_intent(&self, payment_intent_id: &str) -> Result<Option<Session>> {
        let tables = self.tables.read().await;
        Ok(tables
            .by_payment_intent
            .get(payment_intent_id)
            .and_then(|id| tables.by_id.get(id))
            .cloned())
    }

    async fn get_all(&self) -> Result<Vec<Session>> {
        let tables = self.tables.read().await;
        Ok(tables.by_id.values().cloned().collect())
    }
}

/// A thread-safe in-memory store for waitlist signups.
#[derive(Default, Clone)]
pub struct InMemoryWaitlistStore {
    signups: Arc<RwLock<Vec<WaitlistSignup>>>,
}

impl InMemoryWaitlistStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl WaitlistStore for InMemoryWaitlistStore {
    async fn store(&self, signup: WaitlistSignup) -> Result<()> {
        let mut signups = self.signups.write().await;
        signups.push(signup);
        Ok(())
    }

    async fn get_all(&self) -> Result<Vec<WaitlistSignup>> {
        let signups = self.signups.read().await;
        Ok(signups.clone())
    }
}
