use crate::domain::booking::BookingRequest;
use crate::domain::ports::{
    BookingRequestStore, ProfileStore, SessionEdit, SessionInsert, SessionStore, WaitlistStore,
};
use crate::domain::profile::ProfessionalProfile;
use crate::domain::session::Session;
use crate::domain::waitlist::WaitlistSignup;
use crate::error::{MarketError, Result};
use async_trait::async_trait;
use rocksdb::{ColumnFamily, ColumnFamilyDescriptor, DB, IteratorMode, Options, WriteBatch};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Column Family for professional profiles.
pub const CF_PROFILES: &str = "profiles";
/// Column Family for booking requests.
pub const CF_BOOKING_REQUESTS: &str = "booking_requests";
/// Column Family for paid sessions.
pub const CF_SESSIONS: &str = "sessions";
/// Column Family mapping payment intent ids to session ids.
pub const CF_SESSION_PAYMENT_INTENTS: &str = "session_payment_intents";
/// Column Family for waitlist signups.
pub const CF_WAITLIST: &str = "waitlist";

const COLUMN_FAMILIES: [&str; 5] = [
    CF_PROFILES,
    CF_BOOKING_REQUESTS,
    CF_SESSIONS,
    CF_SESSION_PAYMENT_INTENTS,
    CF_WAITLIST,
];

/// A persistent store implementation using RocksDB.
///
/// Every entity lives in its own Column Family as JSON keyed by id. Sessions
/// additionally keep a payment-intent index; inserts into it are serialized
/// through `session_writes` so the uniqueness check and the batch write
/// cannot interleave.
///
/// This struct is thread-safe (`Clone` shares the underlying `Arc<DB>`).
#[derive(Clone)]
pub struct RocksDBStore {
    db: Arc<DB>,
    session_writes: Arc<Mutex<()>>,
}

impl RocksDBStore {
    /// Opens or creates a RocksDB instance at the specified path, creating any
    /// missing column families.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let descriptors = COLUMN_FAMILIES
            .iter()
            .map(|name| ColumnFamilyDescriptor::new(*name, Options::default()));

        let db = DB::open_cf_descriptors(&opts, path, descriptors)?;

        Ok(Self {
            db: Arc::new(db),
            session_writes: Arc::new(Mutex::new(())),
        })
    }

    fn cf(&self, name: &str) -> Result<&ColumnFamily> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| MarketError::Storage(format!("Column family {name} not found")))
    }

    fn put_json<T: Serialize>(&self, cf_name: &str, key: &str, value: &T) -> Result<()> {
        let cf = self.cf(cf_name)?;
        let bytes = serde_json::to_vec(value)?;
        self.db.put_cf(cf, key.as_bytes(), bytes)?;
        Ok(())
    }

    fn get_json<T: DeserializeOwned>(&self, cf_name: &str, key: &str) -> Result<Option<T>> {
        let cf = self.cf(cf_name)?;
        match self.db.get_pinned_cf(cf, key.as_bytes())? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    fn all_json<T: DeserializeOwned>(&self, cf_name: &str) -> Result<Vec<T>> {
        let cf = self.cf(cf_name)?;
        let mut items = Vec::new();
        for item in self.db.iterator_cf(cf, IteratorMode::Start) {
            let (_key, value) = item?;
            items.push(serde_json::from_slice(&value)?);
        }
        Ok(items)
    }

    fn session_id_for(&self, payment_intent_id: &str) -> Result<Option<String>> {
        let cf = self.cf(CF_SESSION_PAYMENT_INTENTS)?;
        Ok(self
            .db
            .get_cf(cf, payment_intent_id.as_bytes())?
            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned()))
    }
}

#[async_trait]
impl ProfileStore for RocksDBStore {
    async fn store(&self, profile: ProfessionalProfile) -> Result<()> {
        self.put_json(CF_PROFILES, &profile.id, &profile)
    }

    async fn get(&self, id: &str) -> Result<Option<ProfessionalProfile>> {
        self.get_json(CF_PROFILES, id)
    }

    async fn get_all(&self) -> Result<Vec<ProfessionalProfile>> {
        self.all_json(CF_PROFILES)
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let cf = self.cf(CF_PROFILES)?;
        let existed = self.db.get_pinned_cf(cf, id.as_bytes())?.is_some();
        if existed {
            self.db.delete_cf(cf, id.as_bytes())?;
        }
        Ok(existed)
    }
}

#[async_trait]
impl BookingRequestStore for RocksDBStore {
    async fn store(&self, request: BookingRequest) -> Result<()> {
        self.put_json(CF_BOOKING_REQUESTS, &request.id, &request)
    }

    async fn get(&self, id: &str) -> Result<Option<BookingRequest>> {
        self.get_json(CF_BOOKING_REQUESTS, id)
    }

    async fn get_all(&self) -> Result<Vec<BookingRequest>> {
        self.all_json(CF_BOOKING_REQUESTS)
    }
}

#[async_trait]
impl SessionStore for RocksDBStore {
    async fn insert_unique(&self, session: Session) -> Result<SessionInsert> {
        let _guard = self.session_writes.lock().await;

        if let Some(existing_id) = self.session_id_for(&session.stripe_payment_intent_id)?
            && let Some(existing) = self.get_json(CF_SESSIONS, &existing_id)?
        {
            return Ok(SessionInsert::Existing(existing));
        }

        let mut batch = WriteBatch::default();
        batch.put_cf(
            self.cf(CF_SESSIONS)?,
            session.id.as_bytes(),
            serde_json::to_vec(&session)?,
        );
        batch.put_cf(
            self.cf(CF_SESSION_PAYMENT_INTENTS)?,
            session.stripe_payment_intent_id.as_bytes(),
            session.id.as_bytes(),
        );
        self.db.write(batch)?;

        Ok(SessionInsert::Created(session))
    }

    async fn update(&self, id: &str, edit: SessionEdit) -> Result<Option<Session>> {
        let _guard = self.session_writes.lock().await;

        let Some(current) = self.get_json::<Session>(CF_SESSIONS, id)? else {
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
        self.put_json(CF_SESSIONS, id, &next)?;
        Ok(Some(next))
    }

    async fn get(&self, id: &str) -> Result<Option<Session>> {
        self.get_json(CF_SESSIONS, id)
    }

    async fn get_by_payment_intent(&self, payment_intent_id: &str) -> Result<Option<Session>> {
        match self.session_id_for(payment_intent_id)? {
            Some(id) => self.get_json(CF_SESSIONS, &id),
            None => Ok(None),
        }
    }

    async fn get_all(&self) -> Result<Vec<Session>> {
        self.all_json(CF_SESSIONS)
    }
}

#[async_trait]
impl WaitlistStore for RocksDBStore {
    async fn store(&self, signup: WaitlistSignup) -> Result<()> {
        self.put_json(CF_WAITLIST, &signup.id, &signup)
    }

    async fn get_all(&self) -> Result<Vec<WaitlistSignup>> {
        self.all_json(CF_WAITLIST)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::profile::NewProfile;
    use tempfile::tempdir;

    fn session(payment_intent: &str) -> Session {
        Session::paid(
            "p1".into(),
            "Jane".into(),
            "jane@brown.edu".into(),
            payment_intent.into(),
            20000,
        )
    }

    #[tokio::test]
    async fn test_rocksdb_open_cf() {
        let dir = tempdir().unwrap();
        let store = RocksDBStore::open(dir.path()).expect("Failed to open RocksDB");

        for name in COLUMN_FAMILIES {
            assert!(store.db.cf_handle(name).is_some());
        }
    }

    #[tokio::test]
    async fn test_rocksdb_profile_store() {
        let dir = tempdir().unwrap();
        let store = RocksDBStore::open(dir.path()).unwrap();

        let profile = ProfessionalProfile::create(NewProfile {
            name: Some("Ada".into()),
            company: Some("Acme".into()),
            role_title: Some("Engineer".into()),
            industry: Some("Tech".into()),
            price_cents: Some(100),
            ..Default::default()
        })
        .unwrap();

        ProfileStore::store(&store, profile.clone()).await.unwrap();
        let retrieved = ProfileStore::get(&store, &profile.id).await.unwrap();
        assert_eq!(retrieved, Some(profile.clone()));
        assert_eq!(ProfileStore::get_all(&store).await.unwrap().len(), 1);

        assert!(ProfileStore::delete(&store, &profile.id).await.unwrap());
        assert!(ProfileStore::get(&store, &profile.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_rocksdb_session_uniqueness() {
        let dir = tempdir().unwrap();
        let store = RocksDBStore::open(dir.path()).unwrap();

        let first = session("pi_1");
        let created = store.insert_unique(first.clone()).await.unwrap();
        assert_eq!(created, SessionInsert::Created(first.clone()));

        let again = store.insert_unique(session("pi_1")).await.unwrap();
        assert_eq!(again, SessionInsert::Existing(first.clone()));

        assert_eq!(SessionStore::get_all(&store).await.unwrap().len(), 1);
        assert_eq!(
            store.get_by_payment_intent("pi_1").await.unwrap(),
            Some(first)
        );
    }

    #[tokio::test]
    async fn test_rocksdb_survives_reopen() {
        let dir = tempdir().unwrap();
        let s = session("pi_9");
        {
            let store = RocksDBStore::open(dir.path()).unwrap();
            store.insert_unique(s.clone()).await.unwrap();
        }
        let reopened = RocksDBStore::open(dir.path()).unwrap();
        assert_eq!(reopened.get_by_payment_intent("pi_9").await.unwrap(), Some(s));
    }

    #[tokio::test]
    async fn test_rocksdb_session_update_persists() {
        let dir = tempdir().unwrap();
        let s = session("pi_3");
        {
            let store = RocksDBStore::open(dir.path()).unwrap();
            store.insert_unique(s.clone()).await.unwrap();
            let rejected = store
                .update(
                    &s.id,
                    Box::new(|_: &mut Session| Err(MarketError::Validation("no".into()))),
                )
                .await;
            assert!(rejected.is_err());
            store
                .update(
                    &s.id,
                    Box::new(|session: &mut Session| {
                        session.calendly_event_url = Some("https://calendly.com/e/3".into());
                        Ok(())
                    }),
                )
                .await
                .unwrap();
            assert!(store
                .update("missing", Box::new(|_: &mut Session| Ok(())))
                .await
                .unwrap()
                .is_none());
        }
        let reopened = RocksDBStore::open(dir.path()).unwrap();
        let stored = SessionStore::get(&reopened, &s.id).await.unwrap().unwrap();
        assert_eq!(
            stored.calendly_event_url.as_deref(),
            Some("https://calendly.com/e/3")
        );
    }
}
