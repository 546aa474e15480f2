//! Adapters behind the domain ports: storage backends, the payment provider
//! client, webhook signature checks and notification delivery.

pub mod in_memory;
pub mod notifier;
#[cfg(feature = "storage-rocksdb")]
pub mod rocksdb;
pub mod signature;
pub mod stripe;

use crate::domain::ports::{
    BookingRequestStoreRef, ProfileStoreRef, SessionStoreRef, WaitlistStoreRef,
};
use std::sync::Arc;

/// One handle per store port, all backed by the same engine.
#[derive(Clone)]
pub struct Stores {
    pub profiles: ProfileStoreRef,
    pub booking_requests: BookingRequestStoreRef,
    pub sessions: SessionStoreRef,
    pub waitlist: WaitlistStoreRef,
}

impl Stores {
    pub fn in_memory() -> Self {
        Self {
            profiles: Arc::new(in_memory::InMemoryProfileStore::new()),
            booking_requests: Arc::new(in_memory::InMemoryBookingRequestStore::new()),
            sessions: Arc::new(in_memory::InMemorySessionStore::new()),
            waitlist: Arc::new(in_memory::InMemoryWaitlistStore::new()),
        }
    }

    #[cfg(feature = "storage-rocksdb")]
    pub fn rocksdb(store: self::rocksdb::RocksDBStore) -> Self {
        Self {
            profiles: Arc::new(store.clone()),
            booking_requests: Arc::new(store.clone()),
            sessions: Arc::new(store.clone()),
            waitlist: Arc::new(store),
        }
    }
}
