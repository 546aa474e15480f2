use super::directory::ProfileDirectory;
use crate::domain::ports::{PaymentProviderRef, SessionStoreRef};
use crate::domain::session::{
    Session, SessionChange, SessionConfirmation, SessionWithProfessional,
};
use crate::error::{MarketError, Result};
use std::collections::HashMap;
use tracing::info;

const SESSION_NOT_FOUND: &str = "Session not found";

/// Read and administrative access to paid sessions.
#[derive(Clone)]
pub struct SessionTracker {
    sessions: SessionStoreRef,
    directory: ProfileDirectory,
    provider: Option<PaymentProviderRef>,
}

impl SessionTracker {
    pub fn new(
        sessions: SessionStoreRef,
        directory: ProfileDirectory,
        provider: Option<PaymentProviderRef>,
    ) -> Self {
        Self {
            sessions,
            directory,
            provider,
        }
    }

    pub async fn get(&self, id: &str) -> Result<Session> {
        self.sessions
            .get(id)
            .await?
            .ok_or_else(|| MarketError::NotFound(SESSION_NOT_FOUND.to_string()))
    }

    pub async fn get_by_payment_intent(&self, payment_intent_id: &str) -> Result<Session> {
        self.sessions
            .get_by_payment_intent(payment_intent_id)
            .await?
            .ok_or_else(|| MarketError::NotFound(SESSION_NOT_FOUND.to_string()))
    }

    /// Every session, newest first, with the professional's display fields.
    pub async fn list_all(&self) -> Result<Vec<SessionWithProfessional>> {
        let mut sessions = self.sessions.get_all().await?;
        sessions.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let professionals: HashMap<_, _> = self
            .directory
            .list_all()
            .await?
            .into_iter()
            .map(|p| (p.id.clone(), p))
            .collect();

        Ok(sessions
            .into_iter()
            .map(|session| {
                let professional = professionals.get(&session.professional_id);
                SessionWithProfessional::project(session, professional)
            })
            .collect())
    }

    /// Looks up what a returning student paid for, by the provider's
    /// checkout id from the success redirect.
    pub async fn resolve_checkout(&self, checkout_id: &str) -> Result<SessionConfirmation> {
        let provider = self.provider.as_ref().ok_or_else(|| {
            MarketError::Configuration("payment provider API key is not set".to_string())
        })?;

        let checkout = provider
            .retrieve_checkout(checkout_id)
            .await?
            .ok_or_else(|| MarketError::NotFound("Invalid session ID".to_string()))?;
        let payment_intent = checkout
            .payment_intent
            .ok_or_else(|| MarketError::Validation("Payment not completed".to_string()))?;

        let session = self.get_by_payment_intent(&payment_intent).await?;
        let professional = self.directory.get(&session.professional_id).await?;
        Ok(SessionConfirmation {
            session,
            professional,
        })
    }

    /// Advances a session along its lifecycle on an admin's behalf.
    ///
    /// The transition check runs inside the store's update, so two racing
    /// admins cannot both leave a terminal state.
    pub async fn update_status(&self, id: &str, change: SessionChange) -> Result<Session> {
        let session = self
            .sessions
            .update(id, Box::new(move |session: &mut Session| session.transition(change)))
            .await?
            .ok_or_else(|| MarketError::NotFound(SESSION_NOT_FOUND.to_string()))?;
        info!(session_id = %id, to = %session.status, "Session status updated");
        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::checkout::{CheckoutRequest, CheckoutResource};
    use crate::domain::ports::{PaymentProvider, ProfileStore, SessionStore};
    use crate::domain::profile::tests::profile;
    use crate::domain::session::SessionStatus;
    use crate::infrastructure::in_memory::{InMemoryProfileStore, InMemorySessionStore};
    use async_trait::async_trait;
    use chrono::Utc;
    use std::sync::Arc;

    struct FixedCheckouts(Vec<CheckoutResource>);

    #[async_trait]
    impl PaymentProvider for FixedCheckouts {
        async fn create_checkout(&self, _request: CheckoutRequest) -> Result<CheckoutResource> {
            Err(MarketError::Provider("not supported".into()))
        }

        async fn retrieve_checkout(&self, id: &str) -> Result<Option<CheckoutResource>> {
            Ok(self.0.iter().find(|c| c.id == id).cloned())
        }
    }

    struct Fixture {
        tracker: SessionTracker,
        session: Session,
        professional_id: String,
    }

    async fn fixture() -> Fixture {
        let profiles = InMemoryProfileStore::new();
        let ada = profile("Ada", "Acme", "Tech", 20000);
        profiles.store(ada.clone()).await.unwrap();

        let sessions = InMemorySessionStore::new();
        let session = Session::paid(
            ada.id.clone(),
            "Jane Doe".into(),
            "jane@brown.edu".into(),
            "pi_paid".into(),
            20000,
        );
        sessions.insert_unique(session.clone()).await.unwrap();
        let orphan = Session::paid(
            "gone".into(),
            "Sam".into(),
            "sam@brown.edu".into(),
            "pi_orphan".into(),
            5000,
        );
        sessions.insert_unique(orphan).await.unwrap();

        let provider = FixedCheckouts(vec![
            CheckoutResource {
                id: "cs_paid".into(),
                payment_intent: Some("pi_paid".into()),
                ..Default::default()
            },
            CheckoutResource {
                id: "cs_open".into(),
                ..Default::default()
            },
        ]);

        let tracker = SessionTracker::new(
            Arc::new(sessions),
            ProfileDirectory::new(Arc::new(profiles)),
            Some(Arc::new(provider)),
        );
        Fixture {
            tracker,
            session,
            professional_id: ada.id,
        }
    }

    #[tokio::test]
    async fn test_list_all_projects_professional() {
        let f = fixture().await;
        let listed = f.tracker.list_all().await.unwrap();
        assert_eq!(listed.len(), 2);

        let paid = listed
            .iter()
            .find(|s| s.session.id == f.session.id)
            .unwrap();
        assert_eq!(paid.professional_name, "Ada");
        assert_eq!(paid.session.amount_cents, 20000);

        let orphan = listed.iter().find(|s| s.session.id != f.session.id).unwrap();
        assert_eq!(orphan.professional_name, "Unknown");
        assert_eq!(orphan.professional_company, "Unknown");
    }

    #[tokio::test]
    async fn test_resolve_checkout() {
        let f = fixture().await;
        let confirmation = f.tracker.resolve_checkout("cs_paid").await.unwrap();
        assert_eq!(confirmation.session, f.session);
        assert_eq!(confirmation.professional.id, f.professional_id);

        assert!(matches!(
            f.tracker.resolve_checkout("cs_unknown").await,
            Err(MarketError::NotFound(m)) if m == "Invalid session ID"
        ));
        assert!(matches!(
            f.tracker.resolve_checkout("cs_open").await,
            Err(MarketError::Validation(m)) if m == "Payment not completed"
        ));
    }

    #[tokio::test]
    async fn test_update_status_follows_lifecycle() {
        let f = fixture().await;
        let at = Utc::now();

        let err = f
            .tracker
            .update_status(
                &f.session.id,
                SessionChange {
                    status: SessionStatus::Completed,
                    scheduled_at: None,
                    calendly_event_url: None,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, MarketError::Validation(_)));

        let scheduled = f
            .tracker
            .update_status(
                &f.session.id,
                SessionChange {
                    status: SessionStatus::Scheduled,
                    scheduled_at: Some(at),
                    calendly_event_url: Some("https://calendly.com/e/1".into()),
                },
            )
            .await
            .unwrap();
        assert_eq!(scheduled.status, SessionStatus::Scheduled);
        assert_eq!(scheduled.scheduled_at, Some(at));

        let stored = f.tracker.get_by_payment_intent("pi_paid").await.unwrap();
        assert_eq!(stored, scheduled);
    }

    #[tokio::test]
    async fn test_missing_session_is_not_found() {
        let f = fixture().await;
        assert!(matches!(
            f.tracker.get("nope").await,
            Err(MarketError::NotFound(_))
        ));
    }
}
