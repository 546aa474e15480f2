use crate::domain::ports::WaitlistStoreRef;
use crate::domain::waitlist::{WaitlistForm, WaitlistSignup};
use crate::error::Result;
use tracing::{error, info};

pub const DEFAULT_ELIGIBLE_UNIVERSITY: &str = "Brown University";

/// Pre-launch signups.
#[derive(Clone)]
pub struct WaitlistService {
    store: WaitlistStoreRef,
    eligible_university: String,
}

impl WaitlistService {
    pub fn new(store: WaitlistStoreRef, eligible_university: impl Into<String>) -> Self {
        Self {
            store,
            eligible_university: eligible_university.into(),
        }
    }

    /// Validates a signup and records it.
    ///
    /// Only validation fails the call. A storage failure is logged and the
    /// signup is still reported as accepted.
    pub async fn join(&self, form: WaitlistForm) -> Result<WaitlistSignup> {
        let signup = form.validate(&self.eligible_university)?;
        match self.store.store(signup.clone()).await {
            Ok(()) => info!(signup_id = %signup.id, "Waitlist signup recorded"),
            Err(e) => error!(error = %e, email = %signup.email, "Failed to store waitlist signup"),
        }
        Ok(signup)
    }

    /// Every signup, newest first.
    pub async fn list_all(&self) -> Result<Vec<WaitlistSignup>> {
        let mut signups = self.store.get_all().await?;
        signups.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(signups)
    }
}
