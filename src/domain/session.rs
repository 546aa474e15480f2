use super::profile::ProfessionalProfile;
use super::validation::lenient_string;
use crate::error::{MarketError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Lifecycle of a paid session.
///
/// ```text
/// PENDING -> PAID -> SCHEDULED -> COMPLETED
///    \         \         \
///     +---------+---------+-> CANCELLED
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SessionStatus {
    Pending,
    Paid,
    Scheduled,
    Completed,
    Cancelled,
}

impl SessionStatus {
    pub const ALL: [Self; 5] = [
        Self::Pending,
        Self::Paid,
        Self::Scheduled,
        Self::Completed,
        Self::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Paid => "PAID",
            Self::Scheduled => "SCHEDULED",
            Self::Completed => "COMPLETED",
            Self::Cancelled => "CANCELLED",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// The single gatekeeper for session status writes.
    ///
    /// Rescheduling (`SCHEDULED -> SCHEDULED`) is allowed so a new time can be
    /// recorded.
    pub fn can_transition_to(&self, next: Self) -> bool {
        use SessionStatus::*;
        if self.is_terminal() {
            return false;
        }
        matches!(
            (self, next),
            (Pending, Paid)
                | (Pending, Cancelled)
                | (Paid, Scheduled)
                | (Paid, Cancelled)
                | (Scheduled, Scheduled)
                | (Scheduled, Completed)
                | (Scheduled, Cancelled)
        )
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SessionStatus {
    type Err = MarketError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| {
                MarketError::Validation(
                    "Invalid status. Must be one of: PENDING, PAID, SCHEDULED, COMPLETED, CANCELLED"
                        .to_string(),
                )
            })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub professional_id: String,
    pub student_name: String,
    pub student_email: String,
    /// External payment reference; unique across sessions.
    pub stripe_payment_intent_id: String,
    pub amount_cents: i64,
    pub status: SessionStatus,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub calendly_event_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Session {
    /// A session materialized from a completed payment.
    pub fn paid(
        professional_id: String,
        student_name: String,
        student_email: String,
        stripe_payment_intent_id: String,
        amount_cents: i64,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            professional_id,
            student_name,
            student_email,
            stripe_payment_intent_id,
            amount_cents,
            status: SessionStatus::Paid,
            scheduled_at: None,
            calendly_event_url: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Moves the session to `next`, recording scheduling details when given.
    pub fn transition(&mut self, change: SessionChange) -> Result<()> {
        if !self.status.can_transition_to(change.status) {
            return Err(MarketError::Validation(format!(
                "Cannot move session from {} to {}",
                self.status, change.status
            )));
        }
        if change.status == SessionStatus::Scheduled
            && change.scheduled_at.is_none()
            && self.scheduled_at.is_none()
        {
            return Err(MarketError::Validation(
                "A scheduled session needs a scheduled time".to_string(),
            ));
        }

        self.status = change.status;
        if let Some(at) = change.scheduled_at {
            self.scheduled_at = Some(at);
        }
        if let Some(url) = change.calendly_event_url {
            self.calendly_event_url = Some(url);
        }
        self.updated_at = Utc::now();
        Ok(())
    }
}

/// A validated admin request to advance a session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionChange {
    pub status: SessionStatus,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub calendly_event_url: Option<String>,
}

/// Raw admin form for a session status change.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SessionStatusForm {
    #[serde(default, deserialize_with = "lenient_string")]
    pub status: Option<String>,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub calendly_event_url: Option<String>,
}

impl TryFrom<SessionStatusForm> for SessionChange {
    type Error = MarketError;

    fn try_from(form: SessionStatusForm) -> Result<Self> {
        let status = form
            .status
            .as_deref()
            .ok_or_else(|| MarketError::Validation("Status is required".to_string()))?
            .parse()?;
        Ok(Self {
            status,
            scheduled_at: form.scheduled_at,
            calendly_event_url: form
                .calendly_event_url
                .map(|u| u.trim().to_string())
                .filter(|u| !u.is_empty()),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionWithProfessional {
    #[serde(flatten)]
    pub session: Session,
    pub professional_name: String,
    pub professional_company: String,
}

impl SessionWithProfessional {
    pub fn project(session: Session, professional: Option<&ProfessionalProfile>) -> Self {
        let (professional_name, professional_company) = super::display_fields(professional);
        Self {
            session,
            professional_name,
            professional_company,
        }
    }
}

/// What the post-payment landing page shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionConfirmation {
    pub session: Session,
    pub professional: ProfessionalProfile,
}
