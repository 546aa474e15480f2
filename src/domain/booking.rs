use super::profile::ProfessionalProfile;
use super::validation::lenient_string;
use crate::error::MarketError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Triage label on a free booking request.
///
/// Admins may move a request between any two states; the only rule is that
/// the value must be one of the declared variants.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BookingStatus {
    #[default]
    New,
    Contacted,
    Scheduled,
}

impl BookingStatus {
    pub const ALL: [Self; 3] = [Self::New, Self::Contacted, Self::Scheduled];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "NEW",
            Self::Contacted => "CONTACTED",
            Self::Scheduled => "SCHEDULED",
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = MarketError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| {
                MarketError::Validation(
                    "Invalid status. Must be one of: NEW, CONTACTED, SCHEDULED".to_string(),
                )
            })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingRequest {
    pub id: String,
    pub professional_id: String,
    pub student_name: String,
    pub student_email: String,
    pub preferred_times: String,
    pub note: Option<String>,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BookingRequest {
    /// Creates a request in the `NEW` state. Inputs are expected to be
    /// validated and trimmed already.
    pub fn new(
        professional_id: String,
        student_name: String,
        student_email: String,
        preferred_times: String,
        note: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            professional_id,
            student_name,
            student_email,
            preferred_times,
            note,
            status: BookingStatus::New,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn set_status(&mut self, status: BookingStatus) {
        self.status = status;
        self.updated_at = Utc::now();
    }
}

/// Raw booking form as posted by a student.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookingSubmission {
    #[serde(default, deserialize_with = "lenient_string")]
    pub professional_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub student_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub student_email: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub preferred_times: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub note: Option<String>,
}

/// Admin status change as posted by the dashboard.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatusChange {
    #[serde(default, deserialize_with = "lenient_string")]
    pub status: Option<String>,
}

/// A booking request joined with its professional's display fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookingRequestWithProfessional {
    #[serde(flatten)]
    pub request: BookingRequest,
    pub professional_name: String,
    pub professional_company: String,
}

impl BookingRequestWithProfessional {
    pub fn project(request: BookingRequest, professional: Option<&ProfessionalProfile>) -> Self {
        let (professional_name, professional_company) = super::display_fields(professional);
        Self {
            request,
            professional_name,
            professional_company,
        }
    }
}
