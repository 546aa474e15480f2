use super::directory::ProfileDirectory;
use crate::domain::booking::{
    BookingRequest, BookingRequestWithProfessional, BookingStatus, BookingSubmission, StatusChange,
};
use crate::domain::notification::Notification;
use crate::domain::ports::{BookingRequestStoreRef, NotificationSinkRef};
use crate::domain::validation::{optional_trimmed, required_trimmed, student_email};
use crate::error::{MarketError, Result};
use std::collections::HashMap;
use tracing::info;

/// Free-form requests for a professional's time, triaged by admins.
#[derive(Clone)]
pub struct BookingRequestTracker {
    requests: BookingRequestStoreRef,
    directory: ProfileDirectory,
    notifier: NotificationSinkRef,
}

impl BookingRequestTracker {
    pub fn new(
        requests: BookingRequestStoreRef,
        directory: ProfileDirectory,
        notifier: NotificationSinkRef,
    ) -> Self {
        Self {
            requests,
            directory,
            notifier,
        }
    }

    /// Validates and records a student's request, then tells the admins.
    ///
    /// Fields are checked in form order and the first failure wins. The
    /// profile must exist and be approved.
    pub async fn submit(&self, submission: BookingSubmission) -> Result<BookingRequest> {
        let professional_id = submission
            .professional_id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| MarketError::Validation("Professional ID is required".to_string()))?;
        let student_name =
            required_trimmed(submission.student_name.as_deref(), "Student name is required")?;
        let student_email = student_email(submission.student_email.as_deref())?;
        let preferred_times = required_trimmed(
            submission.preferred_times.as_deref(),
            "Preferred times are required",
        )?;

        let professional = self.directory.get_bookable(&professional_id).await?;

        let request = BookingRequest::new(
            professional.id.clone(),
            student_name,
            student_email,
            preferred_times,
            optional_trimmed(submission.note.as_deref()),
        );
        self.requests.store(request.clone()).await?;
        info!(request_id = %request.id, professional_id = %professional.id, "Booking request created");

        self.notifier
            .notify(Notification::BookingRequested {
                request: request.clone(),
                professional_name: professional.name,
                professional_company: professional.company,
            })
            .await;

        Ok(request)
    }

    /// Every request, newest first, with the professional's display fields.
    pub async fn list_all(&self) -> Result<Vec<BookingRequestWithProfessional>> {
        let mut requests = self.requests.get_all().await?;
        requests.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let professionals: HashMap<_, _> = self
            .directory
            .list_all()
            .await?
            .into_iter()
            .map(|p| (p.id.clone(), p))
            .collect();

        Ok(requests
            .into_iter()
            .map(|request| {
                let professional = professionals.get(&request.professional_id);
                BookingRequestWithProfessional::project(request, professional)
            })
            .collect())
    }

    /// Relabels a request. The status is parsed before the request is
    /// loaded, so an undeclared value never touches the store.
    pub async fn update_status(&self, id: &str, change: StatusChange) -> Result<BookingRequest> {
        let status: BookingStatus = change.status.as_deref().unwrap_or_default().parse()?;

        let mut request = self
            .requests
            .get(id)
            .await?
            .ok_or_else(|| MarketError::NotFound("Booking request not found".to_string()))?;
        request.set_status(status);
        self.requests.store(request.clone()).await?;
        info!(request_id = %id, %status, "Booking request status updated");
        Ok(request)
    }
}
