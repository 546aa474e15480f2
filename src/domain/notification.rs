use super::booking::BookingRequest;
use super::money::format_price;
use super::session::Session;
use std::fmt::Write;

/// Shown in place of a scheduling link when the professional has none.
pub const SCHEDULING_LINK_PLACEHOLDER: &str =
    "Your professional will reach out with scheduling options shortly.";

/// Lifecycle events worth telling someone about.
#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    /// A student submitted a free booking request; goes to the admins.
    BookingRequested {
        request: BookingRequest,
        professional_name: String,
        professional_company: String,
    },
    /// A payment cleared; goes to the student.
    PaymentConfirmed {
        session: Session,
        professional_name: String,
        professional_company: String,
        scheduling_link: Option<String>,
        landing_url: String,
    },
    /// A payment cleared; goes to the professional.
    SessionBooked {
        session: Session,
        professional_name: String,
        scheduling_link: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recipient {
    Admins,
    Address(String),
    /// The professional behind a profile; the profile carries no address, so
    /// delivery resolves it out of band.
    Professional { id: String, name: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub to: Recipient,
    pub subject: String,
    pub body: String,
}

impl Notification {
    pub fn render(&self) -> Message {
        match self {
            Self::BookingRequested {
                request,
                professional_name,
                professional_company,
            } => {
                let mut body = String::new();
                let _ = writeln!(body, "Professional: {professional_name} ({professional_company})");
                let _ = writeln!(body, "Student: {}", request.student_name);
                let _ = writeln!(body, "Email: {}", request.student_email);
                let _ = writeln!(body, "Preferred Times: {}", request.preferred_times);
                let _ = writeln!(body, "Note: {}", request.note.as_deref().unwrap_or("(none)"));
                let _ = write!(body, "Request ID: {}", request.id);
                Message {
                    to: Recipient::Admins,
                    subject: format!("New Session Request - {professional_name}"),
                    body,
                }
            }
            Self::PaymentConfirmed {
                session,
                professional_name,
                professional_company,
                scheduling_link,
                landing_url,
            } => {
                let mut body = String::new();
                let _ = writeln!(body, "Hi {},", session.student_name);
                let _ = writeln!(body, "Your payment has been confirmed!");
                let _ = writeln!(body, "Amount: {}", format_price(session.amount_cents));
                let _ = writeln!(body, "Professional: {professional_name} ({professional_company})");
                let _ = writeln!(body, "Next Step: Schedule your session");
                match scheduling_link {
                    Some(link) => {
                        let _ = writeln!(body, "Scheduling Link: {link}");
                    }
                    None => {
                        let _ = writeln!(body, "{SCHEDULING_LINK_PLACEHOLDER}");
                    }
                }
                let _ = write!(body, "Or visit: {landing_url}");
                Message {
                    to: Recipient::Address(session.student_email.clone()),
                    subject: format!("Payment Confirmed - Session with {professional_name}"),
                    body,
                }
            }
            Self::SessionBooked {
                session,
                professional_name,
                scheduling_link,
            } => {
                let mut body = String::new();
                let _ = writeln!(body, "Hi {professional_name},");
                let _ = writeln!(body, "You have a new paid session booking!");
                let _ = writeln!(
                    body,
                    "Student: {} ({})",
                    session.student_name, session.student_email
                );
                let _ = writeln!(body, "Amount: {}", format_price(session.amount_cents));
                match scheduling_link {
                    Some(link) => {
                        let _ = writeln!(body, "The student will schedule via your link: {link}");
                    }
                    None => {
                        let _ = writeln!(body, "{SCHEDULING_LINK_PLACEHOLDER}");
                    }
                }
                let _ = write!(body, "Session ID: {}", session.id);
                Message {
                    to: Recipient::Professional {
                        id: session.professional_id.clone(),
                        name: professional_name.clone(),
                    },
                    subject: format!("New Paid Session Booked - {}", session.student_name),
                    body,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session {
        Session::paid("p1".into(), "Jane".into(), "jane@brown.edu".into(), "pi_1".into(), 20000)
    }

    #[test]
    fn test_booking_request_goes_to_admins() {
        let request = BookingRequest::new(
            "p1".into(),
            "Jane".into(),
            "jane@brown.edu".into(),
            "Weekdays".into(),
            None,
        );
        let message = Notification::BookingRequested {
            request,
            professional_name: "Ada".into(),
            professional_company: "Acme".into(),
        }
        .render();
        assert_eq!(message.to, Recipient::Admins);
        assert_eq!(message.subject, "New Session Request - Ada");
        assert!(message.body.contains("Note: (none)"));
    }

    #[test]
    fn test_payment_confirmation_uses_placeholder_without_link() {
        let message = Notification::PaymentConfirmed {
            session: session(),
            professional_name: "Ada".into(),
            professional_company: "Acme".into(),
            scheduling_link: None,
            landing_url: "http://localhost:3000/booking/success?session_id=cs_1".into(),
        }
        .render();
        assert_eq!(message.to, Recipient::Address("jane@brown.edu".into()));
        assert!(message.body.contains("Amount: $200"));
        assert!(message.body.contains(SCHEDULING_LINK_PLACEHOLDER));
    }

    #[test]
    fn test_session_booked_includes_link() {
        let message = Notification::SessionBooked {
            session: session(),
            professional_name: "Ada".into(),
            scheduling_link: Some("https://calendly.com/ada".into()),
        }
        .render();
        assert!(matches!(message.to, Recipient::Professional { ref id, .. } if id == "p1"));
        assert!(message.body.contains("https://calendly.com/ada"));
    }
}
