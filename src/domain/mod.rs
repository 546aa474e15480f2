//! Domain layer: entities, status machines, validation rules and the ports
//! the application layer depends on.

pub mod booking;
pub mod checkout;
pub mod money;
pub mod notification;
pub mod ports;
pub mod profile;
pub mod session;
pub mod validation;
pub mod waitlist;

use profile::ProfessionalProfile;

/// Display name shown when a referenced profile no longer exists.
pub const UNKNOWN_PROFESSIONAL: &str = "Unknown";

/// Name and company used when projecting a profile into a list row.
pub(crate) fn display_fields(professional: Option<&ProfessionalProfile>) -> (String, String) {
    match professional {
        Some(p) => (p.name.clone(), p.company.clone()),
        None => (
            UNKNOWN_PROFESSIONAL.to_string(),
            UNKNOWN_PROFESSIONAL.to_string(),
        ),
    }
}
