use crate::error::{MarketError, Result};

/// Decides whether a caller identity belongs to an administrator.
///
/// The allow-list is loaded once at startup and never changes afterwards.
/// Comparison is case-insensitive over trimmed addresses.
#[derive(Debug, Clone, Default)]
pub struct AdminPolicy {
    admin_emails: Vec<String>,
}

impl AdminPolicy {
    pub fn new<I, S>(admin_emails: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let admin_emails = admin_emails
            .into_iter()
            .map(|email| email.as_ref().trim().to_lowercase())
            .filter(|email| !email.is_empty())
            .collect();
        Self { admin_emails }
    }

    /// Parses a comma-separated allow-list, e.g. `"a@x.io, b@x.io"`.
    pub fn from_csv(list: &str) -> Self {
        Self::new(list.split(','))
    }

    pub fn emails(&self) -> &[String] {
        &self.admin_emails
    }

    pub fn is_admin(&self, caller: Option<&str>) -> bool {
        let Some(caller) = caller.map(|c| c.trim().to_lowercase()) else {
            return false;
        };
        !caller.is_empty() && self.admin_emails.iter().any(|admin| *admin == caller)
    }

    pub fn require_admin(&self, caller: Option<&str>) -> Result<()> {
        if self.is_admin(caller) {
            Ok(())
        } else {
            Err(MarketError::Unauthorized)
        }
    }
}
