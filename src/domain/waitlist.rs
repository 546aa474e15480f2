use super::validation::{is_valid_email, optional_trimmed};
use crate::error::{MarketError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use uuid::Uuid;

/// Graduation years accepted for the pre-launch cohort.
pub const ELIGIBLE_GRAD_YEARS: RangeInclusive<i32> = 2026..=2030;

/// A pre-launch signup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaitlistSignup {
    pub id: String,
    pub name: String,
    pub email: String,
    pub university: String,
    pub grad_year: i32,
    pub interests: Vec<String>,
    pub target_companies: Option<String>,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Raw signup form. `gradYear` may arrive as a number or a numeric string.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaitlistForm {
    pub name: Option<String>,
    pub email: Option<String>,
    pub university: Option<String>,
    pub grad_year: Option<serde_json::Value>,
    #[serde(default)]
    pub interests: Vec<String>,
    pub target_companies: Option<String>,
    pub note: Option<String>,
}

fn parse_grad_year(value: &serde_json::Value) -> Option<i32> {
    match value {
        serde_json::Value::Number(n) => n.as_i64().and_then(|n| i32::try_from(n).ok()),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

impl WaitlistForm {
    /// Validates the form against the eligibility rules. Presence is judged
    /// on trimmed values; the email shape and university are checked as sent.
    pub fn validate(self, eligible_university: &str) -> Result<WaitlistSignup> {
        let name = optional_trimmed(self.name.as_deref());
        let email = optional_trimmed(self.email.as_deref());
        let university = optional_trimmed(self.university.as_deref());
        let (Some(name), Some(email), Some(university), Some(grad_year)) =
            (name, email, university, self.grad_year)
        else {
            return Err(MarketError::Validation("Missing required fields".to_string()));
        };

        let interests: Vec<String> = self
            .interests
            .iter()
            .filter_map(|i| optional_trimmed(Some(i)))
            .collect();
        if interests.is_empty() {
            return Err(MarketError::Validation(
                "At least one interest is required".to_string(),
            ));
        }

        if !self.email.as_deref().is_some_and(is_valid_email) {
            return Err(MarketError::Validation("Invalid email format".to_string()));
        }

        let grad_year = parse_grad_year(&grad_year)
            .filter(|year| ELIGIBLE_GRAD_YEARS.contains(year))
            .ok_or_else(|| MarketError::Validation("Invalid graduation year".to_string()))?;

        // Exact match: a padded university name is not eligible.
        if self.university.as_deref() != Some(eligible_university) {
            return Err(MarketError::Validation(format!(
                "Only {eligible_university} students are eligible at this time"
            )));
        }

        Ok(WaitlistSignup {
            id: Uuid::new_v4().to_string(),
            name,
            email,
            university,
            grad_year,
            interests,
            target_companies: optional_trimmed(self.target_companies.as_deref()),
            note: optional_trimmed(self.note.as_deref()),
            created_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BROWN: &str = "Brown University";

    fn form(json: &str) -> WaitlistForm {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_valid_signup() {
        let signup = form(
            r#"{"name": "Jane", "email": "jane@brown.edu", "university": "Brown University",
                "gradYear": "2027", "interests": ["Tech", " "], "note": ""}"#,
        )
        .validate(BROWN)
        .unwrap();
        assert_eq!(signup.grad_year, 2027);
        assert_eq!(signup.interests, ["Tech"]);
        assert_eq!(signup.note, None);
    }

    #[test]
    fn test_missing_fields_checked_first() {
        let err = form(r#"{"name": "Jane", "email": "bad"}"#).validate(BROWN);
        assert!(matches!(err, Err(MarketError::Validation(m)) if m == "Missing required fields"));
    }

    #[test]
    fn test_interests_required() {
        let err = form(
            r#"{"name": "J", "email": "j@b.edu", "university": "Brown University", "gradYear": 2027}"#,
        )
        .validate(BROWN);
        assert!(matches!(err, Err(MarketError::Validation(m)) if m.contains("interest")));
    }

    #[test]
    fn test_grad_year_bounds() {
        for year in ["2025", "2031", "soon"] {
            let json = format!(
                r#"{{"name": "J", "email": "j@b.edu", "university": "Brown University",
                    "gradYear": "{year}", "interests": ["x"]}}"#
            );
            assert!(matches!(
                form(&json).validate(BROWN),
                Err(MarketError::Validation(m)) if m == "Invalid graduation year"
            ));
        }
    }

    #[test]
    fn test_other_universities_rejected() {
        let err = form(
            r#"{"name": "J", "email": "j@b.edu", "university": "Yale", "gradYear": 2027, "interests": ["x"]}"#,
        )
        .validate(BROWN);
        assert!(matches!(err, Err(MarketError::Validation(m)) if m.contains("Brown University")));
    }

    #[test]
    fn test_padded_email_and_university_rejected() {
        let err = form(
            r#"{"name": "J", "email": " j@brown.edu", "university": "Brown University",
                "gradYear": 2027, "interests": ["x"]}"#,
        )
        .validate(BROWN);
        assert!(matches!(err, Err(MarketError::Validation(m)) if m == "Invalid email format"));

        let err = form(
            r#"{"name": "J", "email": "j@brown.edu", "university": "Brown University ",
                "gradYear": 2027, "interests": ["x"]}"#,
        )
        .validate(BROWN);
        assert!(matches!(err, Err(MarketError::Validation(m)) if m.contains("eligible")));
    }
}
