use super::validation::{optional_trimmed, required_trimmed};
use crate::error::{MarketError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeSet;
use uuid::Uuid;

/// A professional's public listing.
///
/// Only approved profiles are visible to students or bookable; approval is
/// toggled by admins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfessionalProfile {
    pub id: String,
    pub name: String,
    pub company: String,
    pub role_title: String,
    pub industry: String,
    pub bio: String,
    /// Session price in cents.
    pub price_cents: i64,
    pub calendly_link: Option<String>,
    pub is_approved: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Admin input for creating a profile.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewProfile {
    pub name: Option<String>,
    pub company: Option<String>,
    pub role_title: Option<String>,
    pub industry: Option<String>,
    pub bio: Option<String>,
    pub price_cents: Option<i64>,
    pub calendly_link: Option<String>,
    #[serde(default)]
    pub is_approved: bool,
}

/// Admin input for a partial profile edit. Absent fields are left untouched;
/// `calendly_link: null` clears the link.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub company: Option<String>,
    pub role_title: Option<String>,
    pub industry: Option<String>,
    pub bio: Option<String>,
    pub price_cents: Option<i64>,
    #[serde(default, deserialize_with = "present_or_null")]
    pub calendly_link: Option<Option<String>>,
    pub is_approved: Option<bool>,
}

fn present_or_null<'de, D>(deserializer: D) -> std::result::Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

fn validate_price(price_cents: i64) -> Result<i64> {
    if price_cents < 0 {
        return Err(MarketError::Validation(
            "Price must be a non-negative number of cents".to_string(),
        ));
    }
    Ok(price_cents)
}

fn validate_link(link: Option<&str>) -> Result<Option<String>> {
    match optional_trimmed(link) {
        Some(link) if !(link.starts_with("https://") || link.starts_with("http://")) => Err(
            MarketError::Validation("Scheduling link must be an http(s) URL".to_string()),
        ),
        other => Ok(other),
    }
}

impl ProfessionalProfile {
    /// Builds a new profile from admin input, assigning id and timestamps.
    pub fn create(new: NewProfile) -> Result<Self> {
        let name = required_trimmed(new.name.as_deref(), "Name is required")?;
        let company = required_trimmed(new.company.as_deref(), "Company is required")?;
        let role_title = required_trimmed(new.role_title.as_deref(), "Role title is required")?;
        let industry = required_trimmed(new.industry.as_deref(), "Industry is required")?;
        let price_cents = new
            .price_cents
            .ok_or_else(|| MarketError::Validation("Price is required".to_string()))
            .and_then(validate_price)?;
        let calendly_link = validate_link(new.calendly_link.as_deref())?;

        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4().to_string(),
            name,
            company,
            role_title,
            industry,
            bio: new.bio.map(|b| b.trim().to_string()).unwrap_or_default(),
            price_cents,
            calendly_link,
            is_approved: new.is_approved,
            created_at: now,
            updated_at: now,
        })
    }

    /// Applies a partial edit. Validation happens before any field changes,
    /// so a rejected update leaves the profile as it was.
    pub fn apply(&mut self, update: ProfileUpdate) -> Result<()> {
        let name = update
            .name
            .as_deref()
            .map(|v| required_trimmed(Some(v), "Name cannot be empty"))
            .transpose()?;
        let company = update
            .company
            .as_deref()
            .map(|v| required_trimmed(Some(v), "Company cannot be empty"))
            .transpose()?;
        let role_title = update
            .role_title
            .as_deref()
            .map(|v| required_trimmed(Some(v), "Role title cannot be empty"))
            .transpose()?;
        let industry = update
            .industry
            .as_deref()
            .map(|v| required_trimmed(Some(v), "Industry cannot be empty"))
            .transpose()?;
        let price_cents = update.price_cents.map(validate_price).transpose()?;
        let calendly_link = update
            .calendly_link
            .map(|link| validate_link(link.as_deref()))
            .transpose()?;

        if let Some(name) = name {
            self.name = name;
        }
        if let Some(company) = company {
            self.company = company;
        }
        if let Some(role_title) = role_title {
            self.role_title = role_title;
        }
        if let Some(industry) = industry {
            self.industry = industry;
        }
        if let Some(bio) = update.bio {
            self.bio = bio.trim().to_string();
        }
        if let Some(price_cents) = price_cents {
            self.price_cents = price_cents;
        }
        if let Some(calendly_link) = calendly_link {
            self.calendly_link = calendly_link;
        }
        if let Some(is_approved) = update.is_approved {
            self.is_approved = is_approved;
        }
        self.updated_at = Utc::now();
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub enum ProfileSort {
    #[default]
    #[serde(rename = "name")]
    Name,
    #[serde(rename = "price-asc")]
    PriceAsc,
    #[serde(rename = "price-desc")]
    PriceDesc,
}

/// Directory search parameters. All criteria are optional and combine with AND.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileFilter {
    /// Case-insensitive substring over name, company and role title.
    pub q: Option<String>,
    pub industry: Option<String>,
    pub company: Option<String>,
    #[serde(default)]
    pub sort: ProfileSort,
}

impl ProfileFilter {
    fn matches(&self, profile: &ProfessionalProfile) -> bool {
        if let Some(q) = optional_trimmed(self.q.as_deref()) {
            let q = q.to_lowercase();
            let hit = [&profile.name, &profile.company, &profile.role_title]
                .iter()
                .any(|field| field.to_lowercase().contains(&q));
            if !hit {
                return false;
            }
        }
        if let Some(industry) = optional_trimmed(self.industry.as_deref())
            && profile.industry != industry
        {
            return false;
        }
        if let Some(company) = optional_trimmed(self.company.as_deref())
            && profile.company != company
        {
            return false;
        }
        true
    }

    /// Filters and sorts a listed set. Pure; never touches storage.
    pub fn apply(&self, profiles: Vec<ProfessionalProfile>) -> Vec<ProfessionalProfile> {
        let mut filtered: Vec<_> = profiles.into_iter().filter(|p| self.matches(p)).collect();
        match self.sort {
            ProfileSort::PriceAsc => filtered.sort_by_key(|p| p.price_cents),
            ProfileSort::PriceDesc => filtered.sort_by_key(|p| std::cmp::Reverse(p.price_cents)),
            ProfileSort::Name => filtered.sort_by(compare_names),
        }
        filtered
    }
}

fn compare_names(a: &ProfessionalProfile, b: &ProfessionalProfile) -> Ordering {
    a.name
        .to_lowercase()
        .cmp(&b.name.to_lowercase())
        .then_with(|| a.name.cmp(&b.name))
}

/// Distinct filter options derived from a listed set.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProfileFacets {
    pub industries: Vec<String>,
    pub companies: Vec<String>,
}

impl ProfileFacets {
    pub fn from_profiles(profiles: &[ProfessionalProfile]) -> Self {
        let industries: BTreeSet<_> = profiles.iter().map(|p| p.industry.clone()).collect();
        let companies: BTreeSet<_> = profiles.iter().map(|p| p.company.clone()).collect();
        Self {
            industries: industries.into_iter().collect(),
            companies: companies.into_iter().collect(),
        }
    }
}
