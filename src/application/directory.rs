use crate::domain::ports::ProfileStoreRef;
use crate::domain::profile::{
    NewProfile, ProfessionalProfile, ProfileFacets, ProfileFilter, ProfileUpdate,
};
use crate::error::{MarketError, Result};
use tracing::{info, warn};

pub(crate) const PROFESSIONAL_NOT_FOUND: &str = "Professional not found";
pub(crate) const PROFESSIONAL_UNAVAILABLE: &str = "Professional is not available for booking";

/// Professional listings, public and administrative views.
///
/// Every read goes to the store; nothing is cached, so approval changes are
/// visible to the next booking or checkout immediately.
#[derive(Clone)]
pub struct ProfileDirectory {
    store: ProfileStoreRef,
}

impl ProfileDirectory {
    pub fn new(store: ProfileStoreRef) -> Self {
        Self { store }
    }

    /// Any profile, approved or not.
    pub async fn get(&self, id: &str) -> Result<ProfessionalProfile> {
        self.store
            .get(id)
            .await?
            .ok_or_else(|| MarketError::NotFound(PROFESSIONAL_NOT_FOUND.to_string()))
    }

    /// A profile as a student may see it: unapproved profiles do not exist.
    pub async fn get_public(&self, id: &str) -> Result<ProfessionalProfile> {
        match self.store.get(id).await? {
            Some(profile) if profile.is_approved => Ok(profile),
            _ => Err(MarketError::NotFound(PROFESSIONAL_NOT_FOUND.to_string())),
        }
    }

    /// A profile that can take bookings and payments right now.
    pub async fn get_bookable(&self, id: &str) -> Result<ProfessionalProfile> {
        let profile = self.get(id).await?;
        if !profile.is_approved {
            return Err(MarketError::Unavailable(PROFESSIONAL_UNAVAILABLE.to_string()));
        }
        Ok(profile)
    }

    /// Lookup that tolerates both absence and storage failure; the latter is
    /// logged.
    pub(crate) async fn find(&self, id: &str) -> Option<ProfessionalProfile> {
        match self.store.get(id).await {
            Ok(profile) => profile,
            Err(e) => {
                warn!(professional_id = %id, error = %e, "Error fetching professional");
                None
            }
        }
    }

    pub async fn list_approved(&self, filter: &ProfileFilter) -> Result<Vec<ProfessionalProfile>> {
        let approved = self
            .store
            .get_all()
            .await?
            .into_iter()
            .filter(|p| p.is_approved)
            .collect();
        Ok(filter.apply(approved))
    }

    /// Every profile, newest first.
    pub async fn list_all(&self) -> Result<Vec<ProfessionalProfile>> {
        let mut profiles = self.store.get_all().await?;
        profiles.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(profiles)
    }

    pub async fn facets(&self) -> Result<ProfileFacets> {
        let approved: Vec<_> = self
            .store
            .get_all()
            .await?
            .into_iter()
            .filter(|p| p.is_approved)
            .collect();
        Ok(ProfileFacets::from_profiles(&approved))
    }

    pub async fn create(&self, new: NewProfile) -> Result<ProfessionalProfile> {
        let profile = ProfessionalProfile::create(new)?;
        self.store.store(profile.clone()).await?;
        info!(profile_id = %profile.id, name = %profile.name, "Created profile");
        Ok(profile)
    }

    pub async fn update(&self, id: &str, update: ProfileUpdate) -> Result<ProfessionalProfile> {
        let mut profile = self.get(id).await?;
        profile.apply(update)?;
        self.store.store(profile.clone()).await?;
        info!(profile_id = %profile.id, approved = profile.is_approved, "Updated profile");
        Ok(profile)
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        if !self.store.delete(id).await? {
            return Err(MarketError::NotFound(PROFESSIONAL_NOT_FOUND.to_string()));
        }
        info!(profile_id = %id, "Deleted profile");
        Ok(())
    }
}
