//! Identity lookup for submitting users.

use crate::grid::{GameId, PlayerId, UserId};
use async_trait::async_trait;
use derive_getters::Getters;
use derive_more::{Display, Error};
use derive_new::new;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock};
use tracing::{debug, instrument};

/// User profile as stored by the identity service.
///
/// Only `name` matters to the engine: it is the identifier seated in game
/// records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, new)]
pub struct Profile {
    /// Display name, used as the player identifier.
    name: PlayerId,
    /// Games the user takes part in.
    #[serde(default)]
    #[new(default)]
    games: BTreeMap<GameId, bool>,
}

/// Identity lookup failure.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum ProfileError {
    /// No profile exists for the user.
    #[display("No profile for user {_0}")]
    NotFound(#[error(not(source))] UserId),

    /// The identity service could not be reached.
    #[display("Profile lookup failed: {_0}")]
    Unavailable(#[error(not(source))] String),
}

/// Read-only access to user profiles.
#[async_trait]
pub trait ProfileLookup: Send + Sync {
    /// Fetches the profile of `user`.
    async fn get_profile(&self, user: &UserId) -> Result<Profile, ProfileError>;
}

/// Profile lookup backed by an in-process map.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProfiles {
    profiles: Arc<RwLock<HashMap<UserId, Profile>>>,
}

impl InMemoryProfiles {
    /// Creates an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a profile.
    #[instrument(skip(self))]
    pub fn insert(&self, user: UserId, profile: Profile) -> Result<(), ProfileError> {
        let mut profiles = self
            .profiles
            .write()
            .map_err(|_| ProfileError::Unavailable("Profile directory lock poisoned".to_string()))?;
        profiles.insert(user, profile);
        Ok(())
    }
}

#[async_trait]
impl ProfileLookup for InMemoryProfiles {
    #[instrument(skip(self))]
    async fn get_profile(&self, user: &UserId) -> Result<Profile, ProfileError> {
        let profiles = self
            .profiles
            .read()
            .map_err(|_| ProfileError::Unavailable("Profile directory lock poisoned".to_string()))?;
        let profile = profiles
            .get(user)
            .cloned()
            .ok_or_else(|| ProfileError::NotFound(user.clone()))?;
        debug!(name = %profile.name(), "Profile resolved");
        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_lookup_returns_inserted_profile() {
        let profiles = InMemoryProfiles::new();
        profiles
            .insert("uid_1".into(), Profile::new("goose".into()))
            .unwrap();

        let profile = profiles.get_profile(&"uid_1".into()).await.unwrap();
        assert_eq!(profile.name(), &PlayerId::new("goose"));
        assert!(profile.games().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_user_not_found() {
        let profiles = InMemoryProfiles::new();
        let result = profiles.get_profile(&"ghost".into()).await;
        assert_eq!(result, Err(ProfileError::NotFound("ghost".into())));
    }

    #[test]
    fn test_profile_decodes_without_games() {
        let profile: Profile = serde_json::from_str(r#"{"name": "duck"}"#).unwrap();
        assert_eq!(profile.name().as_str(), "duck");
    }
}
