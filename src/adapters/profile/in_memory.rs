//! User profiles held in memory.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::models::UserProfile;
use crate::domain::ports::UserProfileStore;

/// Profile store held in memory.
#[derive(Debug, Default)]
pub struct InMemoryProfileStore {
    profiles: RwLock<HashMap<String, UserProfile>>,
}

impl InMemoryProfileStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the profile for `profile.user_id`.
    pub async fn upsert(&self, profile: UserProfile) {
        self.profiles
            .write()
            .await
            .insert(profile.user_id.clone(), profile);
    }
}

#[async_trait]
impl UserProfileStore for InMemoryProfileStore {
    async fn get_profile(&self, user_id: &str) -> anyhow::Result<Option<UserProfile>> {
        Ok(self.profiles.read().await.get(user_id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_upsert_replaces_profile() {
        let store = InMemoryProfileStore::new();
        store
            .upsert(UserProfile {
                user_id: "u1".to_string(),
                weak_topics: vec!["dp".to_string()],
                ..UserProfile::default()
            })
            .await;
        store
            .upsert(UserProfile {
                user_id: "u1".to_string(),
                weak_topics: vec!["graphs".to_string()],
                ..UserProfile::default()
            })
            .await;

        let profile = store.get_profile("u1").await.unwrap().unwrap();
        assert_eq!(profile.weak_topics, vec!["graphs".to_string()]);
        assert!(store.get_profile("u2").await.unwrap().is_none());
    }
}
