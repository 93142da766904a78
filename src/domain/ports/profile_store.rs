//! User profile lookup port.

use async_trait::async_trait;

use crate::domain::models::UserProfile;

/// Read access to aggregated user learning profiles.
#[async_trait]
pub trait UserProfileStore: Send + Sync {
    /// Profile for `user_id`, or `None` if unknown.
    async fn get_profile(&self, user_id: &str) -> anyhow::Result<Option<UserProfile>>;
}
