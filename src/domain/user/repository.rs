use async_trait::async_trait;

use super::{Identity, Profile, Role};
use crate::domain::DomainResult;

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fails with `Conflict` when the email is already registered.
    async fn create_identity(&self, identity: Identity) -> DomainResult<()>;
    async fn find_identity_by_email(&self, email: &str) -> DomainResult<Option<Identity>>;
    async fn delete_identity(&self, id: &str) -> DomainResult<()>;
    async fn count_identities(&self) -> DomainResult<u64>;

    async fn create_profile(&self, profile: Profile) -> DomainResult<()>;
    async fn find_profile(&self, id: &str) -> DomainResult<Option<Profile>>;
    /// All profiles ordered by full name.
    async fn list_profiles(&self) -> DomainResult<Vec<Profile>>;
    async fn delete_profile(&self, id: &str) -> DomainResult<()>;

    async fn roles_for(&self, user_id: &str) -> DomainResult<Vec<Role>>;
    /// Removes every role of the user, returning how many were removed.
    async fn clear_roles(&self, user_id: &str) -> DomainResult<u64>;
    async fn add_role(&self, user_id: &str, role: Role) -> DomainResult<()>;
}
