use async_trait::async_trait;

use groupbind_core::AppResult;
use groupbind_domain::{NormalizedRoleGrant, ObservedRoleGrant};

/// Port for the remote management API that owns project group memberships.
///
/// Implementations report a missing membership as `AppError::NotFound`.
#[async_trait]
pub trait ProjectGroupApi: Send + Sync {
    /// Resolves a project id to its slug.
    async fn resolve_project(&self, project_id: &str) -> AppResult<String>;

    /// Binds a group to a project and returns the assigned membership id.
    async fn create_binding(
        &self,
        project_slug: &str,
        group_slug: &str,
        roles: &[NormalizedRoleGrant],
    ) -> AppResult<String>;

    /// Fetches the grants currently held by a group in a project.
    async fn fetch_binding(
        &self,
        project_slug: &str,
        group_slug: &str,
    ) -> AppResult<Vec<ObservedRoleGrant>>;

    /// Replaces all grants held by a group in a project.
    async fn update_binding(
        &self,
        project_slug: &str,
        group_slug: &str,
        roles: &[NormalizedRoleGrant],
    ) -> AppResult<()>;

    /// Removes a group from a project.
    async fn delete_binding(&self, project_slug: &str, group_slug: &str) -> AppResult<()>;
}
