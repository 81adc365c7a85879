use std::collections::HashMap;

use async_trait::async_trait;
use groupbind_application::ProjectGroupApi;
use groupbind_core::{AppError, AppResult};
use groupbind_domain::{
    NormalizedRoleGrant, ObservedRoleGrant, TEMPORARY_RANGE_DEFAULT, TemporaryMode,
};
use tokio::sync::RwLock;
use uuid::Uuid;

/// Role slug reported by the management API for custom roles.
const CUSTOM_ROLE_SLUG: &str = "custom";

#[derive(Debug, Clone)]
struct StoredMembership {
    id: String,
    roles: Vec<ObservedRoleGrant>,
}

/// In-memory management API that applies the same server-side defaults as
/// the hosted service.
#[derive(Debug, Default)]
pub struct InMemoryProjectGroupApi {
    projects: RwLock<HashMap<String, String>>,
    custom_roles: RwLock<HashMap<String, String>>,
    memberships: RwLock<HashMap<(String, String), StoredMembership>>,
}

impl InMemoryProjectGroupApi {
    /// Creates an empty in-memory API.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a project id and its slug.
    pub async fn register_project(&self, project_id: &str, project_slug: &str) {
        self.projects
            .write()
            .await
            .insert(project_id.to_owned(), project_slug.to_owned());
    }

    /// Registers a custom role and returns its generated id.
    pub async fn register_custom_role(&self, role_slug: &str) -> String {
        let id = Uuid::new_v4().to_string();
        self.custom_roles
            .write()
            .await
            .insert(role_slug.to_owned(), id.clone());
        id
    }

    async fn ensure_project_slug(&self, project_slug: &str) -> AppResult<()> {
        let known = self
            .projects
            .read()
            .await
            .values()
            .any(|slug| slug == project_slug);
        if !known {
            return Err(AppError::NotFound(format!(
                "project '{project_slug}' does not exist"
            )));
        }

        Ok(())
    }

    async fn store_roles(&self, roles: &[NormalizedRoleGrant]) -> Vec<ObservedRoleGrant> {
        let custom_roles = self.custom_roles.read().await;

        roles
            .iter()
            .map(|role| {
                let custom_role_id = custom_roles.get(role.role_slug.as_str()).cloned();
                let temporary_range = if role.is_temporary && role.temporary_range.is_empty() {
                    TEMPORARY_RANGE_DEFAULT.to_owned()
                } else {
                    role.temporary_range.clone()
                };

                ObservedRoleGrant {
                    role_slug: if custom_role_id.is_some() {
                        CUSTOM_ROLE_SLUG.to_owned()
                    } else {
                        role.role_slug.clone()
                    },
                    custom_role_slug: custom_role_id.as_ref().map(|_| role.role_slug.clone()),
                    custom_role_id,
                    is_temporary: role.is_temporary,
                    temporary_mode: if role.is_temporary {
                        TemporaryMode::Relative
                    } else {
                        TemporaryMode::None
                    },
                    temporary_range,
                    temporary_access_start_time: Some(role.temporary_access_start_time),
                }
            })
            .collect()
    }
}

fn membership_key(project_slug: &str, group_slug: &str) -> (String, String) {
    (project_slug.to_owned(), group_slug.to_owned())
}

fn membership_not_found(project_slug: &str, group_slug: &str) -> AppError {
    AppError::NotFound(format!(
        "group '{group_slug}' is not a member of project '{project_slug}'"
    ))
}

#[async_trait]
impl ProjectGroupApi for InMemoryProjectGroupApi {
    async fn resolve_project(&self, project_id: &str) -> AppResult<String> {
        self.projects
            .read()
            .await
            .get(project_id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("project '{project_id}' does not exist")))
    }

    async fn create_binding(
        &self,
        project_slug: &str,
        group_slug: &str,
        roles: &[NormalizedRoleGrant],
    ) -> AppResult<String> {
        self.ensure_project_slug(project_slug).await?;
        let stored_roles = self.store_roles(roles).await;

        let key = membership_key(project_slug, group_slug);
        let mut memberships = self.memberships.write().await;
        if memberships.contains_key(&key) {
            return Err(AppError::Conflict(format!(
                "group '{group_slug}' is already a member of project '{project_slug}'"
            )));
        }

        let id = Uuid::new_v4().to_string();
        memberships.insert(
            key,
            StoredMembership {
                id: id.clone(),
                roles: stored_roles,
            },
        );
        Ok(id)
    }

    async fn fetch_binding(
        &self,
        project_slug: &str,
        group_slug: &str,
    ) -> AppResult<Vec<ObservedRoleGrant>> {
        self.memberships
            .read()
            .await
            .get(&membership_key(project_slug, group_slug))
            .map(|membership| membership.roles.clone())
            .ok_or_else(|| membership_not_found(project_slug, group_slug))
    }

    async fn update_binding(
        &self,
        project_slug: &str,
        group_slug: &str,
        roles: &[NormalizedRoleGrant],
    ) -> AppResult<()> {
        let stored_roles = self.store_roles(roles).await;
        let mut memberships = self.memberships.write().await;
        let membership = memberships
            .get_mut(&membership_key(project_slug, group_slug))
            .ok_or_else(|| membership_not_found(project_slug, group_slug))?;

        membership.roles = stored_roles;
        Ok(())
    }

    async fn delete_binding(&self, project_slug: &str, group_slug: &str) -> AppResult<()> {
        self.memberships
            .write()
            .await
            .remove(&membership_key(project_slug, group_slug))
            .map(|membership| {
                tracing::debug!(membership_id = %membership.id, "membership removed");
            })
            .ok_or_else(|| membership_not_found(project_slug, group_slug))
    }
}
