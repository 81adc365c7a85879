use chrono::Utc;
use tracing::info;

use groupbind_domain::build_role_set;

use super::*;

impl ProjectGroupService {
    /// Creates the binding and records the desired grants as state.
    ///
    /// All validation runs before the first remote call.
    pub async fn create_binding(
        &self,
        desired: ProjectGroupBinding,
    ) -> Result<ProjectGroupBinding, Diagnostics> {
        self.require_binding_management(LifecycleOperation::Create)?;

        desired.validate_required().map_err(|error| {
            Diagnostic::from_app_error("Invalid project group configuration", &error)
        })?;
        let roles = build_role_set(&desired.roles, Utc::now())
            .map_err(|error| Diagnostic::from_app_error("Error assigning role to group", &error))?;

        let project_slug = self
            .api
            .resolve_project(desired.project_id.as_str())
            .await
            .map_err(|error| {
                Diagnostic::from_app_error("Error attaching group to project", &error)
                    .with_context(format!(
                        "couldn't fetch project details for '{}'",
                        desired.project_id
                    ))
            })?;

        let membership_id = self
            .api
            .create_binding(project_slug.as_str(), desired.group_slug.as_str(), &roles)
            .await
            .map_err(|error| {
                Diagnostic::from_app_error("Error attaching group to project", &error)
                    .with_context(format!(
                        "couldn't bind group '{}' to project '{project_slug}'",
                        desired.group_slug
                    ))
            })?;

        info!(
            project_slug = %project_slug,
            group_slug = %desired.group_slug,
            membership_id = %membership_id,
            role_count = roles.len(),
            "project group binding created"
        );

        Ok(ProjectGroupBinding {
            project_slug: Some(project_slug),
            membership_id: Some(membership_id),
            ..desired
        })
    }
}
