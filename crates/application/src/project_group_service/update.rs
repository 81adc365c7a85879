use chrono::Utc;
use tracing::info;

use groupbind_domain::build_role_set;

use super::*;

impl ProjectGroupService {
    /// Replaces the role set of an existing binding.
    ///
    /// The group slug is immutable; changing it fails before any remote call.
    pub async fn update_binding(
        &self,
        desired: ProjectGroupBinding,
        recorded: ProjectGroupBinding,
    ) -> Result<ProjectGroupBinding, Diagnostics> {
        self.require_binding_management(LifecycleOperation::Update)?;

        desired
            .validate_required()
            .and_then(|()| desired.ensure_same_group(&recorded))
            .map_err(|error| Diagnostic::from_app_error("Unable to update project group", &error))?;
        let project_slug = recorded
            .recorded_project_slug()
            .map_err(|error| Diagnostic::from_app_error("Unable to update project group", &error))?
            .to_owned();
        let roles = build_role_set(&desired.roles, Utc::now())
            .map_err(|error| Diagnostic::from_app_error("Error assigning role to group", &error))?;

        self.api
            .update_binding(project_slug.as_str(), desired.group_slug.as_str(), &roles)
            .await
            .map_err(|error| {
                Diagnostic::from_app_error("Error assigning roles to group", &error).with_context(
                    format!(
                        "couldn't update roles of group '{}' in project '{project_slug}'",
                        desired.group_slug
                    ),
                )
            })?;

        info!(
            project_slug = %project_slug,
            group_slug = %desired.group_slug,
            role_count = roles.len(),
            "project group binding updated"
        );

        Ok(ProjectGroupBinding {
            project_slug: Some(project_slug),
            membership_id: recorded.membership_id,
            ..desired
        })
    }
}
