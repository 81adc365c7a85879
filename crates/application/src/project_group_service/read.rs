use tracing::{debug, info};

use groupbind_domain::smooth_observed_roles;

use super::*;

impl ProjectGroupService {
    /// Refreshes recorded state, suppressing server-filled defaults.
    pub async fn read_binding(
        &self,
        recorded: ProjectGroupBinding,
    ) -> Result<ReadOutcome, Diagnostics> {
        self.require_binding_management(LifecycleOperation::Read)?;

        let project_slug = recorded.recorded_project_slug().map_err(|error| {
            Diagnostic::from_app_error("Error reading project group membership", &error)
        })?;

        let observed = match self
            .api
            .fetch_binding(project_slug, recorded.group_slug.as_str())
            .await
        {
            Ok(observed) => observed,
            Err(error) if error.is_not_found() => {
                info!(
                    project_slug = %project_slug,
                    group_slug = %recorded.group_slug,
                    "project group binding no longer exists"
                );
                return Ok(ReadOutcome::Absent);
            }
            Err(error) => {
                return Err(Diagnostic::from_app_error(
                    "Error reading project group membership",
                    &error,
                )
                .with_context(format!(
                    "couldn't read membership of group '{}' in project '{project_slug}'",
                    recorded.group_slug
                ))
                .into());
            }
        };

        let roles = smooth_observed_roles(&recorded.roles, &observed);
        debug!(
            project_slug = %project_slug,
            group_slug = %recorded.group_slug,
            observed_count = observed.len(),
            "project group binding refreshed"
        );

        Ok(ReadOutcome::Present(ProjectGroupBinding {
            roles,
            ..recorded
        }))
    }
}
