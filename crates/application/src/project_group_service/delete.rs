use tracing::{info, warn};

use super::*;

impl ProjectGroupService {
    /// Removes the binding. Remote failures are reported as warnings.
    pub async fn delete_binding(
        &self,
        recorded: ProjectGroupBinding,
    ) -> Result<DeleteOutcome, Diagnostics> {
        self.require_binding_management(LifecycleOperation::Delete)?;

        let result = match recorded.recorded_project_slug() {
            Ok(project_slug) => self
                .api
                .delete_binding(project_slug, recorded.group_slug.as_str())
                .await
                .map_err(|error| {
                    Diagnostic::from_app_error("Error deleting project group", &error)
                        .with_context(format!(
                            "couldn't remove group '{}' from project '{project_slug}'",
                            recorded.group_slug
                        ))
                }),
            Err(error) => Err(Diagnostic::from_app_error(
                "Error deleting project group",
                &error,
            )),
        };

        match result {
            Ok(()) => {
                info!(
                    group_slug = %recorded.group_slug,
                    "project group binding deleted"
                );
                Ok(DeleteOutcome::default())
            }
            Err(diagnostic) => {
                warn!(
                    group_slug = %recorded.group_slug,
                    detail = %diagnostic.detail,
                    "project group binding delete failed"
                );
                Ok(DeleteOutcome {
                    warnings: vec![diagnostic.into_warning()],
                })
            }
        }
    }
}
