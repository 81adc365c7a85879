mod create;
mod delete;
mod read;
mod update;

use std::sync::Arc;

use async_trait::async_trait;

use groupbind_core::{AppError, AuthMode};
use groupbind_domain::ProjectGroupBinding;

use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::project_group_ports::ProjectGroupApi;

/// Reconciler settings supplied by the host at construction time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReconcilerConfig {
    /// Authentication mode of the management API client.
    pub auth_mode: AuthMode,
}

/// Result of refreshing a binding from the management API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome {
    /// Binding exists; carries the smoothed state to record.
    Present(ProjectGroupBinding),
    /// Binding no longer exists and must be removed from recorded state.
    Absent,
}

/// Result of a completed delete.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeleteOutcome {
    /// Non-fatal problems hit while removing the binding.
    pub warnings: Vec<Diagnostic>,
}

/// Lifecycle contract dispatched by the host orchestrator.
#[async_trait]
pub trait BindingLifecycle: Send + Sync {
    /// Creates the binding from desired state.
    async fn create(
        &self,
        desired: ProjectGroupBinding,
    ) -> Result<ProjectGroupBinding, Diagnostics>;

    /// Refreshes recorded state from the management API.
    async fn read(&self, recorded: ProjectGroupBinding) -> Result<ReadOutcome, Diagnostics>;

    /// Replaces the role set of an existing binding.
    async fn update(
        &self,
        desired: ProjectGroupBinding,
        recorded: ProjectGroupBinding,
    ) -> Result<ProjectGroupBinding, Diagnostics>;

    /// Removes the binding.
    async fn delete(&self, recorded: ProjectGroupBinding) -> Result<DeleteOutcome, Diagnostics>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LifecycleOperation {
    Create,
    Read,
    Update,
    Delete,
}

impl LifecycleOperation {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Read => "read",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

/// Application service reconciling project group bindings.
#[derive(Clone)]
pub struct ProjectGroupService {
    api: Arc<dyn ProjectGroupApi>,
    config: ReconcilerConfig,
}

impl ProjectGroupService {
    /// Creates a new service from required dependencies.
    #[must_use]
    pub fn new(api: Arc<dyn ProjectGroupApi>, config: ReconcilerConfig) -> Self {
        Self { api, config }
    }

    fn require_binding_management(&self, operation: LifecycleOperation) -> Result<(), Diagnostic> {
        if self.config.auth_mode.supports_binding_management() {
            return Ok(());
        }

        Err(Diagnostic::from_app_error(
            format!("Unable to {} project group", operation.as_str()),
            &AppError::Unsupported(format!(
                "only machine identity authentication is supported for this operation, configured mode is '{}'",
                self.config.auth_mode
            )),
        ))
    }
}

#[async_trait]
impl BindingLifecycle for ProjectGroupService {
    async fn create(
        &self,
        desired: ProjectGroupBinding,
    ) -> Result<ProjectGroupBinding, Diagnostics> {
        self.create_binding(desired).await
    }

    async fn read(&self, recorded: ProjectGroupBinding) -> Result<ReadOutcome, Diagnostics> {
        self.read_binding(recorded).await
    }

    async fn update(
        &self,
        desired: ProjectGroupBinding,
        recorded: ProjectGroupBinding,
    ) -> Result<ProjectGroupBinding, Diagnostics> {
        self.update_binding(desired, recorded).await
    }

    async fn delete(&self, recorded: ProjectGroupBinding) -> Result<DeleteOutcome, Diagnostics> {
        self.delete_binding(recorded).await
    }
}
