//! Application services and ports.

#![forbid(unsafe_code)]

mod diagnostics;
mod project_group_ports;
mod project_group_service;

pub use diagnostics::{Diagnostic, DiagnosticKind, DiagnosticSeverity, Diagnostics};
pub use project_group_ports::ProjectGroupApi;
pub use project_group_service::{
    BindingLifecycle, DeleteOutcome, ProjectGroupService, ReadOutcome, ReconcilerConfig,
};
