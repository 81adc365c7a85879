//! Domain entities and invariants for project group bindings.

#![forbid(unsafe_code)]

mod binding;
mod grant;
mod role_set;
mod smoothing;

pub use binding::ProjectGroupBinding;
pub use grant::{
    NormalizedRoleGrant, ObservedRoleGrant, RoleGrant, TEMPORARY_RANGE_DEFAULT, TemporaryMode,
    format_timestamp,
};
pub use role_set::build_role_set;
pub use smoothing::smooth_observed_roles;
