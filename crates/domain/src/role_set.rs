use chrono::{DateTime, Utc};
use groupbind_core::{AppError, AppResult};

use crate::grant::{NormalizedRoleGrant, RoleGrant};

/// Builds the full replacement role list sent on create and update.
///
/// Every grant is normalized independently; the set must keep at least one
/// permanent grant.
pub fn build_role_set(
    grants: &[RoleGrant],
    now: DateTime<Utc>,
) -> AppResult<Vec<NormalizedRoleGrant>> {
    let mut has_permanent_role = false;
    let mut roles = Vec::with_capacity(grants.len());

    for grant in grants {
        let normalized = grant.normalize(now)?;
        has_permanent_role |= !normalized.is_temporary;
        roles.push(normalized);
    }

    if !has_permanent_role {
        return Err(AppError::Validation(
            "must have at least one permanent role".to_owned(),
        ));
    }

    Ok(roles)
}
