use std::collections::HashMap;

use crate::grant::{ObservedRoleGrant, RoleGrant, TEMPORARY_RANGE_DEFAULT, format_timestamp};

/// Reconciles observed grants against the previously recorded grants.
///
/// The management API fills in defaults the user never configured. Those
/// values are reset to unset so they do not show up as drift. Grants are
/// matched by slug; the result contains exactly the observed grants.
#[must_use]
pub fn smooth_observed_roles(
    recorded: &[RoleGrant],
    observed: &[ObservedRoleGrant],
) -> Vec<RoleGrant> {
    let recorded_by_slug: HashMap<&str, &RoleGrant> = recorded
        .iter()
        .map(|grant| (grant.role_slug.as_str(), grant))
        .collect();

    observed
        .iter()
        .map(|grant| {
            let previous = recorded_by_slug.get(grant.effective_slug()).copied();
            smooth_grant(previous, grant)
        })
        .collect()
}

fn smooth_grant(previous: Option<&RoleGrant>, observed: &ObservedRoleGrant) -> RoleGrant {
    let mut presented = RoleGrant {
        role_slug: observed.effective_slug().to_owned(),
        is_temporary: Some(observed.is_temporary),
        temporary_range: Some(observed.temporary_range.clone()),
        temporary_access_start_time: observed.temporary_access_start_time.map(format_timestamp),
    };

    if let Some(previous) = previous {
        if previous.is_temporary == Some(true)
            && observed.is_temporary
            && previous.temporary_range.is_none()
            && observed.temporary_range == TEMPORARY_RANGE_DEFAULT
        {
            presented.temporary_range = None;
        }

        if previous.is_temporary.is_none() && !observed.is_temporary {
            presented.is_temporary = None;
        }
    }

    // Non-temporary grants never carry temporal fields.
    if !observed.is_temporary {
        presented.temporary_range = None;
        presented.temporary_access_start_time = None;
    }

    presented
}
