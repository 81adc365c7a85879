use chrono::{DateTime, Utc};
use groupbind_domain::{NormalizedRoleGrant, ObservedRoleGrant, TemporaryMode};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub(super) struct RolesRequest<'a> {
    roles: Vec<RoleRequest<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RoleRequest<'a> {
    role: &'a str,
    is_temporary: bool,
    temporary_mode: &'static str,
    temporary_range: &'a str,
    temporary_access_start_time: DateTime<Utc>,
}

impl<'a> RolesRequest<'a> {
    pub(super) fn from_roles(roles: &'a [NormalizedRoleGrant]) -> Self {
        Self {
            roles: roles
                .iter()
                .map(|role| RoleRequest {
                    role: role.role_slug.as_str(),
                    is_temporary: role.is_temporary,
                    temporary_mode: role.temporary_mode.as_str(),
                    temporary_range: role.temporary_range.as_str(),
                    temporary_access_start_time: role.temporary_access_start_time,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct ProjectResponse {
    pub(super) workspace: ProjectDetail,
}

#[derive(Debug, Deserialize)]
pub(super) struct ProjectDetail {
    pub(super) slug: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct GroupMembershipResponse {
    pub(super) group_membership: GroupMembershipDetail,
}

#[derive(Debug, Deserialize)]
pub(super) struct GroupMembershipDetail {
    pub(super) id: String,
    #[serde(default)]
    roles: Vec<MembershipRoleResponse>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MembershipRoleResponse {
    role: String,
    #[serde(default)]
    custom_role_id: Option<String>,
    #[serde(default)]
    custom_role_slug: Option<String>,
    #[serde(default)]
    is_temporary: Option<bool>,
    #[serde(default)]
    temporary_mode: Option<String>,
    #[serde(default)]
    temporary_range: Option<String>,
    #[serde(default)]
    temporary_access_start_time: Option<DateTime<Utc>>,
}

impl GroupMembershipResponse {
    pub(super) fn into_observed_roles(self) -> Vec<ObservedRoleGrant> {
        self.group_membership
            .roles
            .into_iter()
            .map(|role| ObservedRoleGrant {
                role_slug: role.role,
                custom_role_id: role.custom_role_id.filter(|id| !id.is_empty()),
                custom_role_slug: role.custom_role_slug.filter(|slug| !slug.is_empty()),
                is_temporary: role.is_temporary.unwrap_or(false),
                temporary_mode: TemporaryMode::from_wire(
                    role.temporary_mode.as_deref().unwrap_or_default(),
                ),
                temporary_range: role.temporary_range.unwrap_or_default(),
                temporary_access_start_time: role.temporary_access_start_time,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use groupbind_domain::{NormalizedRoleGrant, TemporaryMode};
    use serde_json::json;

    use super::{GroupMembershipResponse, RolesRequest};

    #[test]
    fn request_body_uses_wire_field_names() {
        let start = Utc
            .with_ymd_and_hms(2024, 1, 2, 15, 4, 5)
            .single()
            .unwrap_or_else(|| unreachable!());
        let roles = vec![NormalizedRoleGrant {
            role_slug: "viewer".to_owned(),
            is_temporary: true,
            temporary_mode: TemporaryMode::Relative,
            temporary_range: "1h".to_owned(),
            temporary_access_start_time: start,
        }];

        let body = serde_json::to_value(RolesRequest::from_roles(&roles))
            .unwrap_or_else(|_| unreachable!());

        assert_eq!(
            body,
            json!({
                "roles": [{
                    "role": "viewer",
                    "isTemporary": true,
                    "temporaryMode": "relative",
                    "temporaryRange": "1h",
                    "temporaryAccessStartTime": "2024-01-02T15:04:05Z"
                }]
            })
        );
    }

    #[test]
    fn membership_response_maps_custom_roles_and_nulls() {
        let response: GroupMembershipResponse = serde_json::from_value(json!({
            "groupMembership": {
                "id": "m-1",
                "roles": [
                    {
                        "role": "custom",
                        "customRoleId": "c-1",
                        "customRoleSlug": "auditor",
                        "isTemporary": false,
                        "temporaryMode": null,
                        "temporaryRange": null,
                        "temporaryAccessStartTime": null
                    },
                    {
                        "role": "viewer",
                        "customRoleId": "",
                        "isTemporary": true,
                        "temporaryMode": "relative",
                        "temporaryRange": "1h",
                        "temporaryAccessStartTime": "2024-01-02T15:04:05.000Z"
                    }
                ]
            }
        }))
        .unwrap_or_else(|_| unreachable!());

        let roles = response.into_observed_roles();

        assert_eq!(roles[0].effective_slug(), "auditor");
        assert!(!roles[0].is_temporary);
        assert!(roles[0].temporary_range.is_empty());
        assert_eq!(roles[1].custom_role_id, None);
        assert_eq!(roles[1].temporary_mode, TemporaryMode::Relative);
        assert_eq!(
            roles[1].temporary_access_start_time,
            Utc.with_ymd_and_hms(2024, 1, 2, 15, 4, 5).single()
        );
    }
}
