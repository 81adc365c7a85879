use groupbind_core::{AppError, AppResult, NonEmptyString};
use serde::{Deserialize, Serialize};

use crate::grant::RoleGrant;

/// Binding between an external group and a project, carrying role grants.
///
/// The same record is used for desired configuration and recorded state;
/// `project_slug` and `membership_id` stay unset until the binding exists.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProjectGroupBinding {
    /// Project identifier supplied by the user.
    pub project_id: String,
    /// Project slug resolved on creation.
    #[serde(default)]
    pub project_slug: Option<String>,
    /// External group slug, immutable after creation.
    pub group_slug: String,
    /// Membership identifier assigned by the management API.
    #[serde(default)]
    pub membership_id: Option<String>,
    /// Role grants, compared as a set.
    #[serde(default)]
    pub roles: Vec<RoleGrant>,
}

impl ProjectGroupBinding {
    /// Validates the fields required by every lifecycle operation.
    pub fn validate_required(&self) -> AppResult<()> {
        NonEmptyString::for_field("project_id", self.project_id.as_str())?;
        NonEmptyString::for_field("group_slug", self.group_slug.as_str())?;
        Ok(())
    }

    /// Returns the resolved project slug recorded on creation.
    pub fn recorded_project_slug(&self) -> AppResult<&str> {
        self.project_slug
            .as_deref()
            .filter(|slug| !slug.trim().is_empty())
            .ok_or_else(|| {
                AppError::Validation(format!(
                    "binding for group '{}' has no recorded project_slug",
                    self.group_slug
                ))
            })
    }

    /// Rejects a desired record that changes the group of an existing binding.
    pub fn ensure_same_group(&self, recorded: &Self) -> AppResult<()> {
        if self.group_slug != recorded.group_slug {
            return Err(AppError::Validation(format!(
                "cannot change group slug, previous group: {}, new group: {}",
                recorded.group_slug, self.group_slug
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use groupbind_core::AppError;

    use super::ProjectGroupBinding;
    use crate::grant::RoleGrant;

    fn binding(group_slug: &str) -> ProjectGroupBinding {
        ProjectGroupBinding {
            project_id: "proj-1".to_owned(),
            group_slug: group_slug.to_owned(),
            roles: vec![RoleGrant::permanent("admin")],
            ..ProjectGroupBinding::default()
        }
    }

    #[test]
    fn blank_group_slug_is_rejected() {
        assert!(matches!(
            binding(" ").validate_required(),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn group_change_names_both_values() {
        let result = binding("platform").ensure_same_group(&binding("security"));

        match result {
            Err(AppError::Validation(message)) => {
                assert!(message.contains("previous group: security"));
                assert!(message.contains("new group: platform"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn missing_project_slug_is_reported() {
        assert!(binding("platform").recorded_project_slug().is_err());
    }

    #[test]
    fn state_record_deserializes_with_unset_fields() {
        let json = r#"{
            "project_id": "proj-1",
            "group_slug": "platform",
            "roles": [
                {"role_slug": "admin"},
                {"role_slug": "viewer", "is_temporary": true, "temporary_range": null}
            ]
        }"#;

        let parsed: ProjectGroupBinding =
            serde_json::from_str(json).unwrap_or_else(|_| unreachable!());

        assert_eq!(parsed.project_slug, None);
        assert_eq!(parsed.roles[0], RoleGrant::permanent("admin"));
        assert_eq!(parsed.roles[1], RoleGrant::temporary("viewer", None, None));
    }
}
