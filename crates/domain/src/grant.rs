use chrono::{DateTime, SecondsFormat, Utc};
use groupbind_core::{AppError, AppResult, NonEmptyString};
use serde::{Deserialize, Serialize};

/// Range assigned to temporary grants that do not specify one.
pub const TEMPORARY_RANGE_DEFAULT: &str = "1h";

/// How a temporary grant's expiry is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemporaryMode {
    /// Grant never expires.
    #[default]
    None,
    /// Grant expires `temporary_range` after its start time.
    Relative,
}

impl TemporaryMode {
    /// Returns the wire value for this mode.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "",
            Self::Relative => "relative",
        }
    }

    /// Parses a wire value, treating unknown or empty values as no mode.
    #[must_use]
    pub fn from_wire(value: &str) -> Self {
        match value {
            "relative" => Self::Relative,
            _ => Self::None,
        }
    }
}

/// One role grant as authored by the user and recorded in state.
///
/// Optional fields are `None` when unset, which the host diff engine treats
/// differently from an explicit value.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RoleGrant {
    /// Role slug, or the custom role slug for custom roles.
    pub role_slug: String,
    /// Whether the grant expires. Unset behaves as `false`.
    pub is_temporary: Option<bool>,
    /// Duration string such as `1h` or `1d`.
    pub temporary_range: Option<String>,
    /// RFC 3339 start of the temporary access window.
    pub temporary_access_start_time: Option<String>,
}

impl RoleGrant {
    /// Creates a permanent grant with all optional fields unset.
    #[must_use]
    pub fn permanent(role_slug: impl Into<String>) -> Self {
        Self {
            role_slug: role_slug.into(),
            ..Self::default()
        }
    }

    /// Creates a temporary grant with the given optional range and start time.
    #[must_use]
    pub fn temporary(
        role_slug: impl Into<String>,
        temporary_range: Option<&str>,
        temporary_access_start_time: Option<&str>,
    ) -> Self {
        Self {
            role_slug: role_slug.into(),
            is_temporary: Some(true),
            temporary_range: temporary_range.map(str::to_owned),
            temporary_access_start_time: temporary_access_start_time.map(str::to_owned),
        }
    }

    /// Returns the effective temporary flag.
    #[must_use]
    pub fn is_temporary(&self) -> bool {
        self.is_temporary.unwrap_or(false)
    }

    /// Normalizes temporal fields into the wire shape.
    ///
    /// `now` is used as the start time when none was provided.
    pub fn normalize(&self, now: DateTime<Utc>) -> AppResult<NormalizedRoleGrant> {
        let role_slug = NonEmptyString::for_field("role_slug", self.role_slug.as_str())?;
        let is_temporary = self.is_temporary();

        let temporary_access_start_time = match self
            .temporary_access_start_time
            .as_deref()
            .filter(|value| !value.is_empty())
        {
            Some(value) => parse_start_time(role_slug.as_str(), value)?,
            None => now,
        };

        let (temporary_mode, temporary_range) = if is_temporary {
            let range = self
                .temporary_range
                .as_deref()
                .filter(|value| !value.is_empty())
                .unwrap_or(TEMPORARY_RANGE_DEFAULT);
            (TemporaryMode::Relative, range.to_owned())
        } else {
            (TemporaryMode::None, String::new())
        };

        Ok(NormalizedRoleGrant {
            role_slug: role_slug.into(),
            is_temporary,
            temporary_mode,
            temporary_range,
            temporary_access_start_time,
        })
    }
}

fn parse_start_time(role_slug: &str, value: &str) -> AppResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(|error| {
            AppError::Validation(format!(
                "invalid temporary_access_start_time '{value}' for role '{role_slug}': must be an RFC 3339 timestamp ({error})"
            ))
        })
}

/// Formats a timestamp the way it is recorded in state.
#[must_use]
pub fn format_timestamp(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Canonical grant sent to the management API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedRoleGrant {
    /// Role slug.
    pub role_slug: String,
    /// Whether the grant expires.
    pub is_temporary: bool,
    /// Expiry mode, `Relative` exactly when temporary.
    pub temporary_mode: TemporaryMode,
    /// Expiry range, empty when not temporary.
    pub temporary_range: String,
    /// Start of the access window.
    pub temporary_access_start_time: DateTime<Utc>,
}

/// Grant as reported back by the management API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObservedRoleGrant {
    /// Built-in role slug, or a placeholder for custom roles.
    pub role_slug: String,
    /// Custom role id when the grant refers to a custom role.
    pub custom_role_id: Option<String>,
    /// Custom role slug when the grant refers to a custom role.
    pub custom_role_slug: Option<String>,
    /// Whether the grant expires.
    pub is_temporary: bool,
    /// Expiry mode reported by the server.
    pub temporary_mode: TemporaryMode,
    /// Expiry range reported by the server.
    pub temporary_range: String,
    /// Start of the access window, when reported.
    pub temporary_access_start_time: Option<DateTime<Utc>>,
}

impl ObservedRoleGrant {
    /// Returns the slug used to match this grant against recorded state.
    ///
    /// A non-empty custom role slug always wins over the reported role slug.
    #[must_use]
    pub fn effective_slug(&self) -> &str {
        self.custom_role_slug
            .as_deref()
            .filter(|slug| !slug.is_empty())
            .unwrap_or(self.role_slug.as_str())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, TimeZone, Utc};
    use groupbind_core::AppError;

    use super::{ObservedRoleGrant, RoleGrant, TEMPORARY_RANGE_DEFAULT, TemporaryMode};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 2, 15, 4, 5)
            .single()
            .unwrap_or_else(|| unreachable!())
    }

    #[test]
    fn temporary_grant_without_range_defaults_to_one_hour() {
        let normalized = RoleGrant::temporary("viewer", None, None)
            .normalize(now())
            .unwrap_or_else(|_| unreachable!());

        assert_eq!(normalized.temporary_range, TEMPORARY_RANGE_DEFAULT);
        assert_eq!(normalized.temporary_mode, TemporaryMode::Relative);
        assert_eq!(normalized.temporary_access_start_time, now());
    }

    #[test]
    fn empty_range_and_start_time_are_treated_as_unset() {
        let normalized = RoleGrant::temporary("viewer", Some(""), Some(""))
            .normalize(now())
            .unwrap_or_else(|_| unreachable!());

        assert_eq!(normalized.temporary_range, "1h");
        assert_eq!(normalized.temporary_access_start_time, now());
    }

    #[test]
    fn temporary_grant_keeps_explicit_range_and_start_time() {
        let grant = RoleGrant::temporary("viewer", Some("1d"), Some("2024-03-01T10:00:00+02:00"));

        let normalized = grant.normalize(now()).unwrap_or_else(|_| unreachable!());

        assert_eq!(normalized.temporary_range, "1d");
        assert_eq!(
            normalized.temporary_access_start_time,
            Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0)
                .single()
                .unwrap_or_else(|| unreachable!())
        );
    }

    #[test]
    fn permanent_grant_clears_mode_and_range() {
        let grant = RoleGrant {
            role_slug: "admin".to_owned(),
            is_temporary: Some(false),
            temporary_range: Some("5h".to_owned()),
            temporary_access_start_time: None,
        };

        let normalized = grant.normalize(now()).unwrap_or_else(|_| unreachable!());

        assert!(!normalized.is_temporary);
        assert_eq!(normalized.temporary_mode, TemporaryMode::None);
        assert!(normalized.temporary_range.is_empty());
    }

    #[test]
    fn malformed_start_time_names_role_and_value() {
        let result = RoleGrant::temporary("viewer", None, Some("yesterday")).normalize(now());

        match result {
            Err(AppError::Validation(message)) => {
                assert!(message.contains("viewer"));
                assert!(message.contains("yesterday"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn start_time_without_offset_is_rejected() {
        let result =
            RoleGrant::temporary("viewer", None, Some("2024-01-02T15:04:05")).normalize(now());
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn blank_role_slug_is_rejected() {
        let result = RoleGrant::permanent("  ").normalize(now());
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn custom_role_slug_wins_when_reported() {
        let observed = ObservedRoleGrant {
            role_slug: "custom".to_owned(),
            custom_role_id: Some("c-1".to_owned()),
            custom_role_slug: Some("auditor".to_owned()),
            is_temporary: false,
            temporary_mode: TemporaryMode::None,
            temporary_range: String::new(),
            temporary_access_start_time: None,
        };
        assert_eq!(observed.effective_slug(), "auditor");

        let built_in = ObservedRoleGrant {
            custom_role_slug: Some(String::new()),
            role_slug: "admin".to_owned(),
            ..observed
        };
        assert_eq!(built_in.effective_slug(), "admin");
    }
}
