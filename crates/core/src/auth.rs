use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::AppError;

/// Authentication mode the management API client was configured with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthMode {
    /// Machine identity (universal auth) access token.
    #[default]
    MachineIdentity,
    /// Legacy project-scoped service token.
    ServiceToken,
}

impl AuthMode {
    /// Returns a stable configuration value for this mode.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MachineIdentity => "machine_identity",
            Self::ServiceToken => "service_token",
        }
    }

    /// Returns whether project group bindings can be managed with this mode.
    #[must_use]
    pub fn supports_binding_management(&self) -> bool {
        matches!(self, Self::MachineIdentity)
    }
}

impl Display for AuthMode {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for AuthMode {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "machine_identity" => Ok(Self::MachineIdentity),
            "service_token" => Ok(Self::ServiceToken),
            _ => Err(AppError::Validation(format!(
                "unknown auth mode '{value}'"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::AuthMode;

    #[test]
    fn only_machine_identity_manages_bindings() {
        assert!(AuthMode::MachineIdentity.supports_binding_management());
        assert!(!AuthMode::ServiceToken.supports_binding_management());
    }

    #[test]
    fn auth_mode_roundtrip_config_value() {
        let restored = AuthMode::from_str(AuthMode::ServiceToken.as_str());
        assert!(matches!(restored, Ok(AuthMode::ServiceToken)));
        assert!(AuthMode::from_str("oidc").is_err());
    }
}
