use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use groupbind_core::{AppError, AppResult, AuthMode, NonEmptyString};

/// Command line surface of the reconciler.
#[derive(Debug, Parser)]
#[command(name = "groupbind")]
#[command(about = "Run one project group binding lifecycle operation")]
pub struct Cli {
    /// Lifecycle operation to run.
    #[command(subcommand)]
    pub operation: Operation,

    /// Management API base URL.
    #[arg(
        long,
        env = "GROUPBIND_API_BASE_URL",
        default_value = "https://app.infisical.com"
    )]
    pub api_base_url: String,

    /// Access token sent as bearer credentials.
    #[arg(long, env = "GROUPBIND_ACCESS_TOKEN", hide_env_values = true)]
    pub access_token: String,

    /// Authentication mode of the access token.
    #[arg(long, env = "GROUPBIND_AUTH_MODE", default_value = "machine_identity")]
    pub auth_mode: AuthMode,

    /// HTTP client timeout in seconds.
    #[arg(long, env = "GROUPBIND_HTTP_TIMEOUT_SECS", default_value_t = 30)]
    pub http_timeout_secs: u64,
}

/// Lifecycle operation and its state files.
#[derive(Debug, Subcommand)]
pub enum Operation {
    /// Create the binding from desired state.
    Create {
        /// Desired state JSON file.
        #[arg(long)]
        desired: PathBuf,
    },
    /// Refresh recorded state from the management API.
    Read {
        /// Recorded state JSON file.
        #[arg(long)]
        prior: PathBuf,
    },
    /// Replace the role set of an existing binding.
    Update {
        /// Desired state JSON file.
        #[arg(long)]
        desired: PathBuf,
        /// Recorded state JSON file.
        #[arg(long)]
        prior: PathBuf,
    },
    /// Remove the binding.
    Delete {
        /// Recorded state JSON file.
        #[arg(long)]
        prior: PathBuf,
    },
}

impl Operation {
    /// Returns the operation name used in logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create { .. } => "create",
            Self::Read { .. } => "read",
            Self::Update { .. } => "update",
            Self::Delete { .. } => "delete",
        }
    }
}

/// Validated runtime configuration.
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub api_base_url: String,
    pub access_token: String,
    pub auth_mode: AuthMode,
    pub http_timeout: Duration,
}

impl CliConfig {
    pub fn from_cli(cli: &Cli) -> AppResult<Self> {
        let access_token =
            NonEmptyString::for_field("GROUPBIND_ACCESS_TOKEN", cli.access_token.as_str())?;
        let api_base_url = cli.api_base_url.trim().trim_end_matches('/').to_owned();
        if api_base_url.is_empty() {
            return Err(AppError::Validation(
                "GROUPBIND_API_BASE_URL is required".to_owned(),
            ));
        }

        if cli.http_timeout_secs == 0 {
            return Err(AppError::Validation(
                "GROUPBIND_HTTP_TIMEOUT_SECS must be greater than zero".to_owned(),
            ));
        }

        Ok(Self {
            api_base_url,
            access_token: access_token.into(),
            auth_mode: cli.auth_mode,
            http_timeout: Duration::from_secs(cli.http_timeout_secs),
        })
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use groupbind_core::AuthMode;

    use super::{Cli, CliConfig, Operation};

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap_or_else(|error| panic!("{error}"))
    }

    #[test]
    fn flags_override_defaults() {
        let cli = parse(&[
            "groupbind",
            "--access-token",
            "secret",
            "--auth-mode",
            "service_token",
            "--api-base-url",
            "https://secrets.example.com/",
            "read",
            "--prior",
            "state.json",
        ]);

        let config = CliConfig::from_cli(&cli).unwrap_or_else(|_| unreachable!());

        assert_eq!(config.auth_mode, AuthMode::ServiceToken);
        assert_eq!(config.api_base_url, "https://secrets.example.com");
        assert!(matches!(cli.operation, Operation::Read { .. }));
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let cli = parse(&[
            "groupbind",
            "--access-token",
            "secret",
            "--http-timeout-secs",
            "0",
            "delete",
            "--prior",
            "state.json",
        ]);

        assert!(CliConfig::from_cli(&cli).is_err());
    }

    #[test]
    fn unknown_auth_mode_fails_parsing() {
        let result = Cli::try_parse_from([
            "groupbind",
            "--access-token",
            "secret",
            "--auth-mode",
            "oidc",
            "read",
            "--prior",
            "state.json",
        ]);

        assert!(result.is_err());
    }
}
