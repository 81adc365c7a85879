//! groupbind command line reconciler.
//!
//! Runs one lifecycle operation per invocation. State records are read from
//! and written as JSON; the new state goes to stdout, diagnostics to stderr.

#![forbid(unsafe_code)]

mod cli_config;

use std::fs;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use groupbind_application::{
    BindingLifecycle, Diagnostic, ProjectGroupService, ReadOutcome, ReconcilerConfig,
};
use groupbind_core::{AppError, AppResult};
use groupbind_domain::ProjectGroupBinding;
use groupbind_infrastructure::HttpProjectGroupApi;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use cli_config::{Cli, CliConfig, Operation};

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(code) => code,
        Err(error) => {
            error!(error = %error, "groupbind failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> AppResult<ExitCode> {
    let config = CliConfig::from_cli(&cli)?;
    let lifecycle = build_lifecycle(&config)?;

    info!(
        operation = cli.operation.as_str(),
        api_base_url = %config.api_base_url,
        auth_mode = %config.auth_mode,
        "running lifecycle operation"
    );

    let result = match &cli.operation {
        Operation::Create { desired } => lifecycle.create(read_state(desired)?).await.map(Some),
        Operation::Read { prior } => {
            lifecycle
                .read(read_state(prior)?)
                .await
                .map(|outcome| match outcome {
                    ReadOutcome::Present(binding) => Some(binding),
                    ReadOutcome::Absent => None,
                })
        }
        Operation::Update { desired, prior } => lifecycle
            .update(read_state(desired)?, read_state(prior)?)
            .await
            .map(Some),
        Operation::Delete { prior } => {
            lifecycle
                .delete(read_state(prior)?)
                .await
                .map(|outcome| {
                    report(&outcome.warnings);
                    None
                })
        }
    };

    match result {
        Ok(state) => {
            write_state(state.as_ref())?;
            Ok(ExitCode::SUCCESS)
        }
        Err(diagnostics) => {
            report(diagnostics.as_slice());
            Ok(ExitCode::FAILURE)
        }
    }
}

fn build_lifecycle(config: &CliConfig) -> AppResult<Arc<dyn BindingLifecycle>> {
    let http_client = reqwest::Client::builder()
        .timeout(config.http_timeout)
        .build()
        .map_err(|error| AppError::Internal(format!("failed to build HTTP client: {error}")))?;
    let api = HttpProjectGroupApi::new(
        http_client,
        config.api_base_url.as_str(),
        config.access_token.as_str(),
    )?;

    Ok(Arc::new(ProjectGroupService::new(
        Arc::new(api),
        ReconcilerConfig {
            auth_mode: config.auth_mode,
        },
    )))
}

fn read_state(path: &Path) -> AppResult<ProjectGroupBinding> {
    let contents = fs::read_to_string(path).map_err(|error| {
        AppError::Validation(format!("failed to read state file '{}': {error}", path.display()))
    })?;

    serde_json::from_str(contents.as_str()).map_err(|error| {
        AppError::Validation(format!(
            "invalid state file '{}': {error}",
            path.display()
        ))
    })
}

fn write_state(state: Option<&ProjectGroupBinding>) -> AppResult<()> {
    let rendered = serde_json::to_string_pretty(&state)
        .map_err(|error| AppError::Internal(format!("failed to render state: {error}")))?;
    println!("{rendered}");
    Ok(())
}

fn report(diagnostics: &[Diagnostic]) {
    for diagnostic in diagnostics {
        eprintln!("{diagnostic}");
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}
