use crate::context::{self, BuildingContext, ContextError};
use crate::fly::{self, FlyClient, FlyError};
use crate::github::{GithubClient, REPOSITORY_ENV};
use crate::orchestration::{self, RunSettings};
use crate::shared::logging;
use std::path::PathBuf;

pub mod inputs;
pub mod outputs;

pub use inputs::ActionInputs;
pub use outputs::write_outputs;

pub const WORKSPACE_ENV: &str = "GITHUB_WORKSPACE";

/// Errors that abort the whole run before any project is processed.
/// Everything downstream of setup is contained per project and can only
/// show up in the outcome lists.
#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    #[error("input `token` is required")]
    MissingToken,
    #[error("invalid `{input}` input line `{line}`: expected KEY=VALUE")]
    InvalidKeyValue { input: &'static str, line: String },
    #[error("`GITHUB_REPOSITORY` is not set")]
    MissingRepository,
    #[error("failed to write outputs to {path}: {source}")]
    OutputWrite {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Context(#[from] ContextError),
    #[error(transparent)]
    Fly(#[from] FlyError),
}

pub fn run() -> Result<(), SetupError> {
    let inputs = ActionInputs::from_env()?;

    let event = context::read_event()?;
    let (environment, action, pull_request) = context::resolve_event(&event, &inputs.main_branch)?;
    logging::info(&format!(
        "resolved event `{}` on `{}` to environment `{environment}`, action `{action}`",
        event.name, event.git_ref
    ));

    let mut building = BuildingContext::default();
    building.environment = Some(environment);
    building.action = Some(action);
    building.pull_request = pull_request;
    building.env = inputs.env.clone();
    building.secrets = inputs.secrets.clone();

    let session = fly::authenticate(
        &fly::session::default_binary(),
        inputs.fly_api_token.as_deref(),
        true,
    )?;
    let client = FlyClient::new(session);

    let repository =
        std::env::var(REPOSITORY_ENV).map_err(|_| SetupError::MissingRepository)?;
    let github = GithubClient::new(repository, inputs.token.clone());

    let settings = RunSettings {
        org: inputs.fly_org.clone(),
        region: inputs.fly_region.clone(),
        opt_out_depot_builder: inputs.opt_out_depot_builder,
    };
    let workspace_root = std::env::var(WORKSPACE_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("."));

    // The one assert-then-proceed gate: nothing mutating runs on a context
    // that did not validate as a whole.
    let context = building.validate()?;

    let report =
        orchestration::execute_run(&client, &github, &context, &settings, &workspace_root)?;
    write_outputs(&report)?;
    Ok(())
}
