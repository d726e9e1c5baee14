use crate::context::{Action, Environment, RunContext};
use crate::deploy::{preview_name, preview_suffix, reconcile_and_deploy, ReconcileOptions};
use crate::discovery::{self, ProjectCandidate};
use crate::fly::{soft, FlyClient, FlyError};
use crate::github::GithubClient;
use crate::orchestration::outcome::{ProjectOutcome, RunReport, SkipReason};
use crate::orchestration::summary::render_summary;
use crate::shared::logging;
use std::path::Path;

#[derive(Debug, Clone, Default)]
pub struct RunSettings {
    pub org: Option<String>,
    pub region: Option<String>,
    pub opt_out_depot_builder: bool,
}

/// Runs the action the context resolved to, aggregates one outcome per
/// project, and publishes the preview summary comment when there is one to
/// publish. Individual project failures never escape this function, but a
/// failure before any per-project decision exists (listing the remote apps
/// for a destroy run) fails the whole run.
pub fn execute_run(
    client: &FlyClient,
    github: &GithubClient,
    context: &RunContext,
    settings: &RunSettings,
    workspace_root: &Path,
) -> Result<RunReport, FlyError> {
    let outcomes = match context.action() {
        Action::Deploy => run_deploy(client, context, settings, workspace_root),
        Action::Destroy => run_destroy(client, github)?,
    };

    if context.environment() == Environment::Preview {
        if let (Some(pull_request), Some(body)) =
            (context.pull_request(), render_summary(&outcomes))
        {
            if let Err(err) = github.create_issue_comment(pull_request, &body) {
                logging::warn(&format!("failed to publish the summary comment: {err}"));
            }
        }
    }

    Ok(RunReport {
        environment: context.environment().to_string(),
        outcomes,
    })
}

fn run_deploy(
    client: &FlyClient,
    context: &RunContext,
    settings: &RunSettings,
    workspace_root: &Path,
) -> Vec<ProjectOutcome> {
    let candidates = discovery::discover_projects(workspace_root);
    logging::info(&format!(
        "discovered {} candidate project(s) under {}",
        candidates.len(),
        workspace_root.display()
    ));

    candidates
        .iter()
        .map(|candidate| {
            logging::group(&format!("deploy {}", candidate.name));
            let outcome = deploy_project(client, context, settings, candidate);
            if let ProjectOutcome::Skip { id, reason } = &outcome {
                logging::warn(&format!("skipping `{id}`: {reason}"));
            }
            logging::endgroup();
            outcome
        })
        .collect()
}

fn deploy_project(
    client: &FlyClient,
    context: &RunContext,
    settings: &RunSettings,
    candidate: &ProjectCandidate,
) -> ProjectOutcome {
    let skip = |reason: SkipReason| ProjectOutcome::Skip {
        id: candidate.name.clone(),
        reason,
    };

    let metadata = match discovery::load_project_metadata(&candidate.root) {
        Ok(metadata) => metadata,
        Err(err) => {
            logging::info(&format!("{err}"));
            return skip(SkipReason::ProjectConfigMissing);
        }
    };
    let project = metadata.name.unwrap_or_else(|| candidate.name.clone());

    let descriptor = match discovery::find_descriptor(&candidate.root) {
        Ok(Some((path, descriptor))) => {
            logging::info(&format!("descriptor found at {}", path.display()));
            descriptor
        }
        Ok(None) => return skip(SkipReason::DescriptorMissing),
        Err(err) => {
            logging::info(&format!("{err}"));
            return skip(SkipReason::DescriptorMissing);
        }
    };

    if !descriptor.deploy {
        return skip(SkipReason::DeployDisabled);
    }

    let config = discovery::resolve_platform_config(&candidate.root, &descriptor);
    let base = match client.app_name_from_config(&config) {
        Ok(base) => base,
        Err(err) => {
            logging::info(&format!("{err}"));
            return skip(SkipReason::PlatformConfigMissing);
        }
    };

    let app_name = match context.pull_request() {
        Some(number) => preview_name(&base, number),
        None => base,
    };

    let mut env = context.env().clone();
    env.insert("APP_NAME".to_string(), app_name.clone());
    env.insert("APP_URL".to_string(), format!("https://{app_name}.fly.dev"));
    if let Some(number) = context.pull_request() {
        env.insert("PULL_REQUEST_NUMBER".to_string(), number.to_string());
    }
    if let Some(org) = &settings.org {
        env.insert("TENANT_ID".to_string(), org.clone());
    }

    let options = ReconcileOptions {
        app: Some(app_name),
        config: Some(config),
        region: settings.region.clone(),
        environment: context.environment(),
        org: settings.org.clone(),
        env,
        secrets: context.secrets().clone(),
        depot_builder: !settings.opt_out_depot_builder,
    };

    match reconcile_and_deploy(client, &options) {
        Ok(app) => {
            let url = deployed_url(client, &app);
            logging::notice(&format!("deployed `{project}` as `{app}` at {url}"));
            ProjectOutcome::Deploy {
                app,
                name: project,
                url,
            }
        }
        Err(err) => ProjectOutcome::Skip {
            id: project,
            reason: SkipReason::DeployFailed(err.to_string()),
        },
    }
}

fn deployed_url(client: &FlyClient, app: &str) -> String {
    match soft(client.app_status(app)) {
        Ok(Some(status)) if !status.hostname.is_empty() => {
            format!("https://{}", status.hostname)
        }
        _ => format!("https://{app}.fly.dev"),
    }
}

/// Tears preview apps down, one independent decision per app. A name
/// matching the preview pattern only nominates the app; the pull request
/// must be confirmed closed by the source-control host before anything is
/// destroyed. A failed app listing aborts the run: with no app list there
/// is no per-app decision to contain a failure in, and swallowing it would
/// report a clean run that destroyed nothing.
fn run_destroy(
    client: &FlyClient,
    github: &GithubClient,
) -> Result<Vec<ProjectOutcome>, FlyError> {
    let apps = client.apps()?;

    let mut outcomes = Vec::new();
    for app in apps {
        let Some(number) = preview_suffix(&app.name) else {
            continue;
        };
        match github.pull_request(number) {
            Ok(Some(pull_request)) if pull_request.is_closed() => {
                match client.destroy_app(&app.name) {
                    Ok(()) => {
                        logging::notice(&format!("destroyed `{}`", app.name));
                        outcomes.push(ProjectOutcome::Destroy { app: app.name });
                    }
                    Err(err) => outcomes.push(ProjectOutcome::Skip {
                        id: app.name,
                        reason: SkipReason::DestroyFailed(err.to_string()),
                    }),
                }
            }
            Ok(Some(_)) => {
                logging::info(&format!(
                    "pull request #{number} is still open; leaving `{}` in place",
                    app.name
                ));
            }
            Ok(None) => {
                logging::warn(&format!(
                    "no pull request #{number} found for `{}`; leaving it untouched",
                    app.name
                ));
            }
            Err(err) => outcomes.push(ProjectOutcome::Skip {
                id: app.name,
                reason: SkipReason::DestroyFailed(err.to_string()),
            }),
        }
    }
    Ok(outcomes)
}
