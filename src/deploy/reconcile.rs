use crate::context::Environment;
use crate::deploy::{missing_secrets, validate_app_name, DeployError};
use crate::fly::{soft, DeployOptions, FlyClient};
use crate::shared::logging;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Desired state for one application.
#[derive(Debug, Clone)]
pub struct ReconcileOptions {
    pub app: Option<String>,
    pub config: Option<PathBuf>,
    pub region: Option<String>,
    pub environment: Environment,
    pub org: Option<String>,
    pub env: BTreeMap<String, String>,
    pub secrets: BTreeMap<String, String>,
    pub depot_builder: bool,
}

/// Converges the remote application to the desired state and deploys it.
/// Strictly sequential; the first failing step aborts this project only
/// and the caller records the outcome.
///
/// Returns the validated app name the deploy ran under so the caller can
/// fetch the final status.
pub fn reconcile_and_deploy(
    client: &FlyClient,
    options: &ReconcileOptions,
) -> Result<String, DeployError> {
    let config = options
        .config
        .clone()
        .or_else(|| client.default_target().config.clone())
        .ok_or(DeployError::ConfigRequired)?;

    // The platform config is read locally; the project may not exist
    // remotely yet.
    let discovered = client.app_name_from_config(&config)?;

    let resolved = options
        .app
        .clone()
        .or_else(|| client.default_target().app.clone())
        .unwrap_or_else(|| discovered.clone());

    let existing = soft(client.app_status(&resolved))?;
    let (app, existing_secrets) = match existing {
        Some(status) => {
            logging::info(&format!("app `{}` exists; updating in place", status.name));
            // The app is known to exist, so a secrets lookup failure here
            // is a real error rather than an absence.
            let secrets = client.app_secrets(&status.name)?;
            (status.name, secrets)
        }
        None => {
            let created = client.create_app(Some(&resolved), options.org.as_deref())?;
            (created.name, Vec::new())
        }
    };

    let (to_stage, skipped) = missing_secrets(&options.secrets, &existing_secrets);
    for key in &skipped {
        logging::info(&format!(
            "secret `{key}` already set on `{app}`; keeping the remote value"
        ));
    }
    client.stage_secrets(&app, &to_stage)?;

    // An explicitly supplied app name always wins over the name the app
    // was discovered or created under, so a deploy can target an alias.
    let deploy_app = options.app.clone().unwrap_or(app);

    let mut env = options.env.clone();
    env.insert("DEPLOY_ENV".to_string(), options.environment.to_string());

    client.deploy(&DeployOptions {
        app: Some(deploy_app.clone()),
        config,
        region: options.region.clone(),
        env,
        depot_builder: options.depot_builder,
    })?;

    validate_app_name(&deploy_app)?;
    Ok(deploy_app)
}
