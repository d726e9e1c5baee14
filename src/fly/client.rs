use crate::fly::{
    invocation, runner, soft, AppStatus, CertStatus, CommandOutput, CreatedApp, DeployOptions,
    FlyError, FlySession, SecretRecord, Target,
};
use crate::shared::logging;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::path::Path;

/// Typed front over the platform CLI. Holds the immutable session and an
/// optional default target that fills in whatever an explicit target
/// leaves unset.
#[derive(Debug, Clone)]
pub struct FlyClient {
    session: FlySession,
    default_target: Target,
}

/// Stdout of a successful command. A handful of verbs legitimately print
/// plain text (version strings and the like), so unparseable output is
/// carried as text rather than rejected.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandData {
    Json(serde_json::Value),
    Text(String),
}

impl FlyClient {
    pub fn new(session: FlySession) -> Self {
        Self {
            session,
            default_target: Target::default(),
        }
    }

    pub fn with_default_target(mut self, target: Target) -> Self {
        self.default_target = target;
        self
    }

    pub fn session(&self) -> &FlySession {
        &self.session
    }

    pub fn default_target(&self) -> &Target {
        &self.default_target
    }

    /// Runs one CLI command. For token sessions the access token goes in
    /// as the final arguments; login sessions run bare.
    pub fn execute(&self, mut args: Vec<String>) -> Result<CommandOutput, FlyError> {
        args.extend(self.session.token_args());
        runner::run_fly(self.session.binary(), &args)
    }

    /// Like `execute`, with stdout decoded as JSON when it parses and
    /// returned verbatim when it does not.
    pub fn execute_data(&self, args: Vec<String>) -> Result<CommandData, FlyError> {
        let output = self.execute(args)?;
        match serde_json::from_str(&output.stdout) {
            Ok(value) => Ok(CommandData::Json(value)),
            Err(_) => Ok(CommandData::Text(output.stdout.trim().to_string())),
        }
    }

    fn execute_typed<T: DeserializeOwned>(&self, args: Vec<String>) -> Result<T, FlyError> {
        let command = runner::command_form(self.session.binary(), &args);
        let output = self.execute(args)?;
        serde_json::from_str(&output.stdout).map_err(|err| FlyError::Response {
            command,
            reason: err.to_string(),
        })
    }

    pub fn version(&self) -> Result<String, FlyError> {
        match self.execute_data(vec!["version".to_string()])? {
            CommandData::Text(text) => Ok(text),
            CommandData::Json(value) => Ok(value
                .get("Version")
                .and_then(|v| v.as_str())
                .map(str::to_string)
                .unwrap_or_else(|| value.to_string())),
        }
    }

    pub fn app_status(&self, app: &str) -> Result<AppStatus, FlyError> {
        let target = invocation::resolve_target_args(&Target::named(app), &self.default_target);
        self.execute_typed(invocation::status_args(target))
    }

    pub fn app_secrets(&self, app: &str) -> Result<Vec<SecretRecord>, FlyError> {
        self.execute_typed(invocation::secrets_list_args(app))
    }

    pub fn app_certs(&self, app: &str) -> Result<Vec<CertStatus>, FlyError> {
        self.execute_typed(invocation::certs_list_args(app))
    }

    pub fn apps(&self) -> Result<Vec<AppStatus>, FlyError> {
        self.execute_typed(invocation::apps_list_args())
    }

    /// Secrets of every listed app. Apps that fail the per-app lookup are
    /// reported as absent rather than failing the sweep.
    pub fn all_secrets(&self) -> Result<Vec<(String, Vec<SecretRecord>)>, FlyError> {
        let mut collected = Vec::new();
        for app in self.apps()? {
            if let Some(secrets) = soft(self.app_secrets(&app.name))? {
                collected.push((app.name, secrets));
            }
        }
        Ok(collected)
    }

    pub fn all_certs(&self) -> Result<Vec<(String, Vec<CertStatus>)>, FlyError> {
        let mut collected = Vec::new();
        for app in self.apps()? {
            if let Some(certs) = soft(self.app_certs(&app.name))? {
                collected.push((app.name, certs));
            }
        }
        Ok(collected)
    }

    pub fn config_show(&self, target: &Target, local: bool) -> Result<serde_json::Value, FlyError> {
        let target = invocation::resolve_target_args(target, &self.default_target);
        self.execute_typed(invocation::config_show_args(target, local))
    }

    /// Reads the app name embedded in a platform config file. The file is
    /// never parsed here; the CLI's local-file config view owns the format.
    pub fn app_name_from_config(&self, config: &Path) -> Result<String, FlyError> {
        let target = Target::config_file(config);
        let shown = self.config_show(&target, true)?;
        shown
            .get("app")
            .and_then(|value| value.as_str())
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .ok_or_else(|| FlyError::Response {
                command: runner::command_form(
                    self.session.binary(),
                    &invocation::config_show_args(
                        invocation::resolve_target_args(&target, &self.default_target),
                        true,
                    ),
                ),
                reason: "config has no top-level `app` name".to_string(),
            })
    }

    pub fn create_app(&self, name: Option<&str>, org: Option<&str>) -> Result<CreatedApp, FlyError> {
        match name {
            Some(name) => logging::info(&format!("fly: creating app `{name}`")),
            None => logging::info("fly: creating app with a platform-generated name"),
        }
        self.execute_typed(invocation::create_app_args(name, org))
    }

    pub fn stage_secrets(
        &self,
        app: &str,
        secrets: &BTreeMap<String, String>,
    ) -> Result<(), FlyError> {
        if secrets.is_empty() {
            return Ok(());
        }
        self.execute(invocation::stage_secrets_args(app, secrets))?;
        Ok(())
    }

    /// Blocks until the remote deploy completes or fails; the CLI does its
    /// own release polling.
    pub fn deploy(&self, options: &DeployOptions) -> Result<(), FlyError> {
        self.execute(invocation::deploy_args(options))?;
        Ok(())
    }

    pub fn destroy_app(&self, app: &str) -> Result<(), FlyError> {
        self.execute(invocation::destroy_app_args(app))?;
        Ok(())
    }
}
