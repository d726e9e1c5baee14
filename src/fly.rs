use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

pub mod client;
pub mod invocation;
pub mod runner;
pub mod session;

pub use client::FlyClient;
pub use invocation::resolve_target_args;
pub use runner::{command_form, run_fly, CommandOutput};
pub use session::{authenticate, AuthMode, FlySession};

pub const DEFAULT_FLY_BINARY: &str = "flyctl";

#[derive(Debug, thiserror::Error)]
pub enum FlyError {
    #[error("fly CLI must be installed: `{binary}` was not found on PATH")]
    CliMissing { binary: String },
    #[error("fly CLI is not authenticated: no active login and no usable token")]
    NotAuthenticated,
    #[error("failed to spawn `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
    #[error("command `{command}` failed with exit code {exit_code}: {output}")]
    Command {
        command: String,
        exit_code: i32,
        output: String,
    },
    #[error("command `{command}` returned an unexpected response shape: {reason}")]
    Response { command: String, reason: String },
}

/// Converts a command failure into an absent result. Response-shape errors
/// keep propagating: those signal drift between this crate and the platform
/// API, not a missing resource.
pub fn soft<T>(result: Result<T, FlyError>) -> Result<Option<T>, FlyError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(FlyError::Command { .. }) => Ok(None),
        Err(err) => Err(err),
    }
}

/// An operation target. Resolution order is explicit argument, then the
/// client's default, then none. Both fields resolving at once is tolerated
/// and forwarded as-is; see `resolve_target_args`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Target {
    pub app: Option<String>,
    pub config: Option<PathBuf>,
}

impl Target {
    pub fn named(app: impl Into<String>) -> Self {
        Self {
            app: Some(app.into()),
            config: None,
        }
    }

    pub fn config_file(path: impl Into<PathBuf>) -> Self {
        Self {
            app: None,
            config: Some(path.into()),
        }
    }
}

/// Remote application snapshot. Queried fresh on every call, never cached.
#[derive(Debug, Clone, Deserialize)]
pub struct AppStatus {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Hostname", default)]
    pub hostname: String,
    #[serde(rename = "Deployed", default)]
    pub deployed: bool,
    #[serde(rename = "Version", default)]
    pub version: i64,
    #[serde(rename = "Status", default)]
    pub status: String,
}

/// One entry of an app's remote secret store. Values are never readable
/// remotely; only names and digests come back.
#[derive(Debug, Clone, Deserialize)]
pub struct SecretRecord {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Digest", default)]
    pub digest: String,
    #[serde(rename = "CreatedAt", default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CertStatus {
    #[serde(rename = "Hostname")]
    pub hostname: String,
    #[serde(rename = "Configured", default)]
    pub configured: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreatedApp {
    #[serde(rename = "Name")]
    pub name: String,
}

/// Input for the deploy verb. A config path is mandatory; an app name alone
/// cannot drive a deploy.
#[derive(Debug, Clone)]
pub struct DeployOptions {
    pub app: Option<String>,
    pub config: PathBuf,
    pub region: Option<String>,
    pub env: BTreeMap<String, String>,
    pub depot_builder: bool,
}
