use std::collections::BTreeMap;

pub mod event;

pub use event::{read_event, resolve_event, EventInfo, PullRequestPayload};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Deploy,
    Destroy,
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::Deploy => write!(f, "deploy"),
            Action::Destroy => write!(f, "destroy"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Production,
    Preview,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Production => write!(f, "production"),
            Environment::Preview => write!(f, "preview"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ContextError {
    #[error("no environment can be derived from event `{event}` on ref `{git_ref}`")]
    UnsupportedEvent { event: String, git_ref: String },
    #[error("event payload has no pull request")]
    MissingPullRequestPayload,
    #[error("failed to read event payload {path}: {source}")]
    PayloadRead {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid json in event payload {path}: {source}")]
    PayloadParse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("`{variable}` is not set")]
    MissingVariable { variable: &'static str },
    #[error("run context is missing `{field}`")]
    Incomplete { field: &'static str },
    #[error("a preview run requires a pull request number")]
    MissingPullRequest,
}

/// Accumulator for the run context. Filled additively while the run starts
/// and validated exactly once, immediately before the deploy or destroy
/// branch is allowed to execute.
#[derive(Debug, Clone, Default)]
pub struct BuildingContext {
    pub action: Option<Action>,
    pub environment: Option<Environment>,
    pub pull_request: Option<u64>,
    pub env: BTreeMap<String, String>,
    pub secrets: BTreeMap<String, String>,
}

impl BuildingContext {
    pub fn validate(self) -> Result<RunContext, ContextError> {
        let action = self
            .action
            .ok_or(ContextError::Incomplete { field: "action" })?;
        let environment = self.environment.ok_or(ContextError::Incomplete {
            field: "environment",
        })?;
        match environment {
            Environment::Production => Ok(RunContext::Production {
                action,
                env: self.env,
                secrets: self.secrets,
            }),
            Environment::Preview => {
                let pull_request = self.pull_request.ok_or(ContextError::MissingPullRequest)?;
                Ok(RunContext::Preview {
                    action,
                    pull_request,
                    env: self.env,
                    secrets: self.secrets,
                })
            }
        }
    }
}

/// Validated, internally consistent run context. Preview always carries its
/// pull request number; production never does.
#[derive(Debug, Clone)]
pub enum RunContext {
    Production {
        action: Action,
        env: BTreeMap<String, String>,
        secrets: BTreeMap<String, String>,
    },
    Preview {
        action: Action,
        pull_request: u64,
        env: BTreeMap<String, String>,
        secrets: BTreeMap<String, String>,
    },
}

impl RunContext {
    pub fn action(&self) -> Action {
        match self {
            RunContext::Production { action, .. } | RunContext::Preview { action, .. } => *action,
        }
    }

    pub fn environment(&self) -> Environment {
        match self {
            RunContext::Production { .. } => Environment::Production,
            RunContext::Preview { .. } => Environment::Preview,
        }
    }

    pub fn pull_request(&self) -> Option<u64> {
        match self {
            RunContext::Production { .. } => None,
            RunContext::Preview { pull_request, .. } => Some(*pull_request),
        }
    }

    pub fn env(&self) -> &BTreeMap<String, String> {
        match self {
            RunContext::Production { env, .. } | RunContext::Preview { env, .. } => env,
        }
    }

    pub fn secrets(&self) -> &BTreeMap<String, String> {
        match self {
            RunContext::Production { secrets, .. } | RunContext::Preview { secrets, .. } => secrets,
        }
    }
}
