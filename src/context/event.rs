//! Source-control event intake, shaped by the hosted runner's environment:
//! `GITHUB_EVENT_NAME`, `GITHUB_REF` and the JSON payload at
//! `GITHUB_EVENT_PATH`.

use crate::context::{Action, ContextError, Environment};
use serde::Deserialize;
use std::fs;
use std::path::Path;

pub const EVENT_NAME_ENV: &str = "GITHUB_EVENT_NAME";
pub const REF_ENV: &str = "GITHUB_REF";
pub const EVENT_PATH_ENV: &str = "GITHUB_EVENT_PATH";

#[derive(Debug, Clone)]
pub struct EventInfo {
    pub name: String,
    pub git_ref: String,
    pub pull_request: Option<PullRequestPayload>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PullRequestPayload {
    pub number: u64,
    #[serde(default)]
    pub state: String,
}

#[derive(Debug, Clone, Deserialize)]
struct EventPayload {
    #[serde(default)]
    pull_request: Option<PullRequestPayload>,
}

pub fn read_event() -> Result<EventInfo, ContextError> {
    let name = std::env::var(EVENT_NAME_ENV).map_err(|_| ContextError::MissingVariable {
        variable: EVENT_NAME_ENV,
    })?;
    let git_ref = std::env::var(REF_ENV).unwrap_or_default();

    let pull_request = match std::env::var(EVENT_PATH_ENV) {
        Ok(path) => read_payload(Path::new(&path))?.pull_request,
        Err(_) => None,
    };

    Ok(EventInfo {
        name,
        git_ref,
        pull_request,
    })
}

fn read_payload(path: &Path) -> Result<EventPayload, ContextError> {
    let raw = fs::read_to_string(path).map_err(|source| ContextError::PayloadRead {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| ContextError::PayloadParse {
        path: path.display().to_string(),
        source,
    })
}

/// Fixed event rules; anything not covered is rejected instead of being
/// given an implicit environment.
pub fn resolve_event(
    event: &EventInfo,
    main_branch: &str,
) -> Result<(Environment, Action, Option<u64>), ContextError> {
    if event.name == "pull_request" || event.name == "pull_request_target" {
        let payload = event
            .pull_request
            .as_ref()
            .ok_or(ContextError::MissingPullRequestPayload)?;
        let action = if payload.state == "closed" {
            Action::Destroy
        } else {
            Action::Deploy
        };
        return Ok((Environment::Preview, action, Some(payload.number)));
    }

    if event.name == "push" && event.git_ref == format!("refs/heads/{main_branch}") {
        return Ok((Environment::Production, Action::Deploy, None));
    }

    Err(ContextError::UnsupportedEvent {
        event: event.name.clone(),
        git_ref: event.git_ref.clone(),
    })
}
