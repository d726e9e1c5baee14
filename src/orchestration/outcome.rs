use std::collections::BTreeMap;

/// Why a project or app was passed over. A closed set: anything outside it
/// is a programming error, not a new reason string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    ProjectConfigMissing,
    DescriptorMissing,
    DeployDisabled,
    PlatformConfigMissing,
    DeployFailed(String),
    DestroyFailed(String),
}

impl SkipReason {
    /// Failures carry error text and surface in the `failed` output;
    /// everything else is an expected skip.
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            SkipReason::DeployFailed(_) | SkipReason::DestroyFailed(_)
        )
    }
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::ProjectConfigMissing => write!(f, "project configuration not found"),
            SkipReason::DescriptorMissing => write!(f, "deployment descriptor not found"),
            SkipReason::DeployDisabled => write!(f, "deployment disabled"),
            SkipReason::PlatformConfigMissing => write!(f, "platform config file not found"),
            SkipReason::DeployFailed(detail) => write!(f, "deploy failed: {detail}"),
            SkipReason::DestroyFailed(detail) => {
                write!(f, "failed to destroy application: {detail}")
            }
        }
    }
}

/// One outcome per project per run, no exceptions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectOutcome {
    Deploy { app: String, name: String, url: String },
    Destroy { app: String },
    Skip { id: String, reason: SkipReason },
}

#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub environment: String,
    pub outcomes: Vec<ProjectOutcome>,
}

impl RunReport {
    /// Project name to deployed URL.
    pub fn deployed(&self) -> BTreeMap<String, String> {
        self.outcomes
            .iter()
            .filter_map(|outcome| match outcome {
                ProjectOutcome::Deploy { name, url, .. } => Some((name.clone(), url.clone())),
                _ => None,
            })
            .collect()
    }

    pub fn destroyed(&self) -> Vec<String> {
        self.outcomes
            .iter()
            .filter_map(|outcome| match outcome {
                ProjectOutcome::Destroy { app } => Some(app.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn skipped(&self) -> Vec<String> {
        self.outcomes
            .iter()
            .filter_map(|outcome| match outcome {
                ProjectOutcome::Skip { id, reason } if !reason.is_failure() => Some(id.clone()),
                _ => None,
            })
            .collect()
    }

    /// Identifier plus error text for each failed project or app.
    pub fn failed(&self) -> Vec<(String, String)> {
        self.outcomes
            .iter()
            .filter_map(|outcome| match outcome {
                ProjectOutcome::Skip { id, reason } if reason.is_failure() => {
                    Some((id.clone(), reason.to_string()))
                }
                _ => None,
            })
            .collect()
    }
}
