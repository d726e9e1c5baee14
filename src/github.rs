use serde::Deserialize;

pub mod api;

pub use api::GithubClient;

pub const API_BASE_ENV: &str = "FLOTILLA_GITHUB_API_BASE";
pub const REPOSITORY_ENV: &str = "GITHUB_REPOSITORY";

#[derive(Debug, thiserror::Error)]
pub enum GithubError {
    #[error("github api request failed for {path}: {reason}")]
    Request { path: String, reason: String },
    #[error("github api response decode failed for {path}: {reason}")]
    Decode { path: String, reason: String },
}

#[derive(Debug, Clone, Deserialize)]
pub struct PullRequest {
    pub number: u64,
    pub state: String,
}

impl PullRequest {
    pub fn is_closed(&self) -> bool {
        self.state == "closed"
    }
}
