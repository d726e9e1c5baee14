use super::{GithubError, PullRequest, API_BASE_ENV};
use serde::Deserialize;
use serde_json::json;

const DEFAULT_API_BASE: &str = "https://api.github.com";

/// Synchronous REST client scoped to one repository. The API base can be
/// pointed at a local server through `FLOTILLA_GITHUB_API_BASE`.
#[derive(Debug, Clone)]
pub struct GithubClient {
    api_base: String,
    repository: String,
    token: String,
}

impl GithubClient {
    pub fn new(repository: String, token: String) -> Self {
        let api_base = std::env::var(API_BASE_ENV)
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());
        Self {
            api_base,
            repository,
            token,
        }
    }

    pub fn repository(&self) -> &str {
        &self.repository
    }

    fn repository_path(&self) -> String {
        self.repository
            .split('/')
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect::<Vec<_>>()
            .join("/")
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_base.trim_end_matches('/'), path)
    }

    fn get<T: for<'de> Deserialize<'de>>(&self, path: &str) -> Result<Option<T>, GithubError> {
        let response = ureq::get(&self.endpoint(path))
            .set("Authorization", &format!("Bearer {}", self.token))
            .set("Accept", "application/vnd.github+json")
            .set("User-Agent", "flotilla")
            .call();

        let response = match response {
            Ok(response) => response,
            Err(ureq::Error::Status(404, _)) => return Ok(None),
            Err(err) => {
                return Err(GithubError::Request {
                    path: path.to_string(),
                    reason: err.to_string(),
                })
            }
        };

        response
            .into_json::<T>()
            .map(Some)
            .map_err(|err| GithubError::Decode {
                path: path.to_string(),
                reason: err.to_string(),
            })
    }

    fn post_json(&self, path: &str, body: serde_json::Value) -> Result<(), GithubError> {
        ureq::post(&self.endpoint(path))
            .set("Authorization", &format!("Bearer {}", self.token))
            .set("Accept", "application/vnd.github+json")
            .set("User-Agent", "flotilla")
            .send_json(body)
            .map_err(|err| GithubError::Request {
                path: path.to_string(),
                reason: err.to_string(),
            })?;
        Ok(())
    }

    /// Looks one pull request up by number. Absent pull requests come back
    /// as `None`; the destroy path treats that as "do not touch".
    pub fn pull_request(&self, number: u64) -> Result<Option<PullRequest>, GithubError> {
        let path = format!("repos/{}/pulls/{number}", self.repository_path());
        self.get(&path)
    }

    pub fn create_issue_comment(&self, number: u64, body: &str) -> Result<(), GithubError> {
        let path = format!("repos/{}/issues/{number}/comments", self.repository_path());
        self.post_json(&path, json!({ "body": body }))
    }
}
