use crate::deploy::DeployError;

pub const PREVIEW_SEPARATOR: &str = "-pr-";

/// Preview app name for one pull request: `<base>-pr-<number>`.
pub fn preview_name(base: &str, pull_request: u64) -> String {
    format!("{base}{PREVIEW_SEPARATOR}{pull_request}")
}

/// Pull request number encoded in a preview app name, if any. Matching the
/// pattern is never enough to destroy an app; it only nominates the app
/// for an independent source-control check.
pub fn preview_suffix(name: &str) -> Option<u64> {
    let (base, digits) = name.rsplit_once(PREVIEW_SEPARATOR)?;
    if base.is_empty() || digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Platform app name pattern: lowercase alphanumeric with dashes, starting
/// with an alphanumeric.
pub fn validate_app_name(name: &str) -> Result<(), DeployError> {
    let mut chars = name.chars();
    let valid_head = chars
        .next()
        .is_some_and(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit());
    let valid_tail = chars.all(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '-');
    if valid_head && valid_tail {
        Ok(())
    } else {
        Err(DeployError::InvalidAppName(name.to_string()))
    }
}
