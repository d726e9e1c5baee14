use crate::fly::{runner, FlyError};
use crate::shared::logging;

pub const TOKEN_ENV: &str = "FLY_API_TOKEN";
pub const BINARY_ENV: &str = "FLOTILLA_FLY_BIN";

/// How a session proved itself to the platform. `Login` means an existing
/// CLI login was found and token flags are suppressed for the session's
/// whole lifetime. `Unauthenticated` sessions can still run, but any
/// remote call will fail on the platform side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthMode {
    Login,
    Token(String),
    Unauthenticated,
}

/// Immutable authentication outcome, produced once by `authenticate` and
/// threaded into every client call. Reacting to credential changes means
/// authenticating again for a new session.
#[derive(Debug, Clone)]
pub struct FlySession {
    binary: String,
    auth: AuthMode,
}

impl FlySession {
    pub fn binary(&self) -> &str {
        &self.binary
    }

    pub fn auth(&self) -> &AuthMode {
        &self.auth
    }

    pub fn is_ready(&self) -> bool {
        !matches!(self.auth, AuthMode::Unauthenticated)
    }

    /// Trailing token flags for one invocation. Empty for login sessions:
    /// an explicit token would shadow the login the user already has.
    pub(crate) fn token_args(&self) -> Vec<String> {
        match &self.auth {
            AuthMode::Token(token) => vec!["--access-token".to_string(), token.clone()],
            AuthMode::Login | AuthMode::Unauthenticated => Vec::new(),
        }
    }

    #[cfg(test)]
    pub fn for_tests(binary: impl Into<String>, auth: AuthMode) -> Self {
        Self {
            binary: binary.into(),
            auth,
        }
    }
}

pub fn default_binary() -> String {
    std::env::var(BINARY_ENV)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| super::DEFAULT_FLY_BINARY.to_string())
}

/// Resolves authentication once. The CLI must be present (probed via the
/// version verb). Passive login is preferred; otherwise the explicit token,
/// then the `FLY_API_TOKEN` environment fallback. A session without working
/// credentials is returned as not-ready unless `assert_ready` is set, in
/// which case it is an error.
pub fn authenticate(
    binary: &str,
    token: Option<&str>,
    assert_ready: bool,
) -> Result<FlySession, FlyError> {
    runner::run_fly(binary, &["version".to_string()])?;

    let whoami = vec!["auth".to_string(), "whoami".to_string()];
    if runner::run_fly(binary, &whoami).is_ok() {
        logging::info("fly: authenticated through an existing CLI login");
        return Ok(FlySession {
            binary: binary.to_string(),
            auth: AuthMode::Login,
        });
    }

    let token = token
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .or_else(|| {
            std::env::var(TOKEN_ENV)
                .ok()
                .filter(|value| !value.trim().is_empty())
        });

    if let Some(token) = token {
        let check = vec![
            "auth".to_string(),
            "whoami".to_string(),
            "--access-token".to_string(),
            token.clone(),
        ];
        if runner::run_fly(binary, &check).is_ok() {
            logging::info("fly: authenticated with an access token");
            return Ok(FlySession {
                binary: binary.to_string(),
                auth: AuthMode::Token(token),
            });
        }
        logging::warn("fly: the configured access token was rejected");
    }

    if assert_ready {
        return Err(FlyError::NotAuthenticated);
    }

    logging::warn("fly: no working credentials; remote calls will fail until a new session is authenticated");
    Ok(FlySession {
        binary: binary.to_string(),
        auth: AuthMode::Unauthenticated,
    })
}
