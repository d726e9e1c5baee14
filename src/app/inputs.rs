use crate::app::SetupError;
use std::collections::BTreeMap;

/// Action inputs, read from the runner's `INPUT_*` environment. Input
/// names are part of the action contract and map to variables verbatim:
/// `fly-api-token` arrives as `INPUT_FLY-API-TOKEN`.
#[derive(Debug, Clone)]
pub struct ActionInputs {
    pub fly_api_token: Option<String>,
    pub fly_org: Option<String>,
    pub fly_region: Option<String>,
    pub main_branch: String,
    pub token: String,
    pub env: BTreeMap<String, String>,
    pub secrets: BTreeMap<String, String>,
    pub opt_out_depot_builder: bool,
}

pub fn input_variable(name: &str) -> String {
    format!("INPUT_{}", name.to_ascii_uppercase())
}

fn read_input(name: &str) -> Option<String> {
    std::env::var(input_variable(name))
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn read_flag(name: &str) -> bool {
    read_input(name)
        .map(|value| matches!(value.to_ascii_lowercase().as_str(), "true" | "1" | "yes"))
        .unwrap_or(false)
}

/// Parses a multiline `KEY=VALUE` input. Blank lines and `#` comments are
/// ignored; anything else without `=` or with an empty key is a setup
/// error.
pub fn parse_key_value_lines(
    input: &'static str,
    raw: &str,
) -> Result<BTreeMap<String, String>, SetupError> {
    let mut parsed = BTreeMap::new();
    for line in raw.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            return Err(SetupError::InvalidKeyValue {
                input,
                line: line.to_string(),
            });
        };
        let key = key.trim();
        if key.is_empty() {
            return Err(SetupError::InvalidKeyValue {
                input,
                line: line.to_string(),
            });
        }
        parsed.insert(key.to_string(), value.trim().to_string());
    }
    Ok(parsed)
}

impl ActionInputs {
    pub fn from_env() -> Result<Self, SetupError> {
        let token = read_input("token").ok_or(SetupError::MissingToken)?;
        let env = parse_key_value_lines("env", &read_input("env").unwrap_or_default())?;
        let secrets =
            parse_key_value_lines("secrets", &read_input("secrets").unwrap_or_default())?;

        Ok(Self {
            fly_api_token: read_input("fly-api-token"),
            fly_org: read_input("fly-org"),
            fly_region: read_input("fly-region"),
            main_branch: read_input("main-branch").unwrap_or_else(|| "main".to_string()),
            token,
            env,
            secrets,
            opt_out_depot_builder: read_flag("opt-out-depot-builder"),
        })
    }
}
