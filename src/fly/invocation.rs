//! Pure argument building for platform CLI verbs.

use crate::fly::{DeployOptions, Target};
use crate::shared::logging;
use std::collections::BTreeMap;

/// Emits `--app` / `--config` flags for a target. Explicit fields win over
/// the default target's fields. When both an app name and a config path
/// resolve at once the inconsistency is logged but both flags are still
/// forwarded; downstream verbs have historically tolerated the pair.
pub fn resolve_target_args(explicit: &Target, default: &Target) -> Vec<String> {
    let app = explicit.app.clone().or_else(|| default.app.clone());
    let config = explicit.config.clone().or_else(|| default.config.clone());

    if app.is_some() && config.is_some() {
        logging::warn("both an app name and a config path resolved for one command; forwarding both flags");
    }

    let mut args = Vec::new();
    if let Some(app) = app {
        args.push("--app".to_string());
        args.push(app);
    }
    if let Some(config) = config {
        args.push("--config".to_string());
        args.push(config.display().to_string());
    }
    args
}

pub fn status_args(target_args: Vec<String>) -> Vec<String> {
    let mut args = vec!["status".to_string()];
    args.extend(target_args);
    args.push("--json".to_string());
    args
}

pub fn config_show_args(target_args: Vec<String>, local: bool) -> Vec<String> {
    let mut args = vec!["config".to_string(), "show".to_string()];
    if local {
        args.push("--local".to_string());
    }
    args.extend(target_args);
    args.push("--json".to_string());
    args
}

pub fn apps_list_args() -> Vec<String> {
    vec!["apps".to_string(), "list".to_string(), "--json".to_string()]
}

pub fn secrets_list_args(app: &str) -> Vec<String> {
    vec![
        "secrets".to_string(),
        "list".to_string(),
        "--app".to_string(),
        app.to_string(),
        "--json".to_string(),
    ]
}

pub fn certs_list_args(app: &str) -> Vec<String> {
    vec![
        "certs".to_string(),
        "list".to_string(),
        "--app".to_string(),
        app.to_string(),
        "--json".to_string(),
    ]
}

pub fn create_app_args(name: Option<&str>, org: Option<&str>) -> Vec<String> {
    let mut args = vec!["apps".to_string(), "create".to_string()];
    match name {
        Some(name) => args.push(name.to_string()),
        None => args.push("--generate-name".to_string()),
    }
    if let Some(org) = org {
        args.push("--org".to_string());
        args.push(org.to_string());
    }
    args.push("--json".to_string());
    args
}

/// `secrets set … --stage` writes the values without triggering a deploy.
pub fn stage_secrets_args(app: &str, secrets: &BTreeMap<String, String>) -> Vec<String> {
    let mut args = vec!["secrets".to_string(), "set".to_string()];
    for (key, value) in secrets {
        args.push(format!("{key}={value}"));
    }
    args.push("--app".to_string());
    args.push(app.to_string());
    args.push("--stage".to_string());
    args
}

pub fn deploy_args(options: &DeployOptions) -> Vec<String> {
    let mut args = vec![
        "deploy".to_string(),
        "--config".to_string(),
        options.config.display().to_string(),
    ];
    if let Some(app) = &options.app {
        args.push("--app".to_string());
        args.push(app.clone());
    }
    if let Some(region) = &options.region {
        args.push("--region".to_string());
        args.push(region.clone());
    }
    for (key, value) in &options.env {
        args.push("--env".to_string());
        args.push(format!("{key}={value}"));
    }
    if !options.depot_builder {
        args.push("--depot=false".to_string());
    }
    // Remote operations must never stall on an interactive prompt.
    args.push("--yes".to_string());
    args
}

pub fn destroy_app_args(app: &str) -> Vec<String> {
    vec![
        "apps".to_string(),
        "destroy".to_string(),
        app.to_string(),
        "--yes".to_string(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn explicit_target_wins_over_default() {
        let explicit = Target::named("edge");
        let default = Target::named("fallback");
        assert_eq!(
            resolve_target_args(&explicit, &default),
            vec!["--app".to_string(), "edge".to_string()]
        );
    }

    #[test]
    fn default_target_fills_missing_fields() {
        let default = Target::config_file("apps/web/fly.toml");
        let args = resolve_target_args(&Target::default(), &default);
        assert_eq!(
            args,
            vec!["--config".to_string(), "apps/web/fly.toml".to_string()]
        );
    }

    #[test]
    fn both_app_and_config_are_forwarded_together() {
        let explicit = Target {
            app: Some("edge".to_string()),
            config: Some(PathBuf::from("fly.toml")),
        };
        let args = resolve_target_args(&explicit, &Target::default());
        assert_eq!(
            args,
            vec![
                "--app".to_string(),
                "edge".to_string(),
                "--config".to_string(),
                "fly.toml".to_string(),
            ]
        );
    }

    #[test]
    fn create_without_name_asks_for_a_generated_one() {
        let args = create_app_args(None, Some("acme"));
        assert!(args.contains(&"--generate-name".to_string()));
        assert!(args.contains(&"--org".to_string()));
    }

    #[test]
    fn stage_secrets_writes_without_deploying() {
        let mut secrets = BTreeMap::new();
        secrets.insert("B".to_string(), "2".to_string());
        secrets.insert("A".to_string(), "1".to_string());
        let args = stage_secrets_args("edge", &secrets);
        assert_eq!(
            args,
            vec![
                "secrets".to_string(),
                "set".to_string(),
                "A=1".to_string(),
                "B=2".to_string(),
                "--app".to_string(),
                "edge".to_string(),
                "--stage".to_string(),
            ]
        );
    }

    #[test]
    fn deploy_args_are_auto_confirmed_and_honor_depot_opt_out() {
        let mut env = BTreeMap::new();
        env.insert("DEPLOY_ENV".to_string(), "preview".to_string());
        let options = DeployOptions {
            app: Some("edge-pr-4".to_string()),
            config: PathBuf::from("apps/edge/fly.toml"),
            region: Some("ams".to_string()),
            env,
            depot_builder: false,
        };
        let args = deploy_args(&options);
        assert_eq!(args[0], "deploy");
        assert!(args.contains(&"--yes".to_string()));
        assert!(args.contains(&"--depot=false".to_string()));
        assert!(args.contains(&"DEPLOY_ENV=preview".to_string()));
        let app_at = args.iter().position(|a| a == "--app").expect("app flag");
        assert_eq!(args[app_at + 1], "edge-pr-4");
    }

    #[test]
    fn destroy_never_prompts() {
        assert_eq!(
            destroy_app_args("edge-pr-4"),
            vec![
                "apps".to_string(),
                "destroy".to_string(),
                "edge-pr-4".to_string(),
                "--yes".to_string(),
            ]
        );
    }
}
