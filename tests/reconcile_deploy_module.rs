use flotilla::context::Environment;
use flotilla::deploy::{reconcile_and_deploy, DeployError, ReconcileOptions};
use flotilla::fly::{authenticate, FlyClient, FlyError};
use std::collections::BTreeMap;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

const FAKE_FLYCTL: &str = r#"#!/bin/sh
state="__STATE__"
echo "$@" >> "$state/calls.log"

get_flag() {
  flag="$1"; shift
  prev=""
  for a in "$@"; do
    if [ "$prev" = "$flag" ]; then printf '%s' "$a"; return 0; fi
    prev="$a"
  done
  return 1
}

case "$1" in
  version)
    echo "flyctl v0.3.100"
    ;;
  auth)
    echo '{"email":"dev@example.com"}'
    ;;
  status)
    app=$(get_flag --app "$@")
    if [ -f "$state/apps/$app" ]; then
      printf '{"Name":"%s","Hostname":"%s.fly.dev","Deployed":true,"Version":2,"Status":"running"}\n' "$app" "$app"
    else
      echo "Could not find App \"$app\"" 1>&2; exit 1
    fi
    ;;
  config)
    cfg=$(get_flag --config "$@") || { echo "no config path" 1>&2; exit 1; }
    if [ -f "$cfg" ]; then cat "$cfg"; else echo "config not found" 1>&2; exit 1; fi
    ;;
  secrets)
    app=$(get_flag --app "$@")
    case "$2" in
      list)
        if [ -f "$state/secrets/$app.json" ]; then cat "$state/secrets/$app.json"; else echo '[]'; fi
        ;;
      set)
        exit 0
        ;;
    esac
    ;;
  apps)
    case "$2" in
      create)
        name="$3"
        mkdir -p "$state/apps"
        touch "$state/apps/$name"
        printf '{"ID":"%s","Name":"%s"}\n' "$name" "$name"
        ;;
    esac
    ;;
  deploy)
    exit 0
    ;;
  *)
    echo "unknown verb $1" 1>&2; exit 1
    ;;
esac
"#;

fn write_fake_flyctl(base: &Path) -> (PathBuf, PathBuf) {
    let state = base.join("state");
    fs::create_dir_all(state.join("apps")).expect("state dirs");
    fs::create_dir_all(state.join("secrets")).expect("secret dir");

    let script = base.join("flyctl");
    fs::write(
        &script,
        FAKE_FLYCTL.replace("__STATE__", &state.display().to_string()),
    )
    .expect("write script");
    let mut perms = fs::metadata(&script).expect("metadata").permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&script, perms).expect("chmod");

    (script, state)
}

fn calls(state: &Path) -> Vec<String> {
    fs::read_to_string(state.join("calls.log"))
        .unwrap_or_default()
        .lines()
        .map(str::to_string)
        .collect()
}

fn client_for(script: &Path) -> FlyClient {
    let session =
        authenticate(&script.display().to_string(), None, false).expect("authenticate");
    FlyClient::new(session)
}

fn options(config: &Path) -> ReconcileOptions {
    ReconcileOptions {
        app: None,
        config: Some(config.to_path_buf()),
        region: None,
        environment: Environment::Preview,
        org: None,
        env: BTreeMap::new(),
        secrets: BTreeMap::new(),
        depot_builder: true,
    }
}

#[test]
fn repeated_deploys_create_the_app_at_most_once() {
    let dir = tempdir().expect("tempdir");
    let (script, state) = write_fake_flyctl(dir.path());
    let config = dir.path().join("fly.toml");
    fs::write(&config, r#"{"app":"svc-config"}"#).expect("write config");

    let client = client_for(&script);
    let first = reconcile_and_deploy(&client, &options(&config)).expect("first deploy");
    let second = reconcile_and_deploy(&client, &options(&config)).expect("second deploy");
    assert_eq!(first, "svc-config");
    assert_eq!(second, "svc-config");

    let creates = calls(&state)
        .iter()
        .filter(|line| line.starts_with("apps create"))
        .count();
    assert_eq!(creates, 1);

    let deploys = calls(&state)
        .iter()
        .filter(|line| line.starts_with("deploy"))
        .count();
    assert_eq!(deploys, 2);
}

#[test]
fn existing_remote_secrets_are_never_overwritten() {
    let dir = tempdir().expect("tempdir");
    let (script, state) = write_fake_flyctl(dir.path());
    let config = dir.path().join("fly.toml");
    fs::write(&config, r#"{"app":"svc-config"}"#).expect("write config");
    fs::write(state.join("apps/svc-config"), "").expect("seed app");
    fs::write(
        state.join("secrets/svc-config.json"),
        r#"[{"Name":"A","Digest":"digest-of-1","CreatedAt":"2024-01-01T00:00:00Z"}]"#,
    )
    .expect("seed secrets");

    let mut opts = options(&config);
    opts.secrets.insert("A".to_string(), "2".to_string());
    opts.secrets.insert("B".to_string(), "2".to_string());

    let client = client_for(&script);
    reconcile_and_deploy(&client, &opts).expect("deploy");

    let staged: Vec<String> = calls(&state)
        .into_iter()
        .filter(|line| line.starts_with("secrets set"))
        .collect();
    assert_eq!(staged.len(), 1);
    assert!(staged[0].contains("B=2"));
    assert!(!staged[0].contains("A="));
    assert!(staged[0].contains("--stage"));
}

#[test]
fn second_run_stages_nothing_new() {
    let dir = tempdir().expect("tempdir");
    let (script, state) = write_fake_flyctl(dir.path());
    let config = dir.path().join("fly.toml");
    fs::write(&config, r#"{"app":"svc-config"}"#).expect("write config");
    fs::write(state.join("apps/svc-config"), "").expect("seed app");
    fs::write(
        state.join("secrets/svc-config.json"),
        r#"[{"Name":"A","Digest":"d1"},{"Name":"B","Digest":"d2"}]"#,
    )
    .expect("seed secrets");

    let mut opts = options(&config);
    opts.secrets.insert("A".to_string(), "1".to_string());
    opts.secrets.insert("B".to_string(), "2".to_string());

    let client = client_for(&script);
    reconcile_and_deploy(&client, &opts).expect("deploy");

    let staged = calls(&state)
        .iter()
        .filter(|line| line.starts_with("secrets set"))
        .count();
    assert_eq!(staged, 0);
}

#[test]
fn explicit_app_name_wins_over_the_discovered_one() {
    let dir = tempdir().expect("tempdir");
    let (script, state) = write_fake_flyctl(dir.path());
    let config = dir.path().join("fly.toml");
    fs::write(&config, r#"{"app":"real-app"}"#).expect("write config");

    let client = client_for(&script);
    let mut opts = options(&config);
    opts.app = Some("alias-app".to_string());
    let deployed = reconcile_and_deploy(&client, &opts).expect("deploy");
    assert_eq!(deployed, "alias-app");

    let deploy_call = calls(&state)
        .into_iter()
        .find(|line| line.starts_with("deploy"))
        .expect("deploy invocation");
    assert!(deploy_call.contains("--app alias-app"));
    assert!(!deploy_call.contains("real-app"));
}

#[test]
fn without_an_explicit_name_the_discovered_one_drives_the_deploy() {
    let dir = tempdir().expect("tempdir");
    let (script, state) = write_fake_flyctl(dir.path());
    let config = dir.path().join("fly.toml");
    fs::write(&config, r#"{"app":"real-app"}"#).expect("write config");

    let client = client_for(&script);
    let deployed = reconcile_and_deploy(&client, &options(&config)).expect("deploy");
    assert_eq!(deployed, "real-app");

    let deploy_call = calls(&state)
        .into_iter()
        .find(|line| line.starts_with("deploy"))
        .expect("deploy invocation");
    assert!(deploy_call.contains("--app real-app"));
}

#[test]
fn deploy_env_and_region_reach_the_deploy_command() {
    let dir = tempdir().expect("tempdir");
    let (script, state) = write_fake_flyctl(dir.path());
    let config = dir.path().join("fly.toml");
    fs::write(&config, r#"{"app":"svc-config"}"#).expect("write config");

    let mut opts = options(&config);
    opts.region = Some("ams".to_string());
    opts.env.insert("APP_NAME".to_string(), "svc-config".to_string());
    opts.depot_builder = false;

    let client = client_for(&script);
    reconcile_and_deploy(&client, &opts).expect("deploy");

    let deploy_call = calls(&state)
        .into_iter()
        .find(|line| line.starts_with("deploy"))
        .expect("deploy invocation");
    assert!(deploy_call.contains("--region ams"));
    assert!(deploy_call.contains("DEPLOY_ENV=preview"));
    assert!(deploy_call.contains("APP_NAME=svc-config"));
    assert!(deploy_call.contains("--depot=false"));
    assert!(deploy_call.contains("--yes"));
}

#[test]
fn a_config_path_is_required_to_deploy() {
    let dir = tempdir().expect("tempdir");
    let (script, _state) = write_fake_flyctl(dir.path());

    let client = client_for(&script);
    let mut opts = options(Path::new("unused"));
    opts.config = None;
    let err = reconcile_and_deploy(&client, &opts).expect_err("config required");
    assert!(matches!(err, DeployError::ConfigRequired));
}

#[test]
fn a_missing_platform_config_fails_this_project_only() {
    let dir = tempdir().expect("tempdir");
    let (script, _state) = write_fake_flyctl(dir.path());

    let client = client_for(&script);
    let err = reconcile_and_deploy(&client, &options(&dir.path().join("absent/fly.toml")))
        .expect_err("config file missing");
    assert!(matches!(err, DeployError::Fly(FlyError::Command { .. })));
}
