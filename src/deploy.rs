use crate::fly::FlyError;

pub mod naming;
pub mod reconcile;
pub mod secrets;

pub use naming::{preview_name, preview_suffix, validate_app_name};
pub use reconcile::{reconcile_and_deploy, ReconcileOptions};
pub use secrets::missing_secrets;

#[derive(Debug, thiserror::Error)]
pub enum DeployError {
    #[error("config required to deploy")]
    ConfigRequired,
    #[error("app name `{0}` does not match the platform name pattern")]
    InvalidAppName(String),
    #[error(transparent)]
    Fly(#[from] FlyError),
}
