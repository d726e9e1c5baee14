use std::path::{Path, PathBuf};

pub mod descriptor;
pub mod workspace;

pub use descriptor::{find_descriptor, DeployDescriptor, DESCRIPTOR_FILE_NAME};
pub use workspace::{discover_projects, load_project_metadata, ProjectCandidate, ProjectMetadata};

pub const PROJECT_FILE_NAME: &str = "project.json";
pub const PLATFORM_CONFIG_FILE_NAME: &str = "fly.toml";

/// Directories that never contain project sources.
const SKIPPED_DIRS: &[&str] = &["node_modules", ".git", ".nx", "dist", "target"];

#[derive(Debug, thiserror::Error)]
pub enum DiscoveryError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid json in {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("project metadata {path} has no name")]
    UnnamedProject { path: String },
}

pub(crate) fn is_skipped_dir(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| SKIPPED_DIRS.contains(&name))
}

/// The platform config referenced by a descriptor, relative to the project
/// root.
pub fn resolve_platform_config(project_root: &Path, descriptor: &DeployDescriptor) -> PathBuf {
    project_root.join(&descriptor.fly_config)
}
