use crate::discovery::{is_skipped_dir, DiscoveryError, PROJECT_FILE_NAME};
use crate::shared::logging;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize)]
pub struct ProjectMetadata {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "projectType")]
    pub project_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectCandidate {
    pub name: String,
    pub root: PathBuf,
}

/// Enumerates application-kind projects under the workspace, in
/// lexicographic order for deterministic log and outcome ordering.
/// Unreadable entries are logged and passed over; one broken directory
/// must not hide the rest of the workspace.
pub fn discover_projects(workspace_root: &Path) -> Vec<ProjectCandidate> {
    let mut candidates = Vec::new();
    walk(workspace_root, &mut candidates);
    candidates.sort_by(|a, b| a.name.cmp(&b.name));
    candidates
}

fn walk(dir: &Path, candidates: &mut Vec<ProjectCandidate>) {
    let project_file = dir.join(PROJECT_FILE_NAME);
    if project_file.is_file() {
        match read_metadata(&project_file) {
            Ok(metadata) if is_application(&metadata) => {
                let name = metadata
                    .name
                    .unwrap_or_else(|| fallback_name(dir).to_string());
                candidates.push(ProjectCandidate {
                    name,
                    root: dir.to_path_buf(),
                });
            }
            Ok(_) => {}
            Err(err) => logging::warn(&format!("discovery: {err}")),
        }
    }

    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) => {
            logging::warn(&format!(
                "discovery: failed to read {}: {err}",
                dir.display()
            ));
            return;
        }
    };

    let mut subdirs: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_dir() && !is_skipped_dir(path))
        .collect();
    subdirs.sort();
    for subdir in subdirs {
        walk(&subdir, candidates);
    }
}

fn is_application(metadata: &ProjectMetadata) -> bool {
    metadata.project_type.as_deref() == Some("application")
}

fn fallback_name(dir: &Path) -> &str {
    dir.file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("unnamed")
}

/// Re-reads one project's metadata at pipeline time. The orchestration loop
/// turns any failure here into a per-project skip.
pub fn load_project_metadata(project_root: &Path) -> Result<ProjectMetadata, DiscoveryError> {
    let path = project_root.join(PROJECT_FILE_NAME);
    let metadata = read_metadata(&path)?;
    if metadata.name.as_deref().is_none_or(str::is_empty) {
        return Err(DiscoveryError::UnnamedProject {
            path: path.display().to_string(),
        });
    }
    Ok(metadata)
}

fn read_metadata(path: &Path) -> Result<ProjectMetadata, DiscoveryError> {
    let raw = fs::read_to_string(path).map_err(|source| DiscoveryError::Read {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| DiscoveryError::Parse {
        path: path.display().to_string(),
        source,
    })
}
