use crate::discovery::{is_skipped_dir, DiscoveryError};
use serde::Deserialize;
use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};

pub const DESCRIPTOR_FILE_NAME: &str = "fly-deploy.json";

/// Per-project deployment descriptor: marks the project deployable and
/// points at its platform config file.
#[derive(Debug, Clone, Deserialize)]
pub struct DeployDescriptor {
    pub deploy: bool,
    #[serde(rename = "flyConfig")]
    pub fly_config: String,
}

/// Find-down over the project subtree: breadth-first in lexicographic
/// order, so a descriptor at the project root wins over one nested deeper.
/// The search never leaves the project root.
pub fn find_descriptor(
    project_root: &Path,
) -> Result<Option<(PathBuf, DeployDescriptor)>, DiscoveryError> {
    let mut queue: VecDeque<PathBuf> = VecDeque::new();
    queue.push_back(project_root.to_path_buf());

    while let Some(dir) = queue.pop_front() {
        let candidate = dir.join(DESCRIPTOR_FILE_NAME);
        if candidate.is_file() {
            let descriptor = read_descriptor(&candidate)?;
            return Ok(Some((candidate, descriptor)));
        }

        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(_) => continue,
        };
        let mut subdirs: Vec<PathBuf> = entries
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| path.is_dir() && !is_skipped_dir(path))
            .collect();
        subdirs.sort();
        queue.extend(subdirs);
    }

    Ok(None)
}

fn read_descriptor(path: &Path) -> Result<DeployDescriptor, DiscoveryError> {
    let raw = fs::read_to_string(path).map_err(|source| DiscoveryError::Read {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| DiscoveryError::Parse {
        path: path.display().to_string(),
        source,
    })
}
