use crate::fly::SecretRecord;
use std::collections::{BTreeMap, BTreeSet};

/// Splits the desired secrets into the subset to stage and the keys left
/// untouched because they already exist remotely. The merge is
/// non-destructive: an existing remote key is never overwritten, however
/// its desired value may differ, and the split is stable across repeated
/// runs.
pub fn missing_secrets(
    desired: &BTreeMap<String, String>,
    existing: &[SecretRecord],
) -> (BTreeMap<String, String>, Vec<String>) {
    let remote: BTreeSet<&str> = existing.iter().map(|record| record.name.as_str()).collect();

    let mut to_stage = BTreeMap::new();
    let mut skipped = Vec::new();
    for (key, value) in desired {
        if remote.contains(key.as_str()) {
            skipped.push(key.clone());
        } else {
            to_stage.insert(key.clone(), value.clone());
        }
    }
    (to_stage, skipped)
}
