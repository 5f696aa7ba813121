use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::cli::StatusArgs;
use crate::config::PrepRoots;
use crate::model::PreparationManifest;

const MANIFEST_DIR_NAME: &str = "manifests";

pub fn run(args: StatusArgs) -> Result<()> {
    let roots = PrepRoots::resolve(args.output_dir, None, None);
    let output_root = roots.output_root;

    info!(output_root = %output_root.display(), "status requested");

    if output_root.is_dir() {
        let (org_dir_count, item_dir_count) = count_output_dirs(&output_root)?;
        info!(org_dir_count, item_dir_count, "output root scanned");
    } else {
        warn!(path = %output_root.display(), "output root missing");
    }

    match load_latest_manifest(&output_root.join(MANIFEST_DIR_NAME))? {
        Some((path, manifest)) => {
            info!(
                path = %path.display(),
                run_id = %manifest.run_id,
                generated_at = %manifest.generated_at,
                org_dir_count = manifest.counts.org_dir_count,
                item_dir_count = manifest.counts.item_dir_count,
                created_dir_count = manifest.counts.created_dir_count,
                mods_file_count = manifest.counts.mods_file_count,
                "loaded latest preparation manifest"
            );
        }
        None => warn!("no preparation manifest found"),
    }

    Ok(())
}

/// Counts org and item directories under the output root. The reserved
/// `manifests` entry is not an org directory and is skipped.
fn count_output_dirs(output_root: &Path) -> Result<(usize, usize)> {
    let mut org_dir_count = 0;
    let mut item_dir_count = 0;

    let entries = fs::read_dir(output_root)
        .with_context(|| format!("failed to read {}", output_root.display()))?;

    for entry in entries {
        let entry = entry
            .with_context(|| format!("failed to read entry in {}", output_root.display()))?;
        let path = entry.path();

        if !path.is_dir() || entry.file_name() == MANIFEST_DIR_NAME {
            continue;
        }

        org_dir_count += 1;

        let items =
            fs::read_dir(&path).with_context(|| format!("failed to read {}", path.display()))?;
        for item in items {
            let item =
                item.with_context(|| format!("failed to read entry in {}", path.display()))?;
            if item.path().is_dir() {
                item_dir_count += 1;
            }
        }
    }

    Ok((org_dir_count, item_dir_count))
}

fn load_latest_manifest(manifest_dir: &Path) -> Result<Option<(PathBuf, PreparationManifest)>> {
    if !manifest_dir.is_dir() {
        return Ok(None);
    }

    let entries = fs::read_dir(manifest_dir)
        .with_context(|| format!("failed to read {}", manifest_dir.display()))?;

    let mut manifest_paths = Vec::new();
    for entry in entries {
        let entry = entry
            .with_context(|| format!("failed to read entry in {}", manifest_dir.display()))?;
        let path = entry.path();

        let is_prep_manifest = path
            .file_name()
            .and_then(|name| name.to_str())
            .map(|name| name.starts_with("prep_run_") && name.ends_with(".json"))
            .unwrap_or(false);

        if is_prep_manifest {
            manifest_paths.push(path);
        }
    }

    manifest_paths.sort();
    let Some(path) = manifest_paths.pop() else {
        return Ok(None);
    };

    let raw = fs::read(&path).with_context(|| format!("failed to read {}", path.display()))?;
    let manifest: PreparationManifest = serde_json::from_slice(&raw)
        .with_context(|| format!("failed to parse {}", path.display()))?;

    Ok(Some((path, manifest)))
}
