use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::util::ensure_directory;

/// Directory paths confirmed on disk, plus how many this run newly created.
#[derive(Debug, Clone)]
pub struct Provisioned {
    pub paths: Vec<PathBuf>,
    pub created_count: usize,
}

/// Ensures one output directory per organization under the output root,
/// input order preserved. Pre-existing directories are left untouched.
pub fn provision_org_dirs(org_ids: &[String], output_root: &Path) -> Result<Provisioned> {
    let mut paths = Vec::with_capacity(org_ids.len());
    let mut created_count = 0;

    for org_id in org_ids {
        let org_output_dir = output_root.join(org_id);
        if create_if_absent(&org_output_dir)? {
            created_count += 1;
        }
        paths.push(org_output_dir);
    }

    info!(count = paths.len(), created_count, "org output dirs ready");
    Ok(Provisioned {
        paths,
        created_count,
    })
}

/// Ensures one item directory per image file, named after the file's stem,
/// nested under its organization's output directory. Returns the flattened
/// item paths in organization-then-file order.
pub fn provision_item_dirs(
    image_dirs_root: &Path,
    org_output_dirs: &[PathBuf],
) -> Result<Provisioned> {
    let mut paths = Vec::new();
    let mut created_count = 0;

    for org_output_dir in org_output_dirs {
        let org_id = org_output_dir
            .file_name()
            .and_then(|name| name.to_str())
            .with_context(|| {
                format!("invalid org output dir name: {}", org_output_dir.display())
            })?;

        let org_image_dir = image_dirs_root.join(org_id);
        for image_path in list_image_files(&org_image_dir)? {
            let stem = image_path
                .file_stem()
                .and_then(|stem| stem.to_str())
                .with_context(|| format!("invalid image filename: {}", image_path.display()))?;

            let item_output_dir = org_output_dir.join(stem);
            if create_if_absent(&item_output_dir)? {
                created_count += 1;
            }
            paths.push(item_output_dir);
        }
    }

    info!(count = paths.len(), created_count, "item output dirs ready");
    Ok(Provisioned {
        paths,
        created_count,
    })
}

/// Lists the regular files of an image directory in sorted filename order.
pub fn list_image_files(org_image_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    let entries = fs::read_dir(org_image_dir)
        .with_context(|| format!("failed to read {}", org_image_dir.display()))?;

    for entry in entries {
        let entry = entry
            .with_context(|| format!("failed to read entry in {}", org_image_dir.display()))?;
        let path = entry.path();

        if entry
            .file_type()
            .with_context(|| format!("failed to inspect file type: {}", path.display()))?
            .is_file()
        {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}

/// Creates the directory if absent; an already-existing path is success, so a
/// concurrent actor creating it between the check and the call is tolerated.
/// Returns whether this call created it.
fn create_if_absent(path: &Path) -> Result<bool> {
    if path.is_dir() {
        debug!(path = %path.display(), "directory already exists");
        return Ok(false);
    }

    ensure_directory(path)?;
    debug!(path = %path.display(), "created directory");
    Ok(true)
}
