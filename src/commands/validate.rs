use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use tracing::{debug, info};

use crate::cli::ValidateArgs;
use crate::commands::prepare::mods::mods_org_prefix;
use crate::config::{self, PrepRoots};

pub fn run(args: ValidateArgs) -> Result<()> {
    let roots = PrepRoots::resolve(args.output_dir, args.mods_dir, args.image_dirs_root);
    let org_ids = config::parse_org_ids(&args.org_ids)?;

    validate_all(&org_ids, &roots)?;
    info!(org_count = org_ids.len(), "validation passed");

    Ok(())
}

/// Runs the three validators in fixed order, aborting on the first violation.
/// No side effects beyond logging.
pub fn validate_all(org_ids: &[String], roots: &PrepRoots) -> Result<()> {
    validate_paths(roots)?;
    validate_org_ids(org_ids, &roots.mods_dir)?;
    validate_image_dirs(org_ids, &roots.image_dirs_root)
}

pub fn validate_paths(roots: &PrepRoots) -> Result<()> {
    for (label, path) in [
        ("output root", roots.output_root.as_path()),
        ("mods files dir", roots.mods_dir.as_path()),
        ("image dirs root", roots.image_dirs_root.as_path()),
    ] {
        if !path.exists() {
            bail!("{label} does not exist: {}", path.display());
        }
        if !path.is_dir() {
            bail!("{label} is not a directory: {}", path.display());
        }
        debug!(label, path = %path.display(), "root path ok");
    }

    info!("all root paths are valid");
    Ok(())
}

/// Confirms every requested org id appears among the filename prefixes of
/// the mods directory. An empty mods directory fails before any matching.
pub fn validate_org_ids(org_ids: &[String], mods_dir: &Path) -> Result<()> {
    let filenames = list_filenames(mods_dir)?;

    if filenames.is_empty() {
        bail!("no mods files found in {}", mods_dir.display());
    }

    let mods_org_ids: Vec<&str> = filenames
        .iter()
        .filter_map(|filename| mods_org_prefix(filename))
        .collect();

    for org_id in org_ids {
        if !mods_org_ids.iter().any(|prefix| *prefix == org_id.as_str()) {
            bail!(
                "org id {org_id} has no matching mods file in {}",
                mods_dir.display()
            );
        }
        debug!(org_id = %org_id, "org id has a mods file");
    }

    info!("all org ids are valid");
    Ok(())
}

/// Confirms each org's image directory exists, is a directory, and holds at
/// least one entry.
pub fn validate_image_dirs(org_ids: &[String], image_dirs_root: &Path) -> Result<()> {
    for org_id in org_ids {
        let org_image_dir = image_dirs_root.join(org_id);

        if !org_image_dir.exists() {
            bail!("org image dir does not exist: {}", org_image_dir.display());
        }
        if !org_image_dir.is_dir() {
            bail!(
                "org image dir is not a directory: {}",
                org_image_dir.display()
            );
        }

        let mut entries = fs::read_dir(&org_image_dir)
            .with_context(|| format!("failed to read {}", org_image_dir.display()))?;
        if entries.next().is_none() {
            bail!("org image dir is empty: {}", org_image_dir.display());
        }
    }

    info!("all org image dirs are valid and contain entries");
    Ok(())
}

fn list_filenames(dir: &Path) -> Result<Vec<String>> {
    let entries = fs::read_dir(dir).with_context(|| format!("failed to read {}", dir.display()))?;

    let mut filenames = Vec::new();
    for entry in entries {
        let entry = entry.with_context(|| format!("failed to read entry in {}", dir.display()))?;
        if let Some(name) = entry.file_name().to_str() {
            filenames.push(name.to_owned());
        }
    }

    filenames.sort();
    Ok(filenames)
}

#[cfg(test)]
mod tests {
    use super::{validate_image_dirs, validate_org_ids, validate_paths};
    use crate::config::PrepRoots;
    use std::fs;
    use tempfile::TempDir;

    fn org_ids(ids: &[&str]) -> Vec<String> {
        ids.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn validate_paths_accepts_three_existing_directories() {
        let scratch = TempDir::new().expect("scratch dir should be created");
        let roots = PrepRoots {
            output_root: scratch.path().join("out"),
            mods_dir: scratch.path().join("mods"),
            image_dirs_root: scratch.path().join("images"),
        };
        fs::create_dir_all(&roots.output_root).expect("output root should be created");
        fs::create_dir_all(&roots.mods_dir).expect("mods dir should be created");
        fs::create_dir_all(&roots.image_dirs_root).expect("image dirs root should be created");

        validate_paths(&roots).expect("existing directories should validate");
    }

    #[test]
    fn validate_paths_names_a_missing_root() {
        let scratch = TempDir::new().expect("scratch dir should be created");
        let roots = PrepRoots {
            output_root: scratch.path().join("out"),
            mods_dir: scratch.path().join("missing_mods"),
            image_dirs_root: scratch.path().join("images"),
        };
        fs::create_dir_all(&roots.output_root).expect("output root should be created");
        fs::create_dir_all(&roots.image_dirs_root).expect("image dirs root should be created");

        let err = validate_paths(&roots).expect_err("missing mods dir should fail");
        assert!(err.to_string().contains("missing_mods"));
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn validate_paths_rejects_a_file_where_a_directory_is_expected() {
        let scratch = TempDir::new().expect("scratch dir should be created");
        let roots = PrepRoots {
            output_root: scratch.path().join("out"),
            mods_dir: scratch.path().join("mods"),
            image_dirs_root: scratch.path().join("images"),
        };
        fs::create_dir_all(&roots.output_root).expect("output root should be created");
        fs::create_dir_all(&roots.image_dirs_root).expect("image dirs root should be created");
        fs::write(&roots.mods_dir, b"not a dir").expect("file should be written");

        let err = validate_paths(&roots).expect_err("file in place of dir should fail");
        assert!(err.to_string().contains("is not a directory"));
    }

    #[test]
    fn validate_org_ids_fails_on_an_empty_mods_dir() {
        let scratch = TempDir::new().expect("scratch dir should be created");

        let err = validate_org_ids(&org_ids(&["ORG1"]), scratch.path())
            .expect_err("empty mods dir should fail");
        assert!(err.to_string().contains("no mods files found"));
    }

    #[test]
    fn validate_org_ids_names_the_unmatched_id() {
        let scratch = TempDir::new().expect("scratch dir should be created");
        fs::write(scratch.path().join("ORG1_mods.xml"), "<mods/>").expect("file should be written");

        let err = validate_org_ids(&org_ids(&["ORG1", "ORG2"]), scratch.path())
            .expect_err("unmatched org id should fail");
        assert!(err.to_string().contains("ORG2"));
    }

    #[test]
    fn validate_org_ids_matches_text_before_first_underscore() {
        let scratch = TempDir::new().expect("scratch dir should be created");
        fs::write(scratch.path().join("ORG1_extra_mods.xml"), "<mods/>")
            .expect("file should be written");

        validate_org_ids(&org_ids(&["ORG1"]), scratch.path())
            .expect("prefix before first underscore should match");
    }

    #[test]
    fn validate_image_dirs_names_an_empty_org_dir() {
        let scratch = TempDir::new().expect("scratch dir should be created");
        fs::create_dir_all(scratch.path().join("ORG1")).expect("org image dir should be created");

        let err = validate_image_dirs(&org_ids(&["ORG1"]), scratch.path())
            .expect_err("empty image dir should fail");
        assert!(err.to_string().contains("is empty"));
        assert!(err.to_string().contains("ORG1"));
    }

    #[test]
    fn validate_image_dirs_names_a_missing_org_dir() {
        let scratch = TempDir::new().expect("scratch dir should be created");

        let err = validate_image_dirs(&org_ids(&["ORG9"]), scratch.path())
            .expect_err("missing image dir should fail");
        assert!(err.to_string().contains("ORG9"));
        assert!(err.to_string().contains("does not exist"));
    }
}
