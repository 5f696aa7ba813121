use std::env;
use std::path::PathBuf;

use anyhow::{Result, bail};

pub const OUTPUT_DIR_ENV: &str = "DIGIPREP__PROCESSING_OUTPUT_DIR";
pub const MODS_DIR_ENV: &str = "DIGIPREP__ORG_MODS_FILES_DIR";
pub const IMAGE_DIRS_ENV: &str = "DIGIPREP__ORG_IMAGE_DIRS_ROOT";
pub const LOG_LEVEL_ENV: &str = "DIGIPREP__LOGLEVEL";

const OUTPUT_DIR_DEFAULT: &str = "../output_dir";
const MODS_DIR_DEFAULT: &str = "../org_mods_files";
const IMAGE_DIRS_DEFAULT: &str = "../org_image_dirs";

/// The three filesystem roots every command operates on. Each resolves from
/// the CLI flag, then the environment variable, then a relative default.
#[derive(Debug, Clone)]
pub struct PrepRoots {
    pub output_root: PathBuf,
    pub mods_dir: PathBuf,
    pub image_dirs_root: PathBuf,
}

impl PrepRoots {
    pub fn resolve(
        output_dir: Option<PathBuf>,
        mods_dir: Option<PathBuf>,
        image_dirs_root: Option<PathBuf>,
    ) -> Self {
        Self {
            output_root: resolve_path(
                output_dir,
                env::var(OUTPUT_DIR_ENV).ok(),
                OUTPUT_DIR_DEFAULT,
            ),
            mods_dir: resolve_path(mods_dir, env::var(MODS_DIR_ENV).ok(), MODS_DIR_DEFAULT),
            image_dirs_root: resolve_path(
                image_dirs_root,
                env::var(IMAGE_DIRS_ENV).ok(),
                IMAGE_DIRS_DEFAULT,
            ),
        }
    }
}

fn resolve_path(flag: Option<PathBuf>, env_value: Option<String>, default: &str) -> PathBuf {
    flag.or_else(|| env_value.map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(default))
}

/// Fallback log directive when no `RUST_LOG`-style directive is set.
/// Two documented levels: `DEBUG` (diagnostic, the default) and `INFO`.
pub fn default_log_directive() -> &'static str {
    match env::var(LOG_LEVEL_ENV).ok().as_deref() {
        Some("INFO") => "info",
        _ => "debug",
    }
}

pub fn parse_org_ids(raw: &str) -> Result<Vec<String>> {
    let org_ids: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|org_id| !org_id.is_empty())
        .map(ToOwned::to_owned)
        .collect();

    if org_ids.is_empty() {
        bail!("no org ids supplied in {raw:?}");
    }

    Ok(org_ids)
}

#[cfg(test)]
mod tests {
    use super::{parse_org_ids, resolve_path};
    use std::path::PathBuf;

    #[test]
    fn resolve_path_prefers_flag_over_env_and_default() {
        let resolved = resolve_path(
            Some(PathBuf::from("/from/flag")),
            Some("/from/env".to_string()),
            "../fallback",
        );
        assert_eq!(resolved, PathBuf::from("/from/flag"));
    }

    #[test]
    fn resolve_path_prefers_env_over_default() {
        let resolved = resolve_path(None, Some("/from/env".to_string()), "../fallback");
        assert_eq!(resolved, PathBuf::from("/from/env"));
    }

    #[test]
    fn resolve_path_falls_back_to_relative_default() {
        let resolved = resolve_path(None, None, "../fallback");
        assert_eq!(resolved, PathBuf::from("../fallback"));
    }

    #[test]
    fn parse_org_ids_trims_whitespace_around_tokens() {
        let org_ids = parse_org_ids(" HH020005 , HH024889 ").expect("org ids should parse");
        assert_eq!(org_ids, vec!["HH020005", "HH024889"]);
    }

    #[test]
    fn parse_org_ids_drops_empty_tokens() {
        let org_ids = parse_org_ids("ORG1,,ORG2,").expect("org ids should parse");
        assert_eq!(org_ids, vec!["ORG1", "ORG2"]);
    }

    #[test]
    fn parse_org_ids_rejects_an_all_empty_value() {
        assert!(parse_org_ids(" , ").is_err());
    }
}
