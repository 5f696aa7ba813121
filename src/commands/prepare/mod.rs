pub mod mods;
pub mod provision;

use anyhow::Result;
use chrono::Utc;
use tracing::info;

use crate::cli::PrepareArgs;
use crate::commands::validate;
use crate::config::{self, PrepRoots};
use crate::model::{ModsFileEntry, OrgPrepEntry, PrepCounts, PrepPaths, PreparationManifest};
use crate::util::{now_utc_string, utc_compact_string, write_json_pretty};

const MANIFEST_DIR_NAME: &str = "manifests";

pub fn run(args: PrepareArgs) -> Result<()> {
    let started_ts = Utc::now();
    let run_id = format!("prep-{}", utc_compact_string(started_ts));

    let roots = PrepRoots::resolve(args.output_dir, args.mods_dir, args.image_dirs_root);
    let org_ids = config::parse_org_ids(&args.org_ids)?;

    info!(run_id = %run_id, org_count = org_ids.len(), "starting prepare");

    validate::validate_all(&org_ids, &roots)?;

    if args.dry_run {
        let mut item_dir_count = 0;
        for org_id in &org_ids {
            item_dir_count +=
                provision::list_image_files(&roots.image_dirs_root.join(org_id))?.len();
        }
        let mods_file_count = mods::locate_candidates(&org_ids, &roots.mods_dir)?.len();

        info!(
            org_dir_count = org_ids.len(),
            item_dir_count, mods_file_count, "prepare dry-run complete"
        );
        return Ok(());
    }

    let org_dirs = provision::provision_org_dirs(&org_ids, &roots.output_root)?;
    let item_dirs = provision::provision_item_dirs(&roots.image_dirs_root, &org_dirs.paths)?;

    let candidates = mods::locate_candidates(&org_ids, &roots.mods_dir)?;
    let documents = mods::load_documents(&candidates)?;

    let manifest = build_manifest(
        run_id,
        now_utc_string(),
        &roots,
        &org_ids,
        &org_dirs,
        &item_dirs,
        &documents,
    );

    let manifest_path = roots
        .output_root
        .join(MANIFEST_DIR_NAME)
        .join(format!("prep_run_{}.json", utc_compact_string(started_ts)));
    write_json_pretty(&manifest_path, &manifest)?;
    info!(path = %manifest_path.display(), "wrote preparation manifest");

    info!(
        org_dir_count = manifest.counts.org_dir_count,
        item_dir_count = manifest.counts.item_dir_count,
        created_dir_count = manifest.counts.created_dir_count,
        mods_file_count = manifest.counts.mods_file_count,
        "prepare completed"
    );

    Ok(())
}

fn build_manifest(
    run_id: String,
    generated_at: String,
    roots: &PrepRoots,
    org_ids: &[String],
    org_dirs: &provision::Provisioned,
    item_dirs: &provision::Provisioned,
    documents: &[mods::ModsDocument],
) -> PreparationManifest {
    let mut orgs = Vec::with_capacity(org_ids.len());

    for (org_id, org_output_dir) in org_ids.iter().zip(&org_dirs.paths) {
        let org_item_dirs: Vec<String> = item_dirs
            .paths
            .iter()
            .filter(|path| path.parent() == Some(org_output_dir.as_path()))
            .map(|path| path.display().to_string())
            .collect();

        let mods_files: Vec<ModsFileEntry> = documents
            .iter()
            .filter(|doc| doc.org_id == *org_id)
            .map(|doc| ModsFileEntry {
                filename: doc.filename.clone(),
                sha256: doc.sha256.clone(),
                byte_count: doc.text.len(),
            })
            .collect();

        orgs.push(OrgPrepEntry {
            org_id: org_id.clone(),
            output_dir: org_output_dir.display().to_string(),
            item_dirs: org_item_dirs,
            mods_files,
        });
    }

    PreparationManifest {
        manifest_version: 1,
        run_id,
        generated_at,
        paths: PrepPaths {
            output_root: roots.output_root.display().to_string(),
            mods_dir: roots.mods_dir.display().to_string(),
            image_dirs_root: roots.image_dirs_root.display().to_string(),
        },
        counts: PrepCounts {
            org_dir_count: org_dirs.paths.len(),
            item_dir_count: item_dirs.paths.len(),
            created_dir_count: org_dirs.created_count + item_dirs.created_count,
            mods_file_count: documents.len(),
        },
        orgs,
    }
}
