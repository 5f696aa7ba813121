//! Locates each organization's MODS documents by filename convention and
//! loads their raw text. Per-item association is not implemented: the
//! document-to-item mapping is undefined upstream, so callers only record
//! the located documents and their fixity.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

use crate::util::sha256_file;

/// A mods file whose filename prefix matched a requested organization.
#[derive(Debug, Clone)]
pub struct ModsCandidate {
    pub org_id: String,
    pub path: PathBuf,
}

/// A located mods document loaded into memory.
#[derive(Debug, Clone)]
pub struct ModsDocument {
    pub org_id: String,
    pub filename: String,
    pub sha256: String,
    pub text: String,
}

/// Derives the organization prefix from a mods filename: extension stripped,
/// then the text before the first underscore.
pub fn mods_org_prefix(filename: &str) -> Option<&str> {
    let stem = Path::new(filename).file_stem()?.to_str()?;
    stem.split('_').next()
}

/// Finds every xml file in the mods directory whose filename prefix matches
/// one of the requested org ids, in org-then-filename order.
pub fn locate_candidates(org_ids: &[String], mods_dir: &Path) -> Result<Vec<ModsCandidate>> {
    let mut xml_paths = discover_xml_files(mods_dir)?;
    xml_paths.sort();

    let mut candidates = Vec::new();
    for org_id in org_ids {
        for path in &xml_paths {
            let matches = path
                .file_name()
                .and_then(|name| name.to_str())
                .and_then(mods_org_prefix)
                .map(|prefix| prefix == org_id.as_str())
                .unwrap_or(false);

            if matches {
                debug!(org_id = %org_id, path = %path.display(), "matched mods file");
                candidates.push(ModsCandidate {
                    org_id: org_id.clone(),
                    path: path.clone(),
                });
            }
        }
    }

    debug!(candidate_count = candidates.len(), "located mods candidates");
    Ok(candidates)
}

/// Reads each candidate's full text, failing with the file's path on any
/// unreadable candidate.
// TODO: associate each loaded document with its item output dirs once the
// document-to-item mapping is defined.
pub fn load_documents(candidates: &[ModsCandidate]) -> Result<Vec<ModsDocument>> {
    let mut documents = Vec::with_capacity(candidates.len());

    for candidate in candidates {
        let filename = candidate
            .path
            .file_name()
            .and_then(|name| name.to_str())
            .map(ToOwned::to_owned)
            .with_context(|| format!("invalid UTF-8 filename: {}", candidate.path.display()))?;

        let sha256 = sha256_file(&candidate.path)?;
        let text = fs::read_to_string(&candidate.path)
            .with_context(|| format!("failed to read mods file: {}", candidate.path.display()))?;

        documents.push(ModsDocument {
            org_id: candidate.org_id.clone(),
            filename,
            sha256,
            text,
        });
    }

    Ok(documents)
}

fn discover_xml_files(mods_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut xml_paths = Vec::new();

    let entries =
        fs::read_dir(mods_dir).with_context(|| format!("failed to read {}", mods_dir.display()))?;

    for entry in entries {
        let entry =
            entry.with_context(|| format!("failed to read entry in {}", mods_dir.display()))?;
        let path = entry.path();

        if !entry
            .file_type()
            .with_context(|| format!("failed to inspect file type: {}", path.display()))?
            .is_file()
        {
            continue;
        }

        let is_xml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("xml"))
            .unwrap_or(false);

        if is_xml {
            xml_paths.push(path);
        }
    }

    Ok(xml_paths)
}
