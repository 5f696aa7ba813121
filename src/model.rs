use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModsFileEntry {
    pub filename: String,
    pub sha256: String,
    pub byte_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrgPrepEntry {
    pub org_id: String,
    pub output_dir: String,
    pub item_dirs: Vec<String>,
    pub mods_files: Vec<ModsFileEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrepPaths {
    pub output_root: String,
    pub mods_dir: String,
    pub image_dirs_root: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrepCounts {
    pub org_dir_count: usize,
    pub item_dir_count: usize,
    pub created_dir_count: usize,
    pub mods_file_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreparationManifest {
    pub manifest_version: u32,
    pub run_id: String,
    pub generated_at: String,
    pub paths: PrepPaths,
    pub counts: PrepCounts,
    pub orgs: Vec<OrgPrepEntry>,
}
