use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "digiprep",
    version,
    about = "Digitization directory-preparation tooling"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    Validate(ValidateArgs),
    Prepare(PrepareArgs),
    Status(StatusArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ValidateArgs {
    #[arg(long, default_value = "HH020005,HH024889")]
    pub org_ids: String,

    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    #[arg(long)]
    pub mods_dir: Option<PathBuf>,

    #[arg(long)]
    pub image_dirs_root: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct PrepareArgs {
    #[arg(long, default_value = "HH020005,HH024889")]
    pub org_ids: String,

    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    #[arg(long)]
    pub mods_dir: Option<PathBuf>,

    #[arg(long)]
    pub image_dirs_root: Option<PathBuf>,

    #[arg(long, default_value_t = false)]
    pub dry_run: bool,
}

#[derive(Args, Debug, Clone)]
pub struct StatusArgs {
    #[arg(long)]
    pub output_dir: Option<PathBuf>,
}
