//! CLI command implementations.

pub mod config;
pub mod init;
pub mod plugins;
pub mod validate;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use decant_types::manifest::ProjectManifest;

/// Resolve the project file path from an explicit `--project` flag or by
/// discovery, and load any `.env` sitting beside it before anything reads
/// the environment.
pub(crate) fn project_path(project: Option<&Path>) -> Result<PathBuf> {
    let path = match project {
        Some(p) => p.to_path_buf(),
        None => decant_project::find_project_file()?,
    };
    decant_project::load_dotenv(&path);
    Ok(path)
}

/// Locate and parse the project file.
pub(crate) fn load_project(project: Option<&Path>) -> Result<(PathBuf, ProjectManifest)> {
    let path = project_path(project)?;
    let manifest = decant_project::parse_project(&path)
        .with_context(|| format!("Failed to load project file: {}", path.display()))?;
    Ok((path, manifest))
}
