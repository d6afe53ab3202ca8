//! Project-file discovery and `.env` loading.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

/// File name searched for in the working directory and its ancestors.
pub const PROJECT_FILE_NAME: &str = "decant.yml";

/// Environment variable that pins the project file explicitly, bypassing
/// the ancestor walk.
pub const PROJECT_ENV_VAR: &str = "DECANT_PROJECT";

/// Locate the project file from the current working directory.
///
/// Checks `DECANT_PROJECT` first, then walks from the working directory
/// upward looking for `decant.yml`.
///
/// # Errors
///
/// Returns an error if `DECANT_PROJECT` points at a missing file, or if no
/// ancestor directory contains a project file.
pub fn find_project_file() -> Result<PathBuf> {
    if let Ok(pinned) = std::env::var(PROJECT_ENV_VAR) {
        let path = PathBuf::from(&pinned);
        if !path.is_file() {
            bail!("${PROJECT_ENV_VAR} points at '{pinned}', which is not a file");
        }
        return Ok(path);
    }

    let cwd = std::env::current_dir().context("Failed to read current directory")?;
    match find_in_ancestors(&cwd) {
        Some(path) => Ok(path),
        None => bail!(
            "No '{PROJECT_FILE_NAME}' found in {} or any parent directory. \
             Run `decant init` to create one, or set ${PROJECT_ENV_VAR}.",
            cwd.display()
        ),
    }
}

/// Walk `start_dir` and its ancestors for the project file.
pub fn find_in_ancestors(start_dir: &Path) -> Option<PathBuf> {
    let mut dir = Some(start_dir);
    while let Some(d) = dir {
        let candidate = d.join(PROJECT_FILE_NAME);
        if candidate.is_file() {
            return Some(candidate);
        }
        dir = d.parent();
    }
    None
}

/// Load a `.env` file sitting beside the project file, if one exists.
///
/// Variables already present in the process environment win over `.env`
/// entries, so an exported credential is never silently replaced.
pub fn load_dotenv(project_file: &Path) {
    let Some(dir) = project_file.parent() else {
        return;
    };
    let env_path = dir.join(".env");
    if !env_path.is_file() {
        return;
    }

    match dotenvy::from_path(&env_path) {
        Ok(()) => tracing::debug!(path = %env_path.display(), "Loaded .env"),
        Err(e) => tracing::warn!(path = %env_path.display(), error = %e, "Failed to load .env"),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
