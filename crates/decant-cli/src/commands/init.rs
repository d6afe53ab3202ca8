//! `decant init`: create a fresh project file.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use uuid::Uuid;

use decant_project::locate::PROJECT_FILE_NAME;

pub fn run(dir: Option<&Path>) -> Result<()> {
    let base_dir = dir.unwrap_or_else(|| Path::new("."));
    let path = base_dir.join(PROJECT_FILE_NAME);

    if path.exists() {
        bail!("Refusing to overwrite existing project file: {}", path.display());
    }

    fs::create_dir_all(base_dir)
        .with_context(|| format!("Failed to create directory: {}", base_dir.display()))?;

    let content = project_file_template(&Uuid::new_v4().to_string());
    fs::write(&path, content)
        .with_context(|| format!("Failed to write project file: {}", path.display()))?;

    tracing::info!(path = %path.display(), "Created project file");
    println!("Created {}", path.display());
    println!();
    println!("Next steps:");
    println!("  1. Declare an extractor under plugins.extractors");
    println!("  2. Declare a loader under plugins.loaders");
    println!("  3. Run: decant validate");

    Ok(())
}

fn project_file_template(project_id: &str) -> String {
    format!(
        r#"version: 1
send_anonymous_usage_stats: true
project_id: {project_id}
plugins:
  extractors: []
  loaders: []
"#
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
