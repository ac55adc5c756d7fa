use std::path::Path;

use anyhow::{Context, Result};
use chrono::Local;

use prompterm_core::Script;

pub async fn run(path: &Path, out_dir: &Path) -> Result<()> {
    let script = Script::load(path)
        .await
        .with_context(|| format!("failed to load script {}", path.display()))?;

    let exported = script
        .export(out_dir, Local::now().date_naive())
        .await
        .context("failed to export script")?;

    println!("Exported {} words to {}", script.word_count(), exported.display());
    Ok(())
}
