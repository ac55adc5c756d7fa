use std::path::Path;

use anyhow::{Context, Result};

use prompterm_core::AppConfig;

/// Print the config path, or write the defaults there with `init`
pub fn run(path: &Path, init: bool) -> Result<()> {
    if !init {
        let state = if path.exists() { "" } else { " (not created, using defaults)" };
        println!("{}{}", path.display(), state);
        return Ok(());
    }

    if path.exists() {
        println!("Config already exists at {}", path.display());
        return Ok(());
    }

    AppConfig::default()
        .save_to(path)
        .with_context(|| format!("failed to write {}", path.display()))?;
    println!("Wrote default config to {}", path.display());
    Ok(())
}
