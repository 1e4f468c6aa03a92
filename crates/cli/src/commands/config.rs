use std::fs;

use anyhow::{anyhow, Context, Result};
use readiness_core::store::{DatasetLayout, ReadinessConfig};

use crate::canonicalize_or_current;

/// Write the default `readiness.yaml` at `root`.
pub fn init_config_command(root: &str, force: bool) -> Result<()> {
    let root_path = canonicalize_or_current(root)?;
    let layout = DatasetLayout::new(&root_path);

    if layout.config_path.exists() && !force {
        return Err(anyhow!(
            "Config already exists at {} (rerun with --force to overwrite)",
            layout.config_path.display()
        ));
    }
    fs::create_dir_all(&layout.root)
        .with_context(|| format!("Failed to create root dir: {}", layout.root.display()))?;

    let yaml = serde_yaml::to_string(&ReadinessConfig::default())
        .context("Failed to serialize readiness config")?;
    fs::write(&layout.config_path, yaml).with_context(|| {
        format!("Failed to write readiness config: {}", layout.config_path.display())
    })?;

    println!("Wrote readiness config:");
    println!("  Root: {}", layout.root.display());
    println!("  Config: {}", layout.config_path.display());
    println!("  Record store (expected): {}", layout.results_path.display());

    Ok(())
}
