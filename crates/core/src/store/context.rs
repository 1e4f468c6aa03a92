use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::store::{load_config, read_records, DatasetLayout, LoadedRecords, ReadinessConfig};

/// Convenience wrapper bundling layout, config, store path, and loaded records.
#[derive(Debug)]
pub struct DatasetContext {
    pub layout: DatasetLayout,
    pub config: ReadinessConfig,
    pub results_path: PathBuf,
    pub loaded: LoadedRecords,
}

impl DatasetContext {
    /// Load config and records for a given root, optionally overriding the
    /// record store path.
    pub fn from_root(root: impl AsRef<Path>, input: Option<&str>) -> Result<Self> {
        let layout = DatasetLayout::new(root);
        let config = load_config(&layout)?;
        let results_path = layout.results_path_or(input);
        let loaded = read_records(&results_path, &config.metric_policy())
            .with_context(|| format!("Failed to load records from {}", results_path.display()))?;
        tracing::debug!(
            path = %results_path.display(),
            records = loaded.records.len(),
            malformed = loaded.stats.malformed,
            rejected = loaded.stats.rejected,
            "loaded record store"
        );
        Ok(Self { layout, config, results_path, loaded })
    }
}
