use std::path::{Path, PathBuf};

/// Logical layout of a benchmark dataset on disk.
///
/// This is derived from a chosen root path. It does not perform any IO itself.
/// The CLI or other frontends are responsible for reading and writing the
/// files it names.
#[derive(Debug, Clone)]
pub struct DatasetLayout {
    /// Root directory of the dataset.
    pub root: PathBuf,
    /// Directory holding the record store (data).
    pub data_dir: PathBuf,
    /// Newline-delimited JSON record store (data/results.jsonl).
    pub results_path: PathBuf,
    /// Readiness configuration (readiness.yaml).
    pub config_path: PathBuf,
}

impl DatasetLayout {
    /// Compute the default layout for a dataset rooted at `root`.
    ///
    /// This does *not* touch the filesystem.
    pub fn new(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref().to_path_buf();
        let data_dir = root.join("data");
        let results_path = data_dir.join("results.jsonl");
        let config_path = root.join("readiness.yaml");

        Self { root, data_dir, results_path, config_path }
    }

    /// Resolve an explicit record store path against the root, falling back
    /// to the default `data/results.jsonl`.
    pub fn results_path_or(&self, input: Option<&str>) -> PathBuf {
        match input.map(Path::new) {
            Some(p) if p.is_absolute() => p.to_path_buf(),
            Some(p) => self.root.join(p),
            None => self.results_path.clone(),
        }
    }
}
