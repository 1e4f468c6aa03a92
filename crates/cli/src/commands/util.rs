use anyhow::Result;
use readiness_core::analysis::RecordSet;
use readiness_core::store::DatasetContext;

use crate::canonicalize_or_current;

/// Load config and records for `root` (delegates to the core context).
pub fn open_dataset(root: &str, input: Option<&str>) -> Result<DatasetContext> {
    let root_path = canonicalize_or_current(root)?;
    DatasetContext::from_root(&root_path, input)
}

/// Deduplicate the loaded records into the working set.
pub fn working_set(ctx: &DatasetContext) -> RecordSet {
    RecordSet::from_records(ctx.loaded.records.iter().cloned())
}
