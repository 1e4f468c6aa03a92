use std::collections::BTreeMap;
use std::fmt;

use serde::{Serialize, Serializer};

use crate::analysis::{DependencyGraph, RecordSet, Resolution};
use crate::model::Record;

/// Generic marker used when no single dependency accounts for a cap.
pub const CHAIN_MARKER: &str = "depends_on";

/// Why a record's effective bits fall below its own bits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CapReason {
    /// The first dependency (in declaration order) whose effective bits
    /// equal the capped value.
    Dependency(String),
    /// Capped somewhere along the dependency chain.
    Chain,
}

impl CapReason {
    pub fn as_str(&self) -> &str {
        match self {
            CapReason::Dependency(id) => id,
            CapReason::Chain => CHAIN_MARKER,
        }
    }
}

impl fmt::Display for CapReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for CapReason {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Explain a single record's cap, if it has one.
///
/// Records without own bits have nothing to explain.
pub fn find_cap_reason(
    record: &Record,
    resolution: &Resolution,
    graph: &DependencyGraph,
) -> Option<CapReason> {
    let own = record.own_bits?;
    let effective = resolution.effective_bits(&record.id).unwrap_or(0);
    if effective >= own {
        return None;
    }

    let blocking = graph
        .dependencies(&record.id)
        .iter()
        .find(|dep| resolution.effective_bits(dep).unwrap_or(0) == effective);
    Some(match blocking {
        Some(dep) => CapReason::Dependency(dep.clone()),
        None => CapReason::Chain,
    })
}

/// Cap reasons for every capped record in the set.
pub fn explain_all(
    records: &RecordSet,
    resolution: &Resolution,
    graph: &DependencyGraph,
) -> BTreeMap<String, CapReason> {
    records
        .iter()
        .filter_map(|(id, record)| {
            find_cap_reason(record, resolution, graph).map(|reason| (id.clone(), reason))
        })
        .collect()
}
