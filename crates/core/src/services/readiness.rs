use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::analysis::{
    explain_all, CapReason, DependencyGraph, IdResolver, RecordSet, Resolution, TokenResolution,
    WeakestLinkResolver,
};
use crate::model::{gas_per_secure_bit, Record};
use crate::store::ReadinessConfig;

/// Resolver outputs for a record set: the dependency graph, effective bits
/// and cap reasons, all keyed by id.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub graph: DependencyGraph,
    pub resolution: Resolution,
    pub cap_reasons: BTreeMap<String, CapReason>,
}

impl Analysis {
    /// Run identifier resolution, weakest-link resolution and cap explanation.
    pub fn run(records: &RecordSet, known_prefixes: &[String]) -> Self {
        let ids = IdResolver::with_prefixes(records, known_prefixes.iter().cloned());
        let resolver = WeakestLinkResolver::with_resolver(records, &ids);
        let resolution = resolver.resolve();
        let graph = resolver.graph().clone();
        let cap_reasons = explain_all(records, &resolution, &graph);
        Self { graph, resolution, cap_reasons }
    }

    pub fn effective_bits(&self, id: &str) -> Option<u64> {
        self.resolution.effective_bits(id)
    }

    pub fn cap_reason(&self, id: &str) -> Option<&CapReason> {
        self.cap_reasons.get(id)
    }
}

/// One row of the protocol readiness view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReadinessRow {
    pub category: String,
    pub id: String,
    pub gas: Option<u64>,
    pub own_bits: Option<u64>,
    pub effective_bits: u64,
    /// Gas per effective bit of security.
    pub gas_per_secure_bit: Option<f64>,
    pub target_bits: u64,
    pub capped_by: Option<CapReason>,
    pub blocker: Option<String>,
}

/// The readiness view plus the two raw output mappings it is built from.
#[derive(Debug, Clone, Serialize)]
pub struct ReadinessReport {
    pub rows: Vec<ReadinessRow>,
    pub effective_bits: BTreeMap<String, u64>,
    pub cap_reasons: BTreeMap<String, CapReason>,
    pub cyclic: BTreeSet<String>,
}

impl ReadinessReport {
    /// Build the view for a deduplicated record set.
    ///
    /// Rows are sorted by `(category, id)`.
    pub fn build(records: &RecordSet, config: &ReadinessConfig) -> Self {
        let analysis = Analysis::run(records, &config.known_prefixes);

        let mut rows: Vec<ReadinessRow> = records
            .iter()
            .map(|(id, record)| readiness_row(id, record, &analysis, config))
            .collect();
        rows.sort_by(|a, b| (&a.category, &a.id).cmp(&(&b.category, &b.id)));

        Self {
            rows,
            effective_bits: analysis.resolution.effective,
            cap_reasons: analysis.cap_reasons,
            cyclic: analysis.resolution.cyclic,
        }
    }

    /// Build the view from raw records in input order (deduplicating first).
    pub fn from_records<I>(records: I, config: &ReadinessConfig) -> Self
    where
        I: IntoIterator<Item = Record>,
    {
        Self::build(&RecordSet::from_records(records), config)
    }

    pub fn row(&self, id: &str) -> Option<&ReadinessRow> {
        self.rows.iter().find(|row| row.id == id)
    }
}

fn readiness_row(
    id: &str,
    record: &Record,
    analysis: &Analysis,
    config: &ReadinessConfig,
) -> ReadinessRow {
    let effective_bits = analysis.effective_bits(id).unwrap_or(0);
    let target_bits = config
        .target_for(&record.category)
        .unwrap_or_else(|| record.own_bits_or_zero().max(effective_bits));
    let capped_by = analysis.cap_reason(id).cloned();
    let blocker = capped_by.as_ref().map(|reason| match reason {
        CapReason::Dependency(dep) => config.blocker_text(dep),
        CapReason::Chain => "Capped via dependency chain".to_string(),
    });

    ReadinessRow {
        category: record.category.clone(),
        id: id.to_string(),
        gas: record.gas,
        own_bits: record.own_bits,
        effective_bits,
        gas_per_secure_bit: gas_per_secure_bit(record.gas, effective_bits),
        target_bits,
        capped_by,
        blocker,
    }
}

/// Per-token resolution detail for one record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DependencyDetail {
    pub token: String,
    pub resolution: TokenResolution,
    /// Effective bits of the resolved dependency, when it is in the set.
    pub effective_bits: Option<u64>,
}

/// Everything known about why one record resolves the way it does.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordExplanation {
    pub id: String,
    pub own_bits: Option<u64>,
    pub effective_bits: u64,
    pub capped_by: Option<CapReason>,
    pub cyclic: bool,
    pub dependencies: Vec<DependencyDetail>,
}

/// Explain a single record, or `None` when the id is not in the set.
pub fn explain_record(
    records: &RecordSet,
    config: &ReadinessConfig,
    id: &str,
) -> Option<RecordExplanation> {
    let record = records.get(id)?;
    let analysis = Analysis::run(records, &config.known_prefixes);

    let dependencies = record
        .depends_on
        .iter()
        .zip(analysis.graph.token_resolutions(id))
        .map(|(token, resolution)| {
            let resolution = resolution.clone();
            let effective_bits = if records.contains(resolution.target()) {
                analysis.effective_bits(resolution.target())
            } else {
                None
            };
            DependencyDetail { token: token.clone(), resolution, effective_bits }
        })
        .collect();

    Some(RecordExplanation {
        id: id.to_string(),
        own_bits: record.own_bits,
        effective_bits: analysis.effective_bits(id).unwrap_or(0),
        capped_by: analysis.cap_reason(id).cloned(),
        cyclic: analysis.resolution.cyclic.contains(id),
        dependencies,
    })
}
