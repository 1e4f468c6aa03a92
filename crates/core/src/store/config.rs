use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::analysis::DEFAULT_KNOWN_PREFIXES;
use crate::model::MetricPolicy;

/// Human-facing hint shown when a record is capped by a dependency whose id
/// starts with `prefix`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockerHint {
    pub prefix: String,
    pub text: String,
}

impl BlockerHint {
    pub fn new(prefix: impl Into<String>, text: impl Into<String>) -> Self {
        Self { prefix: prefix.into(), text: text.into() }
    }
}

/// Serializable readiness configuration.
///
/// This lives (optionally) at `readiness.yaml` in the dataset root. Every
/// field has a default, so a partial file only overrides what it names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReadinessConfig {
    /// Category prefixes tried when resolving bare dependency tokens.
    pub known_prefixes: Vec<String>,
    /// Display target bits per category.
    pub target_bits: BTreeMap<String, u64>,
    /// Blocker hints, first matching prefix wins.
    pub blocker_hints: Vec<BlockerHint>,
    /// Metric types allowed to supply own bits. Absent pools every type.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metric_types: Option<Vec<String>>,
}

impl Default for ReadinessConfig {
    fn default() -> Self {
        let target_bits = [
            ("ecdsa", 128),
            ("mldsa65", 192),
            ("falcon", 256),
            ("dilithium", 128),
            ("randao", 128),
            ("attestation", 128),
            ("das", 128),
        ]
        .into_iter()
        .map(|(category, bits)| (category.to_string(), bits))
        .collect();

        Self {
            known_prefixes: DEFAULT_KNOWN_PREFIXES.iter().map(|p| p.to_string()).collect(),
            target_bits,
            blocker_hints: vec![
                BlockerHint::new(
                    "ecdsa::l1_envelope_assumption",
                    "Capped by L1 ECDSA envelope assumption (PQ not enshrined end-to-end).",
                ),
                BlockerHint::new(
                    "randao::l1_randao_mix_surface",
                    "Measured gas; H_min denominator is a placeholder until threat model is fixed.",
                ),
                BlockerHint::new(
                    "attestation::relay_attestation_surface",
                    "Measured gas; H_min denominator is a placeholder until threat model is fixed.",
                ),
            ],
            metric_types: None,
        }
    }
}

impl ReadinessConfig {
    pub fn metric_policy(&self) -> MetricPolicy {
        match &self.metric_types {
            Some(types) => MetricPolicy::Only(types.clone()),
            None => MetricPolicy::Pooled,
        }
    }

    /// Target bits for a category, if configured.
    pub fn target_for(&self, category: &str) -> Option<u64> {
        self.target_bits.get(category).copied().filter(|bits| *bits > 0)
    }

    /// Hint text for a blocking dependency id.
    pub fn blocker_text(&self, dep: &str) -> String {
        self.blocker_hints
            .iter()
            .find(|hint| dep.starts_with(&hint.prefix))
            .map(|hint| hint.text.clone())
            .unwrap_or_else(|| format!("Capped by dependency: {dep}"))
    }
}
