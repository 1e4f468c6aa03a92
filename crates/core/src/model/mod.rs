//! Benchmark record model.
//!
//! A [`Record`] is one measurement of a protocol surface: gas cost plus the
//! security level it declares. Raw rows come from several producers with
//! different field names, so every concept is read through an ordered list of
//! accepted aliases (see [`fields`]).

pub mod fields;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use self::fields::{
    depends_on_tokens, first_present, first_text, first_uint, parse_eff_annotation,
    ANNOTATION_FIELDS, BENCH_NAME_FIELDS, CATEGORY_FIELDS, DEPENDS_ON_FIELD,
    EFFECTIVE_BITS_FIELDS, EXPLICIT_ID_FIELDS, GAS_FIELDS, METRIC_TYPE_FIELD, METRIC_VALUE_FIELD,
    SECURITY_EQUIV_FIELDS, TIMESTAMP_FIELDS,
};

/// Separator between category and bench name in a canonical id.
pub const ID_SEPARATOR: &str = "::";

/// Category used when neither the row nor its id names one.
pub const UNKNOWN_CATEGORY: &str = "unknown";

/// Errors raised while turning a raw row into a [`Record`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecordError {
    /// Neither `category::bench_name` nor an explicit id field is present.
    #[error("record has no derivable canonical id")]
    MissingId,
    /// The row parsed as JSON but is not an object.
    #[error("record is not a JSON object")]
    NotAnObject,
}

/// Which field produced a record's own security bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BitsSource {
    /// Explicit `effective_security_bits`.
    EffectiveField,
    /// Explicit `security_equiv_bits`.
    SecurityEquivField,
    /// `security_metric_value`, admitted by the metric policy.
    MetricValue,
    /// `effNNN=MMM` in the free-text notes.
    Annotation,
}

/// Which `security_metric_type` values may supply bits.
///
/// `Pooled` follows the dataset convention: `lambda_eff`,
/// `security_equiv_bits`, `H_min` and friends are all treated as directly
/// comparable bit values.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum MetricPolicy {
    #[default]
    Pooled,
    /// Only the listed metric types (an absent type is always accepted).
    Only(Vec<String>),
}

impl MetricPolicy {
    pub fn admits(&self, metric_type: Option<&str>) -> bool {
        match (self, metric_type) {
            (MetricPolicy::Pooled, _) | (_, None) | (_, Some("")) => true,
            (MetricPolicy::Only(allowed), Some(t)) => allowed.iter().any(|a| a == t),
        }
    }
}

/// One benchmark measurement in canonical form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Canonical identifier, usually `category::bench_name`.
    pub id: String,
    pub category: String,
    pub gas: Option<u64>,
    /// Declared security bits. `None` is reported as absent, resolved as 0.
    pub own_bits: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bits_source: Option<BitsSource>,
    /// Dependency tokens in declaration order, not yet resolved.
    #[serde(default)]
    pub depends_on: Vec<String>,
    /// ISO-8601 timestamp, or empty.
    #[serde(default)]
    pub timestamp: String,
    /// The untouched input row.
    #[serde(default)]
    pub raw: Map<String, Value>,
}

impl Record {
    /// Minimal record with an id and own bits; category derives from the id.
    pub fn new(id: impl Into<String>, own_bits: Option<u64>) -> Self {
        let id = id.into();
        let category = category_of(&id).to_string();
        Self {
            id,
            category,
            gas: None,
            own_bits,
            bits_source: None,
            depends_on: Vec::new(),
            timestamp: String::new(),
            raw: Map::new(),
        }
    }

    pub fn with_depends_on<I, S>(mut self, deps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.depends_on = deps.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_timestamp(mut self, ts: impl Into<String>) -> Self {
        self.timestamp = ts.into();
        self
    }

    pub fn with_gas(mut self, gas: Option<u64>) -> Self {
        self.gas = gas;
        self
    }

    /// Own bits as used by the resolver.
    pub fn own_bits_or_zero(&self) -> u64 {
        self.own_bits.unwrap_or(0)
    }

    /// Gas per declared bit of security.
    pub fn gas_per_own_bit(&self) -> Option<f64> {
        gas_per_secure_bit(self.gas, self.own_bits_or_zero())
    }

    /// Parse a JSON value using the pooled metric policy.
    pub fn from_value(value: &Value) -> Result<Self, RecordError> {
        Self::from_value_with(value, &MetricPolicy::default())
    }

    pub fn from_value_with(value: &Value, policy: &MetricPolicy) -> Result<Self, RecordError> {
        match value {
            Value::Object(obj) => Self::from_json_with(obj, policy),
            _ => Err(RecordError::NotAnObject),
        }
    }

    /// Build a record from a raw row.
    pub fn from_json_with(
        obj: &Map<String, Value>,
        policy: &MetricPolicy,
    ) -> Result<Self, RecordError> {
        let id = canonical_id(obj).ok_or(RecordError::MissingId)?;
        let category =
            first_text(obj, CATEGORY_FIELDS).unwrap_or_else(|| category_of(&id).to_string());
        let (own_bits, bits_source) = match own_bits(obj, policy) {
            Some((bits, source)) => (Some(bits), Some(source)),
            None => (None, None),
        };

        Ok(Self {
            category,
            gas: first_uint(obj, GAS_FIELDS),
            own_bits,
            bits_source,
            depends_on: depends_on_tokens(obj.get(DEPENDS_ON_FIELD)),
            timestamp: first_text(obj, TIMESTAMP_FIELDS).unwrap_or_default(),
            raw: obj.clone(),
            id,
        })
    }
}

/// Derive the canonical id of a raw row.
///
/// `category::bench_name` when both are present, then an explicit id field,
/// then the bare bench name.
pub fn canonical_id(obj: &Map<String, Value>) -> Option<String> {
    let category = first_text(obj, CATEGORY_FIELDS);
    let bench = first_text(obj, BENCH_NAME_FIELDS);
    if let (Some(category), Some(bench)) = (&category, &bench) {
        return Some(format!("{category}{ID_SEPARATOR}{bench}"));
    }
    first_text(obj, EXPLICIT_ID_FIELDS).or(bench)
}

/// Gas spent per bit of security. `None` without gas or with zero bits.
pub fn gas_per_secure_bit(gas: Option<u64>, bits: u64) -> Option<f64> {
    let gas = gas?;
    (bits > 0).then(|| gas as f64 / bits as f64)
}

/// Category implied by an id: the text before the first `::`.
pub fn category_of(id: &str) -> &str {
    match id.split_once(ID_SEPARATOR) {
        Some((prefix, _)) if !prefix.is_empty() => prefix,
        _ => UNKNOWN_CATEGORY,
    }
}

fn own_bits(obj: &Map<String, Value>, policy: &MetricPolicy) -> Option<(u64, BitsSource)> {
    if let Some(bits) = first_uint(obj, EFFECTIVE_BITS_FIELDS) {
        return Some((bits, BitsSource::EffectiveField));
    }
    if let Some(bits) = first_uint(obj, SECURITY_EQUIV_FIELDS) {
        return Some((bits, BitsSource::SecurityEquivField));
    }
    let metric_type = first_present(obj, &[METRIC_TYPE_FIELD]).and_then(Value::as_str);
    if policy.admits(metric_type) {
        if let Some(bits) = first_uint(obj, &[METRIC_VALUE_FIELD]) {
            return Some((bits, BitsSource::MetricValue));
        }
    }
    first_present(obj, ANNOTATION_FIELDS)
        .and_then(Value::as_str)
        .and_then(parse_eff_annotation)
        .map(|bits| (bits, BitsSource::Annotation))
}
