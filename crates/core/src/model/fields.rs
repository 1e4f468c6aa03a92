//! Raw-row field access.
//!
//! Producers disagree on field names, so each concept has an alias list
//! tried in order. Values are coerced leniently: anything that does not
//! coerce is treated as absent.

use std::sync::OnceLock;

use regex::Regex;
use serde_json::{Map, Value};

/// Accepted field names per concept, highest priority first.
pub const CATEGORY_FIELDS: &[&str] = &["scheme", "category"];
pub const BENCH_NAME_FIELDS: &[&str] = &["bench_name", "bench"];
pub const EXPLICIT_ID_FIELDS: &[&str] = &["id", "name", "bench_id"];
pub const GAS_FIELDS: &[&str] = &["gas", "gas_verify", "gas_surface"];
pub const EFFECTIVE_BITS_FIELDS: &[&str] = &["effective_security_bits"];
pub const SECURITY_EQUIV_FIELDS: &[&str] = &["security_equiv_bits"];
pub const METRIC_TYPE_FIELD: &str = "security_metric_type";
pub const METRIC_VALUE_FIELD: &str = "security_metric_value";
pub const ANNOTATION_FIELDS: &[&str] = &["notes"];
pub const TIMESTAMP_FIELDS: &[&str] = &["ts_utc", "timestamp", "ts", "time"];
pub const DEPENDS_ON_FIELD: &str = "depends_on";

/// First non-null value among `keys`.
pub fn first_present<'a>(obj: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().filter_map(|k| obj.get(*k)).find(|v| !v.is_null())
}

/// First non-empty textual value among `keys`. Numbers are rendered as text.
pub fn first_text(obj: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().filter_map(|k| obj.get(*k)).find_map(as_text)
}

/// First value among `keys` that coerces to a non-negative integer.
pub fn first_uint(obj: &Map<String, Value>, keys: &[&str]) -> Option<u64> {
    keys.iter().filter_map(|k| obj.get(*k)).find_map(as_uint)
}

fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Coerce a JSON value into a non-negative integer.
///
/// Booleans, integers, floats and numeric strings (including "128.0") are
/// accepted; floats truncate toward zero. Anything else, and any negative
/// value, yields `None`.
pub fn as_uint(value: &Value) -> Option<u64> {
    let float = match value {
        Value::Bool(b) => return Some(u64::from(*b)),
        Value::Number(n) => {
            if let Some(u) = n.as_u64() {
                return Some(u);
            }
            n.as_f64()?
        }
        Value::String(s) => {
            let s = s.trim();
            if let Ok(u) = s.parse::<u64>() {
                return Some(u);
            }
            s.parse::<f64>().ok()?
        }
        _ => return None,
    };
    if !float.is_finite() {
        return None;
    }
    let truncated = float.trunc();
    if truncated < 0.0 || truncated > u64::MAX as f64 {
        return None;
    }
    Some(truncated as u64)
}

fn eff_pattern() -> Option<&'static Regex> {
    static EFF: OnceLock<Option<Regex>> = OnceLock::new();
    EFF.get_or_init(|| Regex::new(r"(?:^|\s)eff\d+\s*=\s*(\d+)(?:\s|$)").ok()).as_ref()
}

/// Parse an upstream cap encoded in free text, e.g. `"weakest_link=x eff128=128 gpb=3"`.
pub fn parse_eff_annotation(text: &str) -> Option<u64> {
    let caps = eff_pattern()?.captures(text)?;
    caps.get(1)?.as_str().parse().ok()
}

/// Normalize the dependency field into an ordered token list.
pub fn depends_on_tokens(value: Option<&Value>) -> Vec<String> {
    let tokens: Vec<String> = match value {
        Some(Value::Array(items)) => items.iter().filter_map(as_text).collect(),
        Some(Value::String(s)) => s.split(';').map(|t| t.trim().to_string()).collect(),
        Some(Value::Number(n)) => vec![n.to_string()],
        _ => Vec::new(),
    };
    tokens.into_iter().filter(|t| !t.is_empty()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn coerces_numeric_shapes() {
        assert_eq!(as_uint(&json!(true)), Some(1));
        assert_eq!(as_uint(&json!(128)), Some(128));
        assert_eq!(as_uint(&json!(127.9)), Some(127));
        assert_eq!(as_uint(&json!("192")), Some(192));
        assert_eq!(as_uint(&json!(" 256.0 ")), Some(256));
    }

    #[test]
    fn non_numeric_and_negative_values_are_absent() {
        assert_eq!(as_uint(&json!("n/a")), None);
        assert_eq!(as_uint(&json!(-3)), None);
        assert_eq!(as_uint(&json!("-1.5")), None);
        assert_eq!(as_uint(&json!([1])), None);
        assert_eq!(as_uint(&Value::Null), None);
    }

    #[test]
    fn eff_pattern_is_available() {
        assert!(eff_pattern().is_some());
    }

    #[test]
    fn eff_annotation_takes_right_hand_value() {
        assert_eq!(parse_eff_annotation("weakest_link=l1 eff128=128 gpb_eff=3"), Some(128));
        assert_eq!(parse_eff_annotation("eff256 = 96"), Some(96));
        assert_eq!(parse_eff_annotation("gpb_eff128=128"), None);
        assert_eq!(parse_eff_annotation("no cap here"), None);
    }

    #[test]
    fn depends_on_accepts_lists_and_joined_strings() {
        assert_eq!(depends_on_tokens(Some(&json!(["a::b", 7, null]))), vec!["a::b", "7"]);
        assert_eq!(depends_on_tokens(Some(&json!("a::b; c ;"))), vec!["a::b", "c"]);
        assert!(depends_on_tokens(Some(&json!(""))).is_empty());
        assert!(depends_on_tokens(None).is_empty());
    }
}
