use anyhow::{Context, Result};
use readiness_core::model::BitsSource;
use serde::Serialize;

use crate::commands::{open_dataset, working_set};
use crate::{fmt_opt, fmt_ratio};

/// Summary of the record kept for one canonical id.
#[derive(Debug, Serialize, PartialEq)]
pub struct LatestRecordInfo {
    pub id: String,
    pub category: String,
    pub timestamp: String,
    pub gas: Option<u64>,
    pub own_bits: Option<u64>,
    /// Gas per declared bit of security.
    pub gas_per_secure_bit: Option<f64>,
    pub bits_source: Option<BitsSource>,
    pub depends_on: Vec<String>,
}

/// The deduplicated working set, one entry per canonical id.
pub fn collect_latest_records(root: &str, input: Option<&str>) -> Result<Vec<LatestRecordInfo>> {
    let ctx = open_dataset(root, input)?;
    let records = working_set(&ctx);
    Ok(records
        .iter()
        .map(|(id, record)| LatestRecordInfo {
            id: id.clone(),
            category: record.category.clone(),
            timestamp: record.timestamp.clone(),
            gas: record.gas,
            own_bits: record.own_bits,
            gas_per_secure_bit: record.gas_per_own_bit(),
            bits_source: record.bits_source,
            depends_on: record.depends_on.clone(),
        })
        .collect())
}

/// List the latest record per canonical id.
pub fn latest_command(root: &str, input: Option<&str>, json: bool) -> Result<()> {
    let latest = collect_latest_records(root, input)?;

    if json {
        let serialized = serde_json::to_string_pretty(&latest)
            .context("Failed to serialize latest records to JSON")?;
        println!("{}", serialized);
        return Ok(());
    }

    println!("Latest records ({}):", latest.len());
    if latest.is_empty() {
        println!("  (none)");
        return Ok(());
    }
    for info in latest {
        let ts = if info.timestamp.is_empty() { "-" } else { info.timestamp.as_str() };
        println!(
            "  - {} {} gas={} bits={} g/bit={}",
            ts,
            info.id,
            fmt_opt(info.gas),
            fmt_opt(info.own_bits),
            fmt_ratio(info.gas_per_secure_bit)
        );
    }

    Ok(())
}
