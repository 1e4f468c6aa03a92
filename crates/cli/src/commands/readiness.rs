use anyhow::{Context, Result};
use chrono::Utc;
use readiness_core::services::ReadinessReport;
use readiness_core::store::LoadStats;
use serde::Serialize;

use crate::commands::{open_dataset, working_set};
use crate::{fmt_opt, fmt_ratio, sha256_file};

/// Readiness view plus provenance of the store it was computed from.
#[derive(Debug, Serialize)]
pub struct ReadinessSnapshot {
    pub generated_at: String,
    pub results_path: String,
    pub results_sha256: String,
    pub load_stats: LoadStats,
    #[serde(flatten)]
    pub report: ReadinessReport,
}

/// Compute the readiness snapshot for a dataset root.
pub fn build_readiness_snapshot(root: &str, input: Option<&str>) -> Result<ReadinessSnapshot> {
    let ctx = open_dataset(root, input)?;
    let records = working_set(&ctx);
    let report = ReadinessReport::build(&records, &ctx.config);
    let results_sha256 = sha256_file(&ctx.results_path)?;

    Ok(ReadinessSnapshot {
        generated_at: Utc::now().to_rfc3339(),
        results_path: ctx.results_path.display().to_string(),
        results_sha256,
        load_stats: ctx.loaded.stats,
        report,
    })
}

/// Print the protocol readiness view.
pub fn readiness_command(root: &str, input: Option<&str>, json: bool) -> Result<()> {
    let snapshot = build_readiness_snapshot(root, input)?;

    if json {
        let serialized = serde_json::to_string_pretty(&snapshot)
            .context("Failed to serialize readiness report to JSON")?;
        println!("{}", serialized);
        return Ok(());
    }

    let rows = &snapshot.report.rows;
    println!("Protocol readiness ({} surfaces):", rows.len());
    println!("  Store: {}", snapshot.results_path);
    println!(
        "  Skipped: {} malformed, {} without id",
        snapshot.load_stats.malformed, snapshot.load_stats.rejected
    );
    if rows.is_empty() {
        println!("  (none)");
        return Ok(());
    }

    for row in rows {
        println!(
            "  - [{}] {} gas={} own={} effective={} target={} g/bit={}",
            row.category,
            row.id,
            fmt_opt(row.gas),
            fmt_opt(row.own_bits),
            row.effective_bits,
            row.target_bits,
            fmt_ratio(row.gas_per_secure_bit)
        );
        if let (Some(reason), Some(blocker)) = (&row.capped_by, &row.blocker) {
            println!("      capped by {}: {}", reason, blocker);
        }
    }

    if !snapshot.report.cyclic.is_empty() {
        println!("Cyclic dependencies (resolved to 0):");
        for id in &snapshot.report.cyclic {
            println!("  - {}", id);
        }
    }

    Ok(())
}
