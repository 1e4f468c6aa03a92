use anyhow::{anyhow, Context, Result};
use readiness_core::analysis::TokenResolution;
use readiness_core::services::{explain_record, RecordExplanation};

use crate::commands::{open_dataset, working_set};
use crate::fmt_opt;

/// Explain how one record's effective bits were derived.
pub fn explain_record_at(root: &str, input: Option<&str>, id: &str) -> Result<RecordExplanation> {
    let ctx = open_dataset(root, input)?;
    let records = working_set(&ctx);
    explain_record(&records, &ctx.config, id)
        .ok_or_else(|| anyhow!("Record '{}' not found in {}", id, ctx.results_path.display()))
}

/// Print the explanation for one record.
pub fn explain_command(root: &str, input: Option<&str>, id: &str, json: bool) -> Result<()> {
    let explanation = explain_record_at(root, input, id)?;

    if json {
        let serialized = serde_json::to_string_pretty(&explanation)
            .context("Failed to serialize explanation to JSON")?;
        println!("{}", serialized);
        return Ok(());
    }

    println!("Record: {}", explanation.id);
    println!("  Own bits: {}", fmt_opt(explanation.own_bits));
    println!("  Effective bits: {}", explanation.effective_bits);
    match &explanation.capped_by {
        Some(reason) => println!("  Capped by: {}", reason),
        None => println!("  Capped by: -"),
    }
    if explanation.cyclic {
        println!("  Note: part of a dependency cycle (resolved to 0)");
    }

    println!("Dependencies ({}):", explanation.dependencies.len());
    if explanation.dependencies.is_empty() {
        println!("  (none)");
    }
    for dep in &explanation.dependencies {
        let how = match &dep.resolution {
            TokenResolution::Exact { id } => format!("exact -> {id}"),
            TokenResolution::Suffix { id } => format!("suffix -> {id}"),
            TokenResolution::Prefix { id } => format!("prefix -> {id}"),
            TokenResolution::External { .. } => "external (missing, skipped)".to_string(),
            TokenResolution::Ambiguous { candidates, .. } => {
                format!("ambiguous (skipped): {}", candidates.join(", "))
            }
            TokenResolution::Unknown { .. } => "unknown (missing, skipped)".to_string(),
        };
        println!("  - {} [{}] effective={}", dep.token, how, fmt_opt(dep.effective_bits));
    }

    Ok(())
}
