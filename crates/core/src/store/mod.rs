//! Record store access, dataset layout and readiness configuration.
//!
//! The store is a newline-delimited JSON file, one raw benchmark row per
//! line. Reading is tolerant: blank lines are ignored, unparsable lines and
//! id-less rows are counted and skipped. Only a missing store is fatal.
//!
//! - `DatasetLayout`: computed paths for the store and config.
//! - `ReadinessConfig`: YAML configuration with defaults.
//! - `DatasetContext`: layout + config + loaded records, bundled for frontends.

mod config;
mod context;
mod layout;

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use thiserror::Error;

use crate::model::{MetricPolicy, Record};

pub use config::{BlockerHint, ReadinessConfig};
pub use context::DatasetContext;
pub use layout::DatasetLayout;

/// Error type for record store access.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The record store does not exist at all.
    #[error("Record store not found at {}", .0.display())]
    Missing(PathBuf),

    /// Underlying IO error while reading the store.
    #[error("Failed to read record store at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Counters describing what a read skipped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LoadStats {
    /// Non-blank lines seen.
    pub lines: usize,
    /// Lines that were not a JSON object.
    pub malformed: usize,
    /// Objects with no derivable canonical id.
    pub rejected: usize,
}

/// Records parsed from a store, in input order.
#[derive(Debug, Clone, Default)]
pub struct LoadedRecords {
    pub records: Vec<Record>,
    pub stats: LoadStats,
}

/// Read every record from the store at `path`.
pub fn read_records(path: &Path, policy: &MetricPolicy) -> Result<LoadedRecords, StoreError> {
    if !path.exists() {
        return Err(StoreError::Missing(path.to_path_buf()));
    }
    let file =
        File::open(path).map_err(|source| StoreError::Io { path: path.to_path_buf(), source })?;
    parse_records(BufReader::new(file), policy)
        .map_err(|source| StoreError::Io { path: path.to_path_buf(), source })
}

/// Parse newline-delimited records from any reader.
///
/// Only IO failures are errors; a line that is not UTF-8 or not a JSON
/// object counts as malformed.
pub fn parse_records<R: BufRead>(mut reader: R, policy: &MetricPolicy) -> io::Result<LoadedRecords> {
    let mut loaded = LoadedRecords::default();
    let mut buf = Vec::new();
    let mut line_no = 0usize;
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        line_no += 1;

        let line = match std::str::from_utf8(&buf) {
            Ok(text) => text.trim(),
            Err(err) => {
                loaded.stats.lines += 1;
                tracing::debug!(line = line_no, error = %err, "skipping malformed record line");
                loaded.stats.malformed += 1;
                continue;
            }
        };
        if line.is_empty() {
            continue;
        }
        loaded.stats.lines += 1;

        let value: serde_json::Value = match serde_json::from_str(line) {
            Ok(value) => value,
            Err(err) => {
                tracing::debug!(line = line_no, error = %err, "skipping malformed record line");
                loaded.stats.malformed += 1;
                continue;
            }
        };
        if !value.is_object() {
            tracing::debug!(line = line_no, "skipping non-object record line");
            loaded.stats.malformed += 1;
            continue;
        }
        match Record::from_value_with(&value, policy) {
            Ok(record) => loaded.records.push(record),
            Err(err) => {
                tracing::debug!(line = line_no, error = %err, "rejecting record");
                loaded.stats.rejected += 1;
            }
        }
    }
    Ok(loaded)
}

/// Load the readiness config for a layout; a missing file yields defaults.
pub fn load_config(layout: &DatasetLayout) -> Result<ReadinessConfig> {
    if !layout.config_path.exists() {
        return Ok(ReadinessConfig::default());
    }
    let text = std::fs::read_to_string(&layout.config_path).with_context(|| {
        format!("Failed to read readiness config at {}", layout.config_path.display())
    })?;
    let config: ReadinessConfig =
        serde_yaml::from_str(&text).context("Failed to parse readiness config YAML")?;
    Ok(config)
}
