//! Weakest-link analysis over a deduplicated record set.
//!
//! Pipeline:
//! - [`RecordSet`]: one record per canonical id (latest wins).
//! - [`IdResolver`]: dependency tokens -> ids, refusing ambiguous matches.
//! - [`WeakestLinkResolver`]: effective bits = min over own bits and known
//!   dependencies; missing dependencies are skipped, cycles resolve to 0.
//! - [`find_cap_reason`] / [`explain_all`]: which dependency caps a record.

mod explain;
mod ids;
mod latest;
mod weakest_link;

pub use explain::{explain_all, find_cap_reason, CapReason, CHAIN_MARKER};
pub use ids::{IdResolver, TokenResolution, DEFAULT_KNOWN_PREFIXES};
pub use latest::{select_latest, RecordSet};
pub use weakest_link::{compute_effective_bits, DependencyGraph, Resolution, WeakestLinkResolver};
