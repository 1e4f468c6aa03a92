//! Services that compose the analysis passes for frontends.

pub mod readiness;

pub use readiness::{
    explain_record, Analysis, DependencyDetail, ReadinessReport, ReadinessRow, RecordExplanation,
};
