//! Shared DTOs (schemas-as-code) for the optbind workspace.
//!
//! # Design constraints
//! - These types are intended to be serialized to disk.
//! - Nothing here may carry wall-clock data: every artifact must be reproducible.
//! - Prefer adding optional fields over changing semantics.

pub mod generation;
pub mod options;
pub mod report;
pub mod target;

/// Schema identifiers.
pub mod schema {
    pub const OPTBIND_OPTIONS_V1: &str = "optbind.options.v1";
    pub const OPTBIND_CACHE_V1: &str = "optbind.cache.v1";
    pub const OPTBIND_REPORT_V1: &str = "optbind.report.v1";
}

/// Name of the cache stamp written next to generated sources.
pub const CACHE_STAMP_FILE: &str = ".optbind-cache.json";

/// Tool identity recorded in reports.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ToolInfo {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}
