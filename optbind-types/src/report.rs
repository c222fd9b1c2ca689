use crate::ToolInfo;
use crate::generation::GenerationSummary;
use crate::target::TargetId;
use serde::{Deserialize, Serialize};

/// Machine-readable outcome of one generate/check run for one target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationReport {
    pub schema: String,
    pub tool: ToolInfo,
    pub target: TargetId,
    pub status: ReportStatus,
    pub cache_key: String,
    pub out_dir: String,

    #[serde(default)]
    pub files: Vec<ReportFile>,

    #[serde(default)]
    pub options: GenerationSummary,

    /// Drift details for `check` runs.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub drift: Vec<DriftEntry>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    /// Sources were (re)written.
    Generated,
    /// Cache stamp matched; nothing written.
    UpToDate,
    /// Check mode found no drift.
    Fresh,
    /// Check mode found drift.
    Stale,
}

impl ReportStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ReportStatus::Generated => "generated",
            ReportStatus::UpToDate => "up_to_date",
            ReportStatus::Fresh => "fresh",
            ReportStatus::Stale => "stale",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportFile {
    pub path: String,
    pub sha256: String,
    pub bytes: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriftEntry {
    pub path: String,
    pub kind: DriftKind,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patch: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DriftKind {
    Missing,
    Modified,
    Extra,
}

impl DriftKind {
    pub fn as_str(self) -> &'static str {
        match self {
            DriftKind::Missing => "missing",
            DriftKind::Modified => "modified",
            DriftKind::Extra => "extra",
        }
    }
}
