use crate::target::TargetId;
use serde::{Deserialize, Serialize};

/// One generated source file, relative to the output directory.
///
/// `path` always uses `/` separators so stamps and reports are host-independent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedFile {
    pub path: String,
    pub contents: String,
}

/// Result of a pure generation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Generation {
    pub target: TargetId,
    pub cache_key: String,

    /// Sorted by `path`.
    #[serde(default)]
    pub files: Vec<GeneratedFile>,

    #[serde(default)]
    pub summary: GenerationSummary,
}

impl Generation {
    pub fn file(&self, path: &str) -> Option<&GeneratedFile> {
        self.files.iter().find(|f| f.path == path)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationSummary {
    /// Options exposed as target constructs.
    pub bound: u64,
    /// Options the target profile declares unsupported.
    pub unsupported: u64,
    /// Bound options carrying a deprecation.
    pub deprecated: u64,
}

/// Cache stamp stored next to generated sources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStamp {
    pub schema: String,
    pub target: TargetId,
    pub cache_key: String,

    #[serde(default)]
    pub files: Vec<StampedFile>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StampedFile {
    pub path: String,
    pub sha256: String,
}

impl CacheStamp {
    pub fn new(target: TargetId, cache_key: impl Into<String>, files: Vec<StampedFile>) -> Self {
        Self {
            schema: crate::schema::OPTBIND_CACHE_V1.to_string(),
            target,
            cache_key: cache_key.into(),
            files,
        }
    }
}
