//! Clap-free settings for the generate pipeline.

use camino::Utf8PathBuf;
use optbind_domain::GenerateRequest;
use optbind_types::target::TargetId;

/// What a run does with the generated sources.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RunMode {
    /// Write sources unless the cache stamp proves them current.
    #[default]
    Write,
    /// Compare against disk without writing; drift fails the run.
    Check,
}

/// One target to generate.
#[derive(Debug, Clone)]
pub struct TargetSettings {
    pub target: TargetId,
    pub out_dir: Utf8PathBuf,
    pub request: GenerateRequest,
}

#[derive(Debug, Clone, Default)]
pub struct GenerateSettings {
    pub targets: Vec<TargetSettings>,

    /// Regenerate even when the cache stamp matches.
    pub force: bool,

    pub mode: RunMode,
}
