//! Port traits abstracting all I/O away from the pipeline.

use camino::Utf8Path;
use optbind_types::options::OptionSchema;

/// Source of the option schema.
pub trait SchemaSource {
    fn load_schema(&self) -> anyhow::Result<OptionSchema>;
}

/// Read access to previously generated output.
pub trait OutputView {
    /// `None` when the file does not exist.
    fn read_file(&self, path: &Utf8Path) -> anyhow::Result<Option<String>>;

    /// Every file below `dir`, relative, `/`-separated and sorted. Empty when
    /// `dir` does not exist.
    fn list_files(&self, dir: &Utf8Path) -> anyhow::Result<Vec<String>>;
}

/// File-system write operations.
pub trait WritePort {
    fn write_file(&self, path: &Utf8Path, contents: &[u8]) -> anyhow::Result<()>;
    fn create_dir_all(&self, path: &Utf8Path) -> anyhow::Result<()>;
    /// Removing a directory that does not exist is not an error.
    fn remove_dir_all(&self, path: &Utf8Path) -> anyhow::Result<()>;
}
