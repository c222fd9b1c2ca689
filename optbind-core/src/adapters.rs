//! Default filesystem-backed and in-memory port implementations.

use crate::ports::{OutputView, SchemaSource, WritePort};
use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use optbind_types::options::OptionSchema;
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::sync::Mutex;
use tracing::debug;

/// Loads the schema file via `optbind_schema::load_schema`.
#[derive(Debug, Clone)]
pub struct FsSchemaSource {
    pub path: Utf8PathBuf,
}

impl FsSchemaSource {
    pub fn new(path: Utf8PathBuf) -> Self {
        Self { path }
    }
}

impl SchemaSource for FsSchemaSource {
    fn load_schema(&self) -> anyhow::Result<OptionSchema> {
        optbind_schema::load_schema(&self.path)
            .with_context(|| format!("load option schema {}", self.path))
    }
}

/// A schema that is already in memory.
#[derive(Debug, Clone)]
pub struct InMemorySchemaSource {
    schema: OptionSchema,
}

impl InMemorySchemaSource {
    pub fn new(schema: OptionSchema) -> Self {
        Self { schema }
    }
}

impl SchemaSource for InMemorySchemaSource {
    fn load_schema(&self) -> anyhow::Result<OptionSchema> {
        Ok(self.schema.clone())
    }
}

/// Reads generated output from disk.
#[derive(Debug, Clone, Default)]
pub struct FsOutputView;

impl OutputView for FsOutputView {
    fn read_file(&self, path: &Utf8Path) -> anyhow::Result<Option<String>> {
        match fs::read_to_string(path) {
            Ok(s) => Ok(Some(s)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("read {}", path)),
        }
    }

    fn list_files(&self, dir: &Utf8Path) -> anyhow::Result<Vec<String>> {
        let mut out = Vec::new();
        if dir.is_dir() {
            walk(dir, dir, &mut out)?;
        }
        out.sort();
        Ok(out)
    }
}

fn walk(root: &Utf8Path, dir: &Utf8Path, out: &mut Vec<String>) -> anyhow::Result<()> {
    for entry in fs::read_dir(dir).with_context(|| format!("read dir {}", dir))? {
        let entry = entry.with_context(|| format!("read dir {}", dir))?;
        let path = Utf8PathBuf::from_path_buf(entry.path())
            .map_err(|p| anyhow::anyhow!("non-UTF-8 path {}", p.display()))?;
        if path.is_dir() {
            walk(root, &path, out)?;
        } else {
            let rel = path
                .strip_prefix(root)
                .with_context(|| format!("{} is outside {}", path, root))?;
            out.push(rel.as_str().replace('\\', "/"));
        }
    }
    Ok(())
}

/// Filesystem write operations.
#[derive(Debug, Clone, Default)]
pub struct FsWritePort;

impl WritePort for FsWritePort {
    fn write_file(&self, path: &Utf8Path, contents: &[u8]) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("create parent dir for {}", path))?;
        }
        fs::write(path, contents).with_context(|| format!("write {}", path))
    }

    fn create_dir_all(&self, path: &Utf8Path) -> anyhow::Result<()> {
        fs::create_dir_all(path).with_context(|| format!("create_dir_all {}", path))
    }

    fn remove_dir_all(&self, path: &Utf8Path) -> anyhow::Result<()> {
        match fs::remove_dir_all(path) {
            Ok(()) => {
                debug!(path = %path, "cleared output directory");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("remove_dir_all {}", path)),
        }
    }
}

/// In-memory file tree implementing both output ports.
///
/// Keys are `/`-separated paths as passed in.
#[derive(Debug, Default)]
pub struct MemoryFs {
    files: Mutex<BTreeMap<String, Vec<u8>>>,
}

impl MemoryFs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every file.
    pub fn files(&self) -> BTreeMap<String, Vec<u8>> {
        self.lock().clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, Vec<u8>>> {
        self.files.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn key(path: &Utf8Path) -> String {
    path.as_str().replace('\\', "/")
}

impl OutputView for MemoryFs {
    fn read_file(&self, path: &Utf8Path) -> anyhow::Result<Option<String>> {
        match self.lock().get(&key(path)) {
            None => Ok(None),
            Some(bytes) => String::from_utf8(bytes.clone())
                .map(Some)
                .with_context(|| format!("{} is not UTF-8", path)),
        }
    }

    fn list_files(&self, dir: &Utf8Path) -> anyhow::Result<Vec<String>> {
        let prefix = format!("{}/", key(dir).trim_end_matches('/'));
        Ok(self
            .lock()
            .keys()
            .filter_map(|k| k.strip_prefix(&prefix).map(str::to_string))
            .collect())
    }
}

impl WritePort for MemoryFs {
    fn write_file(&self, path: &Utf8Path, contents: &[u8]) -> anyhow::Result<()> {
        self.lock().insert(key(path), contents.to_vec());
        Ok(())
    }

    fn create_dir_all(&self, _path: &Utf8Path) -> anyhow::Result<()> {
        Ok(())
    }

    fn remove_dir_all(&self, path: &Utf8Path) -> anyhow::Result<()> {
        let prefix = format!("{}/", key(path).trim_end_matches('/'));
        self.lock().retain(|k, _| !k.starts_with(&prefix));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn temp_root() -> (TempDir, Utf8PathBuf) {
        let temp = TempDir::new().unwrap();
        let root = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).unwrap();
        (temp, root)
    }

    #[test]
    fn fs_view_lists_nested_files_sorted() {
        let (_temp, root) = temp_root();
        let writer = FsWritePort;
        writer.write_file(&root.join("out/b/B.java"), b"b").unwrap();
        writer.write_file(&root.join("out/A.java"), b"a").unwrap();

        let files = FsOutputView.list_files(&root.join("out")).unwrap();
        assert_eq!(files, vec!["A.java", "b/B.java"]);
        assert!(FsOutputView.list_files(&root.join("missing")).unwrap().is_empty());
    }

    #[test]
    fn fs_view_missing_file_is_none() {
        let (_temp, root) = temp_root();
        assert_eq!(FsOutputView.read_file(&root.join("nope.txt")).unwrap(), None);
    }

    #[test]
    fn fs_remove_missing_dir_is_ok() {
        let (_temp, root) = temp_root();
        FsWritePort.remove_dir_all(&root.join("never-created")).unwrap();
    }

    #[test]
    fn memory_fs_remove_only_clears_the_subtree() {
        let mem = MemoryFs::new();
        mem.write_file(Utf8Path::new("out/gradle/A.java"), b"a").unwrap();
        mem.write_file(Utf8Path::new("out/gradle-extra/B.java"), b"b").unwrap();
        mem.remove_dir_all(Utf8Path::new("out/gradle")).unwrap();

        assert_eq!(mem.list_files(Utf8Path::new("out")).unwrap(), vec!["gradle-extra/B.java"]);
        assert_eq!(
            mem.read_file(Utf8Path::new("out/gradle-extra/B.java")).unwrap().as_deref(),
            Some("b")
        );
    }
}
