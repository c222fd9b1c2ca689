use crate::builtin::builtin_templates;
use crate::template::TemplateSet;
use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use optbind_types::target::TargetId;
use std::collections::BTreeMap;
use tracing::debug;

/// Where a target's template set comes from.
///
/// The generator only sees the loaded `TemplateSet`; this port exists so the
/// pipeline can be tested against in-memory templates.
pub trait TemplateSource {
    fn load(&self, target: TargetId) -> anyhow::Result<TemplateSet>;
}

/// Reads `<root>/<target>/*.tpl`.
#[derive(Debug, Clone)]
pub struct FsTemplateSource {
    root: Utf8PathBuf,
}

impl FsTemplateSource {
    pub fn new(root: Utf8PathBuf) -> Self {
        Self { root }
    }

    pub fn target_dir(&self, target: TargetId) -> Utf8PathBuf {
        self.root.join(target.as_str())
    }
}

impl TemplateSource for FsTemplateSource {
    fn load(&self, target: TargetId) -> anyhow::Result<TemplateSet> {
        let dir = self.target_dir(target);
        let entries = fs::read_dir(&dir).with_context(|| format!("read template dir {}", dir))?;

        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.with_context(|| format!("read template dir {}", dir))?;
            let path = Utf8PathBuf::from_path_buf(entry.path())
                .map_err(|p| anyhow::anyhow!("non-UTF-8 template path {}", p.display()))?;
            if path.is_file() && path.extension() == Some("tpl") {
                paths.push(path);
            }
        }
        paths.sort();

        let mut set = TemplateSet::new();
        for path in &paths {
            let name = template_name(path)?;
            let contents =
                fs::read_to_string(path).with_context(|| format!("read template {}", path))?;
            set.insert(name, contents);
        }
        debug!(target = %target, dir = %dir, templates = set.len(), "loaded templates");
        Ok(set)
    }
}

fn template_name(path: &Utf8Path) -> anyhow::Result<String> {
    path.file_name()
        .map(str::to_string)
        .with_context(|| format!("template path {} has no file name", path))
}

/// The templates compiled into this crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinTemplateSource;

impl TemplateSource for BuiltinTemplateSource {
    fn load(&self, target: TargetId) -> anyhow::Result<TemplateSet> {
        Ok(builtin_templates(target))
    }
}

/// Fixed template sets, for tests and embedding.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTemplateSource {
    sets: BTreeMap<TargetId, TemplateSet>,
}

impl InMemoryTemplateSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, target: TargetId, set: TemplateSet) -> Self {
        self.sets.insert(target, set);
        self
    }
}

impl TemplateSource for InMemoryTemplateSource {
    fn load(&self, target: TargetId) -> anyhow::Result<TemplateSet> {
        self.sets
            .get(&target)
            .cloned()
            .with_context(|| format!("no templates registered for target {}", target))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn fs_source_reads_only_tpl_files_of_the_target() {
        let temp = TempDir::new().unwrap();
        let root = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).unwrap();
        fs::create_dir_all(root.join("maven")).unwrap();
        fs::write(root.join("maven/Maven.tpl"), "${package}\n").unwrap();
        fs::write(root.join("maven/README.md"), "ignored").unwrap();
        fs::create_dir_all(root.join("gradle")).unwrap();
        fs::write(root.join("gradle/Args.tpl"), "args\n").unwrap();

        let set = FsTemplateSource::new(root).load(TargetId::Maven).unwrap();
        let names: Vec<&str> = set.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["Maven.tpl"]);
    }

    #[test]
    fn fs_source_missing_dir_is_an_error() {
        let temp = TempDir::new().unwrap();
        let root = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).unwrap();
        let err = FsTemplateSource::new(root)
            .load(TargetId::Gradle)
            .unwrap_err();
        assert!(format!("{err:#}").contains("read template dir"));
    }

    #[test]
    fn in_memory_source_only_knows_registered_targets() {
        let source = InMemoryTemplateSource::new()
            .with(TargetId::Maven, TemplateSet::new().with("Maven.tpl", "x\n"));
        assert_eq!(source.load(TargetId::Maven).unwrap().len(), 1);
        assert!(source.load(TargetId::Gradle).is_err());
    }
}
