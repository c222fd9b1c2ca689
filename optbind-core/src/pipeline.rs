//! Core generate and check pipelines, extracted from the CLI.
//!
//! These entry points are I/O-agnostic: schema, templates and output are
//! reached only through the port traits.

use crate::ports::{OutputView, SchemaSource, WritePort};
use crate::settings::{GenerateSettings, RunMode, TargetSettings};
use anyhow::Context;
use camino::{Utf8Component, Utf8Path, Utf8PathBuf};
use optbind_domain::{TemplateSource, generate, target_for};
use optbind_hash::sha256_hex;
use optbind_render::render_generation_md;
use optbind_types::generation::{CacheStamp, Generation, StampedFile};
use optbind_types::report::{DriftEntry, DriftKind, GenerationReport, ReportFile, ReportStatus};
use optbind_types::{CACHE_STAMP_FILE, ToolInfo};
use std::collections::BTreeSet;
use tracing::{debug, info};

/// Error type for pipeline results. Exit code 2 = stale sources, 1 = tool error.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("generated sources are stale")]
    Stale,
    #[error("{0:#}")]
    Internal(#[from] anyhow::Error),
}

impl ToolError {
    pub fn exit_code(&self) -> u8 {
        match self {
            ToolError::Stale => 2,
            ToolError::Internal(_) => 1,
        }
    }
}

/// Outcome for one target.
#[derive(Debug, Clone)]
pub struct TargetOutcome {
    pub generation: Generation,
    pub report: GenerationReport,
}

/// Outcome of `run_generate`.
#[derive(Debug, Clone)]
pub struct GenerateOutcome {
    pub targets: Vec<TargetOutcome>,
    /// Check mode found drift in at least one target.
    pub stale: bool,
}

/// Generate (or, in check mode, compare) every configured target.
///
/// Drift in check mode is reported through `GenerateOutcome::stale` so the
/// caller can still write reports before failing with [`ToolError::Stale`].
pub fn run_generate(
    settings: &GenerateSettings,
    schema_source: &dyn SchemaSource,
    template_source: &dyn TemplateSource,
    view: &dyn OutputView,
    writer: &dyn WritePort,
    tool: ToolInfo,
) -> Result<GenerateOutcome, ToolError> {
    ensure_distinct_out_dirs(&settings.targets)?;

    let schema = schema_source.load_schema()?;

    let mut targets = Vec::with_capacity(settings.targets.len());
    for t in &settings.targets {
        let templates = template_source
            .load(t.target)
            .with_context(|| format!("load templates for {}", t.target))?;
        let target = target_for(t.target);
        let generation = generate(&schema, target.as_ref(), &templates, &t.request)
            .with_context(|| format!("generate {} sources", t.target))?;

        let (status, drift) = match settings.mode {
            RunMode::Write => {
                if !settings.force && stamp_is_current(view, &t.out_dir, &generation)? {
                    debug!(target = %t.target, out_dir = %t.out_dir, "cache stamp matches, skipping");
                    (ReportStatus::UpToDate, Vec::new())
                } else {
                    write_generation(writer, &t.out_dir, &generation)?;
                    (ReportStatus::Generated, Vec::new())
                }
            }
            RunMode::Check => {
                let drift = compute_drift(view, &t.out_dir, &generation)?;
                if drift.is_empty() {
                    (ReportStatus::Fresh, drift)
                } else {
                    (ReportStatus::Stale, drift)
                }
            }
        };

        let report = build_report(&tool, t, &generation, status, drift);
        targets.push(TargetOutcome { generation, report });
    }

    let stale = targets
        .iter()
        .any(|t| t.report.status == ReportStatus::Stale);
    Ok(GenerateOutcome { targets, stale })
}

/// Two targets writing into one directory would clear each other's output.
fn ensure_distinct_out_dirs(targets: &[TargetSettings]) -> anyhow::Result<()> {
    let dirs: Vec<Utf8PathBuf> = targets.iter().map(|t| normalize(&t.out_dir)).collect();
    for (i, a) in targets.iter().enumerate() {
        for (j, b) in targets.iter().enumerate().skip(i + 1) {
            if dirs[i].starts_with(&dirs[j]) || dirs[j].starts_with(&dirs[i]) {
                anyhow::bail!(
                    "targets {} and {} share output directory {} / {}",
                    a.target,
                    b.target,
                    a.out_dir,
                    b.out_dir
                );
            }
        }
    }
    Ok(())
}

/// Lexical normalisation: drops `.` and folds `name/..`, so `.` becomes the
/// empty path. Leading `..` and symlinks are left alone.
fn normalize(path: &Utf8Path) -> Utf8PathBuf {
    let mut out: Vec<Utf8Component<'_>> = Vec::new();
    for component in path.components() {
        match component {
            Utf8Component::CurDir => {}
            Utf8Component::ParentDir if matches!(out.last(), Some(Utf8Component::Normal(_))) => {
                out.pop();
            }
            other => out.push(other),
        }
    }
    out.iter().collect()
}

/// True when the stamp carries the same key and every stamped file is
/// present with its recorded hash.
pub fn stamp_is_current(
    view: &dyn OutputView,
    out_dir: &Utf8Path,
    generation: &Generation,
) -> anyhow::Result<bool> {
    let stamp_path = out_dir.join(CACHE_STAMP_FILE);
    let Some(raw) = view.read_file(&stamp_path)? else {
        return Ok(false);
    };
    let stamp: CacheStamp = match serde_json::from_str(&raw) {
        Ok(s) => s,
        Err(e) => {
            debug!(path = %stamp_path, error = %e, "ignoring unreadable cache stamp");
            return Ok(false);
        }
    };
    if stamp.target != generation.target || stamp.cache_key != generation.cache_key {
        return Ok(false);
    }

    for file in &stamp.files {
        match view.read_file(&out_dir.join(&file.path))? {
            Some(contents) if sha256_hex(contents.as_bytes()) == file.sha256 => {}
            _ => {
                debug!(path = %file.path, "stamped file missing or modified");
                return Ok(false);
            }
        }
    }
    Ok(true)
}

/// Clear `out_dir`, then write every file and the cache stamp.
pub fn write_generation(
    writer: &dyn WritePort,
    out_dir: &Utf8Path,
    generation: &Generation,
) -> anyhow::Result<()> {
    writer.remove_dir_all(out_dir)?;
    writer.create_dir_all(out_dir)?;

    let mut stamped = Vec::with_capacity(generation.files.len());
    for file in &generation.files {
        writer.write_file(&out_dir.join(&file.path), file.contents.as_bytes())?;
        stamped.push(StampedFile {
            path: file.path.clone(),
            sha256: sha256_hex(file.contents.as_bytes()),
        });
    }

    let stamp = CacheStamp::new(generation.target, generation.cache_key.clone(), stamped);
    let json = serde_json::to_string_pretty(&stamp).context("serialize cache stamp")?;
    writer.write_file(&out_dir.join(CACHE_STAMP_FILE), json.as_bytes())?;

    info!(
        target = %generation.target,
        out_dir = %out_dir,
        files = generation.files.len(),
        "wrote generated sources"
    );
    Ok(())
}

/// Differences between `generation` and what is on disk, sorted by path.
/// The cache stamp itself is not compared.
pub fn compute_drift(
    view: &dyn OutputView,
    out_dir: &Utf8Path,
    generation: &Generation,
) -> anyhow::Result<Vec<DriftEntry>> {
    let mut drift = Vec::new();
    let expected: BTreeSet<&str> = generation.files.iter().map(|f| f.path.as_str()).collect();

    for file in &generation.files {
        match view.read_file(&out_dir.join(&file.path))? {
            None => drift.push(DriftEntry {
                path: file.path.clone(),
                kind: DriftKind::Missing,
                patch: Some(diffy::create_patch("", &file.contents).to_string()),
            }),
            Some(actual) if actual != file.contents => drift.push(DriftEntry {
                path: file.path.clone(),
                kind: DriftKind::Modified,
                patch: Some(diffy::create_patch(&actual, &file.contents).to_string()),
            }),
            Some(_) => {}
        }
    }

    for path in view.list_files(out_dir)? {
        if path != CACHE_STAMP_FILE && !expected.contains(path.as_str()) {
            drift.push(DriftEntry {
                path,
                kind: DriftKind::Extra,
                patch: None,
            });
        }
    }

    drift.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(drift)
}

fn build_report(
    tool: &ToolInfo,
    settings: &TargetSettings,
    generation: &Generation,
    status: ReportStatus,
    drift: Vec<DriftEntry>,
) -> GenerationReport {
    GenerationReport {
        schema: optbind_types::schema::OPTBIND_REPORT_V1.to_string(),
        tool: tool.clone(),
        target: generation.target,
        status,
        cache_key: generation.cache_key.clone(),
        out_dir: settings.out_dir.as_str().replace('\\', "/"),
        files: generation
            .files
            .iter()
            .map(|f| ReportFile {
                path: f.path.clone(),
                sha256: sha256_hex(f.contents.as_bytes()),
                bytes: f.contents.len() as u64,
            })
            .collect(),
        options: generation.summary.clone(),
        drift,
    }
}

/// Write `<report_dir>/<target>/generation.json` and `generation.md`.
pub fn write_reports(
    outcome: &GenerateOutcome,
    report_dir: &Utf8Path,
    writer: &dyn WritePort,
) -> anyhow::Result<()> {
    for t in &outcome.targets {
        let dir = report_dir.join(t.report.target.as_str());
        writer.create_dir_all(&dir)?;

        let json = serde_json::to_string_pretty(&t.report).context("serialize report")?;
        writer.write_file(&dir.join("generation.json"), json.as_bytes())?;

        let md = render_generation_md(&t.report);
        writer.write_file(&dir.join("generation.md"), md.as_bytes())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{InMemorySchemaSource, MemoryFs};
    use optbind_domain::{BuiltinTemplateSource, GenerateRequest, InMemoryTemplateSource, TemplateSet};
    use optbind_types::options::{DefaultValue, OptionDescriptor, OptionSchema};
    use optbind_types::target::TargetId;
    use pretty_assertions::assert_eq;

    fn tool() -> ToolInfo {
        ToolInfo {
            name: "optbind".into(),
            version: Some("0.0.0-test".into()),
        }
    }

    fn schema() -> OptionSchema {
        let mut add = OptionDescriptor::flag(
            "addLicense",
            "Add the default license header to any file with an unknown license.",
        );
        add.default = Some(DefaultValue::Bool(false));
        OptionSchema::new(vec![add, OptionDescriptor::flag("dry-run", "Do not write files.")])
    }

    fn target(id: TargetId, out: &str) -> TargetSettings {
        TargetSettings {
            target: id,
            out_dir: Utf8PathBuf::from(out),
            request: GenerateRequest::new("org.example", "Opts"),
        }
    }

    fn settings(mode: RunMode) -> GenerateSettings {
        GenerateSettings {
            targets: vec![target(TargetId::Gradle, "out/gradle")],
            force: false,
            mode,
        }
    }

    fn run(settings: &GenerateSettings, fs: &MemoryFs) -> Result<GenerateOutcome, ToolError> {
        run_generate(
            settings,
            &InMemorySchemaSource::new(schema()),
            &BuiltinTemplateSource,
            fs,
            fs,
            tool(),
        )
    }

    #[test]
    fn first_run_writes_sources_and_stamp() {
        let fs = MemoryFs::new();
        let outcome = run(&settings(RunMode::Write), &fs).unwrap();

        assert_eq!(outcome.targets[0].report.status, ReportStatus::Generated);
        let files: Vec<String> = fs.files().into_keys().collect();
        assert_eq!(
            files,
            vec![
                "out/gradle/.optbind-cache.json",
                "out/gradle/org/example/Opts.java",
                "out/gradle/org/example/OptsTaskBase.java",
                "out/gradle/org/example/internal/OptsToConfiguration.java",
            ]
        );
        let stamp: CacheStamp = serde_json::from_slice(&fs.files()["out/gradle/.optbind-cache.json"]).unwrap();
        assert_eq!(stamp.cache_key, outcome.targets[0].generation.cache_key);
        assert_eq!(stamp.files.len(), 3);
    }

    #[test]
    fn matching_stamp_skips_regeneration() {
        let fs = MemoryFs::new();
        run(&settings(RunMode::Write), &fs).unwrap();
        let before = fs.files();

        let outcome = run(&settings(RunMode::Write), &fs).unwrap();
        assert_eq!(outcome.targets[0].report.status, ReportStatus::UpToDate);
        assert_eq!(fs.files(), before);
    }

    #[test]
    fn tampered_output_is_regenerated() {
        let fs = MemoryFs::new();
        run(&settings(RunMode::Write), &fs).unwrap();
        let before = fs.files();
        fs.write_file(Utf8Path::new("out/gradle/org/example/Opts.java"), b"edited")
            .unwrap();
        fs.write_file(Utf8Path::new("out/gradle/Stray.java"), b"stray").unwrap();

        let outcome = run(&settings(RunMode::Write), &fs).unwrap();
        assert_eq!(outcome.targets[0].report.status, ReportStatus::Generated);
        assert_eq!(fs.files(), before);
    }

    #[test]
    fn force_regenerates_even_when_current() {
        let fs = MemoryFs::new();
        run(&settings(RunMode::Write), &fs).unwrap();
        let mut forced = settings(RunMode::Write);
        forced.force = true;
        let outcome = run(&forced, &fs).unwrap();
        assert_eq!(outcome.targets[0].report.status, ReportStatus::Generated);
    }

    #[test]
    fn check_reports_fresh_then_drift() {
        let fs = MemoryFs::new();
        run(&settings(RunMode::Write), &fs).unwrap();

        let outcome = run(&settings(RunMode::Check), &fs).unwrap();
        assert!(!outcome.stale);
        assert_eq!(outcome.targets[0].report.status, ReportStatus::Fresh);

        fs.remove_dir_all(Utf8Path::new("out/gradle/org/example/internal"))
            .unwrap();
        fs.write_file(
            Utf8Path::new("out/gradle/org/example/Opts.java"),
            b"package org.example;\n",
        )
        .unwrap();
        fs.write_file(Utf8Path::new("out/gradle/Stray.java"), b"stray").unwrap();
        let before = fs.files();

        let outcome = run(&settings(RunMode::Check), &fs).unwrap();
        assert!(outcome.stale);
        let report = &outcome.targets[0].report;
        assert_eq!(report.status, ReportStatus::Stale);
        let kinds: Vec<(&str, DriftKind)> = report
            .drift
            .iter()
            .map(|d| (d.path.as_str(), d.kind))
            .collect();
        assert_eq!(
            kinds,
            vec![
                ("Stray.java", DriftKind::Extra),
                ("org/example/Opts.java", DriftKind::Modified),
                ("org/example/internal/OptsToConfiguration.java", DriftKind::Missing),
            ]
        );
        assert!(report.drift[1].patch.as_deref().unwrap().contains("+public interface Opts {"));
        assert_eq!(fs.files(), before, "check mode never writes");
    }

    #[test]
    fn shared_out_dir_is_rejected() {
        let fs = MemoryFs::new();
        let s = GenerateSettings {
            targets: vec![
                target(TargetId::Gradle, "out"),
                target(TargetId::Maven, "out/maven"),
            ],
            force: false,
            mode: RunMode::Write,
        };
        let err = run(&s, &fs).unwrap_err();
        assert_eq!(err.exit_code(), 1);
        assert!(err.to_string().contains("share output directory"));
        assert!(fs.files().is_empty());
    }

    #[test]
    fn nested_out_dirs_are_found_through_dot_segments() {
        for (a, b) in [
            ("./out", "out/maven"),
            (".", "out"),
            ("out/../gen", "gen/./maven"),
        ] {
            let fs = MemoryFs::new();
            let s = GenerateSettings {
                targets: vec![target(TargetId::Gradle, a), target(TargetId::Maven, b)],
                force: false,
                mode: RunMode::Write,
            };
            let err = run(&s, &fs).unwrap_err();
            assert!(err.to_string().contains("share output directory"), "{a} / {b}");
        }

        assert_eq!(normalize(Utf8Path::new("./a/b/../c")), Utf8PathBuf::from("a/c"));
        assert_eq!(normalize(Utf8Path::new("../a")), Utf8PathBuf::from("../a"));
    }

    #[test]
    fn missing_template_fails_without_writing() {
        let fs = MemoryFs::new();
        let templates = InMemoryTemplateSource::new().with(
            TargetId::Gradle,
            TemplateSet::new().with("GradleOptions.tpl", "${package}\n"),
        );
        let err = run_generate(
            &settings(RunMode::Write),
            &InMemorySchemaSource::new(schema()),
            &templates,
            &fs,
            &fs,
            tool(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("GradleTaskBase.tpl"), "{err}");
        assert!(fs.files().is_empty());
    }

    #[test]
    fn reports_are_written_per_target() {
        let fs = MemoryFs::new();
        let mut s = settings(RunMode::Write);
        s.targets.push(target(TargetId::Maven, "out/maven"));
        let outcome = run(&s, &fs).unwrap();
        write_reports(&outcome, Utf8Path::new("reports"), &fs).unwrap();

        let files = fs.files();
        for id in ["gradle", "maven"] {
            let json = &files[&format!("reports/{id}/generation.json")];
            let report: GenerationReport = serde_json::from_slice(json).unwrap();
            assert_eq!(report.target.as_str(), id);
            assert_eq!(report.options.bound, 2);
            assert!(files.contains_key(&format!("reports/{id}/generation.md")));
        }
    }

    #[test]
    fn stale_maps_to_exit_code_two() {
        assert_eq!(ToolError::Stale.exit_code(), 2);
        assert_eq!(ToolError::from(anyhow::anyhow!("boom")).exit_code(), 1);
    }
}
