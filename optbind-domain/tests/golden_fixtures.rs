//! Golden fixture tests for the generator.
//!
//! Each fixture under `tests/fixtures/<name>/` contains:
//!
//! - `options.toml` - the option schema
//! - `optbind.toml` - per-target package, class name and profile
//! - `expected/<target>/` - the generated files, byte for byte
//!
//! Run with `OPTBIND_BLESS=1` (or `cargo xtask bless-fixtures`) to rewrite
//! `expected/` after an intentional output change. A fixture without an
//! `expected/` directory is blessed on first run.

use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use optbind_domain::{GenerateRequest, TargetProfile, builtin_templates, generate, target_for};
use optbind_types::target::TargetId;
use pretty_assertions::assert_eq;
use serde::Deserialize;
use std::collections::BTreeMap;

#[derive(Debug, Deserialize)]
struct FixtureConfig {
    #[serde(default)]
    targets: BTreeMap<String, FixtureTarget>,
}

#[derive(Debug, Deserialize)]
struct FixtureTarget {
    package: String,
    class_name: String,
    #[serde(flatten)]
    profile: TargetProfile,
}

fn fixture_dir(name: &str) -> Utf8PathBuf {
    let manifest_dir = Utf8Path::new(env!("CARGO_MANIFEST_DIR"));
    let workspace_root = manifest_dir.parent().expect("workspace root");
    workspace_root.join("tests").join("fixtures").join(name)
}

fn bless_requested() -> bool {
    std::env::var_os("OPTBIND_BLESS").is_some_and(|v| v != "0")
}

fn collect_files(root: &Utf8Path, dir: &Utf8Path, out: &mut Vec<String>) {
    for entry in fs::read_dir(dir).expect("read expected dir") {
        let path = Utf8PathBuf::from_path_buf(entry.expect("dir entry").path()).expect("utf8");
        if path.is_dir() {
            collect_files(root, &path, out);
        } else {
            let rel = path.strip_prefix(root).expect("relative").as_str().replace('\\', "/");
            out.push(rel);
        }
    }
}

fn run_fixture_test(name: &str) {
    let dir = fixture_dir(name);
    assert!(dir.exists(), "Fixture directory does not exist: {}", dir);

    let schema = optbind_schema::load_schema(&dir.join("options.toml")).expect("load schema");
    let config: FixtureConfig =
        toml::from_str(&fs::read_to_string(dir.join("optbind.toml")).expect("read config"))
            .expect("parse config");
    assert!(!config.targets.is_empty(), "fixture declares no targets");

    for (key, target_cfg) in &config.targets {
        let id: TargetId = key.parse().expect("known target");
        let request = GenerateRequest::new(&target_cfg.package, &target_cfg.class_name)
            .with_profile(target_cfg.profile.clone());
        let target = target_for(id);
        let generation = generate(&schema, target.as_ref(), &builtin_templates(id), &request)
            .unwrap_or_else(|e| panic!("{name}/{id}: {e}"));

        let expected_dir = dir.join("expected").join(id.as_str());
        if bless_requested() || !expected_dir.exists() {
            if expected_dir.exists() {
                fs::remove_dir_all(&expected_dir).expect("clear expected");
            }
            for file in &generation.files {
                let path = expected_dir.join(&file.path);
                fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
                fs::write(&path, &file.contents).expect("write expected");
            }
            continue;
        }

        let mut expected_files = Vec::new();
        collect_files(&expected_dir, &expected_dir, &mut expected_files);
        expected_files.sort();
        let actual_files: Vec<String> = generation.files.iter().map(|f| f.path.clone()).collect();
        assert_eq!(actual_files, expected_files, "{name}/{id}: file set");

        for file in &generation.files {
            let expected =
                fs::read_to_string(expected_dir.join(&file.path)).expect("read expected file");
            assert_eq!(file.contents, expected, "{name}/{id}: {}", file.path);
        }
    }
}

#[test]
fn rat_options() {
    run_fixture_test("rat_options");
}

#[test]
fn rat_options_gradle_shape() {
    let dir = fixture_dir("rat_options");
    let schema = optbind_schema::load_schema(&dir.join("options.toml")).unwrap();
    let mut profile = TargetProfile::default();
    profile
        .renames
        .insert("addLicense".into(), "add-license".into());
    for id in ["dir", "help", "log-level", "output-file"] {
        profile.unsupported.insert(id.into());
    }
    let request =
        GenerateRequest::new("org.apache.rat.gradle", "RatOptions").with_profile(profile);

    let generation = generate(
        &schema,
        target_for(TargetId::Gradle).as_ref(),
        &builtin_templates(TargetId::Gradle),
        &request,
    )
    .unwrap();

    let paths: Vec<&str> = generation.files.iter().map(|f| f.path.as_str()).collect();
    assert_eq!(
        paths,
        vec![
            "org/apache/rat/gradle/RatOptions.java",
            "org/apache/rat/gradle/RatOptionsTaskBase.java",
            "org/apache/rat/gradle/internal/RatOptionsToConfiguration.java",
        ]
    );

    let options = &generation.files[0].contents;
    assert!(options.starts_with("package org.apache.rat.gradle;\n"));
    assert!(options.contains("public interface RatOptions {\n"));
    assert!(options.contains("    @Deprecated\n    Property<Boolean> getAddLicense();\n"));
    assert!(options.contains("    ConfigurableFileCollection getConfigs();\n"));
    assert!(options.contains("    ListProperty<String> getLicensesApproved();\n"));
    assert!(options.contains("    MapProperty<String, Integer> getCounterMaxs();\n"));
    assert!(options.contains("     * @deprecated Deprecated for removal since 0.17: Use &lt;editLicense&gt;\n"));
    assert!(options.contains(
        "        getInputExcludes().convention(java.util.List.of(\"**/target/**\", \"**/.git/**\"));\n"
    ));
    assert!(options.contains("        getInputExcludeSize().convention(0);\n"));
    assert!(options.contains(
        "        getCounterMaxs().convention(java.util.Map.ofEntries(java.util.Map.entry(\"UNAPPROVED\", 0)));\n"
    ));
    assert!(!options.contains("getOutputFile"));

    let task_base = &generation.files[1].contents;
    assert!(task_base.contains("public interface RatOptionsTaskBase extends RatOptions {\n"));
    assert!(task_base.contains(
        "    @Override\n    @PathSensitive(PathSensitivity.RELATIVE)\n    @InputFiles\n    @Optional\n    ConfigurableFileCollection getConfigs();\n"
    ));

    let conv = &generation.files[2].contents;
    assert!(conv.starts_with("package org.apache.rat.gradle.internal;\n"));
    assert!(conv.contains("import org.apache.rat.gradle.*;\n"));
    assert!(conv.contains("public class RatOptionsToConfiguration {\n"));
    assert!(conv.contains("    public RatOptionsToConfiguration(RatOptions options) {\n"));
    assert!(conv.contains("        xlateName.put(\"addLicense\", \"add-license\");\n"));
    assert!(conv.contains("        unsupportedArgs.add(\"log-level\");\n"));
    assert!(conv.contains(
        "        deprecatedArgs.put(\"addLicense\", \"Use of deprecated option 'addLicense'. Deprecated for removal since 0.17: Use <editLicense>\");\n"
    ));
    assert!(!conv.contains("${"));
    assert!(!conv.contains('\r'));

    assert_eq!(generation.summary.bound, 12);
    assert_eq!(generation.summary.unsupported, 4);
    assert_eq!(generation.summary.deprecated, 2);
}
