//! Configuration file loading for optbind.
//!
//! Discovers and loads `optbind.toml` from the project root.
//! Merges config file settings with CLI arguments (CLI takes precedence).

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use optbind_core::settings::TargetSettings;
use optbind_core::{GenerateRequest, TargetProfile};
use optbind_render::ArchiveAttributes;
use optbind_types::target::TargetId;
use serde::Deserialize;
use std::collections::BTreeMap;
use tracing::debug;

/// The config file name to search for.
pub const CONFIG_FILE_NAME: &str = "optbind.toml";

/// Top-level configuration from optbind.toml.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OptbindConfig {
    pub generate: GenerateConfig,

    /// Per-target settings, keyed by target id.
    pub targets: BTreeMap<String, TargetConfig>,

    pub pom: PomConfig,

    pub archive: ArchiveConfig,
}

/// `[generate]` section. Relative paths are resolved against the project root.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GenerateConfig {
    pub schema: Utf8PathBuf,

    /// Template directory with one sub-directory per target. When unset the
    /// templates compiled into the binary are used.
    pub template_dir: Option<Utf8PathBuf>,

    /// Base output directory; each target writes to `<out_dir>/<target>`
    /// unless it sets its own.
    pub out_dir: Utf8PathBuf,

    pub report_dir: Option<Utf8PathBuf>,
}

impl Default for GenerateConfig {
    fn default() -> Self {
        Self {
            schema: Utf8PathBuf::from("options.toml"),
            template_dir: None,
            out_dir: Utf8PathBuf::from("build/generated/sources/optbind"),
            report_dir: None,
        }
    }
}

/// `[targets.<id>]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TargetConfig {
    pub package: Option<String>,
    pub class_name: Option<String>,
    pub out_dir: Option<Utf8PathBuf>,

    #[serde(flatten)]
    pub profile: TargetProfile,
}

/// `[pom]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PomConfig {
    pub root: Utf8PathBuf,
    pub project: Utf8PathBuf,
}

impl Default for PomConfig {
    fn default() -> Self {
        Self {
            root: Utf8PathBuf::from("../pom.xml"),
            project: Utf8PathBuf::from("pom.xml"),
        }
    }
}

/// `[archive]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ArchiveConfig {
    pub title: Option<String>,
    pub vendor: Option<String>,
    pub url: Option<String>,
    pub version: Option<String>,
}

/// Discover the optbind.toml config file in the project root.
pub fn discover_config(project_root: &Utf8Path) -> Option<Utf8PathBuf> {
    let config_path = project_root.join(CONFIG_FILE_NAME);
    if config_path.exists() {
        debug!("found config file at {}", config_path);
        Some(config_path)
    } else {
        debug!("no config file found at {}", config_path);
        None
    }
}

pub fn load_config(path: &Utf8Path) -> anyhow::Result<OptbindConfig> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("read config file {}", path))?;
    parse_config(&contents).with_context(|| format!("parse config file {}", path))
}

/// Parse a config file from a string. Target keys must name known targets.
pub fn parse_config(contents: &str) -> anyhow::Result<OptbindConfig> {
    let config: OptbindConfig = toml::from_str(contents).context("invalid TOML")?;
    for key in config.targets.keys() {
        key.parse::<TargetId>()
            .with_context(|| format!("[targets.{}]", key))?;
    }
    Ok(config)
}

/// Load config from the project root, or return default if not found.
pub fn load_or_default(project_root: &Utf8Path) -> anyhow::Result<OptbindConfig> {
    match discover_config(project_root) {
        Some(path) => load_config(&path),
        None => Ok(OptbindConfig::default()),
    }
}

/// CLI values for `generate`, `cache-key` and `list-options`.
#[derive(Debug, Clone, Default)]
pub struct GenerateOverrides {
    pub targets: Vec<TargetId>,
    pub schema: Option<Utf8PathBuf>,
    pub template_dir: Option<Utf8PathBuf>,
    pub out_dir: Option<Utf8PathBuf>,
    pub report_dir: Option<Utf8PathBuf>,
    pub package: Option<String>,
    pub class_name: Option<String>,
}

/// Generate settings after merging file and CLI values.
#[derive(Debug, Clone)]
pub struct MergedGenerate {
    pub schema: Utf8PathBuf,
    pub template_dir: Option<Utf8PathBuf>,
    pub report_dir: Option<Utf8PathBuf>,
    pub targets: Vec<TargetSettings>,
}

/// Builder for merging config file with CLI arguments.
pub struct ConfigMerger {
    config: OptbindConfig,
    project_root: Utf8PathBuf,
}

impl ConfigMerger {
    pub fn new(config: OptbindConfig, project_root: Utf8PathBuf) -> Self {
        Self {
            config,
            project_root,
        }
    }

    fn resolve(&self, path: &Utf8Path) -> Utf8PathBuf {
        if path.is_absolute() {
            path.to_owned()
        } else {
            self.project_root.join(path)
        }
    }

    /// Merge with generate-style CLI arguments.
    ///
    /// Without `--target`, every target in the config file is selected.
    /// `--package`/`--class-name` override the file for all selected targets;
    /// `--out-dir` replaces the base directory and per-target directories.
    pub fn merge_generate(&self, cli: &GenerateOverrides) -> anyhow::Result<MergedGenerate> {
        let ids: Vec<TargetId> = if cli.targets.is_empty() {
            let mut ids = self
                .config
                .targets
                .keys()
                .map(|k| k.parse::<TargetId>())
                .collect::<Result<Vec<_>, _>>()?;
            ids.sort();
            ids
        } else {
            let mut ids = cli.targets.clone();
            ids.sort();
            ids.dedup();
            ids
        };
        if ids.is_empty() {
            anyhow::bail!(
                "no targets selected: pass --target or add a [targets.<id>] section to {}",
                CONFIG_FILE_NAME
            );
        }

        let base_out = match &cli.out_dir {
            Some(dir) => dir.clone(),
            None => self.resolve(&self.config.generate.out_dir),
        };

        let mut targets = Vec::with_capacity(ids.len());
        for id in ids {
            let file = self.target_config(id);
            let package = cli
                .package
                .clone()
                .or(file.package)
                .with_context(|| format!("no package configured for target {}", id))?;
            let class_name = cli
                .class_name
                .clone()
                .or(file.class_name)
                .with_context(|| format!("no class_name configured for target {}", id))?;
            let out_dir = match (&cli.out_dir, &file.out_dir) {
                (None, Some(dir)) => self.resolve(dir),
                _ => base_out.join(id.as_str()),
            };
            targets.push(TargetSettings {
                target: id,
                out_dir,
                request: GenerateRequest::new(package, class_name).with_profile(file.profile),
            });
        }

        Ok(MergedGenerate {
            schema: cli
                .schema
                .clone()
                .unwrap_or_else(|| self.resolve(&self.config.generate.schema)),
            template_dir: cli.template_dir.clone().or_else(|| {
                self.config
                    .generate
                    .template_dir
                    .as_deref()
                    .map(|d| self.resolve(d))
            }),
            report_dir: cli.report_dir.clone().or_else(|| {
                self.config
                    .generate
                    .report_dir
                    .as_deref()
                    .map(|d| self.resolve(d))
            }),
            targets,
        })
    }

    /// File settings for one target; empty when the file has none.
    pub fn target_config(&self, id: TargetId) -> TargetConfig {
        self.config
            .targets
            .iter()
            .find(|(k, _)| k.parse::<TargetId>().ok() == Some(id))
            .map(|(_, v)| v.clone())
            .unwrap_or_default()
    }

    /// `(root_pom, project_pom)` with CLI paths taking precedence.
    pub fn merge_pom(
        &self,
        cli_root: Option<Utf8PathBuf>,
        cli_project: Option<Utf8PathBuf>,
    ) -> (Utf8PathBuf, Utf8PathBuf) {
        (
            cli_root.unwrap_or_else(|| self.resolve(&self.config.pom.root)),
            cli_project.unwrap_or_else(|| self.resolve(&self.config.pom.project)),
        )
    }

    /// Archive attributes; `--version` overrides the file.
    ///
    /// Manifest values are single logical lines, so line breaks are rejected.
    pub fn merge_archive(&self, cli_version: Option<String>) -> anyhow::Result<ArchiveAttributes> {
        let archive = &self.config.archive;
        let required = |value: &Option<String>, key: &str| {
            let value = value
                .clone()
                .with_context(|| format!("archive.{} is not configured in {}", key, CONFIG_FILE_NAME))?;
            single_line(value, key)
        };
        Ok(ArchiveAttributes {
            title: required(&archive.title, "title")?,
            vendor: required(&archive.vendor, "vendor")?,
            url: required(&archive.url, "url")?,
            version: cli_version
                .or_else(|| archive.version.clone())
                .map(|v| single_line(v, "version"))
                .transpose()?,
        })
    }
}

fn single_line(value: String, key: &str) -> anyhow::Result<String> {
    if value.contains(['\r', '\n']) {
        anyhow::bail!("archive.{} must not contain line breaks", key);
    }
    Ok(value)
}
