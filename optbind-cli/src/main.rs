mod config;
mod explain;

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, Subcommand};
use config::{ConfigMerger, GenerateOverrides, MergedGenerate};
use fs_err as fs;
use optbind_core::adapters::{FsOutputView, FsSchemaSource, FsWritePort};
use optbind_core::pipeline::{ToolError, run_generate, write_reports};
use optbind_core::ports::SchemaSource;
use optbind_core::settings::{GenerateSettings, RunMode};
use optbind_core::{BuiltinTemplateSource, FsTemplateSource, TemplateSource};
use optbind_domain::{bind_schema, builtin_targets, target_for};
use optbind_pom::{VersionResolver, load_pom, resolve_coordinates};
use optbind_render::render_manifest;
use optbind_types::ToolInfo;
use optbind_types::report::ReportStatus;
use optbind_types::target::TargetId;
use std::process::ExitCode;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "optbind",
    version,
    about = "Schema-driven option binding generator for Gradle and Maven plugins."
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Generate (or check) option binding sources.
    Generate(GenerateArgs),
    /// Print the cache key of each selected target.
    CacheKey(TargetArgs),
    /// Show how each schema option binds for a target.
    ListOptions(ListOptionsArgs),
    /// List the available targets.
    ListTargets(ListTargetsArgs),
    /// Explain what a target generates and how option types map.
    Explain(ExplainArgs),
    /// Resolve dependency versions from the root POM.
    Resolve(ResolveArgs),
    /// Render the fixed archive manifest.
    Manifest(ManifestArgs),
}

#[derive(Debug, Parser)]
struct TargetArgs {
    /// Project root holding optbind.toml (default: current directory).
    #[arg(long, default_value = ".")]
    project_root: Utf8PathBuf,

    /// Target to generate; repeatable (default: every target in optbind.toml).
    #[arg(long = "target")]
    targets: Vec<TargetId>,

    /// Option schema file (.toml, .json, .yaml).
    #[arg(long)]
    schema: Option<Utf8PathBuf>,

    /// Template directory with one sub-directory per target.
    #[arg(long)]
    templates: Option<Utf8PathBuf>,

    /// Base output directory; each target writes to <out-dir>/<target>.
    #[arg(long)]
    out_dir: Option<Utf8PathBuf>,

    /// Java package of the generated classes.
    #[arg(long)]
    package: Option<String>,

    /// Base class name of the generated classes.
    #[arg(long)]
    class_name: Option<String>,
}

#[derive(Debug, Parser)]
struct GenerateArgs {
    #[command(flatten)]
    target: TargetArgs,

    /// Regenerate even when the cache stamp matches.
    #[arg(long, default_value_t = false)]
    force: bool,

    /// Compare against existing output without writing; exit 2 on drift.
    #[arg(long, default_value_t = false)]
    check: bool,

    /// Write generation.json and generation.md per target here.
    #[arg(long)]
    report_dir: Option<Utf8PathBuf>,
}

#[derive(Debug, Parser)]
struct ListOptionsArgs {
    #[command(flatten)]
    target: TargetArgs,

    /// Output format (text, json).
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,
}

#[derive(Debug, Parser)]
struct ListTargetsArgs {
    /// Output format (text, json).
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,
}

#[derive(Debug, Parser)]
struct ExplainArgs {
    /// Target to explain (e.g., "gradle", "maven").
    target: String,
}

#[derive(Debug, Parser)]
struct ResolveArgs {
    /// Project root holding optbind.toml (default: current directory).
    #[arg(long, default_value = ".")]
    project_root: Utf8PathBuf,

    /// Root POM with <dependencyManagement> (default from optbind.toml).
    #[arg(long)]
    root_pom: Option<Utf8PathBuf>,

    /// Project POM whose dependencies are resolved (default from optbind.toml).
    #[arg(long)]
    pom: Option<Utf8PathBuf>,

    /// Resolve a single dependency instead of all direct dependencies.
    #[arg(long, requires = "artifact")]
    group: Option<String>,

    #[arg(long, requires = "group")]
    artifact: Option<String>,
}

#[derive(Debug, Parser)]
struct ManifestArgs {
    /// Project root holding optbind.toml (default: current directory).
    #[arg(long, default_value = ".")]
    project_root: Utf8PathBuf,

    /// Write the manifest here instead of stdout.
    #[arg(long)]
    out: Option<Utf8PathBuf>,

    /// Implementation-Version attribute.
    #[arg(long)]
    version: Option<String>,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> ExitCode {
    match real_main() {
        Ok(()) => ExitCode::from(0),
        Err(e) => {
            error!("{}", e);
            ExitCode::from(e.exit_code())
        }
    }
}

fn real_main() -> Result<(), ToolError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Generate(args) => cmd_generate(args),
        Command::CacheKey(args) => cmd_cache_key(args).map_err(ToolError::from),
        Command::ListOptions(args) => cmd_list_options(args).map_err(ToolError::from),
        Command::ListTargets(args) => cmd_list_targets(args).map_err(ToolError::from),
        Command::Explain(args) => cmd_explain(args).map_err(ToolError::from),
        Command::Resolve(args) => cmd_resolve(args).map_err(ToolError::from),
        Command::Manifest(args) => cmd_manifest(args).map_err(ToolError::from),
    }
}

fn merge_target_args(
    args: &TargetArgs,
    report_dir: Option<Utf8PathBuf>,
) -> anyhow::Result<MergedGenerate> {
    let file_config =
        config::load_or_default(&args.project_root).context("load optbind.toml config")?;
    let merged = ConfigMerger::new(file_config, args.project_root.clone()).merge_generate(
        &GenerateOverrides {
            targets: args.targets.clone(),
            schema: args.schema.clone(),
            template_dir: args.templates.clone(),
            out_dir: args.out_dir.clone(),
            report_dir,
            package: args.package.clone(),
            class_name: args.class_name.clone(),
        },
    )?;
    debug!(
        "merged config: schema={}, template_dir={:?}, targets={}",
        merged.schema,
        merged.template_dir,
        merged.targets.len()
    );
    Ok(merged)
}

fn template_source(merged: &MergedGenerate) -> Box<dyn TemplateSource> {
    match &merged.template_dir {
        Some(dir) => Box::new(FsTemplateSource::new(dir.clone())),
        None => Box::new(BuiltinTemplateSource),
    }
}

fn cmd_generate(args: GenerateArgs) -> Result<(), ToolError> {
    let merged = merge_target_args(&args.target, args.report_dir)?;
    let settings = GenerateSettings {
        targets: merged.targets.clone(),
        force: args.force,
        mode: if args.check {
            RunMode::Check
        } else {
            RunMode::Write
        },
    };

    let outcome = run_generate(
        &settings,
        &FsSchemaSource::new(merged.schema.clone()),
        template_source(&merged).as_ref(),
        &FsOutputView,
        &FsWritePort,
        tool_info(),
    )?;

    if let Some(report_dir) = &merged.report_dir {
        write_reports(&outcome, report_dir, &FsWritePort)?;
        info!("wrote reports to {}", report_dir);
    }

    for t in &outcome.targets {
        println!(
            "{}: {} ({} files) {}",
            t.report.target,
            t.report.status.as_str(),
            t.report.files.len(),
            t.report.out_dir
        );
        if t.report.status == ReportStatus::Stale {
            for d in &t.report.drift {
                println!("  {} {}", d.kind.as_str(), d.path);
            }
        }
    }

    if outcome.stale {
        return Err(ToolError::Stale);
    }
    Ok(())
}

fn cmd_cache_key(args: TargetArgs) -> anyhow::Result<()> {
    let merged = merge_target_args(&args, None)?;
    let schema = FsSchemaSource::new(merged.schema.clone()).load_schema()?;
    let templates = template_source(&merged);

    let single = merged.targets.len() == 1;
    for t in &merged.targets {
        let set = templates
            .load(t.target)
            .with_context(|| format!("load templates for {}", t.target))?;
        let key = optbind_domain::cache_key(t.target, &t.request, &schema, &set)
            .with_context(|| format!("cache key for {}", t.target))?;
        if single {
            println!("{}", key);
        } else {
            println!("{} {}", t.target, key);
        }
    }
    Ok(())
}

fn cmd_list_options(args: ListOptionsArgs) -> anyhow::Result<()> {
    let merged = merge_target_args(&args.target, None)?;
    let schema = FsSchemaSource::new(merged.schema.clone()).load_schema()?;

    let mut listings = Vec::new();
    for t in &merged.targets {
        let target = target_for(t.target);
        let bound = bind_schema(&schema, target.as_ref(), &t.request.profile)
            .with_context(|| format!("bind options for {}", t.target))?;
        listings.push((t.target, bound));
    }

    match args.format {
        OutputFormat::Text => {
            for (id, bound) in &listings {
                println!("{} options:\n", id);
                println!("  {:<28} {:<28} {:<32} FLAGS", "OPTION", "ACCESSOR", "TYPE");
                for b in &bound.bound {
                    let flags = if b.binding.deprecated { "deprecated" } else { "" };
                    println!(
                        "  {:<28} {:<28} {:<32} {}",
                        b.binding.option, b.binding.accessor, b.binding.declared_type, flags
                    );
                }
                if !bound.unsupported.is_empty() {
                    let ids: Vec<&str> = bound.unsupported.iter().map(|o| o.id.as_str()).collect();
                    println!("\n  unsupported: {}", ids.join(", "));
                }
                println!();
            }
        }
        OutputFormat::Json => {
            let out: Vec<_> = listings
                .iter()
                .map(|(id, bound)| {
                    let bindings: Vec<_> = bound.bound.iter().map(|b| &b.binding).collect();
                    let unsupported: Vec<&str> =
                        bound.unsupported.iter().map(|o| o.id.as_str()).collect();
                    serde_json::json!({
                        "target": id,
                        "bindings": bindings,
                        "unsupported": unsupported,
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
    }
    Ok(())
}

fn cmd_list_targets(args: ListTargetsArgs) -> anyhow::Result<()> {
    let targets = builtin_targets();
    match args.format {
        OutputFormat::Text => {
            println!("Available targets:\n");
            println!("  {:<10} DESCRIPTION", "TARGET");
            println!("  {:<10} -----------", "------");
            for t in &targets {
                println!("  {:<10} {}", t.id(), t.description());
            }
            println!();
            println!("Use 'optbind explain <target>' for details.");
        }
        OutputFormat::Json => {
            let out: Vec<_> = targets
                .iter()
                .map(|t| {
                    let templates: Vec<&str> = t.outputs().iter().map(|o| o.template).collect();
                    serde_json::json!({
                        "target": t.id(),
                        "description": t.description(),
                        "templates": templates,
                        "directives": t.directives(),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
    }
    Ok(())
}

fn cmd_explain(args: ExplainArgs) -> anyhow::Result<()> {
    use explain::{list_target_keys, lookup_target};

    let Some(explanation) = lookup_target(&args.target) else {
        let available = list_target_keys().join(", ");
        anyhow::bail!(
            "Unknown target: '{}'\n\nAvailable targets: {}",
            args.target,
            available
        );
    };
    let target = target_for(explanation.id);

    println!("================================================================================");
    println!("TARGET: {}", explanation.title);
    println!("================================================================================");
    println!();
    println!("Id:      {}", explanation.id);
    println!();

    println!("DESCRIPTION");
    println!("--------------------------------------------------------------------------------");
    println!("{}", explanation.details);
    println!();

    println!("OUTPUTS");
    println!("--------------------------------------------------------------------------------");
    for output in target.outputs() {
        let package = if output.internal {
            "<package>.internal"
        } else {
            "<package>"
        };
        println!(
            "  {:<26} -> {}.<Class>{}",
            output.template, package, output.suffix
        );
    }
    println!();

    println!("DIRECTIVES");
    println!("--------------------------------------------------------------------------------");
    let directives: Vec<String> = target
        .directives()
        .iter()
        .map(|d| format!("${{{}}}", d))
        .collect();
    println!("  {}", directives.join(" "));
    println!();

    println!("TYPE MAPPING");
    println!("--------------------------------------------------------------------------------");
    for m in explanation.mappings {
        println!("  {:<36} {}", m.shape, m.construct);
    }
    println!();

    Ok(())
}

fn cmd_resolve(args: ResolveArgs) -> anyhow::Result<()> {
    let file_config =
        config::load_or_default(&args.project_root).context("load optbind.toml config")?;
    let (root_path, project_path) = ConfigMerger::new(file_config, args.project_root.clone())
        .merge_pom(args.root_pom, args.pom);

    let root = load_pom(&root_path).with_context(|| format!("load {}", root_path))?;
    let project = load_pom(&project_path).with_context(|| format!("load {}", project_path))?;

    match (args.group, args.artifact) {
        (Some(group), Some(artifact)) => {
            let coordinate = VersionResolver::new(&project, &root).resolve(&group, &artifact)?;
            println!("{}", coordinate);
        }
        _ => {
            for coordinate in resolve_coordinates(&project, &root)? {
                println!("{}", coordinate);
            }
        }
    }
    Ok(())
}

fn cmd_manifest(args: ManifestArgs) -> anyhow::Result<()> {
    let file_config =
        config::load_or_default(&args.project_root).context("load optbind.toml config")?;
    let attrs = ConfigMerger::new(file_config, args.project_root.clone())
        .merge_archive(args.version)?;
    let text = render_manifest(&attrs);

    match &args.out {
        Some(path) => {
            write_text(path, &text)?;
            info!("wrote manifest to {}", path);
        }
        None => print!("{}", text),
    }
    Ok(())
}

fn write_text(path: &Utf8Path, text: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_str().is_empty()) {
        fs::create_dir_all(parent).with_context(|| format!("create {}", parent))?;
    }
    fs::write(path, text).with_context(|| format!("write {}", path))?;
    Ok(())
}

fn tool_info() -> ToolInfo {
    ToolInfo {
        name: "optbind".to_string(),
        version: Some(env!("CARGO_PKG_VERSION").to_string()),
    }
}
