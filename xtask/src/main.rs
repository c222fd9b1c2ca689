use anyhow::Context;
use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};
use fs_err as fs;
use optbind_domain::builtin_template_files;
use optbind_types::target::TargetId;
use std::process::Command as ProcessCommand;

#[derive(Debug, Parser)]
#[command(name = "xtask", about = "Workspace helper tasks")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print schema identifiers used by optbind.
    PrintSchemas,
    /// Copy the builtin templates to <dir>/<target>/ as a starting point for overrides.
    InitTemplates {
        #[arg(long, default_value = "templates")]
        dir: Utf8PathBuf,

        /// Overwrite templates that already exist.
        #[arg(long, default_value_t = false)]
        force: bool,
    },
    /// Bless golden fixtures (overwrite expected outputs).
    BlessFixtures,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::PrintSchemas => {
            println!("{}", optbind_types::schema::OPTBIND_OPTIONS_V1);
            println!("{}", optbind_types::schema::OPTBIND_CACHE_V1);
            println!("{}", optbind_types::schema::OPTBIND_REPORT_V1);
        }
        Command::InitTemplates { dir, force } => {
            for id in TargetId::ALL {
                let target_dir = dir.join(id.as_str());
                fs::create_dir_all(&target_dir).with_context(|| format!("create {target_dir}"))?;
                for (name, contents) in builtin_template_files(id) {
                    let path = target_dir.join(name);
                    if path.exists() && !force {
                        println!("skip {path} (exists)");
                        continue;
                    }
                    fs::write(&path, contents).with_context(|| format!("write {path}"))?;
                }
            }
            println!("initialized {dir}/{{gradle,maven}}");
        }
        Command::BlessFixtures => {
            let status = ProcessCommand::new("cargo")
                .args(["test", "-p", "optbind-domain", "--test", "golden_fixtures"])
                .env("OPTBIND_BLESS", "1")
                .status()
                .context("run golden fixture blessing")?;
            if !status.success() {
                anyhow::bail!("bless-fixtures failed");
            }
        }
    }
    Ok(())
}
