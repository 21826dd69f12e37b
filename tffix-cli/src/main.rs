mod config;

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Args, Parser, Subcommand};
use config::{ConfigMerger, TableSource};
use fs_err as fs;
use std::process::ExitCode;
use tffix_domain::{Planner, PlannerConfig, builtin_fix_table, load_fix_table};
use tffix_edit::{ApplyOptions, ProgressSink, apply_plan};
use tffix_render::{render_apply_md, render_plan_md};
use tffix_types::ToolInfo;
use tffix_types::apply::ApplyReport;
use tffix_types::plan::FixPlan;
use tffix_types::table::FixTable;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "tffix",
    version,
    about = "Adds missing providers and variable metadata to Terraform modules."
)]
struct Cli {
    /// Defaults to `run` in the current directory.
    #[command(subcommand)]
    cmd: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Apply the fix table to the modules under the root.
    Run(RunArgs),
    /// Print the plan without touching any file.
    Plan(PlanArgs),
    /// Print the effective fix table as TOML.
    Table(TableArgs),
}

#[derive(Debug, Default, Args)]
struct TableArgs {
    /// Directory the fix table paths are relative to (default: current directory).
    #[arg(long)]
    root: Option<Utf8PathBuf>,

    /// Fix table TOML file; overrides `[[module]]` entries in tffix.toml.
    #[arg(long)]
    table: Option<Utf8PathBuf>,
}

impl TableArgs {
    fn root(&self) -> Utf8PathBuf {
        self.root.clone().unwrap_or_else(|| Utf8PathBuf::from("."))
    }
}

#[derive(Debug, Default, Args)]
struct RunArgs {
    #[command(flatten)]
    source: TableArgs,

    /// Only fix modules whose name matches this pattern (`*` and `?` wildcards).
    #[arg(long = "module")]
    modules: Vec<String>,

    /// Report what would change without writing files.
    #[arg(long, default_value_t = false)]
    dry_run: bool,

    /// Copy each file to `<file><suffix>` before overwriting it.
    #[arg(long, default_value_t = false)]
    backup: bool,

    /// Skip the HCL syntax check of patched files.
    #[arg(long, default_value_t = false)]
    no_validate: bool,

    /// Write apply.json, apply.md and patch.diff to this directory.
    #[arg(long)]
    out_dir: Option<Utf8PathBuf>,
}

#[derive(Debug, Args)]
struct PlanArgs {
    #[command(flatten)]
    source: TableArgs,

    /// Only plan modules whose name matches this pattern.
    #[arg(long = "module")]
    modules: Vec<String>,

    /// Output format.
    #[arg(long, value_enum, default_value = "md")]
    format: OutputFormat,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    Md,
    Json,
}

fn main() -> ExitCode {
    if let Err(e) = real_main() {
        error!("{:?}", e);
        return ExitCode::from(1);
    }
    ExitCode::from(0)
}

fn real_main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd.unwrap_or_else(|| Command::Run(RunArgs::default())) {
        Command::Run(args) => cmd_run(args),
        Command::Plan(args) => cmd_plan(args),
        Command::Table(args) => cmd_table(args),
    }
}

/// Prints one line per module on stdout, then a final status line.
struct StdoutProgress;

impl ProgressSink for StdoutProgress {
    fn module_started(&mut self, module: &str) {
        println!("Fixing {}...", module);
    }

    fn finished(&mut self, report: &ApplyReport) {
        if report.dry_run {
            println!(
                "Dry run: {} change(s) not written.",
                report.summary.applied
            );
        } else {
            println!("✅ Fixed critical TFLint issues!");
        }
    }
}

fn cmd_run(args: RunArgs) -> anyhow::Result<()> {
    let root = args.source.root();
    let merger = load_merger(&root)?;
    let merged = merger.merge_run_args(args.dry_run, args.backup, args.no_validate);
    debug!(
        "merged config: dry_run={}, validate={}, backup_suffix={:?}",
        merged.dry_run, merged.validate, merged.backup_suffix
    );

    let table = effective_table(merger, &args.source)?;
    let plan = build_plan(&table, args.modules)?;

    let opts = ApplyOptions {
        dry_run: merged.dry_run,
        validate: merged.validate,
        backup_suffix: merged.backup_suffix,
    };
    let (report, patch) = apply_plan(&root, &plan, tool_info(), &opts, &mut StdoutProgress)
        .context("apply fix table")?;

    info!(
        "{} applied, {} unchanged, {} skipped, {} failed, {} file(s) written",
        report.summary.applied,
        report.summary.unchanged,
        report.summary.skipped,
        report.summary.failed,
        report.summary.files_written
    );

    if let Some(out_dir) = args.out_dir {
        fs::create_dir_all(&out_dir).with_context(|| format!("create {}", out_dir))?;
        write_json(&out_dir.join("apply.json"), &report)?;
        fs::write(out_dir.join("apply.md"), render_apply_md(&report))?;
        fs::write(out_dir.join("patch.diff"), &patch)?;
        info!("wrote apply artifacts to {}", out_dir);
    }
    Ok(())
}

fn cmd_plan(args: PlanArgs) -> anyhow::Result<()> {
    let root = args.source.root();
    let merger = load_merger(&root)?;
    let table = effective_table(merger, &args.source)?;
    let plan = build_plan(&table, args.modules)?;

    match args.format {
        OutputFormat::Md => print!("{}", render_plan_md(&plan)),
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&plan).context("serialize json")?
            );
        }
    }
    Ok(())
}

fn cmd_table(args: TableArgs) -> anyhow::Result<()> {
    let root = args.root();
    let merger = load_merger(&root)?;
    let table = effective_table(merger, &args)?;
    print!(
        "{}",
        toml::to_string_pretty(&table).context("serialize fix table")?
    );
    Ok(())
}

fn load_merger(root: &Utf8Path) -> anyhow::Result<ConfigMerger> {
    let file_config = config::load_or_default(root).context("load tffix.toml config")?;
    Ok(ConfigMerger::new(file_config))
}

fn effective_table(merger: ConfigMerger, args: &TableArgs) -> anyhow::Result<FixTable> {
    let cli_table = match &args.table {
        Some(path) => Some((path.clone(), load_fix_table(path)?)),
        None => None,
    };
    let (table, source) = merger.select_table(cli_table, builtin_fix_table);
    match source {
        TableSource::File(path) => debug!("using fix table from {}", path),
        TableSource::Config => debug!("using fix table from tffix.toml"),
        TableSource::Builtin => debug!("using built-in fix table"),
    }
    Ok(table)
}

fn build_plan(table: &FixTable, only: Vec<String>) -> anyhow::Result<FixPlan> {
    Planner::new(PlannerConfig { only })
        .plan(table, tool_info())
        .context("plan fix table")
}

fn write_json<T: serde::Serialize>(path: &Utf8Path, v: &T) -> anyhow::Result<()> {
    let s = serde_json::to_string_pretty(v).context("serialize json")?;
    fs::write(path, s).with_context(|| format!("write {}", path))?;
    Ok(())
}

fn tool_info() -> ToolInfo {
    ToolInfo {
        name: "tffix".to_string(),
        version: Some(env!("CARGO_PKG_VERSION").to_string()),
    }
}
