//! Edit engine for tffix plans.
//!
//! Responsibilities:
//! - Run each operation's patcher against the current file text.
//! - Reject patched text that no longer parses as HCL.
//! - Write changed files (unless dry-run), optionally keeping a backup.
//! - Generate a unified diff preview.

pub mod error;
mod patch;

pub use error::{EditError, EditResult};
pub use patch::{
    DEFAULT_VERSION_TEMPLATE, PatchOutcome, ensure_providers_in, ensure_variable_metadata_in,
};

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use chrono::Utc;
use fs_err as fs;
use sha2::{Digest, Sha256};
use std::collections::{BTreeMap, BTreeSet};
use tffix_types::ToolInfo;
use tffix_types::apply::{ApplyReport, FileChange, OpResult, OpStatus};
use tffix_types::ops::Operation;
use tffix_types::plan::FixPlan;
use tffix_types::table::{ProviderSpec, VariableFix};
use tracing::{debug, info, warn};

#[derive(Debug, Clone)]
pub struct ApplyOptions {
    pub dry_run: bool,
    /// Re-parse patched text with `hcl-edit` before writing it.
    pub validate: bool,
    /// When set, the content a file had before the run is saved to
    /// `<path><suffix>` the first time the file is overwritten.
    pub backup_suffix: Option<String>,
}

impl Default for ApplyOptions {
    fn default() -> Self {
        Self {
            dry_run: false,
            validate: true,
            backup_suffix: None,
        }
    }
}

/// Receives progress while a plan is applied.
pub trait ProgressSink {
    /// Called before the first operation of each module.
    fn module_started(&mut self, module: &str);

    /// Called once after the last module.
    fn finished(&mut self, _report: &ApplyReport) {}
}

/// A sink that ignores all progress.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn module_started(&mut self, _module: &str) {}
}

/// Compute the diff a plan would produce without writing anything.
pub fn preview_patch(repo_root: &Utf8Path, plan: &FixPlan) -> anyhow::Result<String> {
    let opts = ApplyOptions {
        dry_run: true,
        ..ApplyOptions::default()
    };
    let (_, patch) = apply_plan(repo_root, plan, plan.tool.clone(), &opts, &mut NoProgress)?;
    Ok(patch)
}

/// Apply a plan module by module. Each changed file is written as soon as its
/// operation completes. When `opts.dry_run` is true, no files are written, but
/// results and a patch are still produced.
pub fn apply_plan(
    repo_root: &Utf8Path,
    plan: &FixPlan,
    tool: ToolInfo,
    opts: &ApplyOptions,
    progress: &mut dyn ProgressSink,
) -> anyhow::Result<(ApplyReport, String)> {
    let mut report = ApplyReport::new(tool, opts.dry_run);

    // First-seen content per file (None = missing), and the latest content.
    let mut before: BTreeMap<Utf8PathBuf, Option<String>> = BTreeMap::new();
    let mut current: BTreeMap<Utf8PathBuf, Option<String>> = BTreeMap::new();
    let mut written: BTreeSet<Utf8PathBuf> = BTreeSet::new();

    for module in &plan.modules {
        progress.module_started(&module.name);
        report.summary.modules += 1;

        for op in &module.ops {
            let path = op.path().to_path_buf();
            let text = match current.get(&path) {
                Some(text) => text.clone(),
                None => {
                    let text = read_optional(&abs_path(repo_root, &path))?;
                    before.insert(path.clone(), text.clone());
                    text
                }
            };

            let original = if written.contains(&path) {
                None
            } else {
                before.get(&path).and_then(|t| t.as_deref())
            };
            let target = Target {
                root: repo_root,
                text: text.as_deref(),
                original,
            };
            let (result, new_text) = run_op(&target, &module.name, op, opts)?;
            if let Some(new_text) = new_text {
                if !opts.dry_run {
                    written.insert(path.clone());
                }
                current.insert(path, Some(new_text));
            } else {
                current.entry(path).or_insert(text);
            }
            report.record(result);
        }
    }

    report.ended_at = Some(Utc::now());
    progress.finished(&report);

    let patch = render_patch(&before, &current);
    Ok((report, patch))
}

/// Ensure `providers` are declared in the version file at `path`, creating it
/// from [`DEFAULT_VERSION_TEMPLATE`] when missing.
pub fn ensure_providers(path: &Utf8Path, providers: &[ProviderSpec]) -> EditResult<OpResult> {
    run_file_op(Operation::EnsureProviders {
        path: path.to_path_buf(),
        providers: providers.to_vec(),
    })
}

/// Ensure variable metadata in the variables file at `path`. A missing file is
/// left missing.
pub fn ensure_variable_metadata(path: &Utf8Path, variables: &[VariableFix]) -> EditResult<OpResult> {
    run_file_op(Operation::EnsureVariableMetadata {
        path: path.to_path_buf(),
        variables: variables.to_vec(),
    })
}

fn run_file_op(op: Operation) -> EditResult<OpResult> {
    let module = op
        .path()
        .parent()
        .map(|p| p.as_str())
        .filter(|p| !p.is_empty())
        .unwrap_or(".")
        .to_string();
    let text = read_optional(op.path())?;
    let target = Target {
        root: Utf8Path::new(""),
        text: text.as_deref(),
        original: text.as_deref(),
    };
    let (result, _) = run_op(&target, &module, &op, &ApplyOptions::default())?;
    Ok(result)
}

/// The file an operation works on.
struct Target<'a> {
    root: &'a Utf8Path,
    /// Current content (None = missing).
    text: Option<&'a str>,
    /// Content to back up; set only until the file is first written.
    original: Option<&'a str>,
}

/// Run one operation; soft errors become results, runtime errors propagate.
fn run_op(
    target: &Target<'_>,
    module: &str,
    op: &Operation,
    opts: &ApplyOptions,
) -> anyhow::Result<(OpResult, Option<String>)> {
    debug!("{} {} ({})", op.kind().as_str(), op.path(), module);
    let mut result = OpResult {
        module: module.to_string(),
        op: op.kind(),
        path: op.path().to_path_buf(),
        status: OpStatus::Unchanged,
        message: None,
        notes: vec![],
        file: None,
    };

    match execute_op(target, op, opts) {
        Ok(None) => {
            result.status = OpStatus::Skipped;
            result.message = Some("file not found".to_string());
            Ok((result, None))
        }
        Ok(Some(executed)) => {
            result.notes = executed.notes;
            match executed.file {
                Some(file) => {
                    result.status = OpStatus::Applied;
                    result.file = Some(file);
                    Ok((result, Some(executed.text)))
                }
                None => Ok((result, None)),
            }
        }
        Err(EditError::Runtime(e)) => Err(e),
        Err(e) => {
            warn!("{}", e);
            result.status = e.status();
            result.message = Some(e.to_string());
            Ok((result, None))
        }
    }
}

struct Executed {
    text: String,
    notes: Vec<tffix_types::apply::EditNote>,
    /// Set when the text changed.
    file: Option<FileChange>,
}

/// Returns `None` when the operation does not apply because its file is missing.
fn execute_op(
    target: &Target<'_>,
    op: &Operation,
    opts: &ApplyOptions,
) -> EditResult<Option<Executed>> {
    let text = target.text;
    let outcome = match op {
        Operation::EnsureProviders { providers, .. } => ensure_providers_in(text, providers),
        Operation::EnsureVariableMetadata { variables, .. } => match text {
            Some(text) => ensure_variable_metadata_in(text, variables),
            None => return Ok(None),
        },
    }
    .map_err(|source| EditError::Unparseable {
        path: op.path().to_path_buf(),
        source,
    })?;

    if text == Some(outcome.text.as_str()) {
        return Ok(Some(Executed {
            text: outcome.text,
            notes: outcome.notes,
            file: None,
        }));
    }

    if opts.validate
        && let Some(message) = tffix_hcl::syntax_error(&outcome.text)
    {
        return Err(EditError::InvalidOutput {
            path: op.path().to_path_buf(),
            message,
        });
    }

    let file = commit(target, op.path(), &outcome.text, opts)?;
    Ok(Some(Executed {
        text: outcome.text,
        notes: outcome.notes,
        file: Some(file),
    }))
}

fn commit(
    target: &Target<'_>,
    path: &Utf8Path,
    after: &str,
    opts: &ApplyOptions,
) -> anyhow::Result<FileChange> {
    let before = target.text;
    let abs = abs_path(target.root, path);
    let mut backup_path = None;

    if !opts.dry_run {
        if let Some(parent) = abs.parent()
            && !parent.as_str().is_empty()
        {
            fs::create_dir_all(parent).with_context(|| format!("create {}", parent))?;
        }
        if let (Some(suffix), Some(old)) = (&opts.backup_suffix, target.original) {
            let backup = Utf8PathBuf::from(format!("{}{}", abs, suffix));
            fs::write(&backup, old).with_context(|| format!("write backup {}", backup))?;
            backup_path = Some(backup);
        }
        fs::write(&abs, after).with_context(|| format!("write {}", abs))?;
        info!("wrote {}", abs);
    }

    Ok(FileChange {
        path: path.to_path_buf(),
        created: before.is_none(),
        sha256_before: before.map(|b| sha256_hex(b.as_bytes())),
        sha256_after: sha256_hex(after.as_bytes()),
        backup_path,
    })
}

fn read_optional(abs: &Utf8Path) -> anyhow::Result<Option<String>> {
    match fs::read_to_string(abs) {
        Ok(text) => Ok(Some(text)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e).with_context(|| format!("read {}", abs)),
    }
}

fn abs_path(repo_root: &Utf8Path, rel: &Utf8Path) -> Utf8PathBuf {
    if rel.is_absolute() {
        rel.to_path_buf()
    } else {
        repo_root.join(rel)
    }
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

fn render_patch(
    before: &BTreeMap<Utf8PathBuf, Option<String>>,
    after: &BTreeMap<Utf8PathBuf, Option<String>>,
) -> String {
    let mut out = String::new();

    for (path, old) in before {
        let Some(Some(new)) = after.get(path) else {
            continue;
        };
        if old.as_deref() == Some(new.as_str()) {
            continue;
        }

        out.push_str(&format!("diff --git a/{0} b/{0}\n", path));
        match old {
            Some(_) => out.push_str(&format!("--- a/{0}\n+++ b/{0}\n", path)),
            None => out.push_str(&format!("--- /dev/null\n+++ b/{0}\n", path)),
        }

        // diffy emits its own `--- original` / `+++ modified` header; keep the hunks.
        let rendered = diffy::create_patch(old.as_deref().unwrap_or(""), new).to_string();
        out.push_str(rendered.splitn(3, '\n').nth(2).unwrap_or(""));
        if !out.ends_with('\n') {
            out.push('\n');
        }
    }

    out
}
