//! Rendering helpers (markdown) for human-readable artifacts.

use tffix_types::apply::ApplyReport;
use tffix_types::ops::Operation;
use tffix_types::plan::FixPlan;

pub fn render_plan_md(plan: &FixPlan) -> String {
    let mut out = String::new();
    out.push_str("# tffix plan\n\n");
    out.push_str(&format!(
        "- Modules: {}\n- Ops: {}\n- Files: {}\n\n",
        plan.summary.modules, plan.summary.ops, plan.summary.files
    ));

    out.push_str("## Ops\n\n");
    if plan.modules.iter().all(|m| m.ops.is_empty()) {
        out.push_str("_No ops planned._\n");
        return out;
    }

    let mut i = 0;
    for module in &plan.modules {
        for op in &module.ops {
            i += 1;
            out.push_str(&format!("### {}. {}\n\n", i, module.name));
            out.push_str(&format!("- Kind: `{}`\n", op.kind().as_str()));
            out.push_str(&format!("- Target: `{}`\n", op.path()));
            match op {
                Operation::EnsureProviders { providers, .. } => {
                    if providers.is_empty() {
                        out.push_str("- Providers: _none (template only)_\n");
                    }
                    for p in providers {
                        out.push_str(&format!(
                            "- Provider: `{}` = `{}` `{}`\n",
                            p.name, p.source, p.version
                        ));
                    }
                }
                Operation::EnsureVariableMetadata { variables, .. } => {
                    for v in variables {
                        let mut wanted = Vec::new();
                        if let Some(ty) = &v.ty {
                            wanted.push(format!("type `{}`", ty));
                        }
                        if v.description.is_some() {
                            wanted.push("description".to_string());
                        }
                        out.push_str(&format!("- Variable: `{}` ({})\n", v.name, wanted.join(", ")));
                    }
                }
            }
            out.push('\n');
        }
    }

    out
}

pub fn render_apply_md(apply: &ApplyReport) -> String {
    let mut out = String::new();
    out.push_str("# tffix apply\n\n");
    if apply.dry_run {
        out.push_str("_Dry run: no files were written._\n\n");
    }
    out.push_str(&format!(
        "- Modules: {}\n- Attempted: {}\n- Applied: {}\n- Unchanged: {}\n- Skipped: {}\n- Failed: {}\n- Files written: {}\n\n",
        apply.summary.modules,
        apply.summary.attempted,
        apply.summary.applied,
        apply.summary.unchanged,
        apply.summary.skipped,
        apply.summary.failed,
        apply.summary.files_written
    ));

    out.push_str("## Results\n\n");
    if apply.results.is_empty() {
        out.push_str("_No results._\n");
        return out;
    }

    for (i, r) in apply.results.iter().enumerate() {
        out.push_str(&format!("### {}. {}\n\n", i + 1, r.module));
        out.push_str(&format!("- Kind: `{}`\n", r.op.as_str()));
        out.push_str(&format!("- Target: `{}`\n", r.path));
        out.push_str(&format!("- Status: `{}`\n", r.status.as_str()));
        if let Some(msg) = &r.message {
            out.push_str(&format!("- Message: {}\n", msg));
        }
        if !r.notes.is_empty() {
            out.push_str("\n**Notes**\n\n");
            for note in &r.notes {
                out.push_str(&format!("- {}\n", note));
            }
        }
        if let Some(fc) = &r.file {
            out.push_str("\n**File**\n\n");
            let before = fc.sha256_before.as_deref().unwrap_or("-");
            out.push_str(&format!("- `{}` {} → {}\n", fc.path, before, fc.sha256_after));
            if let Some(backup) = &fc.backup_path {
                out.push_str(&format!("- Backup: `{}`\n", backup));
            }
        }
        out.push('\n');
    }

    out
}
