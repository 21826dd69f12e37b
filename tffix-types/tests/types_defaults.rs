use camino::Utf8PathBuf;
use pretty_assertions::assert_eq;
use tffix_types::ToolInfo;
use tffix_types::apply::ApplyReport;
use tffix_types::ops::Operation;
use tffix_types::plan::{FixPlan, ModulePlan};

fn tool() -> ToolInfo {
    ToolInfo {
        name: "tffix".to_string(),
        version: Some("1.2.3".to_string()),
    }
}

#[test]
fn fix_plan_new_sets_schema_and_defaults() {
    let plan = FixPlan::new(tool());

    assert_eq!(plan.schema, tffix_types::schema::TFFIX_PLAN_V1);
    assert_eq!(plan.tool, tool());
    assert!(plan.modules.is_empty());
    assert_eq!(plan.summary.ops, 0);
}

#[test]
fn push_module_counts_distinct_files() {
    let mut plan = FixPlan::new(tool());
    plan.push_module(ModulePlan {
        name: "helm-vault".to_string(),
        ops: vec![
            Operation::EnsureProviders {
                path: Utf8PathBuf::from("helm-vault/version.tf"),
                providers: vec![],
            },
            Operation::EnsureVariableMetadata {
                path: Utf8PathBuf::from("helm-vault/variables.tf"),
                variables: vec![],
            },
        ],
    });
    plan.push_module(ModulePlan {
        name: "helm-vault-again".to_string(),
        ops: vec![Operation::EnsureProviders {
            path: Utf8PathBuf::from("helm-vault/version.tf"),
            providers: vec![],
        }],
    });

    assert_eq!(plan.summary.modules, 2);
    assert_eq!(plan.summary.ops, 3);
    assert_eq!(plan.summary.files, 2);
}

#[test]
fn apply_report_new_is_empty() {
    let report = ApplyReport::new(tool(), true);

    assert_eq!(report.schema, tffix_types::schema::TFFIX_APPLY_V1);
    assert!(report.dry_run);
    assert!(report.results.is_empty());
    assert!(report.ended_at.is_none());
    assert_eq!(report.summary.attempted, 0);
}
