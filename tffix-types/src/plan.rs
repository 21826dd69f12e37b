use crate::ToolInfo;
use crate::ops::Operation;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixPlan {
    pub schema: String,
    pub tool: ToolInfo,

    #[serde(default)]
    pub modules: Vec<ModulePlan>,

    pub summary: PlanSummary,
}

impl FixPlan {
    pub fn new(tool: ToolInfo) -> Self {
        Self {
            schema: crate::schema::TFFIX_PLAN_V1.to_string(),
            tool,
            modules: vec![],
            summary: PlanSummary::default(),
        }
    }

    /// Append a module and keep the summary in step.
    pub fn push_module(&mut self, module: ModulePlan) {
        self.modules.push(module);
        self.recompute_summary();
    }

    pub fn ops(&self) -> impl Iterator<Item = &Operation> {
        self.modules.iter().flat_map(|m| m.ops.iter())
    }

    fn recompute_summary(&mut self) {
        let files: BTreeSet<_> = self.ops().map(|op| op.path().to_owned()).collect();
        self.summary = PlanSummary {
            modules: self.modules.len() as u64,
            ops: self.ops().count() as u64,
            files: files.len() as u64,
        };
    }
}

/// The operations planned for one fix-table entry, in execution order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModulePlan {
    pub name: String,

    #[serde(default)]
    pub ops: Vec<Operation>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanSummary {
    pub modules: u64,
    pub ops: u64,
    pub files: u64,
}
