use crate::error::TableError;
use crate::validate::validate_table;
use tffix_types::ToolInfo;
use tffix_types::ops::Operation;
use tffix_types::plan::{FixPlan, ModulePlan};
use tffix_types::table::{FixTable, ModuleFixEntry};
use tracing::debug;

#[derive(Debug, Clone, Default)]
pub struct PlannerConfig {
    /// Module-name patterns (`*`, `?`). Empty selects every module.
    pub only: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct Planner {
    config: PlannerConfig,
}

impl Planner {
    pub fn new(config: PlannerConfig) -> Self {
        Self { config }
    }

    /// Validate `table` and expand it into per-module operations, keeping
    /// table order.
    pub fn plan(&self, table: &FixTable, tool: ToolInfo) -> Result<FixPlan, TableError> {
        validate_table(table)?;

        let mut plan = FixPlan::new(tool);
        for entry in &table.modules {
            let name = entry.label();
            if !self.selected(&name) {
                debug!("module {} not selected", name);
                continue;
            }
            let ops = module_ops(entry);
            debug!("planned {} op(s) for {}", ops.len(), name);
            plan.push_module(ModulePlan { name, ops });
        }

        if plan.modules.is_empty() && !self.config.only.is_empty() && !table.is_empty() {
            return Err(TableError::NoModulesSelected {
                patterns: self.config.only.clone(),
            });
        }

        Ok(plan)
    }

    fn selected(&self, module: &str) -> bool {
        self.config.only.is_empty() || self.config.only.iter().any(|p| glob_match(p, module))
    }
}

/// Version file first, then variables, mirroring the order the fixes were authored in.
fn module_ops(entry: &ModuleFixEntry) -> Vec<Operation> {
    let mut ops = Vec::new();
    if let Some(path) = &entry.version_file {
        ops.push(Operation::EnsureProviders {
            path: path.clone(),
            providers: entry.providers.clone(),
        });
    }
    if let Some(path) = &entry.variables_file
        && !entry.variables.is_empty()
    {
        ops.push(Operation::EnsureVariableMetadata {
            path: path.clone(),
            variables: entry.variables.clone(),
        });
    }
    ops
}

fn glob_match(pat: &str, text: &str) -> bool {
    // Simple wildcard matcher: '*' and '?'.
    //
    // DP implementation to avoid recursion.
    let p = pat.as_bytes();
    let t = text.as_bytes();
    let mut dp = vec![vec![false; t.len() + 1]; p.len() + 1];
    dp[0][0] = true;

    for i in 1..=p.len() {
        if p[i - 1] == b'*' {
            dp[i][0] = dp[i - 1][0];
        }
    }

    for i in 1..=p.len() {
        for j in 1..=t.len() {
            dp[i][j] = match p[i - 1] {
                b'*' => dp[i - 1][j] || dp[i][j - 1],
                b'?' => dp[i - 1][j - 1],
                c => dp[i - 1][j - 1] && c == t[j - 1],
            };
        }
    }

    dp[p.len()][t.len()]
}
