#![no_main]

//! Fuzz target for fix table loading and planning.

use libfuzzer_sys::fuzz_target;
use tffix_domain::{Planner, parse_fix_table};
use tffix_types::ToolInfo;

fuzz_target!(|data: &[u8]| {
    let Ok(s) = std::str::from_utf8(data) else {
        return;
    };

    let Ok(table) = parse_fix_table(s) else {
        return;
    };
    let tool = ToolInfo {
        name: "tffix".to_string(),
        version: None,
    };
    if let Ok(plan) = Planner::default().plan(&table, tool) {
        assert_eq!(plan.summary.ops, plan.ops().count() as u64);
    }
});
