//! Shared DTOs (schemas-as-code) for the tffix workspace.
//!
//! # Design constraints
//! - Fix tables are read from TOML; plans and apply reports are written as JSON.
//! - Be conservative with breaking changes.
//! - Prefer adding optional fields over changing semantics.

pub mod apply;
pub mod ops;
pub mod plan;
pub mod table;

use serde::{Deserialize, Serialize};

/// Schema identifiers.
pub mod schema {
    pub const TFFIX_PLAN_V1: &str = "tffix.plan.v1";
    pub const TFFIX_APPLY_V1: &str = "tffix.apply.v1";
}

/// Identifies the tool that produced an artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolInfo {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}
