use crate::ToolInfo;
use crate::ops::OpKind;
use camino::Utf8PathBuf;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplyReport {
    pub schema: String,
    pub tool: ToolInfo,
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<DateTime<Utc>>,

    pub dry_run: bool,

    #[serde(default)]
    pub results: Vec<OpResult>,

    pub summary: ApplySummary,
}

impl ApplyReport {
    pub fn new(tool: ToolInfo, dry_run: bool) -> Self {
        Self {
            schema: crate::schema::TFFIX_APPLY_V1.to_string(),
            tool,
            run_id: Uuid::new_v4(),
            started_at: Utc::now(),
            ended_at: None,
            dry_run,
            results: vec![],
            summary: ApplySummary::default(),
        }
    }

    /// Record a result and count it in the summary.
    pub fn record(&mut self, result: OpResult) {
        self.summary.attempted += 1;
        match result.status {
            OpStatus::Applied => self.summary.applied += 1,
            OpStatus::Unchanged => self.summary.unchanged += 1,
            OpStatus::Skipped => self.summary.skipped += 1,
            OpStatus::Failed => self.summary.failed += 1,
        }
        if result.status == OpStatus::Applied && !self.dry_run {
            self.summary.files_written += 1;
        }
        self.results.push(result);
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpResult {
    pub module: String,
    pub op: OpKind,
    pub path: Utf8PathBuf,
    pub status: OpStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<EditNote>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<FileChange>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpStatus {
    /// The file content changed (written unless the run is a dry-run).
    Applied,
    /// Everything requested was already present, or nothing could be anchored.
    Unchanged,
    /// The operation could not run against this file (missing, unparseable).
    Skipped,
    /// The patched text was rejected and nothing was written.
    Failed,
}

impl OpStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            OpStatus::Applied => "applied",
            OpStatus::Unchanged => "unchanged",
            OpStatus::Skipped => "skipped",
            OpStatus::Failed => "failed",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileChange {
    pub path: Utf8PathBuf,
    pub created: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha256_before: Option<String>,

    pub sha256_after: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backup_path: Option<Utf8PathBuf>,
}

/// What a patcher did (or declined to do) for one requested item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EditNote {
    TemplateCreated,
    ProviderAdded { provider: String },
    ProviderPresent { provider: String },
    ProvidersBlockMissing,
    AttributeAdded { variable: String, attribute: String },
    AttributePresent { variable: String, attribute: String },
    VariableMissing { variable: String },
    AnchorMissing { variable: String, attribute: String },
}

impl EditNote {
    /// True when the note describes a change to the text.
    pub fn is_change(&self) -> bool {
        matches!(
            self,
            EditNote::TemplateCreated
                | EditNote::ProviderAdded { .. }
                | EditNote::AttributeAdded { .. }
        )
    }
}

impl fmt::Display for EditNote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditNote::TemplateCreated => write!(f, "created from default template"),
            EditNote::ProviderAdded { provider } => write!(f, "added provider `{provider}`"),
            EditNote::ProviderPresent { provider } => {
                write!(f, "provider `{provider}` already declared")
            }
            EditNote::ProvidersBlockMissing => write!(f, "no required_providers block found"),
            EditNote::AttributeAdded {
                variable,
                attribute,
            } => write!(f, "added `{attribute}` to variable `{variable}`"),
            EditNote::AttributePresent {
                variable,
                attribute,
            } => write!(f, "variable `{variable}` already has `{attribute}`"),
            EditNote::VariableMissing { variable } => {
                write!(f, "variable `{variable}` not declared")
            }
            EditNote::AnchorMissing {
                variable,
                attribute,
            } => write!(
                f,
                "variable `{variable}` has no attribute to anchor `{attribute}` before"
            ),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplySummary {
    pub modules: u64,
    pub attempted: u64,
    pub applied: u64,
    pub unchanged: u64,
    pub skipped: u64,
    pub failed: u64,
    pub files_written: u64,
}
