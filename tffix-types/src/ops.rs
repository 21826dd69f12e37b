use crate::table::{ProviderSpec, VariableFix};
use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};

/// A single file-level edit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Operation {
    /// Make sure every provider is declared in the version file's
    /// `required_providers` block, creating the file from the default
    /// template when it does not exist.
    EnsureProviders {
        path: Utf8PathBuf,
        #[serde(default)]
        providers: Vec<ProviderSpec>,
    },
    /// Make sure the listed variables carry `type` / `description` attributes.
    EnsureVariableMetadata {
        path: Utf8PathBuf,
        #[serde(default)]
        variables: Vec<VariableFix>,
    },
}

impl Operation {
    pub fn path(&self) -> &Utf8Path {
        match self {
            Operation::EnsureProviders { path, .. } => path,
            Operation::EnsureVariableMetadata { path, .. } => path,
        }
    }

    /// Stable snake_case name, matching the serialized `type` tag.
    pub fn kind(&self) -> OpKind {
        match self {
            Operation::EnsureProviders { .. } => OpKind::EnsureProviders,
            Operation::EnsureVariableMetadata { .. } => OpKind::EnsureVariableMetadata,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpKind {
    EnsureProviders,
    EnsureVariableMetadata,
}

impl OpKind {
    pub fn as_str(self) -> &'static str {
        match self {
            OpKind::EnsureProviders => "ensure_providers",
            OpKind::EnsureVariableMetadata => "ensure_variable_metadata",
        }
    }
}
