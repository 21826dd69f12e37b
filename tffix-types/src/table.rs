//! Fix table records: which providers and variable metadata each module must carry.

use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};

/// A provider that must be declared in a module's `required_providers` block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderSpec {
    pub name: String,
    pub source: String,
    pub version: String,
}

impl ProviderSpec {
    pub fn new(
        name: impl Into<String>,
        source: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
            version: version.into(),
        }
    }
}

/// Metadata to ensure on one declared variable.
///
/// `ty` is an HCL type expression inserted verbatim (`string`, `list(string)`);
/// `description` is plain text rendered as a quoted string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableFix {
    pub name: String,

    #[serde(
        rename = "type",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub ty: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl VariableFix {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: None,
            description: None,
        }
    }

    pub fn with_type(mut self, ty: impl Into<String>) -> Self {
        self.ty = Some(ty.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// One unit of work: the fixes for a single module directory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleFixEntry {
    /// Label used in progress output. Falls back to the directory of the first file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Version file to patch. Processed even when `providers` is empty, so a
    /// missing file is created from the default template.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_file: Option<Utf8PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variables_file: Option<Utf8PathBuf>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub providers: Vec<ProviderSpec>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub variables: Vec<VariableFix>,
}

impl ModuleFixEntry {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn version_file(mut self, path: impl Into<Utf8PathBuf>, providers: Vec<ProviderSpec>) -> Self {
        self.version_file = Some(path.into());
        self.providers = providers;
        self
    }

    pub fn variables_file(mut self, path: impl Into<Utf8PathBuf>, variables: Vec<VariableFix>) -> Self {
        self.variables_file = Some(path.into());
        self.variables = variables;
        self
    }

    /// Human-readable module label.
    pub fn label(&self) -> String {
        if let Some(name) = &self.name {
            return name.clone();
        }
        self.version_file
            .as_deref()
            .or(self.variables_file.as_deref())
            .and_then(Utf8Path::parent)
            .map(|p| p.as_str())
            .filter(|p| !p.is_empty())
            .unwrap_or(".")
            .to_string()
    }
}

/// The ordered list of module fixes driving a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixTable {
    #[serde(rename = "module", default, skip_serializing_if = "Vec::is_empty")]
    pub modules: Vec<ModuleFixEntry>,
}

impl FixTable {
    pub fn new(modules: Vec<ModuleFixEntry>) -> Self {
        Self { modules }
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}
