//! Configuration file loading for tffix.
//!
//! Discovers and loads `tffix.toml` from the run root.
//! Merges config file settings with CLI arguments (CLI takes precedence).

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use serde::Deserialize;
use tffix_types::table::{FixTable, ModuleFixEntry};
use tracing::debug;

/// The config file name to search for.
pub const CONFIG_FILE_NAME: &str = "tffix.toml";

/// Top-level configuration from tffix.toml.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TffixConfig {
    /// Apply settings.
    pub apply: ApplyConfig,

    /// Fix table entries; when present they replace the built-in table.
    #[serde(rename = "module")]
    pub modules: Vec<ModuleFixEntry>,
}

/// Apply section of the config.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApplyConfig {
    /// Report changes without writing them.
    pub dry_run: bool,

    /// Keep a copy of each file before overwriting it.
    pub backups: bool,

    /// Suffix for backup files.
    pub backup_suffix: String,

    /// Reject patched files that no longer parse as HCL.
    pub validate: bool,
}

impl Default for ApplyConfig {
    fn default() -> Self {
        Self {
            dry_run: false,
            backups: false,
            backup_suffix: ".tffix.bak".to_string(),
            validate: true,
        }
    }
}

/// Discover the tffix.toml config file.
///
/// Returns `None` if no config file is found.
pub fn discover_config(root: &Utf8Path) -> Option<Utf8PathBuf> {
    let config_path = root.join(CONFIG_FILE_NAME);
    if config_path.exists() {
        debug!("found config file at {}", config_path);
        Some(config_path)
    } else {
        debug!("no config file found at {}", config_path);
        None
    }
}

/// Load and parse a tffix.toml config file.
pub fn load_config(path: &Utf8Path) -> anyhow::Result<TffixConfig> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("read config file {}", path))?;
    parse_config(&contents).with_context(|| format!("parse config file {}", path))
}

/// Parse a config file from a string.
pub fn parse_config(contents: &str) -> anyhow::Result<TffixConfig> {
    let config: TffixConfig = toml::from_str(contents).context("invalid TOML")?;
    Ok(config)
}

/// Load config from the run root, or return default if not found.
pub fn load_or_default(root: &Utf8Path) -> anyhow::Result<TffixConfig> {
    match discover_config(root) {
        Some(path) => load_config(&path),
        None => Ok(TffixConfig::default()),
    }
}

/// Apply settings after merging the config file with CLI flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedConfig {
    pub dry_run: bool,
    pub validate: bool,
    /// Set when backups are enabled.
    pub backup_suffix: Option<String>,
}

/// Where the effective fix table came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableSource {
    /// A `--table` file.
    File(Utf8PathBuf),
    /// `[[module]]` entries in tffix.toml.
    Config,
    Builtin,
}

/// Builder for merging config file with CLI arguments.
pub struct ConfigMerger {
    config: TffixConfig,
}

impl ConfigMerger {
    /// Create a new merger from a loaded config.
    pub fn new(config: TffixConfig) -> Self {
        Self { config }
    }

    /// Merge with run command CLI flags.
    ///
    /// Flags can only switch a behavior on (`--dry-run`, `--backup`) or off
    /// (`--no-validate`); otherwise the config file value is used.
    pub fn merge_run_args(&self, dry_run: bool, backup: bool, no_validate: bool) -> MergedConfig {
        let apply = &self.config.apply;
        MergedConfig {
            dry_run: dry_run || apply.dry_run,
            validate: apply.validate && !no_validate,
            backup_suffix: (backup || apply.backups).then(|| apply.backup_suffix.clone()),
        }
    }

    /// Pick the fix table: a `--table` file, then config entries, then the built-in table.
    pub fn select_table(
        self,
        cli_table: Option<(Utf8PathBuf, FixTable)>,
        builtin: impl FnOnce() -> FixTable,
    ) -> (FixTable, TableSource) {
        if let Some((path, table)) = cli_table {
            return (table, TableSource::File(path));
        }
        if !self.config.modules.is_empty() {
            return (FixTable::new(self.config.modules), TableSource::Config);
        }
        (builtin(), TableSource::Builtin)
    }
}
