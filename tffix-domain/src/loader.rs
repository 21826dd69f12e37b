use anyhow::Context;
use camino::Utf8Path;
use fs_err as fs;
use tffix_types::table::FixTable;
use tracing::debug;

/// Parse a fix table from TOML (`[[module]]` entries).
pub fn parse_fix_table(contents: &str) -> anyhow::Result<FixTable> {
    let table: FixTable = toml::from_str(contents).context("invalid fix table TOML")?;
    Ok(table)
}

/// Load a fix table file.
pub fn load_fix_table(path: &Utf8Path) -> anyhow::Result<FixTable> {
    let contents = fs::read_to_string(path).with_context(|| format!("read fix table {}", path))?;
    let table =
        parse_fix_table(&contents).with_context(|| format!("parse fix table {}", path))?;
    debug!("loaded {} module(s) from {}", table.modules.len(), path);
    Ok(table)
}
