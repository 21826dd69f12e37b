use anyhow::Context;
use clap::{Parser, Subcommand};
use fs_err as fs;
use std::process::Command as ProcessCommand;

#[derive(Debug, Parser)]
#[command(name = "xtask", about = "Workspace helper tasks")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print schema identifiers used by tffix.
    PrintSchemas,
    /// Write the built-in fix table as TOML, ready to edit into a custom table.
    WriteDefaultTable {
        #[arg(long, default_value = "tffix-table.toml")]
        out: String,
    },
    /// Bless golden fixtures (overwrite expected outputs).
    BlessFixtures,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::PrintSchemas => {
            println!("{}", tffix_types::schema::TFFIX_PLAN_V1);
            println!("{}", tffix_types::schema::TFFIX_APPLY_V1);
        }
        Command::WriteDefaultTable { out } => {
            let table = tffix_domain::builtin_fix_table();
            let text = toml::to_string_pretty(&table).context("serialize fix table")?;
            fs::write(&out, text).with_context(|| format!("write {out}"))?;
            println!("wrote {} module(s) to {out}", table.modules.len());
        }
        Command::BlessFixtures => {
            let status = ProcessCommand::new("cargo")
                .args(["test", "-p", "tffix-domain", "--test", "golden_fixtures"])
                .env("TFFIX_BLESS", "1")
                .status()
                .context("run golden fixture blessing")?;
            if !status.success() {
                anyhow::bail!("bless-fixtures failed");
            }
        }
    }
    Ok(())
}
