//! Golden fixture tests for tffix.
//!
//! Each fixture under `tests/fixtures/<name>/` contains:
//!
//! - `repo/` - The module tree before the run
//! - `table.toml` - Fix table to apply (optional; the built-in table otherwise)
//! - `expected/` - The complete module tree after the run
//!
//! Set `TFFIX_BLESS=1` to overwrite `expected/` with the actual output.

use camino::Utf8PathBuf;
use fs_err as fs;
use pretty_assertions::assert_eq;
use std::collections::BTreeMap;
use std::path::Path;
use tempfile::TempDir;
use tffix_domain::{Planner, PlannerConfig, builtin_fix_table, parse_fix_table};
use tffix_edit::{ApplyOptions, NoProgress, apply_plan};
use tffix_render::render_apply_md;
use tffix_types::ToolInfo;
use tffix_types::apply::ApplyReport;

fn tool() -> ToolInfo {
    ToolInfo {
        name: "tffix".to_string(),
        version: Some("test".to_string()),
    }
}

/// Relative path -> contents for every file under `root`.
fn snapshot(root: &Path) -> BTreeMap<String, String> {
    let mut out = BTreeMap::new();
    collect(root, root, &mut out);
    out
}

fn collect(root: &Path, dir: &Path, out: &mut BTreeMap<String, String>) {
    for entry in std::fs::read_dir(dir).expect("read dir") {
        let entry = entry.expect("dir entry");
        let path = entry.path();
        if entry.file_type().expect("file type").is_dir() {
            collect(root, &path, out);
        } else {
            let rel = path
                .strip_prefix(root)
                .expect("relative")
                .to_string_lossy()
                .replace('\\', "/");
            out.insert(rel, fs::read_to_string(&path).expect("read file"));
        }
    }
}

/// Runs a fixture, returning the report of the first run.
fn run_fixture_test(fixture_name: &str) -> ApplyReport {
    // Fixtures are at workspace root: ../tests/fixtures relative to tffix-domain
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    let workspace_root = manifest_dir.parent().expect("workspace root");
    let fixture_path = workspace_root
        .join("tests")
        .join("fixtures")
        .join(fixture_name);

    assert!(
        fixture_path.exists(),
        "Fixture directory does not exist: {}",
        fixture_path.display()
    );

    // Copy repo to tempdir for isolation
    let temp_dir = TempDir::new().expect("create temp dir");
    copy_dir_all(&fixture_path.join("repo"), temp_dir.path()).expect("copy repo");
    let root = Utf8PathBuf::from_path_buf(temp_dir.path().to_path_buf()).expect("utf8 path");

    let table_path = fixture_path.join("table.toml");
    let table = if table_path.exists() {
        parse_fix_table(&fs::read_to_string(&table_path).expect("read table")).expect("parse table")
    } else {
        builtin_fix_table()
    };

    let plan = Planner::new(PlannerConfig::default())
        .plan(&table, tool())
        .expect("generate plan");
    let (report, _patch) = apply_plan(
        &root,
        &plan,
        tool(),
        &ApplyOptions::default(),
        &mut NoProgress,
    )
    .expect("apply plan");

    let expected_dir = fixture_path.join("expected");
    if std::env::var_os("TFFIX_BLESS").is_some() {
        if expected_dir.exists() {
            fs::remove_dir_all(&expected_dir).expect("remove expected dir");
        }
        copy_dir_all(temp_dir.path(), &expected_dir).expect("bless expected");
        println!("Blessed '{}' at {}", fixture_name, expected_dir.display());
    }
    let expected = snapshot(&expected_dir);
    let actual = snapshot(temp_dir.path());
    assert_eq!(actual, expected, "Tree mismatch for fixture '{}'", fixture_name);

    // A second run is a no-op.
    let (second, patch) = apply_plan(
        &root,
        &plan,
        tool(),
        &ApplyOptions::default(),
        &mut NoProgress,
    )
    .expect("second apply");
    assert_eq!(second.summary.applied, 0, "second run changed files");
    assert!(patch.is_empty());
    assert_eq!(snapshot(temp_dir.path()), expected);

    report
}

/// Recursively copy a directory.
fn copy_dir_all(src: &Path, dst: &Path) -> std::io::Result<()> {
    fs::create_dir_all(dst)?;
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let ty = entry.file_type()?;
        let dst_path = dst.join(entry.file_name());
        if ty.is_dir() {
            copy_dir_all(&entry.path(), &dst_path)?;
        } else {
            fs::copy(entry.path(), dst_path)?;
        }
    }
    Ok(())
}

#[test]
fn golden_empty_repo_builtin() {
    let report = run_fixture_test("empty_repo_builtin");
    assert_eq!(report.summary.modules, 6);
    assert_eq!(report.summary.applied, 6);
    // Every variables file is missing.
    assert_eq!(report.summary.skipped, 4);
    assert_eq!(report.summary.files_written, 6);
}

#[test]
fn golden_vault_module() {
    let report = run_fixture_test("vault_module");
    assert_eq!(report.summary.applied, 2);

    let md = render_apply_md(&report);
    assert!(md.contains("- variable `vault_image` already has `description`\n"));
    assert!(md.contains("- variable `not_declared` not declared\n"));
}

#[test]
fn golden_unparseable_skipped() {
    let report = run_fixture_test("unparseable_skipped");
    assert_eq!(report.summary.modules, 3);
    assert_eq!(report.summary.applied, 2);
    assert_eq!(report.summary.skipped, 2);
    assert!(report.results[0].message.is_some());
}
