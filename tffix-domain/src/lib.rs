//! Domain logic: turn a fix table into a deterministic, validated plan.
//!
//! This crate owns *what* should be fixed in which module. It does not own *how*
//! files are edited; that's the `tffix-edit` crate.

mod error;
mod loader;
mod planner;
mod table;
mod validate;

pub use error::TableError;
pub use loader::{load_fix_table, parse_fix_table};
pub use planner::{Planner, PlannerConfig};
pub use table::builtin_fix_table;
pub use validate::validate_table;
