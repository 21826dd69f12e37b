//! Structural outline of HCL native syntax.
//!
//! Responsibilities:
//! - Locate blocks and attributes (with byte spans) on the `hcl-edit` parse tree.
//! - Provide text edit helpers that insert new lines next to located items while
//!   leaving comments and blank lines untouched.
//! - Realign `=` signs of the attribute group an insertion joins, and keep the
//!   file's line ending on inserted lines.
//! - Check whether a text is well-formed HCL.

mod edit;
mod error;
mod outline;

pub use edit::{
    INDENT_UNIT, align_group, expand_block, indent_at, inner_indent, insert_before_attribute,
    insert_before_close, is_line_leading, line_ending, line_start, quote,
};
pub use error::OutlineError;
pub use outline::{Attribute, Block, Body, Item, parse};

/// Returns the `hcl-edit` parse error for `src`, if any.
pub fn syntax_error(src: &str) -> Option<String> {
    hcl_edit::parser::parse_body(src).err().map(|e| e.to_string())
}
