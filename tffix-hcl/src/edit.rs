//! Text edits anchored on outline spans.
//!
//! Every helper returns a new string; callers re-outline before the next edit.
//! Inserted text is written with `\n` and converted to the file's line ending.

use crate::outline::{Attribute, Block, Body, Item};
use std::ops::Range;

/// One level of indentation, as written by `terraform fmt`.
pub const INDENT_UNIT: &str = "  ";

/// Line ending used by `src`: `\r\n` when its first line ends that way.
pub fn line_ending(src: &str) -> &'static str {
    match src.find('\n') {
        Some(i) if src[..i].ends_with('\r') => "\r\n",
        _ => "\n",
    }
}

/// Offset of the first byte of the line containing `pos`.
pub fn line_start(src: &str, pos: usize) -> usize {
    src[..pos].rfind('\n').map_or(0, |i| i + 1)
}

/// Leading whitespace of the line containing `pos`.
pub fn indent_at(src: &str, pos: usize) -> &str {
    let start = line_start(src, pos);
    let line = &src[start..];
    let width = line.len() - line.trim_start_matches([' ', '\t']).len();
    &line[..width]
}

/// True when only spaces or tabs precede `pos` on its line.
pub fn is_line_leading(src: &str, pos: usize) -> bool {
    src[line_start(src, pos)..pos]
        .bytes()
        .all(|b| b == b' ' || b == b'\t')
}

/// Indentation for new items inside `block`: that of its first item, or the
/// block's own indentation plus one level when it has none on its own line.
pub fn inner_indent(src: &str, block: &Block) -> String {
    match block.body.items.first() {
        Some(item) if is_line_leading(src, item.span().start) => {
            indent_at(src, item.span().start).to_string()
        }
        _ => format!("{}{INDENT_UNIT}", indent_at(src, block.span.start)),
    }
}

/// Rewrite a block whose braces share a line so that its content and closing
/// brace each get their own line.
pub fn expand_block(src: &str, block: &Block) -> String {
    let outer = indent_at(src, block.span.start);
    let content = src[block.open + 1..block.close].trim();

    let mut lines = String::from("\n");
    if !content.is_empty() {
        lines.push_str(&format!("{outer}{INDENT_UNIT}{content}\n"));
    }
    lines.push_str(outer);
    replace(src, block.open + 1..block.close, &lines)
}

/// Insert `lines` (indented, newline-terminated) just before the closing
/// brace of `block`.
pub fn insert_before_close(src: &str, block: &Block, lines: &str) -> String {
    if is_line_leading(src, block.close) {
        let at = line_start(src, block.close);
        replace(src, at..at, lines)
    } else {
        let outer = indent_at(src, block.span.start);
        let content_end = src[..block.close].trim_end_matches([' ', '\t']).len();
        replace(src, content_end..block.close, &format!("\n{lines}{outer}"))
    }
}

/// Insert `line` (no indentation, no newline) on its own line just before
/// the line holding `anchor`, reusing the anchor's indentation.
pub fn insert_before_attribute(src: &str, anchor: &Attribute, line: &str) -> String {
    let indent = indent_at(src, anchor.span.start);
    if is_line_leading(src, anchor.span.start) {
        let at = line_start(src, anchor.span.start);
        replace(src, at..at, &format!("{indent}{line}\n"))
    } else {
        let at = anchor.span.start;
        replace(src, at..at, &format!("{line}\n{indent}"))
    }
}

/// Pad the keys of the attribute group holding `key` so that their `=` signs
/// line up one column after the widest key, as `terraform fmt` does.
///
/// A group is a run of attributes on consecutive lines, each starting its
/// line; a blank line, a comment line, a nested block or a multi-line value
/// ends it.
pub fn align_group(src: &str, body: &Body, key: &str) -> String {
    let Some(group) = attribute_groups(src, body)
        .into_iter()
        .find(|group| group.iter().any(|attr| attr.key == key))
    else {
        return src.to_string();
    };

    let width = group.iter().map(|attr| attr.key.chars().count()).max().unwrap_or(0);
    let mut out = src.to_string();
    for attr in group.iter().rev() {
        let key_end = attr.span.start + attr.key.len();
        if !src[key_end..attr.eq].bytes().all(|b| b == b' ' || b == b'\t') {
            continue;
        }
        let pad = " ".repeat(width - attr.key.chars().count() + 1);
        out.replace_range(key_end..attr.eq, &pad);
    }
    out
}

fn attribute_groups<'a>(src: &str, body: &'a Body) -> Vec<Vec<&'a Attribute>> {
    let mut groups: Vec<Vec<&Attribute>> = Vec::new();
    let mut current: Vec<&Attribute> = Vec::new();

    for item in &body.items {
        let Item::Attribute(attr) = item else {
            groups.push(std::mem::take(&mut current));
            continue;
        };
        let eligible = is_line_leading(src, attr.span.start)
            && !src[attr.span.start..attr.eq].contains('\n');
        let chained = current.last().is_some_and(|prev| {
            !src[prev.span.clone()].contains('\n')
                && src[prev.span.end..attr.span.start].matches('\n').count() == 1
        });
        if !(eligible && chained) {
            groups.push(std::mem::take(&mut current));
        }
        if eligible {
            current.push(attr);
        }
    }
    groups.push(current);
    groups.retain(|group| !group.is_empty());
    groups
}

/// Render `text` as an HCL quoted string literal.
pub fn quote(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '$' | '%' if chars.peek() == Some(&'{') => {
                out.push(c);
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

fn replace(src: &str, range: Range<usize>, text: &str) -> String {
    let text = text.replace('\n', line_ending(src));
    let mut out = String::with_capacity(src.len() + text.len());
    out.push_str(&src[..range.start]);
    out.push_str(&text);
    out.push_str(&src[range.end..]);
    out
}
