//! Span outline of an HCL body.
//!
//! The tree comes from `hcl_edit::parser::parse_body`; only the byte offsets
//! needed for textual insertion are kept (item spans, braces, `=` signs).

use crate::error::OutlineError;
use hcl_edit::Span;
use hcl_edit::structure::{self as hcl, Structure};
use std::ops::Range;

/// `key = value` inside a body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub key: String,
    /// From the first byte of the key through the last byte of the value.
    pub span: Range<usize>,
    /// Offset of the `=` sign.
    pub eq: usize,
}

/// `ident "label" ... { body }`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub ident: String,
    pub labels: Vec<String>,
    /// From the first byte of the identifier through the closing brace.
    pub span: Range<usize>,
    /// Offset of the opening brace.
    pub open: usize,
    /// Offset of the closing brace.
    pub close: usize,
    pub body: Body,
}

impl Block {
    /// True when both braces sit on the same line.
    pub fn is_single_line(&self, src: &str) -> bool {
        !src[self.open..self.close].contains('\n')
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Item {
    Attribute(Attribute),
    Block(Block),
}

impl Item {
    pub fn span(&self) -> &Range<usize> {
        match self {
            Item::Attribute(attr) => &attr.span,
            Item::Block(block) => &block.span,
        }
    }
}

/// Items of a file or a block body, in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Body {
    pub items: Vec<Item>,
}

impl Body {
    pub fn attributes(&self) -> impl Iterator<Item = &Attribute> {
        self.items.iter().filter_map(|item| match item {
            Item::Attribute(attr) => Some(attr),
            Item::Block(_) => None,
        })
    }

    pub fn blocks(&self) -> impl Iterator<Item = &Block> {
        self.items.iter().filter_map(|item| match item {
            Item::Block(block) => Some(block),
            Item::Attribute(_) => None,
        })
    }

    pub fn attribute(&self, key: &str) -> Option<&Attribute> {
        self.attributes().find(|attr| attr.key == key)
    }

    pub fn has_attribute(&self, key: &str) -> bool {
        self.attribute(key).is_some()
    }

    /// First block with exactly this identifier and these labels.
    pub fn block(&self, ident: &str, labels: &[&str]) -> Option<&Block> {
        self.blocks().find(|block| {
            block.ident == ident
                && block.labels.len() == labels.len()
                && block.labels.iter().zip(labels).all(|(a, b)| a == b)
        })
    }

    /// The attribute among `keys` that appears first in the source.
    pub fn first_attribute_of(&self, keys: &[&str]) -> Option<&Attribute> {
        self.attributes()
            .find(|attr| keys.contains(&attr.key.as_str()))
    }
}

/// Outline a whole file.
pub fn parse(src: &str) -> Result<Body, OutlineError> {
    let body = hcl_edit::parser::parse_body(src).map_err(|e| OutlineError::from_parser(&e))?;
    outline_body(src, &body)
}

fn outline_body(src: &str, body: &hcl::Body) -> Result<Body, OutlineError> {
    let items = body
        .iter()
        .map(|structure| match structure {
            Structure::Attribute(attr) => outline_attribute(src, attr).map(Item::Attribute),
            Structure::Block(block) => outline_block(src, block).map(Item::Block),
        })
        .collect::<Result<_, _>>()?;
    Ok(Body { items })
}

fn outline_attribute(src: &str, attr: &hcl::Attribute) -> Result<Attribute, OutlineError> {
    let span = source_span(src, attr.span(), "attribute")?;
    let key_end = source_span(src, attr.key.span(), "attribute key")?.end;
    let eq = skip_inline_trivia(src, key_end);
    if src.as_bytes().get(eq) != Some(&b'=') {
        return Err(OutlineError::new(src, key_end, "expected `=` after attribute key"));
    }
    Ok(Attribute {
        key: attr.key.value().as_str().to_string(),
        span: trim_end(src, span),
        eq,
    })
}

fn outline_block(src: &str, block: &hcl::Block) -> Result<Block, OutlineError> {
    let span = source_span(src, block.span(), "block")?;
    let header_end = match block.labels.last() {
        Some(label) => source_span(src, label.span(), "block label")?.end,
        None => source_span(src, block.ident.span(), "block identifier")?.end,
    };
    let open = skip_inline_trivia(src, header_end);
    let close = span.end.saturating_sub(1);
    let bytes = src.as_bytes();
    if open >= close || bytes.get(open) != Some(&b'{') || bytes.get(close) != Some(&b'}') {
        return Err(OutlineError::new(src, span.start, "block braces not found"));
    }

    Ok(Block {
        ident: block.ident.value().as_str().to_string(),
        labels: block
            .labels
            .iter()
            .map(|label| label.as_str().to_string())
            .collect(),
        span,
        open,
        close,
        body: outline_body(src, &block.body)?,
    })
}

/// Spans are always set by the parser; a missing or out-of-range one is
/// reported rather than trusted.
fn source_span(
    src: &str,
    span: Option<Range<usize>>,
    what: &str,
) -> Result<Range<usize>, OutlineError> {
    span.filter(|s| s.start <= s.end && s.end <= src.len())
        .ok_or_else(|| OutlineError::new(src, 0, format!("{what} without source span")))
}

/// Skip spaces, tabs and `/* */` comments on the current line.
fn skip_inline_trivia(src: &str, mut pos: usize) -> usize {
    let bytes = src.as_bytes();
    loop {
        match bytes.get(pos) {
            Some(b' ' | b'\t') => pos += 1,
            Some(b'/') if bytes.get(pos + 1) == Some(&b'*') => match src[pos + 2..].find("*/") {
                Some(end) => pos += end + 4,
                None => return pos,
            },
            _ => return pos,
        }
    }
}

fn trim_end(src: &str, span: Range<usize>) -> Range<usize> {
    let trimmed = src[span.clone()].trim_end_matches([' ', '\t', '\r', '\n']);
    span.start..span.start + trimmed.len()
}
