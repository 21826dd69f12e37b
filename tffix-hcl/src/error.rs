use thiserror::Error;

/// A position-aware outline failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} at line {line}, column {column}")]
pub struct OutlineError {
    /// Byte offset into the source.
    pub offset: usize,
    pub line: usize,
    pub column: usize,
    pub message: String,
}

impl OutlineError {
    pub(crate) fn new(src: &str, offset: usize, message: impl Into<String>) -> Self {
        let offset = offset.min(src.len());
        let before = &src.as_bytes()[..offset];
        let line = before.iter().filter(|b| **b == b'\n').count() + 1;
        let line_begin = before
            .iter()
            .rposition(|b| *b == b'\n')
            .map_or(0, |i| i + 1);
        Self {
            offset,
            line,
            column: offset - line_begin + 1,
            message: message.into(),
        }
    }

    pub(crate) fn from_parser(err: &hcl_edit::parser::Error) -> Self {
        let location = err.location();
        Self {
            offset: location.offset(),
            line: location.line(),
            column: location.column(),
            message: err.message().to_string(),
        }
    }
}
