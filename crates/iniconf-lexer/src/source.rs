use std::ops::Range;

use thiserror::Error;

/// Byte range of a line inside the scanned input.
pub type Span = Range<usize>;

pub type LexerResult<T> = Result<T, LexerError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum LexerError {
    /// A line opened with `[` but is not `[name]` with a non-empty name.
    #[error("malformed section header in line {line}")]
    MalformedSection { line: usize, span: Span },
}

impl LexerError {
    #[must_use]
    pub fn line(&self) -> usize {
        match self {
            Self::MalformedSection { line, .. } => *line,
        }
    }

    #[must_use]
    pub fn span(&self) -> &Span {
        match self {
            Self::MalformedSection { span, .. } => span,
        }
    }
}
