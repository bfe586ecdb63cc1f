use ariadne::{Color, Config, IndexType, Label, Report, ReportKind, Source};
use iniconf_lexer::{LexerError, Span};
use serde::{de, ser};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error("invalid target: expected a struct whose fields are sections, found {found}")]
    InvalidTarget { found: &'static str },

    #[error("malformed section header in line {line}")]
    MalformedSection { line: usize, span: Span },

    #[error("malformed item in line {line}: empty key")]
    MalformedItem { line: usize, span: Span },

    #[error("unknown or missing section for item `{key}` in line {line}")]
    UnresolvedSection { key: String, line: usize, span: Span },

    #[error("field `{field}` must be a struct to hold section [{field}] (line {line})")]
    SectionType {
        field: &'static str,
        line: usize,
        span: Span,
    },

    #[error("invalid value `{value}` for `{key}` in line {line} (need {expected})")]
    TypeConversion {
        key: String,
        value: String,
        expected: &'static str,
        line: usize,
        span: Span,
    },

    #[error("unsupported type {ty} for `{key}` in line {line}")]
    UnsupportedFieldType {
        ty: &'static str,
        key: String,
        line: usize,
        span: Span,
    },

    #[error("duplicate tag `{tag}` declared on `{record}`")]
    DuplicateTag {
        tag: &'static str,
        record: &'static str,
    },

    #[error("{0}")]
    Custom(String),
}

impl Error {
    /// 1-based line the error was raised on, if it is tied to one.
    #[must_use]
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::MalformedSection { line, .. }
            | Self::MalformedItem { line, .. }
            | Self::UnresolvedSection { line, .. }
            | Self::SectionType { line, .. }
            | Self::TypeConversion { line, .. }
            | Self::UnsupportedFieldType { line, .. } => Some(*line),
            Self::InvalidTarget { .. } | Self::DuplicateTag { .. } | Self::Custom(_) => None,
        }
    }

    #[must_use]
    pub fn span(&self) -> Option<&Span> {
        match self {
            Self::MalformedSection { span, .. }
            | Self::MalformedItem { span, .. }
            | Self::UnresolvedSection { span, .. }
            | Self::SectionType { span, .. }
            | Self::TypeConversion { span, .. }
            | Self::UnsupportedFieldType { span, .. } => Some(span),
            Self::InvalidTarget { .. } | Self::DuplicateTag { .. } | Self::Custom(_) => None,
        }
    }

    /// Renders the error against the `source` it came from, pointing at the
    /// offending line. Errors without a location render as their message.
    #[must_use]
    pub fn report(&self, source: &str) -> String {
        let Some(span) = self.span().cloned() else {
            return self.to_string();
        };

        let mut out = Vec::new();
        let written = Report::build(ReportKind::Error, span.clone())
            .with_config(
                Config::default()
                    .with_index_type(IndexType::Byte)
                    .with_color(false),
            )
            .with_message(self)
            .with_label(
                Label::new(span)
                    .with_message(self.label())
                    .with_color(Color::BrightRed),
            )
            .finish()
            .write(Source::from(source), &mut out);

        match written {
            Ok(()) => String::from_utf8_lossy(&out).into_owned(),
            Err(_) => self.to_string(),
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::MalformedSection { .. } => "expected `[name]`",
            Self::MalformedItem { .. } => "expected `key = value`",
            Self::UnresolvedSection { .. } => "no section is active here",
            Self::SectionType { .. } => "item bound to a non-struct section",
            Self::TypeConversion { .. } => "cannot convert this value",
            Self::UnsupportedFieldType { .. } => "field type cannot be read from text",
            _ => "here",
        }
    }
}

impl From<LexerError> for Error {
    fn from(err: LexerError) -> Self {
        match err {
            LexerError::MalformedSection { line, span } => Error::MalformedSection { line, span },
            other => Error::Custom(other.to_string()),
        }
    }
}

impl de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

impl ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
