use crate::source::Span;

/// A classified, non-blank, non-comment line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line<'a> {
    /// `[name]`, holding the trimmed name.
    Section(&'a str),
    /// Any line containing `=`, holding the trimmed raw text. Splitting into
    /// key and value is left to the consumer, see [`Assignment::split`].
    Item(&'a str),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpannedLine<'a> {
    /// 1-based line number in the input.
    pub number: usize,
    pub span: Span,
    pub line: Line<'a>,
}

/// How an item line is divided into key and value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Assignment {
    /// Split on every `=`: the key is the text before the first one and the
    /// value the text between the first and the second. Anything after a
    /// second `=` is dropped.
    #[default]
    EveryEquals,
    /// Split on the first `=` only; the value keeps any further `=`.
    FirstEquals,
}

impl Assignment {
    /// Removes every whitespace character from `raw` and splits it into `(key, value)`.
    #[must_use]
    pub fn split(self, raw: &str) -> (String, String) {
        let compact = raw
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>();

        match self {
            Self::EveryEquals => {
                let mut parts = compact.split('=');
                let key = parts.next().unwrap_or_default();
                let value = parts.next().unwrap_or_default();
                (key.to_owned(), value.to_owned())
            }
            Self::FirstEquals => match compact.split_once('=') {
                Some((key, value)) => (key.to_owned(), value.to_owned()),
                None => (compact, String::new()),
            },
        }
    }
}
