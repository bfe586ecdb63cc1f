pub mod line;
pub mod source;
pub mod utils;

use std::iter::Enumerate;
use std::str::Split;

use tracing::trace;

pub use line::{Assignment, Line, SpannedLine};
pub use source::{LexerError, LexerResult, Span};

use crate::utils::{is_comment, section_name};

/// Lazily classifies the lines of an INI document.
///
/// Blank lines, full-line `#` comments and lines that hold neither a section
/// header nor a `=` are skipped. Inline comments are not recognized.
#[derive(Debug, Clone)]
pub struct Scanner<'a> {
    lines: Enumerate<Split<'a, char>>,
    offset: usize,
}

impl<'a> Scanner<'a> {
    #[must_use]
    pub fn new(input: &'a str) -> Self {
        Self {
            lines: input.split('\n').enumerate(),
            offset: 0,
        }
    }
}

impl<'a> Iterator for Scanner<'a> {
    type Item = LexerResult<SpannedLine<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        for (index, raw) in self.lines.by_ref() {
            let start = self.offset;
            self.offset += raw.len() + 1;

            let number = index + 1;
            let text = raw.trim();
            if text.is_empty() || is_comment(text) {
                continue;
            }

            let indent = raw.len() - raw.trim_start().len();
            let span = start + indent..start + indent + text.len();

            let line = if text.starts_with('[') {
                match section_name(text) {
                    Some(name) => Line::Section(name),
                    None => {
                        return Some(Err(LexerError::MalformedSection { line: number, span }));
                    }
                }
            } else if text.contains('=') {
                Line::Item(text)
            } else {
                trace!(line = number, "skipping line without `=`");
                continue;
            };

            trace!(line = number, kind = ?line, "scanned");
            return Some(Ok(SpannedLine { number, span, line }));
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(input: &str) -> Vec<LexerResult<SpannedLine<'_>>> {
        Scanner::new(input).collect()
    }

    fn lines(input: &str) -> Vec<(usize, Line<'_>)> {
        Scanner::new(input)
            .map(|line| line.map(|spanned| (spanned.number, spanned.line)))
            .collect::<LexerResult<_>>()
            .expect("hardcoded input should scan")
    }

    #[test]
    fn test_sections_and_items() {
        let input = "[mysql]\nhost = 127.0.0.1\nport=3306\n\n[server]\nip=0.0.0.0";
        assert_eq!(
            lines(input),
            &[
                (1, Line::Section("mysql")),
                (2, Line::Item("host = 127.0.0.1")),
                (3, Line::Item("port=3306")),
                (5, Line::Section("server")),
                (6, Line::Item("ip=0.0.0.0")),
            ]
        );
    }

    #[test]
    fn test_comments_and_blank_lines_are_skipped() {
        let input = "# leading comment\n\n   # indented comment\n\t\n[a]\nk=v";
        assert_eq!(lines(input), &[(5, Line::Section("a")), (6, Line::Item("k=v"))]);
    }

    #[test]
    fn test_inline_hash_is_not_a_comment() {
        let input = "k = v # not a comment";
        assert_eq!(lines(input), &[(1, Line::Item("k = v # not a comment"))]);
    }

    #[test]
    fn test_lines_without_equals_are_ignored() {
        let input = "[a]\njust some text\nk=v";
        assert_eq!(lines(input), &[(1, Line::Section("a")), (3, Line::Item("k=v"))]);
    }

    #[test]
    fn test_section_name_is_trimmed() {
        assert_eq!(lines("[  spaced name  ]"), &[(1, Line::Section("spaced name"))]);
    }

    #[test]
    fn test_crlf_line_endings() {
        let input = "[a]\r\nk = v\r\n";
        assert_eq!(lines(input), &[(1, Line::Section("a")), (2, Line::Item("k = v"))]);
    }

    #[test]
    fn test_malformed_sections() {
        for header in ["[", "[]", "[ ]", "[open", "[a]trailing"] {
            let input = format!("# comment\n\n{header}\nk=v");
            let scanned = scan(&input);
            assert!(
                matches!(
                    scanned.first(),
                    Some(Err(LexerError::MalformedSection { line: 3, .. }))
                ),
                "{header:?} should be rejected on line 3, got {scanned:?}"
            );
        }
    }

    #[test]
    fn test_doubled_closing_bracket_is_malformed() {
        let scanned = scan("[a]]\nk=v");
        assert!(
            matches!(
                scanned.first(),
                Some(Err(LexerError::MalformedSection { line: 1, .. }))
            ),
            "got {scanned:?}"
        );
    }

    #[test]
    fn test_error_message_names_line() {
        let err = scan("\n\n\n[]").remove(0).unwrap_err();
        assert_eq!(err.line(), 4);
        assert_eq!(err.to_string(), "malformed section header in line 4");
    }

    #[test]
    fn test_spans_point_at_trimmed_text() {
        let input = "[a]\n  key = value  \n";
        let scanned = lines_with_spans(input);
        assert_eq!(&input[scanned[0].clone()], "[a]");
        assert_eq!(&input[scanned[1].clone()], "key = value");
    }

    fn lines_with_spans(input: &str) -> Vec<Span> {
        Scanner::new(input)
            .map(|line| line.expect("hardcoded input should scan").span)
            .collect()
    }

    #[test]
    fn test_split_every_equals() {
        assert_eq!(
            Assignment::EveryEquals.split(" host = 127.0.0.1 "),
            ("host".to_owned(), "127.0.0.1".to_owned())
        );
        assert_eq!(
            Assignment::EveryEquals.split("token = a=b"),
            ("token".to_owned(), "a".to_owned())
        );
    }

    #[test]
    fn test_split_first_equals() {
        assert_eq!(
            Assignment::FirstEquals.split("token = a=b=c"),
            ("token".to_owned(), "a=b=c".to_owned())
        );
    }

    #[test]
    fn test_split_removes_interior_whitespace() {
        assert_eq!(
            Assignment::default().split("na me =\tmy value"),
            ("name".to_owned(), "myvalue".to_owned())
        );
    }

    #[test]
    fn test_split_empty_key() {
        assert_eq!(
            Assignment::default().split(" = 42"),
            (String::new(), "42".to_owned())
        );
    }
}
