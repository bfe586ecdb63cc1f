use winnow::{Parser, combinator::delimited, token::take_till};

/// Extracts the trimmed name of a `[name]` header. Returns `None` when the
/// brackets are unbalanced, text follows the closing `]`, or the name is blank.
pub fn section_name(text: &str) -> Option<&str> {
    let name = header.parse(text).ok()?.trim();
    (!name.is_empty()).then_some(name)
}

fn header<'i>(input: &mut &'i str) -> Result<&'i str, ()> {
    delimited('[', take_till(0.., ']'), ']').parse_next(input)
}

pub fn is_comment(text: &str) -> bool {
    text.starts_with('#')
}
