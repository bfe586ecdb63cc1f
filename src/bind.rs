use crate::{
    error::{Error, Result},
    options::Options,
    value::Value,
};
use hashbrown::HashSet;
use iniconf_lexer::{Assignment, Line, Scanner, Span, SpannedLine};
use tracing::{debug, trace};

/// One `key=value` line, already split and checked for an empty key.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Item {
    pub(crate) key: String,
    pub(crate) value: String,
    pub(crate) line: usize,
    pub(crate) span: Span,
}

impl Item {
    fn new(raw: &str, spanned: SpannedLine<'_>, assignment: Assignment) -> Result<Self> {
        let (key, value) = assignment.split(raw);
        if key.is_empty() {
            return Err(Error::MalformedItem {
                line: spanned.number,
                span: spanned.span,
            });
        }

        Ok(Self {
            key,
            value,
            line: spanned.number,
            span: spanned.span,
        })
    }

    pub(crate) fn conversion(&self, expected: &'static str) -> Error {
        Error::TypeConversion {
            key: self.key.clone(),
            value: self.value.clone(),
            expected,
            line: self.line,
            span: self.span.clone(),
        }
    }

    pub(crate) fn unsupported(self, ty: &'static str) -> Error {
        Error::UnsupportedFieldType {
            ty,
            key: self.key,
            line: self.line,
            span: self.span,
        }
    }
}

/// Applies the lines of a document, in order, to the sections of a captured
/// record. Stops at the first error; writes made before it are kept.
pub(crate) struct Binder<'a> {
    sections: &'a mut [(&'static str, Value)],
    options: Options,
    /// Index of the section selected by the last matched header.
    active: Option<usize>,
}

impl<'a> Binder<'a> {
    pub(crate) fn new(sections: &'a mut [(&'static str, Value)], options: Options) -> Self {
        Self {
            sections,
            options,
            active: None,
        }
    }

    pub(crate) fn bind(&mut self, input: &str) -> Result<()> {
        for next in Scanner::new(input) {
            let spanned = next?;
            match spanned.line {
                Line::Section(name) => self.enter(name, spanned.number),
                Line::Item(raw) => {
                    let item = Item::new(raw, spanned, self.options.assignment)?;
                    self.assign(item)?;
                }
            }
        }

        Ok(())
    }

    fn enter(&mut self, name: &str, line: usize) {
        self.active = self.sections.iter().position(|(tag, _)| *tag == name);
        match self.active {
            Some(_) => debug!(line, section = name, "entering section"),
            None => debug!(line, section = name, "skipping unknown section"),
        }
    }

    fn assign(&mut self, item: Item) -> Result<()> {
        let Some(index) = self.active else {
            return Err(Error::UnresolvedSection {
                key: item.key,
                line: item.line,
                span: item.span,
            });
        };

        let (section, value) = &mut self.sections[index];
        let Value::Struct { fields, .. } = value else {
            return Err(Error::SectionType {
                field: *section,
                line: item.line,
                span: item.span,
            });
        };

        let Some((_, slot)) = fields.iter_mut().find(|(tag, _)| *tag == item.key) else {
            debug!(line = item.line, key = %item.key, "ignoring unknown key");
            return Ok(());
        };

        trace!(
            line = item.line,
            section = *section,
            key = %item.key,
            value = %item.value,
            "binding item"
        );
        *slot = convert(slot, item)?;
        Ok(())
    }
}

/// Converts the item's text to the shape of the value it replaces.
fn convert(current: &Value, item: Item) -> Result<Value> {
    match current {
        Value::String(_) => Ok(Value::String(item.value)),
        Value::Integer(_, width) => width
            .parse(&item.value)
            .map(|value| Value::Integer(value, *width))
            .ok_or_else(|| item.conversion("int")),
        Value::Float(_) => item
            .value
            .parse()
            .map(Value::Float)
            .map_err(|_| item.conversion("float")),
        Value::Null | Value::Raw(_) => Ok(Value::Raw(item)),
        other => Err(item.unsupported(other.kind())),
    }
}

/// Fails on the first tag declared twice on `record` or on one of its
/// section records.
pub(crate) fn check_tags(record: &'static str, sections: &[(&'static str, Value)]) -> Result<()> {
    first_duplicate(record, sections)?;
    for (_, section) in sections {
        if let Value::Struct { name, fields } = section {
            first_duplicate(*name, fields)?;
        }
    }

    Ok(())
}

fn first_duplicate(record: &'static str, fields: &[(&'static str, Value)]) -> Result<()> {
    let mut seen = HashSet::with_capacity(fields.len());
    match fields.iter().map(|(tag, _)| *tag).find(|tag| !seen.insert(*tag)) {
        Some(tag) => Err(Error::DuplicateTag { tag, record }),
        None => Ok(()),
    }
}
