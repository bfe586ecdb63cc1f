use iniconf_lexer::Assignment;

/// Knobs for [`crate::de::from_str_with_options`] and friends.
///
/// The default reproduces the permissive behavior: values end at the second
/// `=` and duplicate tags resolve to the first declaration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Options {
    pub assignment: Assignment,
    /// Reject records that declare the same tag on two fields.
    pub strict_tags: bool,
}

impl Options {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn assignment(mut self, assignment: Assignment) -> Self {
        self.assignment = assignment;
        self
    }

    #[must_use]
    pub fn strict_tags(mut self, strict: bool) -> Self {
        self.strict_tags = strict;
        self
    }
}
