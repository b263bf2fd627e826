use chrono::NaiveDate;
use indexmap::IndexMap;

use crate::parse::todo_parser::parse_record;

/// One task line and everything derived from it.
///
/// The raw text is the only persisted state. The other fields are filled in by
/// the parser and can't be set independently, so they always agree with
/// `raw_text`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoRecord {
    pub(crate) raw_text: String,
    pub(crate) completed: bool,
    pub(crate) priority: Option<char>,
    pub(crate) due: Option<NaiveDate>,
    pub(crate) context: Option<String>,
    pub(crate) projects: Vec<String>,
    pub(crate) attributes: IndexMap<String, String>,
}

impl TodoRecord {
    /// Parse a task line
    pub fn parse(raw: &str) -> Self {
        parse_record(raw)
    }

    /// Replace the text, re-deriving every field
    pub fn set_text(&mut self, raw: &str) {
        *self = parse_record(raw);
    }

    pub fn raw_text(&self) -> &str {
        &self.raw_text
    }

    /// Line starts with `x `
    pub fn is_completed(&self) -> bool {
        self.completed
    }

    /// Priority letter from the first `(A)` marker
    pub fn priority(&self) -> Option<char> {
        self.priority
    }

    /// Date from the first `due:YYYY-MM-DD` marker, if it is a real date
    pub fn due(&self) -> Option<NaiveDate> {
        self.due
    }

    /// First `@context` token, including the `@`
    pub fn context(&self) -> Option<&str> {
        self.context.as_deref()
    }

    /// All `+project` tokens, including the `+`
    pub fn projects(&self) -> &[String] {
        &self.projects
    }

    /// `key:value` pairs in order of first appearance
    pub fn attributes(&self) -> &IndexMap<String, String> {
        &self.attributes
    }
}
