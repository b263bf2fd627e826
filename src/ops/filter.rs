use chrono::{DateTime, Utc};

use crate::model::todo::TodoRecord;
use crate::parse::resolve_relative_dates;

/// An AND-filter: a record is visible iff its raw text contains every term.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Filter {
    terms: Vec<String>,
}

impl Filter {
    /// Build a filter from an expression (without the trigger character).
    /// Relative dates in the expression are resolved first, so `due:tomorrow`
    /// matches what an entry with `due:tomorrow` was stored as.
    pub fn parse(expression: &str, now: DateTime<Utc>) -> Self {
        let resolved = resolve_relative_dates(expression, now);
        Filter {
            terms: resolved.split_whitespace().map(str::to_string).collect(),
        }
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    /// Case-sensitive substring match on every term
    pub fn matches(&self, record: &TodoRecord) -> bool {
        self.terms.iter().all(|t| record.raw_text().contains(t.as_str()))
    }
}

/// Indices of records visible under `filter` (all of them when there's none)
pub fn visible_indices(records: &[TodoRecord], filter: Option<&Filter>) -> Vec<usize> {
    records
        .iter()
        .enumerate()
        .filter(|(_, r)| filter.is_none_or(|f| f.matches(r)))
        .map(|(i, _)| i)
        .collect()
}
