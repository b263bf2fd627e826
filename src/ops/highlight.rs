use std::ops::Range;

use crate::parse::patterns::{COMPLETED, CONTEXT, KEY_VALUE, PRIORITY, PROJECT};

/// Presentation category of a recognized token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Completed,
    KeyValue,
    Project,
    Context,
    Priority,
}

impl Category {
    /// CSS-style class used by the markup renderer
    pub fn class_name(self) -> &'static str {
        match self {
            Category::Completed => "color-completed",
            Category::KeyValue => "color-kvpair",
            Category::Project => "color-project",
            Category::Context => "color-context",
            Category::Priority => "color-priority",
        }
    }
}

/// A highlighted byte range of the source text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub range: Range<usize>,
    pub category: Category,
}

/// Highlighting for one line. `completed` wraps the whole line; `tokens` are
/// disjoint and sorted by position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Highlight {
    pub completed: bool,
    pub tokens: Vec<Token>,
}

/// A contiguous piece of the line, with its category if it is a token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment<'a> {
    pub text: &'a str,
    pub category: Option<Category>,
}

/// Find the tokens of a line.
///
/// Patterns run in a fixed order (key:value, project, context, priority) and a
/// match overlapping an earlier token is dropped, so nothing is wrapped twice.
/// Only the first priority marker is highlighted.
pub fn highlight(text: &str) -> Highlight {
    let mut tokens: Vec<Token> = Vec::new();

    for (re, category) in [
        (&*KEY_VALUE, Category::KeyValue),
        (&*PROJECT, Category::Project),
        (&*CONTEXT, Category::Context),
    ] {
        for m in re.find_iter(text) {
            claim(&mut tokens, m.range(), category);
        }
    }
    if let Some(m) = PRIORITY.find(text) {
        claim(&mut tokens, m.range(), Category::Priority);
    }

    tokens.sort_by_key(|t| t.range.start);
    Highlight {
        completed: COMPLETED.is_match(text),
        tokens,
    }
}

fn claim(tokens: &mut Vec<Token>, range: Range<usize>, category: Category) {
    let overlaps = tokens
        .iter()
        .any(|t| t.range.start < range.end && range.start < t.range.end);
    if !overlaps {
        tokens.push(Token { range, category });
    }
}

/// Split a line into plain and token segments, covering all of it.
pub fn segments(text: &str) -> Vec<Segment<'_>> {
    let hl = highlight(text);
    let mut out = Vec::new();
    let mut last_end = 0;
    for token in &hl.tokens {
        if token.range.start > last_end {
            out.push(Segment {
                text: &text[last_end..token.range.start],
                category: None,
            });
        }
        out.push(Segment {
            text: &text[token.range.clone()],
            category: Some(token.category),
        });
        last_end = token.range.end;
    }
    if last_end < text.len() {
        out.push(Segment {
            text: &text[last_end..],
            category: None,
        });
    }
    out
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

/// Render a line as `<span class="color-...">` markup.
pub fn to_markup(text: &str) -> String {
    let completed = COMPLETED.is_match(text);
    let mut out = String::new();
    if completed {
        out.push_str(&format!("<span class=\"{}\">", Category::Completed.class_name()));
    }
    for seg in segments(text) {
        match seg.category {
            Some(cat) => out.push_str(&format!(
                "<span class=\"{}\">{}</span>",
                cat.class_name(),
                escape(seg.text)
            )),
            None => out.push_str(&escape(seg.text)),
        }
    }
    if completed {
        out.push_str("</span>");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn categories(text: &str) -> Vec<(&str, Category)> {
        segments(text)
            .into_iter()
            .filter_map(|s| s.category.map(|c| (s.text, c)))
            .collect()
    }

    #[test]
    fn test_tokens_in_position_order() {
        assert_eq!(
            categories("(A) call +garage @phone due:2024-01-01"),
            vec![
                ("(A)", Category::Priority),
                ("+garage", Category::Project),
                ("@phone", Category::Context),
                ("due:2024-01-01", Category::KeyValue),
            ]
        );
    }

    #[test]
    fn test_segments_cover_text() {
        for text in ["", "plain", "x (B) a +p @c k:v tail", "@a@b", "ünïcödé @ctx"] {
            let joined: String = segments(text).iter().map(|s| s.text).collect();
            assert_eq!(joined, text);
        }
    }

    #[test]
    fn test_only_first_priority() {
        let cats = categories("(A) then (B)");
        assert_eq!(cats, vec![("(A)", Category::Priority)]);
    }

    #[test]
    fn test_completed_flag() {
        assert!(highlight("x done").completed);
        assert!(!highlight("not x done").completed);
        assert!(highlight("x done").tokens.is_empty());
    }

    #[test]
    fn test_overlapping_match_is_not_wrapped_twice() {
        // `p:+x` is not a key:value (the value can't start with `+`), so the
        // project wins; `k:v@c` splits into a pair and a context
        assert_eq!(
            categories("p:+x k:v@c"),
            vec![("+x", Category::Project), ("k:v", Category::KeyValue), ("@c", Category::Context)]
        );
    }

    #[test]
    fn test_markup() {
        assert_eq!(
            to_markup("(A) fix <b> @home"),
            "<span class=\"color-priority\">(A)</span> fix &lt;b&gt; <span class=\"color-context\">@home</span>"
        );
        assert_eq!(
            to_markup("x done +p"),
            "<span class=\"color-completed\">x done <span class=\"color-project\">+p</span></span>"
        );
    }
}
