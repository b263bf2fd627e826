use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Display width in terminal cells. Tabs count as 4 cells.
pub fn display_width(s: &str) -> usize {
    s.graphemes(true).map(grapheme_display_width).sum()
}

/// Display width of a grapheme cluster.
fn grapheme_display_width(g: &str) -> usize {
    if g == "\t" {
        return 4;
    }
    UnicodeWidthStr::width(g)
}

/// Truncate a string to fit within `max_cells` terminal cells, appending `…` if truncated.
pub fn truncate_to_width(s: &str, max_cells: usize) -> String {
    if display_width(s) <= max_cells {
        return s.to_string();
    }
    if max_cells == 0 {
        return String::new();
    }
    let budget = max_cells - 1; // one cell for '…'
    let mut width = 0;
    let mut result = String::new();
    for g in s.graphemes(true) {
        width += grapheme_display_width(g);
        if width > budget {
            break;
        }
        result.push_str(g);
    }
    result.push('\u{2026}');
    result
}

/// Next grapheme boundary after `byte_offset`. None at the end.
pub fn next_grapheme_boundary(s: &str, byte_offset: usize) -> Option<usize> {
    let g = s.get(byte_offset..)?.graphemes(true).next()?;
    Some(byte_offset + g.len())
}

/// Previous grapheme boundary before `byte_offset`. None at the start.
pub fn prev_grapheme_boundary(s: &str, byte_offset: usize) -> Option<usize> {
    let g = s.get(..byte_offset)?.graphemes(true).next_back()?;
    Some(byte_offset - g.len())
}

fn is_blank(g: &str) -> bool {
    g.chars().all(char::is_whitespace)
}

/// Start of the word left of `byte_offset`, skipping whitespace first.
pub fn word_boundary_left(s: &str, byte_offset: usize) -> usize {
    let prefix = &s[..byte_offset.min(s.len())];
    let mut pos = prefix.len();
    let mut in_word = false;
    for (i, g) in prefix.grapheme_indices(true).rev() {
        if is_blank(g) {
            if in_word {
                break;
            }
        } else {
            in_word = true;
        }
        pos = i;
    }
    pos
}

/// Start of the next word right of `byte_offset`, or the end.
pub fn word_boundary_right(s: &str, byte_offset: usize) -> usize {
    let start = byte_offset.min(s.len());
    let mut seen_blank = false;
    for (i, g) in s[start..].grapheme_indices(true) {
        if is_blank(g) {
            seen_blank = true;
        } else if seen_blank {
            return start + i;
        }
    }
    s.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_width() {
        assert_eq!(display_width("call mom"), 8);
        assert_eq!(display_width("你好"), 4);
        assert_eq!(display_width("cafe\u{0301}"), 4);
        assert_eq!(display_width("a\tb"), 6);
    }

    #[test]
    fn test_truncate_to_width() {
        assert_eq!(truncate_to_width("short", 10), "short");
        assert_eq!(truncate_to_width("Save failed: disk full", 8), "Save fa\u{2026}");
        assert_eq!(truncate_to_width("你好世界", 5), "你好\u{2026}");
        assert_eq!(truncate_to_width("abc", 0), "");
    }

    #[test]
    fn test_grapheme_boundaries() {
        let s = "ae\u{0301}b";
        assert_eq!(next_grapheme_boundary(s, 0), Some(1));
        assert_eq!(next_grapheme_boundary(s, 1), Some(4));
        assert_eq!(next_grapheme_boundary(s, 5), None);
        assert_eq!(prev_grapheme_boundary(s, 4), Some(1));
        assert_eq!(prev_grapheme_boundary(s, 0), None);
    }

    #[test]
    fn test_word_boundaries() {
        let s = "call mom  @phone";
        assert_eq!(word_boundary_left(s, s.len()), 10);
        assert_eq!(word_boundary_left(s, 10), 5);
        assert_eq!(word_boundary_left(s, 7), 5);
        assert_eq!(word_boundary_left(s, 0), 0);
        assert_eq!(word_boundary_right(s, 0), 5);
        assert_eq!(word_boundary_right(s, 5), 10);
        assert_eq!(word_boundary_right(s, 10), s.len());
    }
}
