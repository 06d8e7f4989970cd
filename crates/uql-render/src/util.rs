//! Text measurement and padding on a fixed-width glyph model.
//!
//! Widths are terminal display columns: CJK characters count as two, and
//! tabs are expanded to spaces before anything is measured.

use unicode_width::UnicodeWidthStr;

/// Returns the display width of a string.
///
/// # Example
///
/// ```rust
/// use uql_render::display_width;
///
/// assert_eq!(display_width("hello"), 5);
/// assert_eq!(display_width("日本"), 4);
/// ```
pub fn display_width(s: &str) -> usize {
    s.width()
}

/// Replaces every tab with `tab_width` spaces.
pub fn expand_tabs(s: &str, tab_width: usize) -> String {
    if !s.contains('\t') {
        return s.to_string();
    }
    s.replace('\t', &" ".repeat(tab_width))
}

/// Splits a cell's text into display lines, expanding tabs.
///
/// An empty string is one empty line; `\r\n` line endings are accepted.
pub fn cell_lines(s: &str, tab_width: usize) -> Vec<String> {
    s.split('\n')
        .map(|line| expand_tabs(line.strip_suffix('\r').unwrap_or(line), tab_width))
        .collect()
}

/// Pads a string on the right with spaces to reach the target width.
///
/// Strings already at or beyond the width are returned unchanged.
///
/// # Example
///
/// ```rust
/// use uql_render::pad_right;
///
/// assert_eq!(pad_right("hi", 5), "hi   ");
/// assert_eq!(pad_right("hello", 3), "hello");
/// ```
pub fn pad_right(s: &str, width: usize) -> String {
    let current = display_width(s);
    if current >= width {
        return s.to_string();
    }
    let mut out = String::with_capacity(s.len() + width - current);
    out.push_str(s);
    out.extend(std::iter::repeat_n(' ', width - current));
    out
}

/// A run of `width` copies of `fill`.
pub fn repeat_char(fill: char, width: usize) -> String {
    std::iter::repeat_n(fill, width).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_tabs() {
        assert_eq!(expand_tabs("a\tb", 4), "a    b");
        assert_eq!(expand_tabs("plain", 4), "plain");
        assert_eq!(display_width(&expand_tabs("\t", 8)), 8);
    }

    #[test]
    fn test_cell_lines() {
        assert_eq!(cell_lines("", 4), vec![""]);
        assert_eq!(
            cell_lines("Exception\r\n\tat Foo.bar", 2),
            vec!["Exception", "  at Foo.bar"]
        );
    }

    #[test]
    fn test_pad_right_wide_chars() {
        assert_eq!(pad_right("日本", 6), "日本  ");
        assert_eq!(display_width(&pad_right("日本", 6)), 6);
    }

    #[test]
    fn test_repeat_char() {
        assert_eq!(repeat_char('=', 3), "===");
        assert_eq!(repeat_char('-', 0), "");
    }
}
