//! Rewindable line cursor

/// Cursor over the lines of a document
///
/// Lines starting with `#` are comments: they are skipped by [`Iterator::next`]
/// but still count toward the position, so reported line numbers match the
/// source file.
#[derive(Debug, Clone)]
pub struct Lines {
    /// Index of the next line to examine
    line: usize,
    text: Vec<String>,
    /// Position [`Lines::back`] rewinds to; cleared once used
    rewind: Option<usize>,
}

impl Lines {
    pub fn new(text: Vec<String>) -> Self {
        Self {
            line: 0,
            text,
            rewind: None,
        }
    }

    /// Split a string into lines, dropping `\r` before each line break
    pub fn from_text(input: &str) -> Self {
        Self::new(input.lines().map(str::to_string).collect())
    }

    /// 1-based number of the last line returned by [`Iterator::next`]
    pub fn line_number(&self) -> usize {
        self.line
    }

    /// Raw lines, comments included
    pub fn raw(&self) -> &[String] {
        &self.text
    }

    /// Return the next non-blank line, or `None` at end of input
    pub fn next_non_empty(&mut self) -> Option<String> {
        loop {
            let text = self.next()?;
            if !text.is_empty() {
                return Some(text);
            }
        }
    }

    /// Push the last returned line back so the next call returns it again
    ///
    /// Only one line can be pushed back per advance; a second call without
    /// an intervening advance leaves the cursor where it is.
    pub fn back(&mut self) {
        match self.rewind.take() {
            Some(position) => self.line = position,
            None => log::warn!(
                "ignoring repeated rewind at line {}; only one line can be pushed back",
                self.line
            ),
        }
    }
}

impl Iterator for Lines {
    type Item = String;

    /// Return the next non-comment line, or `None` at end of input
    fn next(&mut self) -> Option<String> {
        while self.line < self.text.len() {
            let current = self.line;
            self.line += 1;
            let text = &self.text[current];
            if !text.starts_with('#') {
                self.rewind = Some(current);
                return Some(text.clone());
            }
        }
        // Rewinding past the end is a no-op, but still counts as one use.
        self.rewind = Some(self.line);
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_skips_comments() {
        let mut lines = Lines::from_text("# comment\nfirst\n# another\nsecond");
        assert_eq!(lines.next().as_deref(), Some("first"));
        assert_eq!(lines.line_number(), 2);
        assert_eq!(lines.next().as_deref(), Some("second"));
        assert_eq!(lines.line_number(), 4);
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_back_returns_same_line() {
        let mut lines = Lines::from_text("a\nb");
        assert_eq!(lines.next().as_deref(), Some("a"));
        lines.back();
        assert_eq!(lines.next().as_deref(), Some("a"));
        assert_eq!(lines.next().as_deref(), Some("b"));
    }

    #[test]
    fn test_back_over_comment_does_not_rescan() {
        let mut lines = Lines::from_text("a\n# skip\nb\nc");
        lines.next();
        assert_eq!(lines.next().as_deref(), Some("b"));
        lines.back();
        assert_eq!(lines.next().as_deref(), Some("b"));
        assert_eq!(lines.line_number(), 3);
    }

    #[test]
    fn test_double_back_rewinds_once() {
        let mut lines = Lines::from_text("a\nb\nc");
        lines.next();
        lines.next();
        lines.back();
        lines.back();
        assert_eq!(lines.next().as_deref(), Some("b"));
    }

    #[test]
    fn test_back_before_any_advance_is_noop() {
        let mut lines = Lines::from_text("a");
        lines.back();
        assert_eq!(lines.next().as_deref(), Some("a"));
    }

    #[test]
    fn test_back_at_eof() {
        let mut lines = Lines::from_text("a");
        lines.next();
        assert_eq!(lines.next(), None);
        lines.back();
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_next_non_empty_skips_blanks() {
        let mut lines = Lines::from_text("\n\n  \nx");
        // Whitespace-only lines are not blank.
        assert_eq!(lines.next_non_empty().as_deref(), Some("  "));
        assert_eq!(lines.next_non_empty().as_deref(), Some("x"));
        assert_eq!(lines.next_non_empty(), None);
    }
}
