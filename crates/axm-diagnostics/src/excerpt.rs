//! Source excerpt rendering
//!
//! Produces the line-numbered, syntax-highlighted window of source shown
//! around a failing line on the HTML error page. Every failure mode
//! (unreadable file, line out of range) degrades to an empty string;
//! callers treat empty as "no excerpt available".

use crate::highlight::{highlight_code, HighlightPalette};
use std::fs;
use std::path::Path;

/// Default number of lines shown around the failing line
pub const DEFAULT_EXCERPT_LINES: usize = 10;

/// Inclusive 0-based window of lines around an error line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineRange {
    /// First line of the window
    pub begin: usize,
    /// Last line of the window
    pub end: usize,
}

impl LineRange {
    /// Compute the window for `error_line` (0-based) in a file of
    /// `line_count` lines, at most `max_lines` long. Near the top of the
    /// file the window shifts toward line 0 instead of centering.
    pub fn around(error_line: usize, line_count: usize, max_lines: usize) -> Self {
        let max_lines = max_lines.max(1);
        let half = max_lines / 2;
        let begin = error_line.saturating_sub(half);
        let end = (begin + max_lines - 1).min(line_count.saturating_sub(1));
        Self { begin, end }
    }

    /// Whether `line` (0-based) falls inside the window
    pub fn contains(&self, line: usize) -> bool {
        self.begin <= line && line <= self.end
    }
}

/// Render a syntax-highlighted excerpt of `file` around `error_line`
/// (1-based), at most `max_lines` lines long.
///
/// Returns an empty string when the file cannot be read or the line is
/// out of range.
pub fn render_source_excerpt(
    file: impl AsRef<Path>,
    error_line: usize,
    max_lines: usize,
    palette: &HighlightPalette,
) -> String {
    if error_line == 0 {
        return String::new();
    }
    let error_line = error_line - 1;

    let Ok(source) = fs::read_to_string(file) else {
        return String::new();
    };
    let lines: Vec<&str> = source.lines().collect();
    if error_line >= lines.len() {
        return String::new();
    }

    let range = LineRange::around(error_line, lines.len(), max_lines);
    let number_width = decimal_width(range.end + 1);

    let mut output = String::new();
    for i in range.begin..=range.end {
        let highlighted = highlight_code(lines[i], palette);
        let is_error_line = i == error_line;

        let classes = if is_error_line { "ln error-ln" } else { "ln" };
        let body = if highlighted.is_empty() {
            highlighted
        } else {
            format!("{highlighted}</br>")
        };
        let code = format!(
            "<span class=\"{classes}\">{:0width$}</span> {body}",
            i + 1,
            width = number_width
        );

        if is_error_line {
            output.push_str("<span class=\"error\">");
            output.push_str(&code);
            output.push_str("</span>");
        } else {
            output.push_str(&code);
        }
    }

    format!("<div class=\"code\"><pre>{output}</pre></div>")
}

/// Decimal width of a 1-based line number
fn decimal_width(n: usize) -> usize {
    n.to_string().len()
}
