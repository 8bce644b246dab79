//! Minimal syntax highlighting for source excerpts
//!
//! Works one line at a time: script-delimiter sequences are protected
//! with placeholder tokens so they survive highlighting, the line is
//! scanned into comment, string, keyword, markup, and plain runs, and
//! the placeholders are restored as escaped entities afterwards.

use crate::html::escape_html;
use regex::Regex;
use std::sync::OnceLock;

/// Colors applied to highlighted token classes, as CSS declaration
/// fragments for inline `style` attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightPalette {
    /// Line and block comments
    pub comment: String,
    /// Markup delimiters (`<`, `>`)
    pub markup: String,
    /// Language keywords
    pub keyword: String,
    /// String literals
    pub string: String,
}

impl Default for HighlightPalette {
    fn default() -> Self {
        Self {
            comment: "#008000; font-style: italic".to_string(),
            markup: "#808080".to_string(),
            keyword: "#9406adc0; font-weight: bold".to_string(),
            string: "#DD0000".to_string(),
        }
    }
}

/// (literal, placeholder token, restored entity form)
///
/// Literal delimiter sequences are swapped for alphabetic tokens before
/// scanning so they cannot terminate the highlighted fragment, then
/// swapped back in already-escaped form.
const PLACEHOLDERS: &[(&str, &str, &str)] = &[
    ("<?", "phptagopen", "&lt;?"),
    ("?>", "phptagclose", "?&gt;"),
    ("<%", "asptagopen", "&lt;%"),
    ("%>", "asptagclose", "%&gt;"),
    ("\\", "backslashtmp", "\\"),
    ("</script>", "scriptclose", "&lt;/script&gt;"),
];

const KEYWORDS: &[&str] = &[
    "abstract", "as", "break", "case", "catch", "class", "const", "continue",
    "default", "do", "echo", "else", "elseif", "enum", "extends", "final",
    "finally", "fn", "for", "foreach", "function", "if", "impl", "implements",
    "interface", "let", "loop", "match", "mut", "namespace", "new", "private",
    "protected", "pub", "public", "return", "static", "struct", "switch",
    "throw", "trait", "try", "use", "while",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TokenClass {
    Plain,
    Comment,
    Keyword,
    Str,
    Markup,
}

/// Highlight one line of source into an HTML fragment.
///
/// Carriage returns and tabs are stripped, pre-escaped entities decoded,
/// and delimiter placeholders applied before scanning; the output carries
/// no newline, tab, or vertical-tab artifacts.
pub fn highlight_code(line: &str, palette: &HighlightPalette) -> String {
    let line = line.replace(['\r', '\t'], "");
    let line = decode_entities(&line);

    let mut protected = line;
    for (literal, token, _) in PLACEHOLDERS {
        protected = protected.replace(literal, token);
    }

    let mut out = render_runs(&scan(&protected), palette);

    // Drop spans that ended up with no visible content.
    out = empty_span_re().replace_all(&out, "").into_owned();

    for (_, token, restored) in PLACEHOLDERS {
        out = out.replace(token, restored);
    }

    out.replace(['\n', '\t', '\u{b}'], "")
}

fn empty_span_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"<span style="color: [^"]*"></span>"#).unwrap())
}

/// Decode the HTML entities a pre-rendered source line may carry
fn decode_entities(s: &str) -> String {
    s.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#039;", "'")
        .replace("&amp;", "&")
}

/// Split a line into classified runs
fn scan(line: &str) -> Vec<(TokenClass, String)> {
    let chars: Vec<char> = line.chars().collect();
    let mut runs: Vec<(TokenClass, String)> = Vec::new();
    let mut plain = String::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        // Line comments run to the end of the line
        if (c == '/' && chars.get(i + 1) == Some(&'/')) || c == '#' {
            flush_plain(&mut runs, &mut plain);
            runs.push((TokenClass::Comment, chars[i..].iter().collect()));
            i = chars.len();
            continue;
        }

        // Block comment, to `*/` or the end of the line
        if c == '/' && chars.get(i + 1) == Some(&'*') {
            flush_plain(&mut runs, &mut plain);
            let mut j = i + 2;
            while j < chars.len() && !(chars[j] == '*' && chars.get(j + 1) == Some(&'/')) {
                j += 1;
            }
            let end = if j < chars.len() { j + 2 } else { chars.len() };
            runs.push((TokenClass::Comment, chars[i..end].iter().collect()));
            i = end;
            continue;
        }

        // String literal, unterminated ones run to the end of the line
        if c == '"' || c == '\'' {
            flush_plain(&mut runs, &mut plain);
            let mut j = i + 1;
            while j < chars.len() && chars[j] != c {
                j += 1;
            }
            let end = (j + 1).min(chars.len());
            runs.push((TokenClass::Str, chars[i..end].iter().collect()));
            i = end;
            continue;
        }

        // Identifier or keyword
        if c.is_alphabetic() || c == '_' {
            flush_plain(&mut runs, &mut plain);
            let mut j = i;
            while j < chars.len() && (chars[j].is_alphanumeric() || chars[j] == '_') {
                j += 1;
            }
            let word: String = chars[i..j].iter().collect();
            let class = if KEYWORDS.contains(&word.as_str()) {
                TokenClass::Keyword
            } else {
                TokenClass::Plain
            };
            runs.push((class, word));
            i = j;
            continue;
        }

        if c == '<' || c == '>' {
            flush_plain(&mut runs, &mut plain);
            runs.push((TokenClass::Markup, c.to_string()));
            i += 1;
            continue;
        }

        plain.push(c);
        i += 1;
    }

    flush_plain(&mut runs, &mut plain);
    runs
}

fn flush_plain(runs: &mut Vec<(TokenClass, String)>, plain: &mut String) {
    if !plain.is_empty() {
        runs.push((TokenClass::Plain, std::mem::take(plain)));
    }
}

fn render_runs(runs: &[(TokenClass, String)], palette: &HighlightPalette) -> String {
    let mut out = String::new();
    for (class, text) in runs {
        let escaped = escape_html(text);
        match class {
            TokenClass::Plain => out.push_str(&escaped),
            TokenClass::Comment => push_span(&mut out, &palette.comment, &escaped),
            TokenClass::Keyword => push_span(&mut out, &palette.keyword, &escaped),
            TokenClass::Str => push_span(&mut out, &palette.string, &escaped),
            TokenClass::Markup => push_span(&mut out, &palette.markup, &escaped),
        }
    }
    out
}

fn push_span(out: &mut String, color: &str, text: &str) {
    out.push_str("<span style=\"color: ");
    out.push_str(color);
    out.push_str("\">");
    out.push_str(text);
    out.push_str("</span>");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn highlight(line: &str) -> String {
        highlight_code(line, &HighlightPalette::default())
    }

    #[test]
    fn test_keyword_span() {
        let out = highlight("return 1;");
        assert!(out.contains(
            "<span style=\"color: #9406adc0; font-weight: bold\">return</span>"
        ));
        assert!(out.contains(" 1;"));
    }

    #[test]
    fn test_string_span() {
        let out = highlight("let x = 'hello';");
        assert!(out.contains("<span style=\"color: #DD0000\">'hello'</span>"));
    }

    #[test]
    fn test_line_comment_span() {
        let out = highlight("x = 1; // set x");
        assert!(out.contains(
            "<span style=\"color: #008000; font-style: italic\">// set x</span>"
        ));
    }

    #[test]
    fn test_hash_comment_span() {
        let out = highlight("# whole line");
        assert!(out.contains("# whole line</span>"));
    }

    #[test]
    fn test_block_comment_span() {
        let out = highlight("a /* note */ b");
        assert!(out.contains("/* note */</span>"));
        assert!(out.contains("b"));
    }

    #[test]
    fn test_unterminated_string_runs_to_end() {
        let out = highlight("let s = \"open");
        assert!(out.contains("<span style=\"color: #DD0000\">\"open</span>"));
    }

    #[test]
    fn test_markup_delimiters_escaped_and_colored() {
        let out = highlight("<div>");
        assert!(out.contains("<span style=\"color: #808080\">&lt;</span>"));
        assert!(out.contains("<span style=\"color: #808080\">&gt;</span>"));
        assert!(out.contains("div"));
    }

    #[test]
    fn test_script_open_tag_survives() {
        let out = highlight("<?php echo 1;");
        assert!(out.contains("&lt;?"));
        assert!(!out.contains("phptagopen"));
    }

    #[test]
    fn test_script_close_sequence_survives() {
        let out = highlight("</script>");
        assert!(out.contains("&lt;/script&gt;"));
        assert!(!out.contains("scriptclose"));
    }

    #[test]
    fn test_tabs_and_carriage_returns_stripped() {
        let out = highlight("\ta = 1;\r");
        assert!(!out.contains('\t'));
        assert!(!out.contains('\r'));
        assert!(out.contains("a = 1;"));
    }

    #[test]
    fn test_entities_decoded_before_scanning() {
        // A pre-escaped `<` must be treated as markup, not literal text.
        let out = highlight("&lt;span&gt;");
        assert!(out.contains("<span style=\"color: #808080\">&lt;</span>"));
    }

    #[test]
    fn test_empty_line() {
        assert_eq!(highlight(""), "");
    }

    #[test]
    fn test_custom_palette() {
        let palette = HighlightPalette {
            keyword: "#112233".to_string(),
            ..HighlightPalette::default()
        };
        let out = highlight_code("if x", &palette);
        assert!(out.contains("<span style=\"color: #112233\">if</span>"));
    }
}
