//! Axm diagnostics - developer-facing error rendering
//!
//! Renders uncaught framework errors for two front-ends that share one
//! captured error model:
//! - a colorized terminal report with an enumerated backtrace
//! - an HTML error page with argument previews and syntax-highlighted
//!   source excerpts
//!
//! In production mode verbose output is suppressed; only the top-level
//! type, message, and location survive.

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// Public API modules
pub mod console;
pub mod error;
pub mod excerpt;
pub mod highlight;
pub mod html;

// Re-export commonly used types
pub use console::{ColorMode, ConsoleReporter, ReportConfig};
pub use error::{
    render_args, ArgValue, CallKind, CapturedError, ErrorOrigin, StackFrame, INTERNAL_CALL,
};
pub use excerpt::{render_source_excerpt, LineRange, DEFAULT_EXCERPT_LINES};
pub use highlight::{highlight_code, HighlightPalette};
pub use html::{
    build_data_map, classify_status, escape_html, throw_display, HtmlRenderer, HttpResponder,
    RenderError, TemplateEngine, DEBUG_SCRIPT, EXCEPTION_VIEW,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_smoke() {
        // Smoke test to verify the crate builds and tests run
        assert_eq!(VERSION, "0.1.0");
    }
}
