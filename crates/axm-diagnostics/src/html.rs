//! HTML error page assembly
//!
//! Builds the field map for the templated error page, classifies the
//! HTTP status, and provides a bare fallback page for when the templated
//! path is unavailable. The framework's view renderer and outbound
//! response are collaborators behind small traits.

use crate::error::{CapturedError, ErrorOrigin};
use serde_json::{json, Map, Value};
use thiserror::Error;

/// Client-side script driving trace expand/collapse and tab switching on
/// the rendered error page.
pub const DEBUG_SCRIPT: &str = include_str!("assets/debug.js");

/// View rendered for the templated error page
pub const EXCEPTION_VIEW: &str = "exception/src/views/exception";

/// Failures at the template collaborator boundary
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("template rendering failed for view '{view}': {reason}")]
    Template { view: String, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// External view renderer
pub trait TemplateEngine {
    /// Render the view at `view` with the given field map.
    fn render(&self, view: &str, data: &Map<String, Value>) -> Result<String, RenderError>;
}

/// Outbound response surface the renderer is allowed to touch
pub trait HttpResponder {
    /// Flush and discard any buffered page output.
    fn discard_buffered(&mut self);

    /// Set the HTTP status code.
    fn set_status(&mut self, code: u16);

    /// Register an outbound header.
    fn set_header(&mut self, name: &str, value: &str);

    /// Send the finished body to the client.
    fn send(&mut self, body: String);
}

/// Templated error page renderer
pub struct HtmlRenderer {
    view: String,
}

impl HtmlRenderer {
    /// Create a renderer targeting the default exception view
    pub fn new() -> Self {
        Self {
            view: EXCEPTION_VIEW.to_string(),
        }
    }

    /// Override the view path
    pub fn with_view(mut self, view: impl Into<String>) -> Self {
        self.view = view.into();
        self
    }

    /// Render the error page through the template engine.
    ///
    /// Buffered output is discarded before any data is assembled so a
    /// partial page never precedes the error page. Returns `Ok(false)`
    /// in production, where the caller is expected to fall back to a
    /// generic response.
    pub fn handle_exception(
        &self,
        err: &CapturedError,
        production: bool,
        engine: &dyn TemplateEngine,
        responder: &mut dyn HttpResponder,
    ) -> Result<bool, RenderError> {
        responder.discard_buffered();
        if production {
            return Ok(false);
        }

        let code = classify_status(err, responder);
        let data = build_data_map(err, code);
        let body = engine.render(&self.view, &data)?;
        responder.send(body);
        Ok(true)
    }
}

impl Default for HtmlRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Assemble the field map handed to the template. The shape is fixed by
/// the error view: `type`, `code`, `message`, `file`, `line`, `traces`.
/// An empty message becomes the literal `(null)` so the absence stays
/// visible.
pub fn build_data_map(err: &CapturedError, code: u16) -> Map<String, Value> {
    let mut data = Map::new();
    data.insert("type".to_string(), json!(err.type_name));
    data.insert("code".to_string(), json!(code));
    let message = if err.message.is_empty() {
        "(null)"
    } else {
        &err.message
    };
    data.insert("message".to_string(), json!(message));
    data.insert("file".to_string(), json!(err.file));
    data.insert("line".to_string(), json!(err.line));
    data.insert(
        "traces".to_string(),
        serde_json::to_value(&err.frames).unwrap_or(Value::Null),
    );
    data
}

/// Classify the HTTP status for an error: 404 for framework-raised
/// errors (missing route, controller, or view), 500 for everything else.
/// Sets the status on the responder; framework errors also get the
/// `X-Axm` marker header.
pub fn classify_status(err: &CapturedError, responder: &mut dyn HttpResponder) -> u16 {
    let code = match err.origin {
        ErrorOrigin::Framework => {
            responder.set_header("X-Axm", "true");
            404
        }
        ErrorOrigin::Application => 500,
    };
    responder.set_status(code);
    code
}

/// Bare fallback page used when the templated path is unavailable:
/// plain tags, no template engine. Outside production the native trace
/// text is appended.
pub fn throw_display(err: &CapturedError, production: bool) -> String {
    let mut out = format!(
        "<h1>{}: {} ({}:{})</h1>\n<h6>{}</h6>",
        escape_html(&err.type_name),
        escape_html(&err.message),
        escape_html(&err.file),
        err.line,
        escape_html(&err.message),
    );

    if !production {
        out.push_str(&format!(
            "<h6>({}: {})</h6>",
            escape_html(&err.file),
            err.line
        ));
        out.push_str(&format!(
            "<h6>{}</h6>",
            escape_html(&err.trace_to_string())
        ));
    }

    out
}

/// Escape text for interpolation into HTML
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
    out
}
