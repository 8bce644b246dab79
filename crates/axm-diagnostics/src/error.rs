//! Captured error model
//!
//! An uncaught error is snapshotted into a [`CapturedError`] at the moment
//! the framework intercepts it. The capture is immutable after construction
//! and both front-ends (terminal and HTML) read from the same data.

use serde::{Deserialize, Serialize};

/// Location placeholder for frames that carry no file information
/// (built-in or internal calls). Such frames are labeled, never omitted.
pub const INTERNAL_CALL: &str = "[internal function]";

/// How a stack frame's function was invoked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallKind {
    /// Instance method call (`->` in the captured trace)
    Instance,
    /// Static method call (`::`)
    Static,
}

impl CallKind {
    /// Raw marker as recorded in the trace
    pub fn marker(self) -> &'static str {
        match self {
            CallKind::Instance => "->",
            CallKind::Static => "::",
        }
    }

    /// Marker as rendered in a call signature: instance calls show the
    /// call parentheses, static calls keep the raw marker.
    pub fn rendered(self) -> &'static str {
        match self {
            CallKind::Instance => "()->",
            CallKind::Static => "::",
        }
    }
}

/// Where the error was raised, for HTTP status classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorOrigin {
    /// Raised by the framework itself (missing route, controller, view).
    /// Classified as a not-found condition.
    Framework,
    /// Anything else
    #[default]
    Application,
}

/// A captured argument value
///
/// Closed set of semantic shapes an argument preview can take. Keys of a
/// `Mapping` are themselves `ArgValue`s because the captured data allows
/// arrays and objects in key position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum ArgValue {
    /// Object reference, carrying its type name
    Object(String),
    /// Ordered key/value pairs (array or map)
    Mapping(Vec<(ArgValue, ArgValue)>),
    /// String value, stored unescaped
    Str(String),
    Bool(bool),
    Null,
    /// Opaque handle (file, socket, ...)
    Resource,
    /// Any other scalar, already rendered to its literal text
    Scalar(String),
}

impl ArgValue {
    /// Render for the argument list of a call signature.
    pub fn render(&self) -> String {
        match self {
            ArgValue::Object(type_name) => format!("Object({type_name})"),
            ArgValue::Mapping(entries) if entries.is_empty() => "[]".to_string(),
            ArgValue::Mapping(entries) => render_mapping(entries),
            ArgValue::Str(s) => format!("'{s}'"),
            ArgValue::Bool(true) => "true".to_string(),
            ArgValue::Bool(false) => "false".to_string(),
            ArgValue::Null => "null".to_string(),
            ArgValue::Resource => "resource".to_string(),
            ArgValue::Scalar(s) => s.clone(),
        }
    }

    /// Render inside a mapping, where strings stay bare and objects show
    /// only their type name.
    fn render_bare(&self) -> String {
        match self {
            ArgValue::Object(type_name) => type_name.clone(),
            ArgValue::Mapping(entries) if entries.is_empty() => "[]".to_string(),
            ArgValue::Mapping(entries) => render_mapping(entries),
            ArgValue::Str(s) => s.clone(),
            other => other.render(),
        }
    }
}

/// `[k=>v, ...]` rendering of a non-empty mapping. An object in key
/// position, or a mapping key whose first entry's key is an object,
/// collapses to the `(Object(Closure))` literal.
fn render_mapping(entries: &[(ArgValue, ArgValue)]) -> String {
    let mut parts = Vec::with_capacity(entries.len());
    for (key, value) in entries {
        let part = match key {
            ArgValue::Object(_) => "(Object(Closure))".to_string(),
            ArgValue::Mapping(inner) => match inner.first() {
                Some((ArgValue::Object(_), _)) => "(Object(Closure))".to_string(),
                _ => format!("{}=>{}", render_mapping(inner), value.render_bare()),
            },
            key => format!("{}=>{}", key.render_bare(), value.render_bare()),
        };
        parts.push(part);
    }
    format!("[{}]", parts.join(", "))
}

/// Join rendered arguments with `, `, truncating the joined list at
/// `max_len` characters with a trailing `...`.
pub fn render_args(args: &[ArgValue], max_len: usize) -> String {
    let joined = args
        .iter()
        .map(ArgValue::render)
        .collect::<Vec<_>>()
        .join(", ");
    if joined.chars().count() <= max_len {
        return joined;
    }
    let cut: String = joined.chars().take(max_len).collect();
    format!("{cut}...")
}

/// One entry in a captured call stack
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StackFrame {
    /// Source file, absent for calls from non-file contexts
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub file: Option<String>,
    /// Line number (1-based), absent together with `file`
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub line: Option<usize>,
    /// Enclosing type, absent for free functions
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub class: Option<String>,
    /// Call style, present when `class` is
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub call: Option<CallKind>,
    /// Function or method name
    pub function: String,
    /// Captured argument values, in call order
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub args: Vec<ArgValue>,
}

impl StackFrame {
    /// Create a frame for a bare function call
    pub fn new(function: impl Into<String>) -> Self {
        Self {
            file: None,
            line: None,
            class: None,
            call: None,
            function: function.into(),
            args: Vec::new(),
        }
    }

    /// Set the call site
    pub fn at(mut self, file: impl Into<String>, line: usize) -> Self {
        self.file = Some(file.into());
        self.line = Some(line);
        self
    }

    /// Set the enclosing type and call style
    pub fn in_class(mut self, class: impl Into<String>, call: CallKind) -> Self {
        self.class = Some(class.into());
        self.call = Some(call);
        self
    }

    /// Append an argument value
    pub fn with_arg(mut self, arg: ArgValue) -> Self {
        self.args.push(arg);
        self
    }

    /// Location column text: `file:line`, or the internal-call
    /// placeholder when the frame has no file.
    pub fn location(&self) -> String {
        match &self.file {
            Some(file) => format!("{}:{}", file, self.line.unwrap_or(0)),
            None => INTERNAL_CALL.to_string(),
        }
    }

    /// Call signature as shown in backtraces: `Class()->method('x')`,
    /// `Class::method()`, or `func()`. The rendered argument list is
    /// truncated at `max_args_len` characters.
    pub fn signature(&self, max_args_len: usize) -> String {
        let args = render_args(&self.args, max_args_len);
        match &self.class {
            Some(class) => format!(
                "{}{}{}({})",
                class,
                self.call.unwrap_or(CallKind::Static).rendered(),
                self.function,
                args
            ),
            None => format!("{}({})", self.function, args),
        }
    }
}

/// Snapshot of an uncaught error, taken when it is intercepted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapturedError {
    /// Error class name
    pub type_name: String,
    /// Error message, possibly empty
    pub message: String,
    /// Source file the error was raised in
    pub file: String,
    /// Line number (1-based)
    pub line: usize,
    /// Origin, drives HTTP status classification
    #[serde(default)]
    pub origin: ErrorOrigin,
    /// Call stack, outermost call last
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub frames: Vec<StackFrame>,
}

impl CapturedError {
    /// Create a capture with type name and message
    pub fn new(type_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            message: message.into(),
            file: "<unknown>".to_string(),
            line: 1,
            origin: ErrorOrigin::Application,
            frames: Vec::new(),
        }
    }

    /// Set the source file
    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = file.into();
        self
    }

    /// Set the line number
    pub fn with_line(mut self, line: usize) -> Self {
        self.line = line;
        self
    }

    /// Append a stack frame
    pub fn with_frame(mut self, frame: StackFrame) -> Self {
        self.frames.push(frame);
        self
    }

    /// Replace the whole frame sequence
    pub fn with_frames(mut self, frames: Vec<StackFrame>) -> Self {
        self.frames = frames;
        self
    }

    /// Mark the error as raised by the framework itself
    pub fn framework(mut self) -> Self {
        self.origin = ErrorOrigin::Framework;
        self
    }

    /// Plain-text trace in the native `#i file(line): signature` shape,
    /// one frame per line. Used by the fallback HTML renderer.
    pub fn trace_to_string(&self) -> String {
        self.frames
            .iter()
            .enumerate()
            .map(|(i, frame)| {
                let location = match &frame.file {
                    Some(file) => format!("{}({})", file, frame.line.unwrap_or(0)),
                    None => INTERNAL_CALL.to_string(),
                };
                format!("#{} {}: {}", i, location, frame.signature(usize::MAX))
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
