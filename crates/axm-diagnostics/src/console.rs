//! Terminal exception reporter
//!
//! Writes the colorized report shown when an uncaught error reaches the
//! CLI front controller: title, location, and an enumerated backtrace
//! with per-frame locations, call signatures, and argument previews.
//! Respects the NO_COLOR environment variable and auto-detects terminal
//! capabilities.

use crate::error::{CapturedError, StackFrame};
use std::io::Write;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Color mode for report output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
    /// Always use colors
    Always,
    /// Never use colors
    Never,
    /// Auto-detect terminal capabilities
    Auto,
}

impl ColorMode {
    /// Resolve to a termcolor ColorChoice
    pub fn to_color_choice(self) -> ColorChoice {
        // Always respect NO_COLOR (https://no-color.org)
        if std::env::var("NO_COLOR").is_ok() {
            return ColorChoice::Never;
        }
        match self {
            ColorMode::Always => ColorChoice::Always,
            ColorMode::Never => ColorChoice::Never,
            ColorMode::Auto => ColorChoice::Auto,
        }
    }
}

/// Report tuning
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportConfig {
    /// Upper bound, in characters, on a rendered argument list
    pub max_args_len: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self { max_args_len: 200 }
    }
}

/// Terminal report writer with color support
pub struct ConsoleReporter {
    color_mode: ColorMode,
    config: ReportConfig,
}

impl ConsoleReporter {
    /// Create a reporter with the given color mode
    pub fn new(color_mode: ColorMode) -> Self {
        Self {
            color_mode,
            config: ReportConfig::default(),
        }
    }

    /// Create a reporter that auto-detects color support
    pub fn auto() -> Self {
        Self::new(ColorMode::Auto)
    }

    /// Create a plain (no color) reporter
    pub fn plain() -> Self {
        Self::new(ColorMode::Never)
    }

    /// Override the report configuration
    pub fn with_config(mut self, config: ReportConfig) -> Self {
        self.config = config;
        self
    }

    /// Write the report to stdout and terminate the process with exit
    /// status 1. Never returns. In production only the title and
    /// location are shown; the backtrace is skipped.
    pub fn report(&self, err: &CapturedError, production: bool) -> ! {
        let mut stream = StandardStream::stdout(self.color_mode.to_color_choice());
        let _ = self.write_report(&mut stream, err, production);
        let _ = stream.flush();
        std::process::exit(1);
    }

    /// Write the report to a WriteColor sink
    pub fn write_report(
        &self,
        w: &mut impl WriteColor,
        err: &CapturedError,
        production: bool,
    ) -> std::io::Result<()> {
        // Title: [TypeName: message]
        writeln!(w)?;
        w.set_color(ColorSpec::new().set_fg(Some(Color::Red)))?;
        write!(w, "[{}: {}]", err.type_name, err.message)?;
        w.reset()?;
        writeln!(w)?;
        writeln!(w)?;

        // Location: at file:line
        write!(w, "at ")?;
        w.set_color(ColorSpec::new().set_fg(Some(Color::Green)))?;
        write!(w, "{}:{}", err.file, err.line)?;
        w.reset()?;
        writeln!(w)?;
        writeln!(w)?;

        if !production {
            if !err.frames.is_empty() {
                w.set_color(ColorSpec::new().set_fg(Some(Color::Blue)))?;
                write!(w, "Backtrace:")?;
                w.reset()?;
                writeln!(w)?;
            }

            for (i, frame) in err.frames.iter().enumerate() {
                self.write_frame(w, i + 1, frame)?;
            }
        }

        Ok(())
    }

    fn write_frame(
        &self,
        w: &mut impl WriteColor,
        index: usize,
        frame: &StackFrame,
    ) -> std::io::Result<()> {
        // Location column: 1-based index aligned to width 3, then the
        // call site or the internal-call placeholder.
        write!(w, "{:>3}    ", index)?;
        w.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)))?;
        write!(w, "{}", frame.location())?;
        w.reset()?;
        writeln!(w)?;

        // Signature column, padded to sit under the location text
        let signature = format!("       {}", frame.signature(self.config.max_args_len));
        writeln!(w, "{}", signature)?;

        // Separator exactly as long as the signature line
        w.set_color(ColorSpec::new().set_fg(Some(Color::Green)))?;
        write!(w, "{}", "-".repeat(signature.chars().count()))?;
        w.reset()?;
        writeln!(w)?;
        writeln!(w)?;

        Ok(())
    }

    /// Format a report to a buffer (for testing)
    pub fn format_to_buffer(&self, err: &CapturedError, production: bool) -> Vec<u8> {
        let mut buf = termcolor::Buffer::no_color();
        let _ = self.write_report(&mut buf, err, production);
        buf.into_inner()
    }
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::auto()
    }
}
