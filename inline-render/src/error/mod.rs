//! Error types and error handling
//!
//! Rendering surfaces exactly two engine failure kinds: syntax errors, which
//! carry a (possibly remapped) line number, and everything else, which is
//! passed through untouched.

use std::borrow::Borrow;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors returned by the rendering entry points
#[derive(Debug, Error)]
pub enum RenderError {
    /// Template text could not be parsed
    #[error(transparent)]
    Syntax(#[from] TemplateSyntaxError),

    /// Any other engine failure (unknown filter, undefined value, missing template, ...)
    #[error("template runtime error: {0}")]
    Runtime(#[source] minijinja::Error),

    /// Output could not be written
    #[error("failed to write rendered output: {0}")]
    Io(#[from] std::io::Error),

    /// A context value was not shaped like a map
    #[error("invalid render context: {0}")]
    InvalidContext(String),
}

impl RenderError {
    /// Returns the syntax error if this is one
    #[must_use]
    pub const fn as_syntax(&self) -> Option<&TemplateSyntaxError> {
        match self {
            Self::Syntax(err) => Some(err),
            _ => None,
        }
    }
}

/// A template failed to parse
///
/// The line number starts out relative to the template text the engine
/// compiled. For inline templates it is rewritten to point into the caller's
/// source file before the error reaches the caller. A rewritten line is the
/// raw result of the remapping formula and may be zero or negative when the
/// call site does not follow the expected layout.
#[derive(Debug, Error)]
#[error("syntax error in template '{name}'{}: {detail}", line_suffix(.line))]
pub struct TemplateSyntaxError {
    name: String,
    detail: String,
    line: Option<i64>,
    path: Option<PathBuf>,
    #[source]
    source: minijinja::Error,
}

fn line_suffix(line: impl Borrow<Option<i64>>) -> String {
    line.borrow().map(|line| format!(" at line {line}")).unwrap_or_default()
}

impl TemplateSyntaxError {
    /// Wrap an engine syntax error
    ///
    /// `fallback_name` is used when the engine did not attach a template name.
    #[must_use]
    pub fn new(source: minijinja::Error, fallback_name: &str, path: Option<PathBuf>) -> Self {
        Self {
            name: source.name().unwrap_or(fallback_name).to_owned(),
            detail: source.detail().unwrap_or("syntax error").to_owned(),
            line: source.line().and_then(|line| i64::try_from(line).ok()),
            path,
            source,
        }
    }

    /// Name (logical id) of the template that failed to parse
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Engine-provided description of the failure
    #[must_use]
    pub fn detail(&self) -> &str {
        &self.detail
    }

    /// Reported line, if the engine knew one
    #[must_use]
    pub const fn template_line(&self) -> Option<i64> {
        self.line
    }

    /// Overwrite the reported line
    pub const fn set_template_line(&mut self, line: i64) {
        self.line = Some(line);
    }

    /// Backing file of the failing template, `None` for inline templates
    #[must_use]
    pub fn source_path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// The untouched engine error
    #[must_use]
    pub const fn engine_error(&self) -> &minijinja::Error {
        &self.source
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use minijinja::{Environment, ErrorKind};

    fn parse_error(source: &str) -> minijinja::Error {
        let mut env = Environment::new();
        env.add_template_owned("broken", source.to_owned())
            .expect_err("template should not parse")
    }

    #[test]
    fn test_wraps_engine_error() {
        let err = TemplateSyntaxError::new(parse_error("ok\n{{ }}"), "fallback", None);
        assert_eq!(err.name(), "broken");
        assert_eq!(err.template_line(), Some(2));
        assert_eq!(err.engine_error().kind(), ErrorKind::SyntaxError);
        assert!(err.source_path().is_none());
    }

    #[test]
    fn test_display_uses_current_line() {
        let mut err = TemplateSyntaxError::new(parse_error("{{ }}"), "fallback", None);
        err.set_template_line(42);
        let message = err.to_string();
        assert!(message.contains("'broken'"));
        assert!(message.contains("at line 42"));
    }

    #[test]
    fn test_display_keeps_non_positive_line() {
        let mut err = TemplateSyntaxError::new(parse_error("{{ }}"), "fallback", None);
        err.set_template_line(-5);
        assert!(err.to_string().contains("at line -5"));
    }

    #[test]
    fn test_as_syntax() {
        let err = RenderError::from(TemplateSyntaxError::new(parse_error("{{ }}"), "x", None));
        assert!(err.as_syntax().is_some());

        let err = RenderError::InvalidContext("nope".to_string());
        assert!(err.as_syntax().is_none());
    }
}
