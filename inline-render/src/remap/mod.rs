//! Best-effort source mapping for inline template syntax errors
//!
//! The engine reports syntax errors relative to the template text it
//! compiled. An inline template is usually a multi-line raw string sitting in
//! the middle of a call expression, so that line is of little use on its own.
//! [`LineRemap`] walks back from the line of the render call, over a fixed
//! call overhead, the context argument (one entry per line) and the whole
//! template body, then forward by the engine's relative line:
//!
//! ```text
//! corrected = call_site_line - arg_lines_offset - context_entries - source_lines + template_line
//! ```
//!
//! The value is kept as computed, even when it is zero or negative.
//!
//! The call-site line comes from `#[track_caller]`, which reports the line the
//! call starts on. The formula assumes the call is reported *below* the
//! template literal. When the call starts on the literal's opening line:
//!
//! ```rust,ignore
//! renderer.render(r#"
//! <h1>{{ title }}</h1>
//! "#, "page", &ctx)?;
//! ```
//!
//! the reported line sits `arg_lines_offset + context_entries + source_lines - 1`
//! lines above the failing line. The line only matches when the render call is
//! reported that many lines further down; tune [`LineRemap::arg_lines_offset`]
//! to the layout used by a code base. Other layouts produce a wrong, but never
//! failing, line number.

use serde::{Deserialize, Serialize};

use crate::context::Context;
use crate::error::TemplateSyntaxError;

/// Default number of lines between the template literal and the reported call line
pub const DEFAULT_ARG_LINES_OFFSET: usize = 3;

/// Layout facts about a single render call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallSite {
    /// Line of the render call in the caller's file
    pub line: usize,
    /// Entries in the context passed to the call
    pub context_entries: usize,
    /// `\n`-separated pieces of the template source
    pub source_lines: usize,
}

impl CallSite {
    /// Describe a call made at `line` with the given template and context
    #[must_use]
    pub fn new(line: usize, source: &str, context: &Context) -> Self {
        Self {
            line,
            context_entries: context.len(),
            source_lines: source.split('\n').count(),
        }
    }
}

/// Tunable line remapping for path-less syntax errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineRemap {
    /// Remap at all
    pub enabled: bool,

    /// Fixed overhead subtracted from the call-site line
    pub arg_lines_offset: usize,

    /// Subtract one line per context entry
    pub count_context_entries: bool,
}

impl Default for LineRemap {
    fn default() -> Self {
        Self {
            enabled: true,
            arg_lines_offset: DEFAULT_ARG_LINES_OFFSET,
            count_context_entries: true,
        }
    }
}

impl LineRemap {
    /// Corrected line for an error at `template_line` of a template rendered from `site`
    ///
    /// Plain formula value; zero or negative when the call site does not
    /// follow the expected layout.
    #[must_use]
    pub fn corrected_line(&self, site: &CallSite, template_line: i64) -> i64 {
        let context_entries = if self.count_context_entries {
            site.context_entries
        } else {
            0
        };
        signed(site.line) - signed(self.arg_lines_offset) - signed(context_entries)
            - signed(site.source_lines)
            + template_line
    }

    /// Rewrite the line of `err` in place
    ///
    /// Does nothing when remapping is disabled or the error has no line.
    pub fn apply(&self, err: &mut TemplateSyntaxError, site: &CallSite) {
        if !self.enabled {
            return;
        }
        let Some(template_line) = err.template_line() else {
            return;
        };
        let corrected = self.corrected_line(site, template_line);
        tracing::debug!(
            template = err.name(),
            template_line,
            call_site_line = site.line,
            corrected,
            "remapped inline template syntax error"
        );
        err.set_template_line(corrected);
    }
}

fn signed(value: usize) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}
