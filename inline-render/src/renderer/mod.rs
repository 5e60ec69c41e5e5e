//! Inline rendering pipeline
//!
//! [`Renderer`] is the handle host applications own and pass around. It
//! builds its [`Engine`] lazily, exactly once, and keeps the default context
//! that every render call is layered over.
//!
//! ```rust
//! use inline_render::{Context, RenderSettings, Renderer};
//!
//! # fn main() -> Result<(), inline_render::RenderError> {
//! let renderer = Renderer::new(RenderSettings::default());
//! renderer.set_default_context(Context::from_serialize(minijinja::context! { site => "Acme" })?);
//!
//! let mut ctx = Context::new();
//! ctx.insert("page", "About");
//! let html = renderer.render("{{ page }} | {{ site }}", "title", &ctx)?;
//! assert_eq!(html, "About | Acme");
//! # Ok(())
//! # }
//! ```

use std::io::{self, Write};
use std::panic::Location;
use std::sync::OnceLock;

use minijinja::ErrorKind;
use parking_lot::RwLock;

use crate::config::RenderSettings;
use crate::context::Context;
use crate::engine::Engine;
use crate::error::{RenderError, TemplateSyntaxError};
use crate::remap::CallSite;

/// Owner of the shared engine and the default context
#[derive(Debug)]
pub struct Renderer {
    settings: RenderSettings,
    engine: OnceLock<Engine>,
    defaults: RwLock<Context>,
}

impl Renderer {
    /// Create a renderer; the engine is built on first use
    #[must_use]
    pub fn new(settings: RenderSettings) -> Self {
        Self {
            settings,
            engine: OnceLock::new(),
            defaults: RwLock::new(Context::new()),
        }
    }

    /// Create a renderer from `INLINE_RENDER_*` environment settings
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(RenderSettings::from_env())
    }

    /// Settings this renderer was built with
    #[must_use]
    pub const fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    /// Build the engine if it does not exist yet and return it
    pub fn ensure_engine(&self) -> &Engine {
        self.engine.get_or_init(|| Engine::new(self.settings.debug))
    }

    /// The shared engine, for registering filters, functions or directories
    pub fn engine(&self) -> &Engine {
        self.ensure_engine()
    }

    /// Replace the default context wholesale
    ///
    /// Only renders started afterwards see the new defaults.
    pub fn set_default_context(&self, context: Context) {
        tracing::debug!(entries = context.len(), "default context replaced");
        *self.defaults.write() = context;
    }

    /// Snapshot of the current default context
    #[must_use]
    pub fn default_context(&self) -> Context {
        self.defaults.read().clone()
    }

    /// Render `source` registered under `id`
    ///
    /// The template is appended to the loader chain for good. Syntax errors in
    /// templates without a backing file get their line rewritten to point at
    /// the calling source file (see [`crate::remap`]).
    ///
    /// # Errors
    ///
    /// [`RenderError::Syntax`] if the template does not parse,
    /// [`RenderError::Runtime`] for any other engine failure.
    #[track_caller]
    pub fn render(&self, source: &str, id: &str, context: &Context) -> Result<String, RenderError> {
        let call_line = Location::caller().line() as usize;
        let engine = self.ensure_engine();
        engine.register_inline(id, source);

        let effective = Context::merged(&self.defaults.read(), context);

        engine.render(id, &effective).map_err(|err| {
            self.classify(engine, err, id, &CallSite::new(call_line, source, context))
        })
    }

    /// Render and write the output to `writer`
    ///
    /// Nothing is written if rendering fails.
    ///
    /// # Errors
    ///
    /// Same as [`Renderer::render`], plus [`RenderError::Io`] if writing fails.
    #[track_caller]
    pub fn display_to<W: Write>(
        &self,
        mut writer: W,
        source: &str,
        id: &str,
        context: &Context,
    ) -> Result<(), RenderError> {
        let output = self.render(source, id, context)?;
        writer.write_all(output.as_bytes())?;
        writer.flush()?;
        Ok(())
    }

    /// Render and write the output to stdout
    ///
    /// # Errors
    ///
    /// Same as [`Renderer::display_to`].
    #[track_caller]
    pub fn display(&self, source: &str, id: &str, context: &Context) -> Result<(), RenderError> {
        self.display_to(io::stdout().lock(), source, id, context)
    }

    fn classify(
        &self,
        engine: &Engine,
        err: minijinja::Error,
        id: &str,
        site: &CallSite,
    ) -> RenderError {
        if err.kind() != ErrorKind::SyntaxError {
            return RenderError::Runtime(err);
        }

        let name = err.name().unwrap_or(id).to_owned();
        let path = engine.loader().source_path(&name);
        let mut syntax = TemplateSyntaxError::new(err, id, path);
        if syntax.source_path().is_none() {
            self.settings.remap.apply(&mut syntax, site);
        }
        RenderError::Syntax(syntax)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(RenderSettings::default())
    }
}
