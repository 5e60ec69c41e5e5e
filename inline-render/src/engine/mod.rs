//! The shared template engine
//!
//! An [`Engine`] couples one minijinja [`Environment`] with one
//! [`LoaderChain`]. The environment resolves every template name through the
//! chain and keeps the compiled result cached for its lifetime, so the chain
//! and the cache only ever grow.
//!
//! # Example
//!
//! ```rust
//! use inline_render::{Context, Engine};
//!
//! let engine = Engine::new(false);
//! engine.register_inline("hello", "Hello {{ name }}!");
//!
//! let mut ctx = Context::new();
//! ctx.insert("name", "World");
//! assert_eq!(engine.render("hello", &ctx).unwrap(), "Hello World!");
//! ```

mod debug;
mod loader;

use std::path::PathBuf;
use std::sync::Arc;

use minijinja::Environment;
use parking_lot::RwLock;

use crate::context::Context;

pub use loader::{DirectorySource, InlineSource, LoaderChain, LoaderError, TemplateSource};

/// Thread-safe template environment with an append-only loader chain
#[derive(Debug)]
pub struct Engine {
    env: Arc<RwLock<Environment<'static>>>,
    loader: LoaderChain,
    debug: bool,
}

impl Engine {
    /// Build an engine with an empty loader chain
    ///
    /// `debug_mode` switches minijinja's verbose error reporting and the
    /// `dump` template function.
    #[must_use]
    pub fn new(debug_mode: bool) -> Self {
        let loader = LoaderChain::new();

        let mut env = Environment::new();
        env.set_debug(debug_mode);
        let chain = loader.clone();
        env.set_loader(move |name| chain.load(name).map_err(Into::into));
        env.add_function("dump", debug::dump);

        tracing::debug!(debug_mode, "template engine created");

        Self {
            env: Arc::new(RwLock::new(env)),
            loader,
            debug: debug_mode,
        }
    }

    /// Whether the engine was built in debug mode
    #[must_use]
    pub const fn debug(&self) -> bool {
        self.debug
    }

    /// The loader chain every template name resolves through
    #[must_use]
    pub const fn loader(&self) -> &LoaderChain {
        &self.loader
    }

    /// Append a single-entry source mapping `id` to `source`
    ///
    /// The entry is never removed. If `id` is already known, the earlier
    /// entry (and its compiled template) keeps winning.
    pub fn register_inline(&self, id: &str, source: &str) {
        self.loader.push(InlineSource::new(id, source));
        tracing::trace!(id, entries = self.loader.len(), "inline template registered");
    }

    /// Append a file-backed source serving templates below `root`
    pub fn add_directory(&self, root: impl Into<PathBuf>) {
        let source = DirectorySource::new(root);
        tracing::debug!(root = %source.root().display(), "template directory registered");
        self.loader.push(source);
    }

    /// Render the template registered as `id`
    ///
    /// # Errors
    ///
    /// Returns the engine's error if `id` cannot be resolved, parsed or
    /// evaluated.
    pub fn render(&self, id: &str, context: &Context) -> Result<String, minijinja::Error> {
        let env = self.env.read();
        let template = env.get_template(id)?;
        template.render(context)
    }

    /// Run `f` with shared access to the environment
    pub fn with_environment<R>(&self, f: impl FnOnce(&Environment<'static>) -> R) -> R {
        f(&self.env.read())
    }

    /// Run `f` with exclusive access to the environment
    ///
    /// Use this to register extra filters, tests or globals.
    ///
    /// ```rust
    /// use inline_render::{Context, Engine};
    ///
    /// let engine = Engine::new(false);
    /// engine.with_environment_mut(|env| {
    ///     env.add_filter("shout", |value: String| value.to_uppercase());
    /// });
    /// engine.register_inline("loud", "{{ 'hi' | shout }}");
    /// assert_eq!(engine.render("loud", &Context::new()).unwrap(), "HI");
    /// ```
    pub fn with_environment_mut<R>(&self, f: impl FnOnce(&mut Environment<'static>) -> R) -> R {
        f(&mut self.env.write())
    }
}
