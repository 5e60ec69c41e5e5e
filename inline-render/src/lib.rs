//! inline-render: one shared Jinja engine for inline templates
//!
//! Host applications get a single rendering entry point on top of
//! [minijinja](https://docs.rs/minijinja) with two extras:
//!
//! - Template strings written inline in code are rendered without any
//!   filesystem loader, registered under a caller-chosen id.
//! - When such a template fails to parse, the error line points into the
//!   caller's source file instead of into the template fragment.
//!
//! # Quick Start
//!
//! ```rust
//! use inline_render::prelude::*;
//!
//! # fn main() -> Result<(), RenderError> {
//! let renderer = Renderer::from_env();
//!
//! let mut ctx = Context::new();
//! ctx.insert("name", "World");
//!
//! let out = renderer.render(r#"Hello {{ name }}!"#, "greeting", &ctx)?;
//! assert_eq!(out, "Hello World!");
//! # Ok(())
//! # }
//! ```
//!
//! # Resource growth
//!
//! Every render call appends one entry to the loader chain and the engine
//! keeps one compiled template per id. Neither is ever evicted; use a fixed
//! set of ids in long-running processes.

pub mod config;
pub mod context;
pub mod engine;
pub mod error;
pub mod global;
pub mod observability;
pub mod remap;
pub mod renderer;

pub use config::RenderSettings;
pub use context::Context;
pub use engine::Engine;
pub use error::{RenderError, TemplateSyntaxError};
pub use remap::{CallSite, LineRemap};
pub use renderer::Renderer;

pub mod prelude {
    //! Convenience re-exports for common types
    //!
    //! ```rust
    //! use inline_render::prelude::*;
    //! ```

    pub use crate::config::RenderSettings;
    pub use crate::context::Context;
    pub use crate::engine::{DirectorySource, Engine, InlineSource, LoaderChain, TemplateSource};
    pub use crate::error::{RenderError, TemplateSyntaxError};
    pub use crate::remap::LineRemap;
    pub use crate::renderer::Renderer;

    // Re-export the engine for `context!` and custom filters
    pub use minijinja;
}
