//! Process-wide convenience entry points
//!
//! A single [`Renderer`] built lazily from [`RenderSettings::from_env`] on
//! first use and shared by every caller in the process. Prefer owning a
//! [`Renderer`] and passing it around; use these when threading a handle
//! through is not an option.
//!
//! [`RenderSettings::from_env`]: crate::config::RenderSettings::from_env

use std::sync::OnceLock;

use crate::context::Context;
use crate::engine::Engine;
use crate::error::RenderError;
use crate::renderer::Renderer;

/// Get or initialize the process-wide renderer (lazy singleton)
pub fn renderer() -> &'static Renderer {
    static RENDERER: OnceLock<Renderer> = OnceLock::new();
    RENDERER.get_or_init(Renderer::from_env)
}

/// Replace the process-wide default context
pub fn set_default_context(context: Context) {
    renderer().set_default_context(context);
}

/// Render an inline template with the process-wide renderer
///
/// # Errors
///
/// See [`Renderer::render`].
#[track_caller]
pub fn render(source: &str, id: &str, context: &Context) -> Result<String, RenderError> {
    renderer().render(source, id, context)
}

/// Render an inline template to stdout with the process-wide renderer
///
/// # Errors
///
/// See [`Renderer::display`].
#[track_caller]
pub fn display(source: &str, id: &str, context: &Context) -> Result<(), RenderError> {
    renderer().display(source, id, context)
}

/// The process-wide engine, built on first access
pub fn engine() -> &'static Engine {
    renderer().engine()
}
