//! Renderer settings
//!
//! Settings are layered with figment, lowest priority first:
//!
//! 1. Hardcoded defaults
//! 2. An optional TOML file ([`RenderSettings::load_from`])
//! 3. Environment variables with the `INLINE_RENDER_` prefix, `__` for nesting
//!
//! # Example Configuration
//!
//! ```toml
//! debug = true
//!
//! [remap]
//! enabled = true
//! arg_lines_offset = 3
//! count_context_entries = true
//! ```
//!
//! The same through the environment:
//!
//! ```text
//! INLINE_RENDER_DEBUG=true
//! INLINE_RENDER_REMAP__ARG_LINES_OFFSET=3
//! ```

use std::path::Path;

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::remap::LineRemap;

/// Prefix of environment variables read by [`RenderSettings::from_env`]
pub const ENV_PREFIX: &str = "INLINE_RENDER_";

/// Complete renderer configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Engine debug mode: verbose errors and a live `dump()` function
    pub debug: bool,

    /// Line remapping for inline syntax errors
    pub remap: LineRemap,
}

impl RenderSettings {
    /// Load settings from the environment, falling back to defaults
    ///
    /// Unreadable settings are logged and treated as unset.
    #[must_use]
    pub fn from_env() -> Self {
        Self::load().unwrap_or_else(|err| {
            tracing::warn!(error = %err, "invalid renderer settings in environment, using defaults");
            Self::default()
        })
    }

    /// Load settings from defaults and the environment
    ///
    /// # Errors
    ///
    /// Returns an error if an `INLINE_RENDER_*` variable has the wrong type.
    pub fn load() -> anyhow::Result<Self> {
        let settings = Self::base()?.merge(Self::env()).extract()?;
        Ok(settings)
    }

    /// Load settings from a TOML file, with the environment on top
    ///
    /// # Errors
    ///
    /// Returns an error if the file contains invalid TOML or values of the
    /// wrong type.
    pub fn load_from(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let settings = Self::base()?
            .merge(Toml::file(path.as_ref()))
            .merge(Self::env())
            .extract()?;
        Ok(settings)
    }

    fn base() -> anyhow::Result<Figment> {
        Ok(Figment::new().merge(Toml::string(&toml::to_string(&Self::default())?)))
    }

    fn env() -> Env {
        Env::prefixed(ENV_PREFIX).split("__").lowercase(true)
    }
}
