//! Logging setup for host applications
//!
//! The library itself only emits `tracing` events. Hosts that do not install
//! their own subscriber can call [`init`].

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install a global `tracing` subscriber
///
/// Sets up:
/// - Pretty formatting in debug builds, JSON in release builds
/// - `RUST_LOG` filtering, defaulting to `debug,inline_render=trace` (debug
///   builds) or `info` (release builds)
///
/// Calling it again, or after another subscriber was installed, is a no-op.
///
/// # Example
///
/// ```rust
/// inline_render::observability::init();
/// tracing::info!("host started");
/// ```
pub fn init() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cfg!(debug_assertions) {
            EnvFilter::new("debug,inline_render=trace")
        } else {
            EnvFilter::new("info")
        }
    });

    #[cfg(debug_assertions)]
    let result = tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().pretty())
        .try_init();

    #[cfg(not(debug_assertions))]
    let result = tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().json())
        .try_init();

    if let Err(err) = result {
        tracing::debug!(error = %err, "tracing subscriber already installed");
    }
}
