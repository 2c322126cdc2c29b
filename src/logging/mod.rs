//! Tracing setup.
//!
//! The library itself only emits `tracing` events (malformed rules, denied
//! requests). Services embedding it call [`setup_tracing`] once at startup to
//! get those events on the console:
//!
//! ```rust,ignore
//! fn main() {
//!     goodies::logging::setup_tracing();
//! }
//! ```
//!
//! Filtering follows `RUST_LOG` and defaults to `info`. Matcher diagnostics are
//! emitted at `debug`, so use `RUST_LOG=goodies=debug` to see them.
//!
//! Without `pretty_logs`, output is plain text for log aggregation:
//! ```text
//! DEBUG goodies::net::ip_matcher: Ignoring malformed subnet pattern pattern="10.0.0.0/x"
//! ```
//!
//! With `pretty_logs`, output is colorized with timestamps:
//! ```text
//! 14:32:01.234 DEBUG goodies::web::request_rules: Request denied remote="10.1.2.3" reason="blacklisted"
//! ```

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

#[cfg(not(feature = "pretty_logs"))]
mod production;

#[cfg(feature = "pretty_logs")]
mod pretty;

/// Installs the console subscriber.
///
/// # Panics
///
/// Panics if a global subscriber has already been installed.
pub fn setup_tracing() {
    Registry::default().with(setup_console_layer()).init();
    tracing::info!("Tracing initialized successfully [reporting to console only]");
}

fn console_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

#[cfg(feature = "pretty_logs")]
fn setup_console_layer() -> Box<dyn Layer<Registry> + Send + Sync + 'static> {
    tracing_subscriber::fmt::layer()
        .event_format(pretty::PrettyConsoleLogFormat)
        .with_filter(console_filter())
        .boxed()
}

#[cfg(not(feature = "pretty_logs"))]
fn setup_console_layer() -> Box<dyn Layer<Registry> + Send + Sync + 'static> {
    tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .event_format(production::ProductionLogFormat)
        .with_filter(console_filter())
        .boxed()
}
