//! Logging setup.
//!
//! formflow logs through `tracing`. Applications that do not install their
//! own subscriber can call [`init_logging`] once at startup.

use tracing_subscriber::EnvFilter;

/// Output format of the installed subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per event.
    Json,
}

/// Installs a global `tracing` subscriber writing to stderr.
///
/// The filter comes from `RUST_LOG`, falling back to `warn`. Returns false
/// if a global subscriber was already installed.
pub fn init_logging(format: LogFormat) -> bool {
    init_logging_with(format, None)
}

/// Like [`init_logging`] with an explicit filter directive such as
/// `"formflow=debug"`, which takes precedence over `RUST_LOG`.
pub fn init_logging_with(format: LogFormat, directive: Option<&str>) -> bool {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter(directive))
        .with_target(false)
        .with_writer(std::io::stderr);

    match format {
        LogFormat::Text => builder.try_init().is_ok(),
        LogFormat::Json => builder.json().try_init().is_ok(),
    }
}

fn env_filter(directive: Option<&str>) -> EnvFilter {
    directive.map_or_else(
        || EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        EnvFilter::new,
    )
}
