use stepdag_core::constants::STEPDAG_LOG_VAR;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

// Re-export tracing macros for convenience
pub use tracing::{debug, error, info, instrument, span, trace, warn, Level, Span};

/// Initialize the tracing system
///
/// The filter comes from `STEPDAG_LOG`, then `RUST_LOG`, then `default_level`.
/// Output goes to stderr so stdout stays clean for plan output.
pub fn init(default_level: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync + 'static>> {
    let filter = env_filter(default_level)?;

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(is_tty())
        .compact()
        .with_target(false)
        .with_thread_ids(false)
        .with_level(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}

fn env_filter(default_level: &str) -> Result<EnvFilter, tracing_subscriber::filter::ParseError> {
    if let Ok(filter) = EnvFilter::try_from_env(STEPDAG_LOG_VAR) {
        return Ok(filter);
    }
    EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(default_level))
}

/// Check if we're running in a TTY environment
fn is_tty() -> bool {
    std::io::IsTerminal::is_terminal(&std::io::stderr())
}

/// Create a span for one planning call
pub fn plan_span(total_steps: usize) -> Span {
    span!(Level::INFO, "plan", total_steps = %total_steps)
}
