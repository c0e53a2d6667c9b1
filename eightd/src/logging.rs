//! Diagnostic tracing for the wizard.
//!
//! Stdout belongs to the customer: prompts, the scrum report and the JSON
//! summary. Diagnostics go to stderr only, filtered by `RUST_LOG`, so
//! `--format json` output stays parseable with logging turned up.
//!
//! Submitted feedback is not a diagnostic. It is written to the feedback event
//! log by `io::feedback_log` on every submission regardless of `RUST_LOG`; the
//! `info!` event emitted alongside it is only a trace of that write.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Install the stderr subscriber. Call once, before any command runs.
///
/// Without `RUST_LOG` only warnings are shown. Useful targets:
///
/// ```bash
/// RUST_LOG=eightd::session=info eightd --non-interactive
/// RUST_LOG=eightd::io=debug eightd status
/// ```
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}
