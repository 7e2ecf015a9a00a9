//! Logging setup for Ppurigi binaries.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Build the default `EnvFilter` directives, one `target=level` pair per target.
///
/// Cargo package names use dashes while tracing targets use the crate name,
/// so dashes are normalized to underscores.
pub fn default_directives(targets: &[&str], default_log_level: &str) -> String {
    targets
        .iter()
        .map(|target| format!("{}={}", target.replace('-', "_"), default_log_level))
        .collect::<Vec<_>>()
        .join(",")
}

/// Initialize the tracing subscriber for the given targets.
///
/// `RUST_LOG` takes precedence over `default_log_level` when set.
///
/// # Examples
///
/// ```no_run
/// use ppurigi_shared::logger::setup_logger;
///
/// setup_logger(&["ppurigi-client", "ppurigi_client"], "info");
/// ```
pub fn setup_logger(targets: &[&str], default_log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_directives(targets, default_log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
