//! Logging setup utilities for the VibeLounge binaries.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Build the default `EnvFilter` directive for a crate.
///
/// The crate's own target, the shared crate and `tower_http` all log at
/// `default_log_level`.
pub fn default_filter_directive(crate_name: &str, default_log_level: &str) -> String {
    format!(
        "{}={},{}={},tower_http={}",
        crate_name.replace('-', "_"),
        default_log_level,
        env!("CARGO_PKG_NAME").replace('-', "_"),
        default_log_level,
        default_log_level
    )
}

/// Initialize the tracing subscriber with the specified default log level.
///
/// The log level can be overridden using the `RUST_LOG` environment variable.
///
/// # Arguments
///
/// * `crate_name` - The package name of the binary (e.g., `env!("CARGO_PKG_NAME")`)
/// * `default_log_level` - The default log level (e.g., "debug", "info", "warn", "error")
///
/// # Examples
///
/// ```no_run
/// use vibelounge_shared::logger::setup_logger;
///
/// setup_logger("vibelounge-server", "debug");
/// ```
pub fn setup_logger(crate_name: &str, default_log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                default_filter_directive(crate_name, default_log_level).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::debug!("Logger initialized for '{}'", crate_name);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_directive_replaces_hyphens() {
        // テスト項目: クレート名のハイフンがアンダースコアに置換される
        // given (前提条件):
        let crate_name = "vibelounge-server";

        // when (操作):
        let directive = default_filter_directive(crate_name, "info");

        // then (期待する結果):
        assert!(directive.starts_with("vibelounge_server=info"));
        assert!(directive.contains("vibelounge_shared=info"));
        assert!(directive.ends_with("tower_http=info"));
    }
}
