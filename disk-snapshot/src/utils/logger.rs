//! Logging configuration using tracing.

use crate::config::LogConfig;
use std::io::IsTerminal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const FALLBACK_LEVEL: &str = "warn";

/// Build the filter: `RUST_LOG`, then `level`, then `warn`.
fn build_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new(FALLBACK_LEVEL))
}

/// Initialize logging from the `[log]` section, with `level_override`
/// (the `--log-level` flag) taking precedence over it.
///
/// Logs go to stderr so snapshot listings on stdout stay clean.
pub fn init(config: &LogConfig, level_override: Option<&str>) -> anyhow::Result<()> {
    let level = level_override.unwrap_or(&config.level);
    let stderr = std::io::stderr();

    tracing_subscriber::registry()
        .with(build_filter(level))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_ansi(stderr.is_terminal())
                .with_writer(std::io::stderr),
        )
        .try_init()?;

    Ok(())
}
