//! Logging initialization.
//!
//! Configures `tracing-subscriber` from the `[general]` section of
//! `OvrgenConfig`. Logs are written to stderr so stdout stays reserved
//! for status lines and JSON output.
//!
//! Filter precedence: `RUST_LOG`, then `--log-level`, then `general.log_level`.

use anyhow::Result;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use ovrgen_core::config::GeneralConfig;

/// Initialize the global tracing subscriber.
///
/// Must be called exactly once, before any tracing macros are used.
///
/// # Formats
///
/// * `"json"` - Machine-parseable JSON lines
/// * `"pretty"` - Human-readable output
pub fn init_tracing(config: &GeneralConfig, level_override: Option<&str>) -> Result<()> {
    let level = level_override.unwrap_or(&config.log_level);
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    match config.log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(std::io::stderr),
                )
                .try_init()
                .map_err(|e| {
                    anyhow::anyhow!("failed to initialize JSON tracing subscriber: {}", e)
                })?;
        }
        "pretty" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .pretty()
                        .with_writer(std::io::stderr),
                )
                .try_init()
                .map_err(|e| {
                    anyhow::anyhow!("failed to initialize pretty tracing subscriber: {}", e)
                })?;
        }
        _ => {
            return Err(anyhow::anyhow!(
                "unknown log format '{}', expected 'json' or 'pretty'",
                config.log_format
            ));
        }
    }

    Ok(())
}
