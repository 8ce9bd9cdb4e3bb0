//! Tracing initialization.
//!
//! Standard output carries the menu and result tables, so all diagnostics go
//! to standard error through a `tracing-subscriber` fmt layer. The level is
//! taken from `RUST_LOG` and defaults to `warn`, which keeps the interactive
//! session quiet unless a statement is slow or a handler fails.
//!
//! ```bash
//! # trace every statement the gateway runs
//! RUST_LOG=hotelctl=debug,sqlx=debug hotelctl hotels 5432 clerk
//! ```

use tracing::debug;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Default filter when `RUST_LOG` is unset
pub const DEFAULT_FILTER: &str = "warn";

/// Initialize tracing with a stderr fmt layer.
pub fn init_telemetry() -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr).with_target(true))
        .try_init()?;

    debug!("Telemetry initialized");
    Ok(())
}
