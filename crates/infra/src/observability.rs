//! Tracing subscriber setup for hosts embedding the bridge.
//!
//! `RUST_LOG` overrides the default filter. Initialisation is idempotent: a
//! second call, or a host that already installed a subscriber, is reported
//! as `false` rather than an error.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Default filter: bridge crates at `info`, everything else at `warn`.
pub const DEFAULT_FILTER: &str = "warn,regbridge_domain=info,regbridge_core=info,regbridge_infra=info";

/// Install a global subscriber. Returns `true` if this call installed it.
pub fn init_tracing(default_filter: Option<&str>, json: bool) -> bool {
    let filter = build_env_filter(default_filter.unwrap_or(DEFAULT_FILTER));

    let installed = if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_target(true))
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().compact().with_target(false))
            .try_init()
    };

    installed.is_ok()
}

fn build_env_filter(default_filter: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter))
}
