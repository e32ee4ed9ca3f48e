//! Opt-in tracing setup for hosts and the `leuki_layout` tool.
//!
//! The library only emits `tracing` events. Installing a subscriber is left to
//! the host; with the `telemetry` feature enabled these helpers install a
//! compact stderr subscriber, leaving stdout free for layout JSON.

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "leuki=info";

/// Installs the default subscriber with [`DEFAULT_FILTER`].
///
/// Returns `false` when the feature is disabled or the host already installed
/// a global subscriber.
#[must_use]
pub fn init_default_tracing() -> bool {
    init_tracing(DEFAULT_FILTER)
}

/// Installs a compact stderr subscriber. `RUST_LOG` wins over `fallback_filter`.
#[must_use]
pub fn init_tracing(fallback_filter: &str) -> bool {
    #[cfg(feature = "telemetry")]
    {
        use tracing_subscriber::EnvFilter;

        let filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(fallback_filter))
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

        return tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .compact()
            .try_init()
            .is_ok();
    }

    #[cfg(not(feature = "telemetry"))]
    {
        let _ = fallback_filter;
        false
    }
}
