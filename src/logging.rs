//! Subscriber setup for binaries and tests embedding a parameter tree.
//!
//! The library only emits `tracing` events; nothing is printed until the
//! host installs a subscriber. `RUST_LOG` overrides the default filter.

/// Install a formatting subscriber filtered by `RUST_LOG`, falling back to
/// `default_filter` (for example `"info,paramtree=debug"`).
///
/// Returns `false` when a global subscriber was already installed.
pub fn init_logging(default_filter: &str) -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .try_init()
        .is_ok()
}
