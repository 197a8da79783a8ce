use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install a global fmt subscriber filtered by `RUST_LOG`.
///
/// `default_filter` applies when `RUST_LOG` is unset or invalid. Fails if a
/// global subscriber has already been installed.
pub fn init_tracing(default_filter: &str) -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer())
        .try_init()?;

    tracing::debug!(filter = %default_filter, "Tracing initialized");
    Ok(())
}
