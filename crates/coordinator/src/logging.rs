//! Tracing setup

use tracing_subscriber::EnvFilter;

/// Install the global fmt subscriber.
///
/// Filtering follows `RUST_LOG` and falls back to `info`. Fails instead of
/// panicking when a global subscriber is already installed, so hosts that
/// bring their own subscriber can call this unconditionally.
pub fn init_tracing() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .try_init()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_fails_gracefully() {
        let _ = init_tracing();
        assert!(init_tracing().is_err());
    }
}
