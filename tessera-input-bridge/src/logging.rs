//! Tracing subscriber setup for hosts that do not install their own.

/// Installs a global `tracing` subscriber.
///
/// `RUST_LOG` takes precedence. Without it, desktop builds log
/// `error,tessera_input_bridge=info`. Calling this more than once, or after
/// the host installed a subscriber, does nothing.
pub fn init_tracing() {
    #[cfg(target_os = "android")]
    {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_max_level(tracing::Level::INFO)
            .try_init();
    }

    #[cfg(not(target_os = "android"))]
    {
        let filter = match tracing_subscriber::EnvFilter::try_from_default_env() {
            Ok(filter) => filter,
            Err(_) => match tracing_subscriber::EnvFilter::try_new(
                "error,tessera_input_bridge=info",
            ) {
                Ok(filter) => filter,
                Err(_) => tracing_subscriber::EnvFilter::new("error"),
            },
        };

        let _ = tracing_subscriber::fmt()
            .pretty()
            .with_env_filter(filter)
            .try_init();
    }
}
