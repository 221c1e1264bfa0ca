use tracing_subscriber::{fmt, EnvFilter};

/// Initialize tracing for the binary.
///
/// `RUST_LOG` wins when set, otherwise the provided default level is used.
pub fn init(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_file(false)
        .with_line_number(false)
        .init();
}
