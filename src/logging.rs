//! Tracing subscriber setup shared by both binaries.

use tracing_subscriber::EnvFilter;

/// Filter used when neither `CASE_STUDIO_LOG` nor `RUST_LOG` is set
pub const DEFAULT_FILTER: &str = "case_studio=info";

/// Install a formatted subscriber writing to stderr.
///
/// `CASE_STUDIO_LOG` is checked first, then `RUST_LOG`. Calling this twice
/// is harmless; the second call keeps the first subscriber.
pub fn init_logging() {
    let filter = EnvFilter::try_from_env("CASE_STUDIO_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
