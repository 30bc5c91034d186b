//! Tracing subscriber setup for the binaries.
//!
//! ## Log Levels
//!
//! - **INFO**: solve start, pause and resume, completion, city generation
//! - **DEBUG**: every step, city edits, resets
//! - **TRACE**: ticks that fire while paused

use std::sync::OnceLock;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

static INIT: OnceLock<()> = OnceLock::new();

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_DIRECTIVE: &str = "tourviz=info";

/// Install a stderr `fmt` subscriber filtered by `RUST_LOG`, falling back
/// to `default_directive`.
///
/// Only the first call has effect. A subscriber installed elsewhere wins.
pub fn init_tracing(default_directive: &str) {
    INIT.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_directive));

        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(false),
            )
            .try_init();
    });
}

/// Whether `RUST_LOG` is set, for front ends that only log on request.
#[must_use]
pub fn requested_by_env() -> bool {
    std::env::var_os(EnvFilter::DEFAULT_ENV).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_repeatable() {
        init_tracing(DEFAULT_DIRECTIVE);
        init_tracing("tourviz=trace");
        tracing::info!("logging initialised twice without panicking");
    }
}
