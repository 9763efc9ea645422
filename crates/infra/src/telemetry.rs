//! Tracing bootstrap
//!
//! Installs a global `tracing` subscriber. The filter defaults to `info` and
//! follows `RUST_LOG` when set. Safe to call more than once; later calls and
//! calls made after another subscriber was installed are no-ops.

use std::sync::OnceLock;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

static TRACING_INITIALIZED: OnceLock<bool> = OnceLock::new();

/// Install the global subscriber, emitting JSON lines when `json` is set.
///
/// Returns whether this call installed the subscriber.
pub fn init_tracing(json: bool) -> bool {
    let mut installed_now = false;
    TRACING_INITIALIZED.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let layer = if json {
            fmt::layer().with_target(true).json().with_filter(filter).boxed()
        } else {
            fmt::layer().with_target(true).with_ansi(true).with_filter(filter).boxed()
        };

        installed_now = tracing_subscriber::registry().with(layer).try_init().is_ok();
        if !installed_now {
            tracing::debug!("Global tracing subscriber already set, keeping it");
        }
        installed_now
    });
    installed_now
}
