//! Logging and tracing utilities for providers.
//!
//! This module provides helpers for setting up structured logging using the
//! `tracing` ecosystem. All logs are written to **stderr**; stdout is left
//! to the host runtime, which emits the serialized progress event there.
//!
//! # Quick Start
//!
//! ```ignore
//! use resource_provider_sdk::init_logging;
//!
//! fn main() {
//!     // Initialize logging (reads RUST_LOG env var)
//!     init_logging();
//!     tracing::info!("Provider starting");
//! }
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Controls log levels (e.g., `info`, `debug`,
//!   `resource_provider_sdk=debug`)

use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// The stderr subscriber shared by all init variants: compact format, no
/// thread IDs or file locations.
fn build_subscriber(filter: EnvFilter) -> impl SubscriberInitExt {
    tracing_subscriber::registry().with(filter).with(
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false),
    )
}

fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// Initialize the default logging subscriber.
///
/// This sets up a `tracing` subscriber that:
/// - Writes to **stderr** (stdout carries the invocation response)
/// - Respects the `RUST_LOG` environment variable for filtering
/// - Defaults to `info` level if `RUST_LOG` is not set
/// - Uses a compact, human-readable format
///
/// # Panics
///
/// Panics if a global subscriber has already been set.
pub fn init_logging() {
    build_subscriber(env_filter("info")).init();
}

/// Initialize logging with a custom default level.
///
/// Like [`init_logging`], but allows specifying a default log level
/// that will be used if `RUST_LOG` is not set.
pub fn init_logging_with_default(default_level: &str) {
    build_subscriber(env_filter(default_level)).init();
}

/// Try to initialize logging, returning false if already initialized.
///
/// Unlike [`init_logging`], this function does not panic if a subscriber
/// has already been set. This is useful in test scenarios or when the
/// provider might be initialized multiple times.
pub fn try_init_logging() -> bool {
    build_subscriber(env_filter("info")).try_init().is_ok()
}
