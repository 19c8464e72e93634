// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Simple diagnostics library for the handlefs workspace
//!
//! Library crates log through the `log` facade; this crate owns the one
//! place where a logger gets installed.
//!
//! Usage:
//! - Set HANDLEFS_LOG=off (default) - no logs
//! - Set HANDLEFS_LOG=info - basic operation logs
//! - Set HANDLEFS_LOG=debug - handle navigation and write-session lifecycle
//! - Set HANDLEFS_LOG=trace - everything

use log::LevelFilter;
use std::sync::Once;

// Re-export log so callers need only one dependency
pub use log;

/// Environment variable consulted by [`init_diagnostics`]
pub const LOG_ENV: &str = "HANDLEFS_LOG";

static INIT: Once = Once::new();

/// Map a `HANDLEFS_LOG` value onto a level filter.
///
/// Returns `None` for unrecognized values.
#[must_use]
pub fn parse_level(value: &str) -> Option<LevelFilter> {
    match value.trim().to_ascii_lowercase().as_str() {
        "off" | "" => Some(LevelFilter::Off),
        "error" => Some(LevelFilter::Error),
        "warn" => Some(LevelFilter::Warn),
        "info" => Some(LevelFilter::Info),
        "debug" => Some(LevelFilter::Debug),
        "trace" => Some(LevelFilter::Trace),
        _ => None,
    }
}

/// Initialize diagnostics based on the HANDLEFS_LOG environment variable
///
/// This should be called once at application startup. It's safe to call
/// multiple times - subsequent calls will be ignored. If another logger was
/// already installed by the host process, that logger is left in place.
pub fn init_diagnostics() {
    INIT.call_once(|| {
        let value = std::env::var(LOG_ENV).unwrap_or_else(|_| "off".to_string());
        let (level, unknown) = match parse_level(&value) {
            Some(LevelFilter::Off) => return,
            Some(level) => (level, false),
            None => (LevelFilter::Info, true),
        };

        let installed = env_logger::Builder::new()
            .filter_level(level)
            .target(env_logger::Target::Stderr)
            .try_init()
            .is_ok();

        if installed && unknown {
            log::warn!("Unknown {LOG_ENV} value '{value}', using 'info'");
        }
    });
}

/// Re-export the init function for convenience
pub use init_diagnostics as init;
