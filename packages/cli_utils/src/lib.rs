#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Shared CLI utilities for the touki-sync binaries.
//!
//! Provides `indicatif` spinner helpers plus [`init_logger`], which wires
//! up `indicatif-log-bridge` so that `log::info!` and friends are suspended
//! while progress indicators redraw.
//!
//! Any binary that calls [`init_logger()`] at startup gets full progress
//! indicator support for free.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

pub use indicatif::MultiProgress;

/// Creates a steadily ticking spinner for one pipeline step (extraction,
/// worksheet lookup). Finish it with [`ProgressBar::finish_with_message`]
/// or [`ProgressBar::finish_and_clear`].
#[must_use]
pub fn step_spinner(multi: &MultiProgress, message: &str) -> ProgressBar {
    let bar = multi.add(ProgressBar::new_spinner());
    bar.enable_steady_tick(Duration::from_millis(100));
    bar.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    bar.set_message(message.to_string());
    bar
}

/// Initializes the global logger wrapped in `indicatif-log-bridge` so that
/// `log::info!` and friends are suspended while progress indicators redraw.
///
/// Returns the [`MultiProgress`] that all progress indicators must be
/// added to.
#[must_use]
pub fn init_logger() -> MultiProgress {
    let multi = MultiProgress::new();

    // Build the pretty-env-logger logger manually so we can wrap it.
    let logger = pretty_env_logger::formatted_builder()
        .parse_env("RUST_LOG")
        .build();
    let level = logger.filter();

    indicatif_log_bridge::LogWrapper::new(multi.clone(), logger)
        .try_init()
        .ok(); // Ignore error if logger was already set (e.g., in tests)

    log::set_max_level(level);

    multi
}
