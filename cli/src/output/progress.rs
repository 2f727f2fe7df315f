//! Spinner shown while waiting on Twitter or docker.

#![allow(clippy::expect_used)] // Templates are compile-time constants

use std::future::Future;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use crate::output::OutputContext;

/// Create a spinner for indeterminate progress.
///
/// # Panics
///
/// Never in practice: the template is a constant.
#[must_use]
pub fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"])
            .template("{spinner:.cyan} {msg}")
            .expect("valid template"),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

/// Run `fut` behind a spinner when the terminal is interactive.
///
/// The spinner is cleared once the future completes, whatever its outcome.
pub async fn with_spinner<F: Future>(ctx: &OutputContext, msg: &str, fut: F) -> F::Output {
    if !ctx.show_progress() {
        return fut.await;
    }
    let pb = spinner(msg);
    let out = fut.await;
    pb.finish_and_clear();
    out
}
