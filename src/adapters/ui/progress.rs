//! indicatif helpers: spinner around store calls and the lockout countdown line.

use crate::domain::format_remaining;
use crate::usecases::countdown::LockoutCountdown;
use indicatif::{ProgressBar, ProgressStyle};
use std::future::Future;
use std::time::Duration;

const TICK_CHARS: &str = "⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏";

fn spinner_style(template: &str) -> ProgressStyle {
    ProgressStyle::default_spinner()
        .template(template)
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_chars(TICK_CHARS)
}

pub fn spinner(msg: impl Into<String>) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(spinner_style("{spinner:.cyan} {msg}"));
    pb.set_message(msg.into());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

/// Run `fut` with a spinner; the spinner is cleared when it resolves.
pub async fn with_spinner<F, T>(msg: impl Into<String>, fut: F) -> T
where
    F: Future<Output = T>,
{
    let pb = spinner(msg);
    let out = fut.await;
    pb.finish_and_clear();
    out
}

/// Blocks until the countdown ends, redrawing the remaining time each tick.
pub async fn show_lockout(mut countdown: LockoutCountdown) {
    let pb = ProgressBar::new_spinner();
    pb.set_style(spinner_style("{spinner:.red} {msg}"));
    pb.enable_steady_tick(Duration::from_millis(120));
    while let Some(secs) = countdown.remaining() {
        pb.set_message(format!(
            "Access blocked. Try again in {}",
            format_remaining(secs)
        ));
        if !countdown.changed().await {
            break;
        }
    }
    pb.finish_with_message("Access unlocked. You can try again.");
}
