use std::path::Path;

use console::style;

use crate::domain::ping::{AttemptRecord, PingOutcome, Target};

/// Render one attempt as its console line.
///
/// Success shows the full display label, failures show the bare target
/// name: a success line states who replied, a failure may come from
/// anywhere.
pub fn render_attempt(target: &Target, record: &AttemptRecord) -> String {
    let clock = record.completed_at.format("%H:%M:%S");
    match &record.outcome {
        PingOutcome::Success { rtt_ms } => {
            format!("{} | {} | {}", clock, target.label(), render_rtt(*rtt_ms))
        }
        PingOutcome::Failure { .. } => {
            let reason = record.outcome.failure_text().unwrap_or_default();
            style(format!("{} | {} | {}", clock, target.name, reason))
                .yellow()
                .to_string()
        }
        PingOutcome::Transport { message } | PingOutcome::Unexpected { message } => {
            style(format!("{} | {} | {}", clock, target.name, message))
                .red()
                .to_string()
        }
    }
}

/// `time=<ms>ms`, with the sub-millisecond case rendered as `time<1ms`.
fn render_rtt(rtt_ms: u128) -> String {
    if rtt_ms < 1 {
        "time<1ms".to_string()
    } else {
        format!("time={rtt_ms}ms")
    }
}

/// One-time line announcing the log file in use.
pub fn render_log_notice(path: &Path) -> String {
    format!(
        "{} {}",
        style("Logging to:").cyan().bold(),
        style(path.display()).green()
    )
}

/// One-time line announcing the resolved target before the loop starts.
pub fn render_preamble(target: &Target) -> String {
    format!(
        "{} {}:",
        style("Pinging").cyan().bold(),
        style(target.label()).green()
    )
}
