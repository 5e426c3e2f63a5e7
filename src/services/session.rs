//! Ping session engine.
//!
//! Drives the attempt loop against an already resolved target: probe,
//! print, optionally log, sleep, repeat. One attempt fully completes
//! before the next starts.

use std::path::PathBuf;

use chrono::Local;
use console::{Term, style};
use tokio::signal;
use tokio::time::{Duration, sleep};
use tracing::{debug, instrument};

use crate::csvlog;
use crate::domain::ping::{AttemptRecord, PingOutcome, Target};
use crate::fmt;

/// Delay between two consecutive attempts, never skipped on failure.
const ATTEMPT_INTERVAL: Duration = Duration::from_secs(1);

/// Source of raw attempt outcomes. Production uses the surge-ping adapter;
/// tests drive the loop with a scripted implementation.
#[allow(async_fn_in_trait)]
pub trait Prober {
    /// Send one echo request and classify whatever came back.
    async fn probe(&mut self) -> PingOutcome;
}

/// How many attempts a session runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunMode {
    /// Repeat until the process is interrupted.
    UntilInterrupted,
    /// Exactly this many attempts, then exit normally.
    Count(u32),
}

/// Everything the loop needs, built once before the first attempt.
#[derive(Clone, Debug)]
pub struct Session {
    pub target: Target,
    pub mode: RunMode,
    pub log_path: Option<PathBuf>,
}

impl Session {
    /// Run the attempt loop to completion, or until Ctrl-C in
    /// [`RunMode::UntilInterrupted`]. Cancellation takes effect at the
    /// sleep boundary; an in-flight request runs out its timeout.
    #[instrument(skip(self, prober, term), fields(target = %self.target.name))]
    pub async fn run<P: Prober>(&self, prober: &mut P, term: &Term) {
        let mut sent: u32 = 0;
        loop {
            let outcome = prober.probe().await;
            let record = AttemptRecord {
                completed_at: Local::now(),
                outcome,
            };
            debug!(status = record.outcome.status_label(), "attempt finished");

            term.write_line(&fmt::text::render_attempt(&self.target, &record))
                .ok();
            if let Some(path) = &self.log_path {
                // The attempt already happened, a failed append must not
                // kill the loop.
                if let Err(e) = csvlog::append(path, &self.target, &record) {
                    term.write_line(
                        &style(format!("Error: cannot write to log file: {e}"))
                            .red()
                            .to_string(),
                    )
                    .ok();
                }
            }

            sent = sent.saturating_add(1);
            match self.mode {
                RunMode::Count(total) if sent >= total => break,
                RunMode::Count(_) => sleep(ATTEMPT_INTERVAL).await,
                RunMode::UntilInterrupted => {
                    tokio::select! {
                        _ = sleep(ATTEMPT_INTERVAL) => {}
                        _ = signal::ctrl_c() => break,
                    }
                }
            }
        }
    }
}
