//! Ping domain types.
//!
//! A [`Target`] is resolved exactly once before the loop starts; every
//! attempt against it produces one [`PingOutcome`], stamped into an
//! [`AttemptRecord`] when it completes.

use chrono::{DateTime, Local};
use std::net::IpAddr;

/// Target host resolved to an IP address.
#[derive(Clone, Debug)]
pub struct Target {
    pub name: String,
    pub ip: IpAddr,
    label: String,
}

impl Target {
    pub fn new(name: impl Into<String>, ip: IpAddr) -> Self {
        let name = name.into();
        let ip_text = ip.to_string();
        let label = if name == ip_text {
            name.clone()
        } else {
            format!("{name} [{ip_text}]")
        };
        Self { name, ip, label }
    }

    /// Display label: the bare name, or `name [ip]` when they differ.
    pub fn label(&self) -> &str {
        &self.label
    }
}

/// Classified result of a single echo attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PingOutcome {
    /// Echo reply from the target.
    Success { rtt_ms: u128 },
    /// The ICMP layer reported a non-success status. `reply_source` is set
    /// when the failure reply came from an identifiable node, typically an
    /// intermediate router.
    Failure {
        status: String,
        reply_source: Option<IpAddr>,
    },
    /// The ICMP subsystem itself failed before a status could be produced.
    Transport { message: String },
    /// Anything else that went wrong during the attempt.
    Unexpected { message: String },
}

impl PingOutcome {
    /// Transport-level failure while pinging `ip`.
    pub fn transport(ip: IpAddr, err: impl std::fmt::Display) -> Self {
        PingOutcome::Transport {
            message: format!("A ping exception occurred to {ip}: {err}"),
        }
    }

    /// Catch-all for anything the other variants do not cover.
    pub fn unexpected(err: impl std::fmt::Display) -> Self {
        PingOutcome::Unexpected {
            message: format!("An unexpected error occurred: {err}"),
        }
    }

    /// Value of the `status` column in the CSV log.
    pub fn status_label(&self) -> &str {
        match self {
            PingOutcome::Success { .. } => "Success",
            PingOutcome::Failure { status, .. } => status,
            PingOutcome::Transport { .. } => "Exception",
            PingOutcome::Unexpected { .. } => "Error",
        }
    }

    /// Human readable failure text, shared by the console line and the CSV
    /// `failure_reason` column. `None` on success.
    pub fn failure_text(&self) -> Option<String> {
        match self {
            PingOutcome::Success { .. } => None,
            PingOutcome::Failure {
                status,
                reply_source,
            } => Some(match reply_source {
                Some(addr) => format!("Reply from {addr}: {status}"),
                None => status.clone(),
            }),
            PingOutcome::Transport { message } | PingOutcome::Unexpected { message } => {
                Some(message.clone())
            }
        }
    }
}

/// A completed attempt stamped with its completion time.
#[derive(Clone, Debug)]
pub struct AttemptRecord {
    pub completed_at: DateTime<Local>,
    pub outcome: PingOutcome,
}
