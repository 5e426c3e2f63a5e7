//! Per-attempt CSV logging.
//!
//! Every append is an independent open-append-close, so external readers
//! observe a fully written file between attempts. The file is created with
//! its header on first write and only ever appended to afterwards.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, SecondsFormat};

use crate::domain::ping::{AttemptRecord, PingOutcome, Target};
use crate::error::ZpingError;

/// Column header written when a new file is created.
const HEADER: &str = "datetime,target_name,target_ip,status,RoundtripTime,failure_reason";

/// Characters replaced by `_` when a target name becomes part of a file name.
const UNSAFE_CHARS: [char; 9] = ['\\', '/', ':', '*', '?', '"', '<', '>', '|'];

/// File-name-safe form of a target name. Only the characters in
/// [`UNSAFE_CHARS`] are replaced, everything else passes through.
pub fn sanitize_target(name: &str) -> String {
    name.chars()
        .map(|c| if UNSAFE_CHARS.contains(&c) { '_' } else { c })
        .collect()
}

/// Default log path for a target, stamped with the generation time:
/// `zping-<target>-<yyyyMMddTHHmmss>.csv` in the working directory.
pub fn default_path(target: &str, generated_at: DateTime<Local>) -> PathBuf {
    PathBuf::from(format!(
        "zping-{}-{}.csv",
        sanitize_target(target),
        generated_at.format("%Y%m%dT%H%M%S")
    ))
}

/// Resolve the log destination from the CLI flags, `None` when logging is
/// off. An explicit path implies logging and is used verbatim. The parent
/// directory of the resolved path must already exist; a missing directory
/// aborts the run before anything else happens.
pub fn resolve_destination(
    target: &str,
    csvlog: bool,
    explicit: Option<&Path>,
) -> Result<Option<PathBuf>, ZpingError> {
    let path = match explicit {
        Some(p) => p.to_path_buf(),
        None if csvlog => default_path(target, Local::now()),
        None => return Ok(None),
    };
    ensure_parent_exists(&path)?;
    Ok(Some(path))
}

fn ensure_parent_exists(path: &Path) -> Result<(), ZpingError> {
    match path.parent() {
        // A bare file name lands in the working directory.
        None => Ok(()),
        Some(parent) if parent.as_os_str().is_empty() => Ok(()),
        Some(parent) if parent.is_dir() => Ok(()),
        Some(parent) => Err(ZpingError::Config(format!(
            "log directory '{}' does not exist",
            parent.display()
        ))),
    }
}

/// Append one record, creating the file with its header first if needed.
/// The row timestamp is captured here, independently of the console line.
pub fn append(path: &Path, target: &Target, record: &AttemptRecord) -> Result<(), ZpingError> {
    let new_file = !path.exists();
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    if new_file {
        writeln!(file, "{HEADER}")?;
    }
    writeln!(file, "{}", render_row(Local::now(), target, record))?;
    Ok(())
}

/// One CSV data row for a completed attempt.
fn render_row(logged_at: DateTime<Local>, target: &Target, record: &AttemptRecord) -> String {
    let rtt = match &record.outcome {
        PingOutcome::Success { rtt_ms } => rtt_ms.to_string(),
        _ => String::new(),
    };
    let reason = record.outcome.failure_text().unwrap_or_default();
    [
        logged_at.to_rfc3339_opts(SecondsFormat::Micros, false),
        target.name.clone(),
        target.ip.to_string(),
        record.outcome.status_label().to_string(),
        rtt,
        reason,
    ]
    .iter()
    .map(|raw| field(raw))
    .collect::<Vec<_>>()
    .join(",")
}

/// Quote a field only when it needs it, so ordinary rows stay bare.
fn field(raw: &str) -> String {
    if raw.contains([',', '"', '\r', '\n']) {
        format!("\"{}\"", raw.replace('"', "\"\""))
    } else {
        raw.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn target() -> Target {
        Target::new("example.com", "203.0.113.9".parse().unwrap())
    }

    fn stamp() -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 8, 6, 15, 30, 0).unwrap()
    }

    #[test]
    fn test_sanitize_replaces_exactly_the_unsafe_set() {
        assert_eq!(
            sanitize_target(r#"a\b/c:d*e?f"g<h>i|j"#),
            "a_b_c_d_e_f_g_h_i_j"
        );
        assert_eq!(sanitize_target("host-1.example.com"), "host-1.example.com");
    }

    #[test]
    fn test_default_path_is_deterministic() {
        let a = default_path("fe80::1%eth0", stamp());
        let b = default_path("fe80::1%eth0", stamp());
        assert_eq!(a, b);
        assert_eq!(a, PathBuf::from("zping-fe80__1%eth0-20260806T153000.csv"));
    }

    #[test]
    fn test_resolve_destination_disabled() {
        assert_eq!(resolve_destination("host", false, None).unwrap(), None);
    }

    #[test]
    fn test_resolve_destination_rejects_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let bad = dir.path().join("missing").join("out.csv");
        let err = resolve_destination("host", false, Some(&bad)).expect_err("expected failure");
        assert!(matches!(err, ZpingError::Config(_)));
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn test_resolve_destination_accepts_bare_file_name() {
        let path = resolve_destination("host", false, Some(Path::new("out.csv")))
            .unwrap()
            .unwrap();
        assert_eq!(path, PathBuf::from("out.csv"));
    }

    #[test]
    fn test_append_writes_header_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log.csv");
        let record = AttemptRecord {
            completed_at: Local::now(),
            outcome: PingOutcome::Success { rtt_ms: 3 },
        };
        append(&path, &target(), &record).unwrap();
        append(&path, &target(), &record).unwrap();

        let body = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = body.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], HEADER);
        assert!(lines[1].ends_with(",example.com,203.0.113.9,Success,3,"));
        assert_eq!(body.matches("datetime,").count(), 1);
    }

    #[test]
    fn test_render_row_for_intermediate_failure() {
        let record = AttemptRecord {
            completed_at: Local::now(),
            outcome: PingOutcome::Failure {
                status: "TtlExpired".to_string(),
                reply_source: Some("203.0.113.5".parse().unwrap()),
            },
        };
        let row = render_row(stamp(), &target(), &record);
        let fields: Vec<&str> = row.split(',').collect();
        assert_eq!(fields[1], "example.com");
        assert_eq!(fields[2], "203.0.113.9");
        assert_eq!(fields[3], "TtlExpired");
        assert_eq!(fields[4], "");
        assert_eq!(fields[5], "Reply from 203.0.113.5: TtlExpired");
    }

    #[test]
    fn test_render_row_quotes_reasons_containing_commas() {
        let record = AttemptRecord {
            completed_at: Local::now(),
            outcome: PingOutcome::Transport {
                message: "A ping exception occurred to 203.0.113.9: no route, link down"
                    .to_string(),
            },
        };
        let row = render_row(stamp(), &target(), &record);
        assert!(row.ends_with(
            ",Exception,,\"A ping exception occurred to 203.0.113.9: no route, link down\""
        ));
    }
}
