//! Capture live tmux state into snapshot trees.
//!
//! Sessions are listed, ordered by creation time and then walked window by
//! window and pane by pane. A malformed record aborts the capture of the
//! session it belongs to; sibling sessions are still captured.

use tracing::{debug, warn};

use super::parse::{parse_pane, parse_session, parse_summary, parse_window};
use super::{Multiplexer, Session, SessionSummary};
use crate::error::{Error, Result};

/// Outcome of capturing every live session
#[derive(Debug, Default)]
pub struct CaptureReport {
    pub sessions: Vec<Session>,
    /// Sessions that could not be captured, in listing order
    pub failures: Vec<Error>,
}

/// List live sessions, oldest first
pub fn list_summaries<M: Multiplexer + ?Sized>(mux: &M) -> Result<Vec<SessionSummary>> {
    let output = mux.list_sessions().map_err(|source| Error::Query {
        what: "sessions".into(),
        source,
    })?;

    let mut summaries = records(&output)
        .map(parse_summary)
        .collect::<Result<Vec<_>>>()?;
    // stable: sessions created in the same second keep tmux's order
    summaries.sort_by_key(|s| s.created);

    Ok(summaries)
}

/// Capture one session by name
pub fn capture_session<M: Multiplexer + ?Sized>(
    mux: &M,
    name: &str,
    order: u32,
) -> Result<Session> {
    let mut session = Session {
        order,
        name: name.to_string(),
        windows: Vec::new(),
    };

    let windows = mux.list_windows(name).map_err(|source| Error::Query {
        what: format!("windows for session {}", name),
        source,
    })?;

    for record in records(&windows) {
        let mut window = parse_window(record, &session.name)?;

        let panes = mux
            .list_panes(&window.session_window)
            .map_err(|source| Error::Query {
                what: format!("panes for window {}", window.session_window),
                source,
            })?;

        for record in records(&panes) {
            let pane = parse_pane(record, &window.session_name, &window.session_window)?;
            window.panes.push(pane);
        }

        debug!(
            window = %window.session_window,
            panes = window.panes.len(),
            "captured window"
        );
        session.windows.push(window);
    }

    Ok(session)
}

/// Capture every live session
///
/// Fails only when the session listing itself cannot be obtained.
pub fn capture_all<M: Multiplexer + ?Sized>(mux: &M) -> Result<CaptureReport> {
    let output = mux.list_sessions().map_err(|source| Error::Query {
        what: "sessions".into(),
        source,
    })?;

    let mut listed: Vec<(u64, &str)> = Vec::new();
    let mut report = CaptureReport::default();

    for record in records(&output) {
        // Ordering needs the timestamp; a record without one sorts first
        // and still fails on its own below.
        let created = record
            .split(' ')
            .next()
            .and_then(|ts| ts.parse().ok())
            .unwrap_or(0);
        listed.push((created, record));
    }
    listed.sort_by_key(|(created, _)| *created);

    for (idx, (_, record)) in listed.into_iter().enumerate() {
        let order = idx as u32 + 1;
        let captured =
            parse_session(record, order).and_then(|shell| capture_session(mux, &shell.name, order));

        match captured {
            Ok(session) => report.sessions.push(session),
            Err(e) => {
                warn!(error = %e, "skipping session capture");
                report.failures.push(e);
            }
        }
    }

    Ok(report)
}

fn records(output: &str) -> impl Iterator<Item = &str> {
    output.lines().map(str::trim_end).filter(|l| !l.is_empty())
}
