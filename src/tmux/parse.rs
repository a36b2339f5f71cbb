use once_cell::sync::Lazy;
use regex::Regex;

use super::address::window_address;
use super::{Pane, Session, SessionSummary, Window};
use crate::error::{Error, Result};

// Free-text fields may contain spaces. Names sit between two single-token
// fields; a pane title runs up to the absolute path that closes the record.

/// `#{session_created} #{session_name} #{session_windows}`
static RE_SESSION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?P<created>\S+) (?P<name>.+) (?P<windows>\S+)$").unwrap());

/// `#{window_index} #{window_name} #{window_layout}`
static RE_WINDOW: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?P<index>\S+) (?P<name>.*) (?P<layout>\S+)$").unwrap());

/// `#{pane_index} #{pane_title} #{pane_current_path}`
static RE_PANE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?P<index>\S+) (?P<title>.*?) (?P<path>/.*)$").unwrap());

/// Build an empty session shell from a `list-sessions` record
pub fn parse_session(record: &str, order: u32) -> Result<Session> {
    let caps = RE_SESSION
        .captures(record)
        .ok_or_else(|| Error::parse("session", record, "expected `created name windows`"))?;

    Ok(Session {
        order,
        name: caps["name"].to_string(),
        windows: Vec::new(),
    })
}

/// Parse a `list-sessions` record for display
pub fn parse_summary(record: &str) -> Result<SessionSummary> {
    let caps = RE_SESSION
        .captures(record)
        .ok_or_else(|| Error::parse("session", record, "expected `created name windows`"))?;

    let created = caps["created"].parse().map_err(|_| {
        Error::parse(
            "session",
            record,
            format!("invalid creation time {:?}", &caps["created"]),
        )
    })?;
    let windows = caps["windows"].parse().map_err(|_| {
        Error::parse(
            "session",
            record,
            format!("invalid window count {:?}", &caps["windows"]),
        )
    })?;

    Ok(SessionSummary {
        created,
        name: caps["name"].to_string(),
        windows,
    })
}

/// Parse a `list-windows` record; panes are filled in separately
pub fn parse_window(record: &str, session_name: &str) -> Result<Window> {
    let caps = RE_WINDOW
        .captures(record)
        .ok_or_else(|| Error::parse("window", record, "expected `index name layout`"))?;

    let order = parse_index("window", record, &caps["index"])?;

    Ok(Window {
        order,
        name: caps["name"].to_string(),
        layout: caps["layout"].to_string(),
        session_name: session_name.to_string(),
        session_window: window_address(session_name, order),
        panes: Vec::new(),
    })
}

pub fn parse_pane(record: &str, session_name: &str, session_window: &str) -> Result<Pane> {
    let caps = RE_PANE
        .captures(record)
        .ok_or_else(|| Error::parse("pane", record, "expected `index title path`"))?;

    Ok(Pane {
        order: parse_index("pane", record, &caps["index"])?,
        name: caps["title"].to_string(),
        path: caps["path"].to_string(),
        session_name: session_name.to_string(),
        session_window: session_window.to_string(),
    })
}

fn parse_index(kind: &'static str, record: &str, field: &str) -> Result<u32> {
    field
        .parse()
        .map_err(|_| Error::parse(kind, record, format!("invalid {} index {:?}", kind, field)))
}
