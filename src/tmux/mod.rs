mod address;
mod capture;
mod client;
#[cfg(test)]
pub(crate) mod fake;
mod parse;
mod replay;

pub use address::window_address;
pub use capture::{capture_all, capture_session, list_summaries};
pub use client::TmuxClient;
pub use replay::Replayer;

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::MuxError;

/// A tmux session and the windows it owns
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Rank among captured sessions (informational)
    pub order: u32,
    /// Session name, the key tmux resolves sessions by
    pub name: String,
    #[serde(default)]
    pub windows: Vec<Window>,
}

impl Session {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            order: 1,
            name: name.into(),
            windows: Vec::new(),
        }
    }

    /// Working directory of the first pane of the first window
    pub fn initial_dir(&self) -> Option<&str> {
        self.windows.first().and_then(Window::initial_dir)
    }
}

/// A window inside a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Window {
    /// 1-based index as reported by tmux
    pub order: u32,
    pub name: String,
    /// Layout descriptor as printed by `#{window_layout}`
    pub layout: String,
    pub session_name: String,
    /// `session:order`
    pub session_window: String,
    #[serde(default)]
    pub panes: Vec<Pane>,
}

impl Window {
    pub fn initial_dir(&self) -> Option<&str> {
        self.panes.first().map(|p| p.path.as_str())
    }
}

/// A pane inside a window
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pane {
    /// 1-based index within the window
    pub order: u32,
    /// Pane title
    pub name: String,
    pub path: String,
    pub session_name: String,
    pub session_window: String,
}

/// One row of `tmux list-sessions`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSummary {
    /// Unix timestamp when the session was created
    pub created: u64,
    pub name: String,
    pub windows: usize,
}

/// Query and mutation surface of a terminal multiplexer.
///
/// Listings return raw newline separated records; turning them into
/// typed entities is the job of the parser. Every call blocks until the
/// multiplexer has finished.
pub trait Multiplexer {
    /// `created name windows` per session
    fn list_sessions(&self) -> Result<String, MuxError>;
    /// `index name layout` per window of `session`
    fn list_windows(&self, session: &str) -> Result<String, MuxError>;
    /// `index title path` per pane of the window at `session_window`
    fn list_panes(&self, session_window: &str) -> Result<String, MuxError>;

    fn has_session(&self, name: &str) -> Result<bool, MuxError>;
    fn new_session(&self, name: &str, dir: &Path) -> Result<(), MuxError>;
    fn kill_session(&self, name: &str) -> Result<(), MuxError>;
    fn kill_window(&self, address: &str) -> Result<(), MuxError>;
    fn new_window(&self, target: &str, dir: &Path, name: &str) -> Result<(), MuxError>;
    fn rename_window(&self, address: &str, name: &str) -> Result<(), MuxError>;
    fn select_layout(&self, address: &str, layout: &str) -> Result<(), MuxError>;
    fn split_window(&self, target: &str, dir: &Path) -> Result<(), MuxError>;
    fn set_pane_title(&self, address: &str, title: &str) -> Result<(), MuxError>;

    /// Hand the controlling terminal to the session until it detaches
    fn attach(&self, name: &str) -> Result<(), MuxError>;
}
