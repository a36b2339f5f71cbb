//! Rebuild live tmux state from a snapshot.
//!
//! tmux can only be driven imperatively, so a session is reproduced as an
//! ordered sequence of create, rename, split and layout calls. tmux creates
//! window 1 together with its session and pane 1 together with its window;
//! those are renamed, never created. This is a fixed property of tmux, not
//! an optimisation.
//!
//! A split places the new pane right after the pane it targets, so pane N
//! is always made by splitting pane N-1.

use std::path::{Path, PathBuf};

use tracing::{debug, info, info_span, warn};

use super::address::{pane_address, window_address};
use super::{Multiplexer, Pane, Session, Window};
use crate::error::{Error, ReplayStep, Result};

/// Sessions touched by a batch restore
#[derive(Debug, Default, PartialEq, Eq)]
pub struct RestoreReport {
    pub restored: Vec<String>,
    /// Already live and left alone
    pub skipped: Vec<String>,
}

/// Replays snapshots against a multiplexer
pub struct Replayer<'a, M: Multiplexer + ?Sized> {
    mux: &'a M,
    /// Kill and recreate sessions that already exist
    force: bool,
    /// Directory used when a snapshot carries none
    fallback_dir: PathBuf,
}

impl<'a, M: Multiplexer + ?Sized> Replayer<'a, M> {
    pub fn new(mux: &'a M, fallback_dir: impl Into<PathBuf>) -> Self {
        Self {
            mux,
            force: false,
            fallback_dir: fallback_dir.into(),
        }
    }

    pub fn force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    /// Restore every session in order.
    ///
    /// A session that is already live is skipped and the batch continues;
    /// any other failure stops the batch. Sessions restored before the
    /// failure are left in place.
    pub fn restore_all(&self, sessions: &[Session]) -> Result<RestoreReport> {
        let mut report = RestoreReport::default();

        for session in sessions {
            match self.replay_session(session) {
                Ok(()) => report.restored.push(session.name.clone()),
                Err(Error::SessionExists(name)) => {
                    info!(session = %name, "session already exists, skipping");
                    report.skipped.push(name);
                }
                Err(e) => return Err(e),
            }
        }

        Ok(report)
    }

    /// Reproduce one session as live state
    pub fn replay_session(&self, session: &Session) -> Result<()> {
        let span = info_span!("replay", session = %session.name);
        let _enter = span.enter();

        self.ensure_vacant(&session.name)?;

        let dir = session
            .initial_dir()
            .map(Path::new)
            .unwrap_or(self.fallback_dir.as_path());
        self.mux
            .new_session(&session.name, dir)
            .map_err(|e| Error::replay(ReplayStep::CreateSession, session.name.as_str(), e))?;

        for window in &session.windows {
            self.replay_window(&session.name, window)?;
        }

        // window 1 came with the session but the snapshot has none
        if !session.windows.is_empty() && session.windows.iter().all(|w| w.order != 1) {
            let address = window_address(&session.name, 1);
            self.mux
                .kill_window(&address)
                .map_err(|e| Error::replay(ReplayStep::KillWindow, address.as_str(), e))?;
        }

        info!(windows = session.windows.len(), "session restored");
        Ok(())
    }

    fn ensure_vacant(&self, name: &str) -> Result<()> {
        let exists = self.mux.has_session(name).map_err(|source| Error::Query {
            what: format!("session {}", name),
            source,
        })?;
        if !exists {
            return Ok(());
        }
        if !self.force {
            return Err(Error::SessionExists(name.to_string()));
        }

        warn!(session = %name, "killing existing session");
        self.mux
            .kill_session(name)
            .map_err(|e| Error::replay(ReplayStep::KillSession, name, e))
    }

    fn replay_window(&self, session_name: &str, window: &Window) -> Result<()> {
        let address = window_address(session_name, window.order);

        if window.order == 1 {
            // created along with the session
            self.mux
                .rename_window(&address, &window.name)
                .map_err(|e| Error::replay(ReplayStep::RenameWindow, address.as_str(), e))?;
        } else {
            let dir = window
                .initial_dir()
                .map(Path::new)
                .unwrap_or(self.fallback_dir.as_path());
            self.mux
                .new_window(&address, dir, &window.name)
                .map_err(|e| Error::replay(ReplayStep::CreateWindow, address.as_str(), e))?;
        }
        debug!(window = %address, "window ready");

        for pane in &window.panes {
            self.replay_pane(&address, pane)?;
        }

        // tmux only accepts a layout whose cell count matches the live panes
        if !window.layout.is_empty() {
            self.mux
                .select_layout(&address, &window.layout)
                .map_err(|e| Error::replay(ReplayStep::ApplyLayout, address.as_str(), e))?;
        }

        Ok(())
    }

    fn replay_pane(&self, window: &str, pane: &Pane) -> Result<()> {
        let address = pane_address(window, pane.order);

        if pane.order != 1 {
            let previous = pane_address(window, pane.order - 1);
            self.mux
                .split_window(&previous, Path::new(&pane.path))
                .map_err(|e| Error::replay(ReplayStep::SplitPane, address.as_str(), e))?;
        }

        self.mux
            .set_pane_title(&address, &pane.name)
            .map_err(|e| Error::replay(ReplayStep::RenamePane, address.as_str(), e))
    }
}
