//! In-memory multiplexer for tests.
//!
//! Mirrors the parts of tmux behaviour replay depends on: a new session
//! comes with window 1 and pane 1, a split lands right after the pane it
//! targets and shifts later panes up, and every mutation is recorded in
//! call order.

use std::cell::RefCell;
use std::path::Path;

use super::Multiplexer;
use crate::error::MuxError;

const DEFAULT_LAYOUT: &str = "c0d1,80x24,0,0,0";
const DEFAULT_TITLE: &str = "host";
const DEFAULT_WINDOW: &str = "zsh";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    NewSession { name: String, dir: String },
    KillSession(String),
    KillWindow(String),
    NewWindow { target: String, dir: String, name: String },
    RenameWindow { address: String, name: String },
    SelectLayout { address: String, layout: String },
    SplitWindow { target: String, dir: String },
    SetPaneTitle { address: String, title: String },
    Attach(String),
}

#[derive(Debug)]
struct FakePane {
    index: u32,
    title: String,
    path: String,
}

#[derive(Debug)]
struct FakeWindow {
    index: u32,
    name: String,
    layout: String,
    panes: Vec<FakePane>,
}

#[derive(Debug)]
struct FakeSession {
    name: String,
    created: u64,
    windows: Vec<FakeWindow>,
}

#[derive(Debug, Default)]
struct State {
    sessions: Vec<FakeSession>,
    calls: Vec<Call>,
    clock: u64,
    listing: Option<String>,
    fail: Option<(&'static str, String)>,
}

#[derive(Debug, Default)]
pub struct FakeMux {
    state: RefCell<State>,
}

fn failed(command: &str, stderr: &str) -> MuxError {
    MuxError::Failed {
        command: command.to_string(),
        stderr: stderr.to_string(),
    }
}

fn split_window_target(target: &str) -> Result<(&str, u32), MuxError> {
    let (session, index) = target
        .rsplit_once(':')
        .ok_or_else(|| failed("target", "malformed window target"))?;
    let index = index
        .parse()
        .map_err(|_| failed("target", "malformed window index"))?;
    Ok((session, index))
}

impl State {
    fn check(&self, op: &'static str, target: &str) -> Result<(), MuxError> {
        match &self.fail {
            Some((fail_op, fail_target)) if *fail_op == op && fail_target == target => {
                Err(failed(op, "injected failure"))
            }
            _ => Ok(()),
        }
    }

    fn session_mut(&mut self, name: &str) -> Result<&mut FakeSession, MuxError> {
        self.sessions
            .iter_mut()
            .find(|s| s.name == name)
            .ok_or_else(|| failed("session", &format!("can't find session: {}", name)))
    }

    fn window_mut(&mut self, address: &str) -> Result<&mut FakeWindow, MuxError> {
        let (session, index) = split_window_target(address)?;
        self.session_mut(session)?
            .windows
            .iter_mut()
            .find(|w| w.index == index)
            .ok_or_else(|| failed("window", &format!("can't find window: {}", address)))
    }

    fn insert_session(&mut self, name: &str, dir: &str) {
        self.clock += 100;
        self.sessions.push(FakeSession {
            name: name.to_string(),
            created: self.clock,
            windows: vec![FakeWindow::new(1, DEFAULT_WINDOW, dir)],
        });
    }

    fn insert_window(&mut self, target: &str, dir: &str, name: &str) -> Result<(), MuxError> {
        let (session, index) = split_window_target(target)?;
        let session = self.session_mut(session)?;
        if session.windows.iter().any(|w| w.index == index) {
            return Err(failed("new-window", &format!("index {} in use", index)));
        }
        session.windows.push(FakeWindow::new(index, name, dir));
        session.windows.sort_by_key(|w| w.index);
        Ok(())
    }

    /// Split `target` the way tmux does: the new pane goes right after the
    /// split pane and every pane is renumbered by position.
    fn insert_pane(&mut self, target: &str, dir: &str) -> Result<(), MuxError> {
        let (session, rest) = target
            .rsplit_once(':')
            .ok_or_else(|| failed("target", "malformed window target"))?;
        let (window, pane) = match rest.split_once('.') {
            Some((index, pane)) => {
                let pane: u32 = pane
                    .parse()
                    .map_err(|_| failed("split-window", "malformed pane index"))?;
                (format!("{}:{}", session, index), Some(pane))
            }
            None => (target.to_string(), None),
        };

        let window = self.window_mut(&window)?;
        // a bare window target splits the active pane, which `-d` leaves at the first
        let split = match pane {
            Some(index) => window
                .panes
                .iter()
                .position(|p| p.index == index)
                .ok_or_else(|| failed("split-window", &format!("can't find pane: {}", target)))?,
            None => 0,
        };

        let base = window.panes.first().map_or(1, |p| p.index);
        let at = (split + 1).min(window.panes.len());
        window.panes.insert(
            at,
            FakePane {
                index: 0,
                title: DEFAULT_TITLE.to_string(),
                path: dir.to_string(),
            },
        );
        for (offset, pane) in window.panes.iter_mut().enumerate() {
            pane.index = base + offset as u32;
        }
        Ok(())
    }
}

impl FakeWindow {
    fn new(index: u32, name: &str, dir: &str) -> Self {
        Self {
            index,
            name: name.to_string(),
            layout: DEFAULT_LAYOUT.to_string(),
            panes: vec![FakePane {
                index: 1,
                title: DEFAULT_TITLE.to_string(),
                path: dir.to_string(),
            }],
        }
    }
}

impl FakeMux {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a live session without recording a call
    pub fn add_session(&self, name: &str, dir: &str) {
        self.state.borrow_mut().insert_session(name, dir);
    }

    pub fn add_window(&self, session: &str, index: u32, name: &str, dir: &str) {
        let target = format!("{}:{}", session, index);
        self.state
            .borrow_mut()
            .insert_window(&target, dir, name)
            .expect("seed window");
    }

    pub fn add_pane(&self, window: &str, dir: &str) {
        self.state
            .borrow_mut()
            .insert_pane(window, dir)
            .expect("seed pane");
    }

    /// Replace the `list-sessions` output with raw text
    pub fn set_session_listing(&self, listing: &str) {
        self.state.borrow_mut().listing = Some(listing.to_string());
    }

    /// Make the next `op` against `target` fail
    pub fn fail_on(&self, op: &'static str, target: &str) {
        self.state.borrow_mut().fail = Some((op, target.to_string()));
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.borrow().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state.borrow_mut().calls.clear();
    }

    pub fn session_names(&self) -> Vec<String> {
        self.state
            .borrow()
            .sessions
            .iter()
            .map(|s| s.name.clone())
            .collect()
    }

    fn record(&self, call: Call) {
        self.state.borrow_mut().calls.push(call);
    }
}

fn dir_string(dir: &Path) -> String {
    dir.to_string_lossy().into_owned()
}

impl Multiplexer for FakeMux {
    fn list_sessions(&self) -> Result<String, MuxError> {
        let state = self.state.borrow();
        if let Some(listing) = &state.listing {
            return Ok(listing.clone());
        }
        let listing = state
            .sessions
            .iter()
            .map(|s| format!("{} {} {}\n", s.created, s.name, s.windows.len()))
            .collect();
        Ok(listing)
    }

    fn list_windows(&self, session: &str) -> Result<String, MuxError> {
        let mut state = self.state.borrow_mut();
        let listing = state
            .session_mut(session)?
            .windows
            .iter()
            .map(|w| format!("{} {} {}\n", w.index, w.name, w.layout))
            .collect();
        Ok(listing)
    }

    fn list_panes(&self, session_window: &str) -> Result<String, MuxError> {
        let mut state = self.state.borrow_mut();
        let listing = state
            .window_mut(session_window)?
            .panes
            .iter()
            .map(|p| format!("{} {} {}\n", p.index, p.title, p.path))
            .collect();
        Ok(listing)
    }

    fn has_session(&self, name: &str) -> Result<bool, MuxError> {
        Ok(self.state.borrow().sessions.iter().any(|s| s.name == name))
    }

    fn new_session(&self, name: &str, dir: &Path) -> Result<(), MuxError> {
        let dir = dir_string(dir);
        self.record(Call::NewSession {
            name: name.to_string(),
            dir: dir.clone(),
        });
        let mut state = self.state.borrow_mut();
        state.check("new-session", name)?;
        if state.sessions.iter().any(|s| s.name == name) {
            return Err(failed("new-session", &format!("duplicate session: {}", name)));
        }
        state.insert_session(name, &dir);
        Ok(())
    }

    fn kill_session(&self, name: &str) -> Result<(), MuxError> {
        self.record(Call::KillSession(name.to_string()));
        let mut state = self.state.borrow_mut();
        state.check("kill-session", name)?;
        let before = state.sessions.len();
        state.sessions.retain(|s| s.name != name);
        if state.sessions.len() == before {
            return Err(failed("kill-session", &format!("can't find session: {}", name)));
        }
        Ok(())
    }

    fn kill_window(&self, address: &str) -> Result<(), MuxError> {
        self.record(Call::KillWindow(address.to_string()));
        let mut state = self.state.borrow_mut();
        state.check("kill-window", address)?;
        let (session, index) = split_window_target(address)?;
        let session = state.session_mut(session)?;
        let before = session.windows.len();
        session.windows.retain(|w| w.index != index);
        if session.windows.len() == before {
            return Err(failed("kill-window", &format!("can't find window: {}", address)));
        }
        Ok(())
    }

    fn new_window(&self, target: &str, dir: &Path, name: &str) -> Result<(), MuxError> {
        let dir = dir_string(dir);
        self.record(Call::NewWindow {
            target: target.to_string(),
            dir: dir.clone(),
            name: name.to_string(),
        });
        let mut state = self.state.borrow_mut();
        state.check("new-window", target)?;
        state.insert_window(target, &dir, name)
    }

    fn rename_window(&self, address: &str, name: &str) -> Result<(), MuxError> {
        self.record(Call::RenameWindow {
            address: address.to_string(),
            name: name.to_string(),
        });
        let mut state = self.state.borrow_mut();
        state.check("rename-window", address)?;
        state.window_mut(address)?.name = name.to_string();
        Ok(())
    }

    fn select_layout(&self, address: &str, layout: &str) -> Result<(), MuxError> {
        self.record(Call::SelectLayout {
            address: address.to_string(),
            layout: layout.to_string(),
        });
        let mut state = self.state.borrow_mut();
        state.check("select-layout", address)?;
        state.window_mut(address)?.layout = layout.to_string();
        Ok(())
    }

    fn split_window(&self, target: &str, dir: &Path) -> Result<(), MuxError> {
        let dir = dir_string(dir);
        self.record(Call::SplitWindow {
            target: target.to_string(),
            dir: dir.clone(),
        });
        let mut state = self.state.borrow_mut();
        state.check("split-window", target)?;
        state.insert_pane(target, &dir)
    }

    fn set_pane_title(&self, address: &str, title: &str) -> Result<(), MuxError> {
        self.record(Call::SetPaneTitle {
            address: address.to_string(),
            title: title.to_string(),
        });
        let mut state = self.state.borrow_mut();
        state.check("select-pane", address)?;
        let (window, index) = address
            .rsplit_once('.')
            .ok_or_else(|| failed("select-pane", "malformed pane target"))?;
        let index: u32 = index
            .parse()
            .map_err(|_| failed("select-pane", "malformed pane index"))?;
        let pane = state
            .window_mut(window)?
            .panes
            .iter_mut()
            .find(|p| p.index == index)
            .ok_or_else(|| failed("select-pane", &format!("can't find pane: {}", address)))?;
        pane.title = title.to_string();
        Ok(())
    }

    fn attach(&self, name: &str) -> Result<(), MuxError> {
        self.record(Call::Attach(name.to_string()));
        if self.state.borrow().sessions.iter().any(|s| s.name == name) {
            Ok(())
        } else {
            Err(failed("attach-session", &format!("can't find session: {}", name)))
        }
    }
}
