use std::path::Path;
use std::process::{Command, Output, Stdio};

use tracing::debug;

use super::Multiplexer;
use crate::error::MuxError;

const SESSION_FORMAT: &str = "#{session_created} #{session_name} #{session_windows}";
const WINDOW_FORMAT: &str = "#{window_index} #{window_name} #{window_layout}";
const PANE_FORMAT: &str = "#{pane_index} #{pane_title} #{pane_current_path}";

/// Client for interacting with tmux via CLI
pub struct TmuxClient {
    /// Path to tmux binary
    tmux_path: String,
}

impl TmuxClient {
    pub fn new() -> Self {
        Self::with_path("tmux")
    }

    pub fn with_path(tmux_path: impl Into<String>) -> Self {
        Self {
            tmux_path: tmux_path.into(),
        }
    }

    fn output(&self, args: &[&str]) -> Result<Output, MuxError> {
        debug!(?args, "tmux");
        Command::new(&self.tmux_path)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .map_err(|source| MuxError::Spawn {
                program: self.tmux_path.clone(),
                source,
            })
    }

    /// Run a command and return its stdout
    fn run(&self, args: &[&str]) -> Result<String, MuxError> {
        let output = self.output(args)?;
        if !output.status.success() {
            return Err(self.failure(args, &output));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// Like `run`, but a missing server means there is nothing to list
    fn list(&self, args: &[&str]) -> Result<String, MuxError> {
        let output = self.output(args)?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            if stderr.contains("no server running") || stderr.contains("no sessions") {
                return Ok(String::new());
            }
            return Err(self.failure(args, &output));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn failure(&self, args: &[&str], output: &Output) -> MuxError {
        MuxError::Failed {
            command: format!("{} {}", self.tmux_path, args.join(" ")),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        }
    }
}

impl Default for TmuxClient {
    fn default() -> Self {
        Self::new()
    }
}

/// `=name` makes tmux match the session name exactly instead of by prefix
fn exact(name: &str) -> String {
    format!("={}", name)
}

fn dir_arg(dir: &Path) -> String {
    dir.to_string_lossy().into_owned()
}

impl Multiplexer for TmuxClient {
    fn list_sessions(&self) -> Result<String, MuxError> {
        self.list(&["list-sessions", "-F", SESSION_FORMAT])
    }

    fn list_windows(&self, session: &str) -> Result<String, MuxError> {
        self.run(&["list-windows", "-t", &exact(session), "-F", WINDOW_FORMAT])
    }

    fn list_panes(&self, session_window: &str) -> Result<String, MuxError> {
        self.run(&["list-panes", "-t", session_window, "-F", PANE_FORMAT])
    }

    fn has_session(&self, name: &str) -> Result<bool, MuxError> {
        let output = self.output(&["has-session", "-t", &exact(name)])?;
        Ok(output.status.success())
    }

    fn new_session(&self, name: &str, dir: &Path) -> Result<(), MuxError> {
        self.run(&["new-session", "-d", "-s", name, "-c", &dir_arg(dir)])
            .map(drop)
    }

    fn kill_session(&self, name: &str) -> Result<(), MuxError> {
        self.run(&["kill-session", "-t", &exact(name)]).map(drop)
    }

    fn kill_window(&self, address: &str) -> Result<(), MuxError> {
        self.run(&["kill-window", "-t", address]).map(drop)
    }

    fn new_window(&self, target: &str, dir: &Path, name: &str) -> Result<(), MuxError> {
        self.run(&["new-window", "-d", "-t", target, "-c", &dir_arg(dir), "-n", name])
            .map(drop)
    }

    fn rename_window(&self, address: &str, name: &str) -> Result<(), MuxError> {
        self.run(&["rename-window", "-t", address, name]).map(drop)
    }

    fn select_layout(&self, address: &str, layout: &str) -> Result<(), MuxError> {
        self.run(&["select-layout", "-t", address, layout]).map(drop)
    }

    fn split_window(&self, target: &str, dir: &Path) -> Result<(), MuxError> {
        self.run(&["split-window", "-d", "-t", target, "-c", &dir_arg(dir)])
            .map(drop)
    }

    fn set_pane_title(&self, address: &str, title: &str) -> Result<(), MuxError> {
        self.run(&["select-pane", "-t", address, "-T", title]).map(drop)
    }

    fn attach(&self, name: &str) -> Result<(), MuxError> {
        let target = exact(name);
        let args = ["attach-session", "-t", target.as_str()];
        debug!(?args, "tmux");
        let status = Command::new(&self.tmux_path)
            .args(args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|source| MuxError::Spawn {
                program: self.tmux_path.clone(),
                source,
            })?;

        if !status.success() {
            return Err(MuxError::Failed {
                command: format!("{} {}", self.tmux_path, args.join(" ")),
                stderr: format!("exited with {}", status),
            });
        }
        Ok(())
    }
}
