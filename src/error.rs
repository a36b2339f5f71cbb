use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Failure reported by the multiplexer collaborator itself
#[derive(Debug, Error)]
pub enum MuxError {
    /// The tmux binary could not be started
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    /// tmux ran but exited unsuccessfully
    #[error("`{command}` failed: {stderr}")]
    Failed { command: String, stderr: String },
}

/// The mutation that was being issued when replay failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplayStep {
    KillSession,
    KillWindow,
    CreateSession,
    CreateWindow,
    RenameWindow,
    ApplyLayout,
    SplitPane,
    RenamePane,
}

impl fmt::Display for ReplayStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ReplayStep::KillSession => "kill session",
            ReplayStep::KillWindow => "kill window",
            ReplayStep::CreateSession => "create session",
            ReplayStep::CreateWindow => "create window",
            ReplayStep::RenameWindow => "rename window",
            ReplayStep::ApplyLayout => "apply layout to window",
            ReplayStep::SplitPane => "create pane",
            ReplayStep::RenamePane => "rename pane",
        };
        f.write_str(s)
    }
}

/// Errors produced while capturing, replaying, templating or persisting sessions
#[derive(Debug, Error)]
pub enum Error {
    /// A record from a tmux listing did not have the expected shape
    #[error("unable to parse {kind} record {record:?}: {reason}")]
    Parse {
        kind: &'static str,
        record: String,
        reason: String,
    },

    /// A live session with this name already exists
    #[error("session already exists: {0}")]
    SessionExists(String),

    /// A mutation against tmux failed; `target` is the address being mutated
    #[error("unable to {step}: {target}")]
    Replay {
        step: ReplayStep,
        target: String,
        #[source]
        source: MuxError,
    },

    /// A listing query against tmux failed
    #[error("unable to list {what}")]
    Query {
        what: String,
        #[source]
        source: MuxError,
    },

    /// The user backed out of an interactive selection
    #[error("selection cancelled")]
    Cancelled,

    #[error("terminal error: {0}")]
    Terminal(#[source] std::io::Error),

    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Name cannot be used as a template file name
    #[error("invalid template name: {0:?}")]
    InvalidName(String),

    #[error("unable to resolve the home directory")]
    NoHomeDir,
}

impl Error {
    pub(crate) fn parse(kind: &'static str, record: &str, reason: impl Into<String>) -> Self {
        Error::Parse {
            kind,
            record: record.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn replay(step: ReplayStep, target: impl Into<String>, source: MuxError) -> Self {
        Error::Replay {
            step,
            target: target.into(),
            source,
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
