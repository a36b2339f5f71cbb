use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Tmux utilities for managing sessions with save/restore capabilities
#[derive(Parser, Debug)]
#[command(name = "tmxu", version)]
#[command(about = "Tmux utilities for managing sessions with save/restore capabilities")]
#[command(after_help = "Use `tmxu help [command]` to get detailed information about a specific command.\n\
Flags take GNU style: `--force` or `-f`, `--name web`, `--path DIR`, `--templ NAME`.\n\
The single-dash long form (`-force`, `-name=web`) is not accepted.")]
pub struct Cli {
    /// Log what is sent to tmux
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub action: Option<Action>,
}

/// Actions that can be dispatched through the application
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// List all active sessions in tmux
    List,

    /// Attach to running tmux session
    ///
    /// Connects to an existing tmux session by name. Without a name, pick
    /// one of the running sessions interactively.
    Attach {
        /// Session to attach to
        name: Option<String>,
    },

    /// Save tmux sessions
    ///
    /// Captures all running tmux sessions including windows, panes, and
    /// layouts. Saves to ~/.config/tmxu/tmux-sessions.json.
    Save {
        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },

    /// Restore tmux sessions
    ///
    /// Recreates tmux sessions from ~/.config/tmxu/tmux-sessions.json.
    /// Skips sessions that already exist.
    Restore {
        /// Override existing sessions while restoring
        #[arg(short, long)]
        force: bool,

        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },

    /// List all saved templates
    ListTemplates,

    /// Save session as template
    ///
    /// Saves a running tmux session as a reusable template. Templates are
    /// stored in ~/.config/tmxu/templates/.
    SaveTemplate {
        /// Running session to take the shape from
        session_name: String,

        /// Name of the template. Defaults to the session name
        #[arg(short, long)]
        name: Option<String>,
    },

    /// Delete saved template
    DeleteTemplate {
        template_name: String,
    },

    /// Create new session, optionally based on a template
    NewSession {
        session_name: String,

        /// Initial path for all panes. Defaults to the current directory
        #[arg(short, long)]
        path: Option<PathBuf>,

        /// Template to create the new session from
        #[arg(short, long)]
        templ: Option<String>,
    },

    /// Display app version information
    Version,
}
