use std::env;
use std::path::PathBuf;

use crate::error::{Error, Result};

/// Overrides the directory snapshots and templates are kept in
pub const CONFIG_DIR_ENV: &str = "TMXU_CONFIG_DIR";
/// Overrides the tmux binary
pub const TMUX_ENV: &str = "TMXU_TMUX";

/// Settings resolved once at startup and passed down explicitly
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Root for `tmux-sessions.json` and `templates/`
    pub config_dir: PathBuf,
    pub tmux_bin: String,
    pub version: String,
}

impl Config {
    /// Resolve from the environment, defaulting to `~/.config/tmxu`
    pub fn load() -> Result<Self> {
        Self::from_vars(|key| env::var(key).ok(), dirs::home_dir())
    }

    fn from_vars(var: impl Fn(&str) -> Option<String>, home: Option<PathBuf>) -> Result<Self> {
        let config_dir = match var(CONFIG_DIR_ENV).filter(|v| !v.is_empty()) {
            Some(dir) => PathBuf::from(dir),
            None => home.ok_or(Error::NoHomeDir)?.join(".config").join("tmxu"),
        };

        Ok(Self {
            config_dir,
            tmux_bin: var(TMUX_ENV)
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| "tmux".to_string()),
            version: env!("CARGO_PKG_VERSION").to_string(),
        })
    }
}
