use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::{Error, Result};
use crate::template::{validate_name, Template};
use crate::tmux::Session;

pub const SESSIONS_FILE: &str = "tmux-sessions.json";
pub const TEMPLATES_DIR: &str = "templates";

/// JSON files under the config directory
pub struct Store {
    root: PathBuf,
}

impl Store {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn sessions_path(&self) -> PathBuf {
        self.root.join(SESSIONS_FILE)
    }

    pub fn templates_dir(&self) -> PathBuf {
        self.root.join(TEMPLATES_DIR)
    }

    pub fn template_path(&self, name: &str) -> Result<PathBuf> {
        validate_name(name)?;
        Ok(self.templates_dir().join(format!("{}.json", name)))
    }

    pub fn load_sessions(&self) -> Result<Vec<Session>> {
        read_json(&self.sessions_path())
    }

    /// Returns the path written
    pub fn save_sessions(&self, sessions: &[Session]) -> Result<PathBuf> {
        let path = self.sessions_path();
        write_json(&path, &sessions)?;
        Ok(path)
    }

    pub fn load_template(&self, name: &str) -> Result<Template> {
        read_json(&self.template_path(name)?)
    }

    pub fn save_template(&self, template: &Template) -> Result<PathBuf> {
        let path = self.template_path(template.name())?;
        write_json(&path, template)?;
        Ok(path)
    }

    pub fn delete_template(&self, name: &str) -> Result<PathBuf> {
        let path = self.template_path(name)?;
        fs::remove_file(&path).map_err(|e| Error::io(&path, e))?;
        debug!(path = %path.display(), "template deleted");
        Ok(path)
    }

    /// All stored templates, sorted by file name
    ///
    /// A missing templates directory means there are none. Files that do
    /// not parse are skipped with a warning.
    pub fn list_templates(&self) -> Result<Vec<Template>> {
        let dir = self.templates_dir();
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut templates = Vec::new();
        let walker = WalkDir::new(&dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name();

        for entry in walker {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(dir.as_path()).to_path_buf();
                Error::io(path, e.into())
            })?;
            let path = entry.path();
            if !entry.file_type().is_file() || path.extension().map_or(true, |ext| ext != "json")
            {
                continue;
            }

            match read_json::<Template>(path) {
                Ok(template) => templates.push(template),
                Err(e) => warn!(error = %e, "ignoring unreadable template"),
            }
        }

        Ok(templates)
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let data = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    serde_json::from_str(&data).map_err(|source| Error::Json {
        path: path.to_path_buf(),
        source,
    })
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }

    let json = serde_json::to_string_pretty(value).map_err(|source| Error::Json {
        path: path.to_path_buf(),
        source,
    })?;
    fs::write(path, json).map_err(|e| Error::io(path, e))?;

    debug!(path = %path.display(), "wrote snapshot");
    Ok(())
}
