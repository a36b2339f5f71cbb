use std::env;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use tracing::info;

use crate::actions::Action;
use crate::config::Config;
use crate::error::Error;
use crate::picker;
use crate::store::Store;
use crate::template::{derive_template, instantiate_template};
use crate::tmux::{self, Multiplexer, Replayer, Session};

/// Main application state
pub struct App<M: Multiplexer> {
    pub config: Config,
    pub mux: M,
    pub store: Store,
}

impl<M: Multiplexer> App<M> {
    pub fn new(config: Config, mux: M) -> Self {
        let store = Store::new(&config.config_dir);
        Self { config, mux, store }
    }

    /// Run one action to completion
    pub fn run(&self, action: Action) -> Result<()> {
        match action {
            Action::List => self.list(),
            Action::Attach { name } => self.attach(name),
            Action::Save { yes } => self.save(yes),
            Action::Restore { force, yes } => self.restore(force, yes),
            Action::ListTemplates => self.list_templates(),
            Action::SaveTemplate { session_name, name } => {
                self.save_template(&session_name, name.as_deref())
            }
            Action::DeleteTemplate { template_name } => self.delete_template(&template_name),
            Action::NewSession {
                session_name,
                path,
                templ,
            } => self.new_session(&session_name, path, templ.as_deref()),
            Action::Version => {
                println!("tmxu version {}", self.config.version);
                Ok(())
            }
        }
    }

    fn list(&self) -> Result<()> {
        let sessions =
            tmux::list_summaries(&self.mux).context("Unable to list all tmux sessions")?;
        if sessions.is_empty() {
            println!("No sessions");
            return Ok(());
        }

        let rows: Vec<Vec<String>> = sessions
            .iter()
            .map(|s| {
                vec![
                    s.name.clone(),
                    format!("{} win", s.windows),
                    picker::age_since(s.created),
                ]
            })
            .collect();

        println!("Available sessions");
        print!("{}", render_table(&rows));
        Ok(())
    }

    fn attach(&self, name: Option<String>) -> Result<()> {
        let name = match name {
            Some(name) => name,
            None => {
                let sessions = tmux::list_summaries(&self.mux)
                    .context("Unable to list all tmux sessions")?;
                if sessions.is_empty() {
                    println!("No sessions");
                    return Ok(());
                }

                match picker::pick("tmux sessions", &sessions) {
                    Ok(index) => sessions[index].name.clone(),
                    Err(Error::Cancelled) => {
                        println!("Aborted.");
                        return Ok(());
                    }
                    Err(e) => return Err(e).context("Unable to show session picker"),
                }
            }
        };

        self.mux
            .attach(&name)
            .with_context(|| format!("Unable to attach to tmux session: {}", name))
    }

    fn save(&self, yes: bool) -> Result<()> {
        if !yes && !confirm("Save all tmux sessions?")? {
            println!("Aborted.");
            return Ok(());
        }

        let report = tmux::capture_all(&self.mux).context("Unable to list all tmux sessions")?;
        let path = self
            .store
            .save_sessions(&report.sessions)
            .context("Unable to save tmux sessions")?;
        println!(
            "Saved {} tmux session(s) at {}",
            report.sessions.len(),
            path.display()
        );

        if !report.failures.is_empty() {
            let reasons: Vec<String> = report.failures.iter().map(|e| e.to_string()).collect();
            bail!(
                "Unable to capture {} session(s):\n  {}",
                reasons.len(),
                reasons.join("\n  ")
            );
        }
        Ok(())
    }

    fn restore(&self, force: bool, yes: bool) -> Result<()> {
        if !yes && !confirm("Restore tmux sessions from saved file?")? {
            println!("Aborted.");
            return Ok(());
        }

        let sessions = self
            .store
            .load_sessions()
            .context("Unable to load sessions from session file")?;

        let report = Replayer::new(&self.mux, current_dir()?)
            .force(force)
            .restore_all(&sessions)
            .context("Unable to restore tmux sessions")?;

        for name in &report.skipped {
            println!("Session already exists: {}", name);
        }
        println!("Restored {} tmux session(s)", report.restored.len());
        Ok(())
    }

    fn list_templates(&self) -> Result<()> {
        let templates = self
            .store
            .list_templates()
            .with_context(|| {
                format!(
                    "Unable to list available templates in {}",
                    self.store.templates_dir().display()
                )
            })?;

        if templates.is_empty() {
            println!("No saved templates");
            return Ok(());
        }

        for template in &templates {
            let session = template.session();
            println!("{}: {} windows", template.name(), session.windows.len());
            for window in &session.windows {
                println!("  window {}: {} panes", window.name, window.panes.len());
                for pane in &window.panes {
                    println!("    pane: {}", pane.name);
                }
            }
        }
        Ok(())
    }

    fn save_template(&self, session_name: &str, template_name: Option<&str>) -> Result<()> {
        let exists = self
            .mux
            .has_session(session_name)
            .with_context(|| format!("Unable to check session: {}", session_name))?;
        if !exists {
            bail!("No running session named {}", session_name);
        }

        let session = tmux::capture_session(&self.mux, session_name, 1)
            .with_context(|| format!("Unable to capture session: {}", session_name))?;
        let template = derive_template(&session, template_name.unwrap_or(session_name));

        let path = self
            .store
            .save_template(&template)
            .with_context(|| format!("Unable to save session {} as template", session_name))?;
        info!(template = template.name(), "template saved");
        println!("Template saved at: {}", path.display());
        Ok(())
    }

    fn delete_template(&self, template_name: &str) -> Result<()> {
        let path = self
            .store
            .delete_template(template_name)
            .with_context(|| format!("Unable to delete template: {}", template_name))?;
        println!("Template deleted: {}", path.display());
        Ok(())
    }

    fn new_session(
        &self,
        session_name: &str,
        path: Option<PathBuf>,
        template_name: Option<&str>,
    ) -> Result<()> {
        let path = match path {
            Some(path) => path,
            None => current_dir()?,
        };

        let session = match template_name {
            Some(template_name) => {
                let template = self
                    .store
                    .load_template(template_name)
                    .with_context(|| format!("Unable to read template: {}", template_name))?;
                instantiate_template(&template, session_name, &path.to_string_lossy())
            }
            None => Session::new(session_name),
        };

        self.replay_new(&session, &path)?;
        println!(
            "Session: {} created!\nRun `tmxu attach {}` in order to use newly created session",
            session_name, session_name
        );
        Ok(())
    }

    fn replay_new(&self, session: &Session, fallback_dir: &Path) -> Result<()> {
        match Replayer::new(&self.mux, fallback_dir).replay_session(session) {
            Ok(()) => Ok(()),
            Err(e @ Error::SessionExists(_)) => Err(e.into()),
            Err(e) => {
                Err(e).with_context(|| format!("Unable to create session: {}", session.name))
            }
        }
    }
}

fn current_dir() -> Result<PathBuf> {
    env::current_dir().context("Cannot get the current directory")
}

/// Ask a yes/no question on stdin
fn confirm(question: &str) -> Result<bool> {
    print!("{} [y/N] ", question);
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    let answer = answer.trim();
    Ok(answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes"))
}

/// Left-aligned columns padded to the widest cell
fn render_table(rows: &[Vec<String>]) -> String {
    let cols = rows.iter().map(Vec::len).max().unwrap_or(0);
    let widths: Vec<usize> = (0..cols)
        .map(|i| {
            rows.iter()
                .filter_map(|row| row.get(i))
                .map(|cell| cell.chars().count())
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    for row in rows {
        let line: String = row
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("  {:<w$}", cell, w = width + 2))
            .collect();
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}
