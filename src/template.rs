//! Path-parameterized session templates.
//!
//! A template keeps the shape of a session (windows, panes, names and
//! layouts) and drops every working directory. Instantiating one under a
//! new session name rewrites every address and gives all panes the same
//! directory; per-pane locations do not survive the round trip.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::tmux::{window_address, Session};

/// Stands in for working directories and session names inside a template
pub const PATH_PLACEHOLDER: &str = "TEMP_VALUE";

/// Names that are safe to use as a file stem
static RE_TEMPLATE_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-][A-Za-z0-9._-]*$").unwrap());

/// A captured session with its directories replaced by a placeholder.
///
/// Its `session_name`/`session_window` fields are markers built from the
/// placeholder and never address a live target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Template(Session);

impl Template {
    pub fn name(&self) -> &str {
        &self.0.name
    }

    pub fn session(&self) -> &Session {
        &self.0
    }
}

pub fn validate_name(name: &str) -> Result<()> {
    if RE_TEMPLATE_NAME.is_match(name) {
        Ok(())
    } else {
        Err(Error::InvalidName(name.to_string()))
    }
}

/// Strip a captured session down to its shape
pub fn derive_template(session: &Session, template_name: &str) -> Template {
    let mut shape = session.clone();
    shape.name = template_name.to_string();

    for window in &mut shape.windows {
        window.session_name = PATH_PLACEHOLDER.to_string();
        window.session_window = window_address(PATH_PLACEHOLDER, window.order);

        for pane in &mut window.panes {
            pane.path = PATH_PLACEHOLDER.to_string();
            pane.session_name = PATH_PLACEHOLDER.to_string();
            pane.session_window = window.session_window.clone();
        }
    }

    Template(shape)
}

/// Build a concrete session from a template
pub fn instantiate_template(template: &Template, session_name: &str, path: &str) -> Session {
    let mut session = template.0.clone();
    session.name = session_name.to_string();

    for window in &mut session.windows {
        window.session_name = session_name.to_string();
        window.session_window = window_address(session_name, window.order);

        for pane in &mut window.panes {
            pane.path = path.to_string();
            pane.session_name = session_name.to_string();
            pane.session_window = window.session_window.clone();
        }
    }

    session
}
