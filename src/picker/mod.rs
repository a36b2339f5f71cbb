//! Raw-terminal picker for choosing one item from a list.
//!
//! Input is consumed one byte at a time: Enter picks the highlighted item,
//! `q` cancels, and escape sequences move the highlight. A lone Escape with
//! nothing else buffered cancels as well, which is how it is told apart
//! from the first byte of an arrow key.

use std::io::{self, BufRead, BufReader, Read};
use std::time::{SystemTime, UNIX_EPOCH};

use crossterm::{cursor, execute, terminal};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, ListState, Paragraph},
    Frame, Terminal,
};

use crate::error::{Error, Result};
use crate::tmux::SessionSummary;

const ENTER: u8 = 13;
const ESCAPE: u8 = 27;
const QUIT: u8 = b'q';

const RULE: &str = " ────────────────────────────────────────────────";
const TITLE_WIDTH: usize = 25;

/// Something that can be listed in the picker
pub trait MenuItem {
    fn title(&self) -> &str;
    fn desc(&self) -> String;
}

impl MenuItem for SessionSummary {
    fn title(&self) -> &str {
        &self.name
    }

    fn desc(&self) -> String {
        format!("{} win · {}", self.windows, age_since(self.created))
    }
}

/// Relative age of a unix timestamp
pub fn age_since(created: u64) -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    relative_age(now.saturating_sub(created))
}

/// Human readable age such as `3h ago`
pub fn relative_age(seconds: u64) -> String {
    const MINUTE: u64 = 60;
    const HOUR: u64 = 60 * MINUTE;
    const DAY: u64 = 24 * HOUR;
    const MONTH: u64 = 28 * DAY;
    const YEAR: u64 = 12 * MONTH;

    match seconds {
        s if s < MINUTE => "just now".to_string(),
        s if s < HOUR => format!("{}min ago", s / MINUTE),
        s if s < DAY => format!("{}h ago", s / HOUR),
        s if s < MONTH => format!("{}d ago", s / DAY),
        s if s < YEAR => format!("{}m ago", s / MONTH),
        s => format!("{}y ago", s / YEAR),
    }
}

/// Colors used by the picker
pub struct Theme {
    pub fg: Color,
    pub accent: Color,
    pub dim: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            fg: Color::Rgb(220, 220, 220),
            accent: Color::Rgb(217, 119, 87),
            dim: Color::Rgb(100, 100, 100),
        }
    }
}

/// Result of feeding input to the selector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Continue,
    Selected(usize),
    Cancelled,
}

/// Highlight position over a list of `len` items
#[derive(Debug)]
pub struct Selector {
    len: usize,
    selected: usize,
}

impl Selector {
    pub fn new(len: usize) -> Self {
        Self { len, selected: 0 }
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    fn up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    fn down(&mut self) {
        if self.selected + 1 < self.len {
            self.selected += 1;
        }
    }

    /// Block for one byte of input and apply it.
    ///
    /// End of input counts as cancellation.
    pub fn step<R: Read>(&mut self, input: &mut BufReader<R>) -> io::Result<Step> {
        let Some(byte) = read_byte(input)? else {
            return Ok(Step::Cancelled);
        };

        match byte {
            ENTER if self.len > 0 => Ok(Step::Selected(self.selected)),
            QUIT => Ok(Step::Cancelled),
            ESCAPE => {
                let pending = input.buffer();
                if pending.is_empty() {
                    return Ok(Step::Cancelled);
                }

                let n = pending.len().min(2);
                match pending[..n] {
                    [b'[', b'A'] => self.up(),
                    [b'[', b'B'] => self.down(),
                    _ => {}
                }
                input.consume(n);
                Ok(Step::Continue)
            }
            _ => Ok(Step::Continue),
        }
    }
}

fn read_byte<R: Read>(input: &mut BufReader<R>) -> io::Result<Option<u8>> {
    let mut byte = [0u8; 1];
    loop {
        match input.read(&mut byte) {
            Ok(0) => return Ok(None),
            Ok(_) => return Ok(Some(byte[0])),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
}

/// Raw mode and a hidden cursor for as long as the guard lives
struct RawModeGuard;

impl RawModeGuard {
    fn acquire() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        if let Err(e) = execute!(io::stdout(), cursor::Hide) {
            let _ = terminal::disable_raw_mode();
            return Err(e);
        }
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = execute!(io::stdout(), cursor::Show);
        let _ = terminal::disable_raw_mode();
    }
}

/// Let the user pick one item on the controlling terminal
pub fn pick<T: MenuItem>(title: &str, items: &[T]) -> Result<usize> {
    let _raw = RawModeGuard::acquire().map_err(Error::Terminal)?;

    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout())).map_err(Error::Terminal)?;
    terminal.clear().map_err(Error::Terminal)?;

    let mut input = BufReader::new(io::stdin());
    let choice = select(&mut terminal, &mut input, title, items);

    let _ = terminal.clear();
    choice
}

/// Draw the list and feed input to a selector until it settles
pub fn select<B: Backend, R: Read, T: MenuItem>(
    terminal: &mut Terminal<B>,
    input: &mut BufReader<R>,
    title: &str,
    items: &[T],
) -> Result<usize> {
    let theme = Theme::default();
    let mut selector = Selector::new(items.len());

    loop {
        terminal
            .draw(|frame| render(frame, &theme, title, items, selector.selected()))
            .map_err(Error::Terminal)?;

        match selector.step(input).map_err(Error::Terminal)? {
            Step::Continue => {}
            Step::Selected(index) => return Ok(index),
            Step::Cancelled => return Err(Error::Cancelled),
        }
    }
}

fn render<T: MenuItem>(frame: &mut Frame, theme: &Theme, title: &str, items: &[T], selected: usize) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Items
            Constraint::Length(2), // Footer
        ])
        .split(frame.area());

    let header = Paragraph::new(vec![
        Line::from(Span::styled(
            format!(" {} ", title),
            Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(RULE, Style::default().fg(theme.dim))),
    ]);
    frame.render_widget(header, chunks[0]);

    let rows: Vec<ListItem> = items
        .iter()
        .map(|item| {
            let leader = "·".repeat(TITLE_WIDTH.saturating_sub(item.title().chars().count()));
            ListItem::new(Line::from(vec![
                Span::styled(format!("{} ", item.title()), Style::default().fg(theme.fg)),
                Span::styled(format!("{} ", leader), Style::default().fg(theme.dim)),
                Span::styled(item.desc(), Style::default().fg(theme.dim)),
            ]))
        })
        .collect();

    let list = List::new(rows)
        .highlight_style(Style::default().fg(theme.accent).add_modifier(Modifier::BOLD))
        .highlight_symbol("> ");
    let mut state = ListState::default();
    state.select(Some(selected));
    frame.render_stateful_widget(list, chunks[1], &mut state);

    let footer = Paragraph::new(vec![
        Line::from(Span::styled(RULE, Style::default().fg(theme.dim))),
        Line::from(Span::styled(
            " Use ↑/↓ to navigate, Enter to select, q to quit",
            Style::default().fg(theme.dim),
        )),
    ]);
    frame.render_widget(footer, chunks[2]);
}
