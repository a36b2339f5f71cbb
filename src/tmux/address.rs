//! Target strings tmux resolves windows and panes by.

/// `session:order`
pub fn window_address(session_name: &str, order: u32) -> String {
    format!("{}:{}", session_name, order)
}

/// `session:window.order`
pub fn pane_address(session_window: &str, order: u32) -> String {
    format!("{}.{}", session_window, order)
}
