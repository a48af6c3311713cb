//! UI rendering module for Skycast
//!
//! This module contains all the rendering logic for the terminal user interface,
//! using the ratatui library for TUI components.

pub mod dashboard;
pub mod help_overlay;
pub mod search_bar;
pub mod status_bar;

pub use dashboard::Dashboard;
pub use help_overlay::render as render_help_overlay;

use ratatui::{
    layout::{Constraint, Direction, Layout},
    Frame,
};

use crate::app::App;

/// Renders the whole screen for the current application state
pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .split(frame.area());

    search_bar::render(frame, chunks[0], app);
    dashboard::render(frame, chunks[1], &app.dashboard);
    status_bar::render(frame, chunks[2], app);

    if app.show_help {
        render_help_overlay(frame);
    }
}
