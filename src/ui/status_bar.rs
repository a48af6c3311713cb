//! Status line rendering
//!
//! One line at the bottom of the screen with the loading indicator and the
//! most useful key hints for the current mode.

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app::{App, InputMode};

/// Key hints for the current input mode
fn key_hints(mode: InputMode) -> &'static str {
    match mode {
        InputMode::Normal => "/ search  r refresh  ? help  q quit",
        InputMode::Editing => "Enter search  Esc cancel",
    }
}

/// Renders the status line into `area`
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let mut spans = Vec::new();

    if app.is_fetching() {
        spans.push(Span::styled(
            " Loading... ",
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::raw(" "));
    }

    if let Some(query) = &app.current_query {
        spans.push(Span::styled(
            format!("{}  ", query),
            Style::default().fg(Color::White),
        ));
    }

    spans.push(Span::styled(
        key_hints(app.input_mode),
        Style::default().fg(Color::DarkGray),
    ));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
