//! Weather dashboard view
//!
//! [`Dashboard`] holds the text of every display surface (temperature label,
//! timestamp, details, forecast list), the background theme and the loading
//! flag. It is updated through the [`Renderer`] trait and drawn with ratatui.
//! It never performs any network access.

use chrono::NaiveDateTime;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::data::WeatherSnapshot;
use crate::location::LocationQuery;
use crate::pipeline::Renderer;
use crate::theme::{background_for, Background};

/// Upstream format of `last_updated`
const UPSTREAM_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";
/// Display format for the last-updated surface
const DISPLAY_TIMESTAMP_FORMAT: &str = "%a %b %d %Y %H:%M";

mod colors {
    use ratatui::style::Color;

    /// Frame color when no background theme applies yet
    pub const FRAME: Color = Color::Cyan;
    /// Section headers
    pub const HEADER: Color = Color::Cyan;
    /// Primary text
    pub const PRIMARY: Color = Color::White;
    /// Labels and secondary text
    pub const SECONDARY: Color = Color::Gray;
    /// Weekday column in the forecast list
    pub const WEEKDAY: Color = Color::Yellow;
}

/// Contents of every display surface
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dashboard {
    /// "<temp>°C, <place>"
    pub temperature_label: String,
    pub last_updated: String,
    pub condition: String,
    pub country: String,
    pub lat: String,
    pub lon: String,
    /// "<n>%"
    pub cloud: String,
    /// "<n>%"
    pub humidity: String,
    /// "<n> kph"
    pub wind: String,
    pub uv: String,
    pub icon_url: String,
    /// Current background; unknown conditions keep the previous one
    pub background: Option<Background>,
    /// One "<Weekday> <condition>" entry per upcoming day, earliest first
    pub upcoming_days: Vec<String>,
    /// Loading indicator visibility
    pub loading: bool,
}

impl Dashboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// True until the first snapshot has been applied
    pub fn is_empty(&self) -> bool {
        self.temperature_label.is_empty()
    }

    /// Plain-text rendering used outside the TUI
    pub fn to_plain_text(&self) -> String {
        let mut lines = vec![
            self.temperature_label.clone(),
            format!("Updated:   {}", self.last_updated),
            format!("Condition: {}", self.condition),
            format!("Country:   {}", self.country),
            format!("Lat/Lon:   {}, {}", self.lat, self.lon),
            format!("Cloud:     {}", self.cloud),
            format!("Humidity:  {}", self.humidity),
            format!("Wind:      {}", self.wind),
            format!("UV index:  {}", self.uv),
            format!("Icon:      {}", self.icon_url),
        ];
        if let Some(background) = self.background {
            lines.push(format!("Theme:     {}", background.label()));
            lines.push(format!("Backdrop:  {}", background.image_ref()));
        }
        if !self.upcoming_days.is_empty() {
            lines.push(String::new());
            lines.push("Next days:".to_string());
            lines.extend(self.upcoming_days.iter().map(|day| format!("  {}", day)));
        }
        lines.join("\n")
    }
}

impl Renderer for Dashboard {
    fn show_loading(&mut self) {
        self.loading = true;
    }

    fn hide_loading(&mut self) {
        self.loading = false;
    }

    fn apply_snapshot(&mut self, snapshot: &WeatherSnapshot, display_name: &LocationQuery) {
        self.temperature_label = format!("{}°C, {}", snapshot.temp_celsius, display_name);
        self.last_updated = format_last_updated(&snapshot.last_updated);
        self.condition = snapshot.condition_text.clone();
        self.country = snapshot.country.clone();
        self.lat = snapshot.lat.to_string();
        self.lon = snapshot.lon.to_string();
        self.cloud = format!("{}%", snapshot.cloud_pct);
        self.humidity = format!("{}%", snapshot.humidity_pct);
        self.wind = format!("{} kph", snapshot.wind_kph);
        self.uv = snapshot.uv_index.to_string();
        self.icon_url = snapshot.icon_url.clone();

        if let Some(background) = background_for(&snapshot.condition_text) {
            self.background = Some(background);
        }

        self.upcoming_days.clear();
        self.upcoming_days.extend(
            snapshot
                .forecast
                .iter()
                .map(|day| format!("{} {}", day.weekday_name(), day.condition_text)),
        );
    }
}

/// Format the upstream timestamp for display, falling back to the raw text
fn format_last_updated(raw: &str) -> String {
    match NaiveDateTime::parse_from_str(raw, UPSTREAM_TIMESTAMP_FORMAT) {
        Ok(timestamp) => timestamp.format(DISPLAY_TIMESTAMP_FORMAT).to_string(),
        Err(_) => raw.to_string(),
    }
}

/// Renders the dashboard into `area`
pub fn render(frame: &mut Frame, area: Rect, dashboard: &Dashboard) {
    let frame_color = dashboard
        .background
        .map(|b| b.color())
        .unwrap_or(colors::FRAME);

    let title = match dashboard.background {
        Some(background) => format!(" Skycast · {} ", background.label()),
        None => " Skycast ".to_string(),
    };

    let main_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(frame_color))
        .title(Span::styled(
            title,
            Style::default()
                .fg(colors::PRIMARY)
                .add_modifier(Modifier::BOLD),
        ));

    let inner = main_block.inner(area);
    frame.render_widget(main_block, area);

    if dashboard.is_empty() {
        render_placeholder(frame, inner, dashboard.loading);
        return;
    }

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(9), Constraint::Min(3)])
        .split(inner);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[0]);

    render_current(frame, columns[0], dashboard);
    render_details(frame, columns[1], dashboard);
    render_upcoming_days(frame, rows[1], dashboard);
}

/// Shown before any snapshot has been applied
fn render_placeholder(frame: &mut Frame, area: Rect, loading: bool) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(45),
            Constraint::Length(1),
            Constraint::Percentage(45),
        ])
        .split(area);

    let text = if loading {
        "Fetching weather..."
    } else {
        "No weather yet. Press / to search for a place."
    };

    let paragraph = Paragraph::new(text)
        .style(Style::default().fg(colors::SECONDARY))
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, chunks[1]);
}

fn render_current(frame: &mut Frame, area: Rect, dashboard: &Dashboard) {
    let mut lines = vec![
        Line::from(Span::styled(
            dashboard.temperature_label.clone(),
            Style::default()
                .fg(colors::PRIMARY)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            dashboard.last_updated.clone(),
            Style::default().fg(colors::SECONDARY),
        )),
        Line::from(""),
        Line::from(Span::styled(
            dashboard.condition.clone(),
            Style::default().fg(colors::PRIMARY),
        )),
        Line::from(Span::styled(
            dashboard.icon_url.clone(),
            Style::default().fg(Color::DarkGray),
        )),
    ];
    if let Some(background) = dashboard.background {
        lines.push(Line::from(Span::styled(
            background.image_ref(),
            Style::default().fg(Color::DarkGray),
        )));
    }

    let block = Block::default()
        .title(Span::styled(" Now ", Style::default().fg(colors::HEADER)))
        .borders(Borders::ALL);

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_details(frame: &mut Frame, area: Rect, dashboard: &Dashboard) {
    let lines = vec![
        detail_line("Country", &dashboard.country),
        detail_line("Lat", &dashboard.lat),
        detail_line("Lon", &dashboard.lon),
        detail_line("Cloud", &dashboard.cloud),
        detail_line("Humidity", &dashboard.humidity),
        detail_line("Wind", &dashboard.wind),
        detail_line("UV", &dashboard.uv),
    ];

    let block = Block::default()
        .title(Span::styled(
            " Details ",
            Style::default().fg(colors::HEADER),
        ))
        .borders(Borders::ALL);

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn detail_line(label: &str, value: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            format!("{:<10}", label),
            Style::default().fg(colors::SECONDARY),
        ),
        Span::styled(value.to_string(), Style::default().fg(colors::PRIMARY)),
    ])
}

fn render_upcoming_days(frame: &mut Frame, area: Rect, dashboard: &Dashboard) {
    let lines: Vec<Line> = dashboard
        .upcoming_days
        .iter()
        .map(|entry| {
            // Entries are "<Weekday> <condition>"
            let (weekday, condition) = entry.split_once(' ').unwrap_or((entry.as_str(), ""));
            Line::from(vec![
                Span::styled(
                    format!("{:<5}", weekday),
                    Style::default().fg(colors::WEEKDAY),
                ),
                Span::raw(condition.to_string()),
            ])
        })
        .collect();

    let block = Block::default()
        .title(Span::styled(
            " Next days ",
            Style::default().fg(colors::HEADER),
        ))
        .borders(Borders::ALL);

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
